use crate::geometry::{PixelPoint, Point};

use super::engine::CropEngine;
use super::rect::CropRect;

/// Pointer interaction state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// A selection is being dragged out from `anchor` (natural space).
    Dragging { anchor: PixelPoint },
}

/// Turns pointer events on the preview into crop edits.
///
/// Points are given in display space and mapped through the engine's
/// [`CoordinateMapper`](crate::geometry::CoordinateMapper).
#[derive(Clone, Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Begin a new selection at `at`. Ignored while cropping is disabled.
    pub fn pointer_down(&mut self, engine: &mut CropEngine, at: Point) {
        if !engine.is_enabled() {
            return;
        }
        let geometry = *engine.geometry();
        let p = engine.mapper().to_natural(at);
        let anchor = PixelPoint {
            x: p.x.min(geometry.natural_width.saturating_sub(1)),
            y: p.y.min(geometry.natural_height.saturating_sub(1)),
        };
        engine.begin_selection(anchor);
        self.state = DragState::Dragging { anchor };
    }

    /// Stretch the selection between the anchor and `at`, in any direction.
    pub fn pointer_move(&mut self, engine: &mut CropEngine, at: Point) {
        let DragState::Dragging { anchor } = self.state else {
            return;
        };
        if !engine.is_enabled() {
            self.state = DragState::Idle;
            return;
        }
        let current = engine.mapper().to_natural(at);
        let aspect = engine.is_ratio_locked().then(|| engine.aspect());

        let raw_w = anchor.x.abs_diff(current.x);
        let raw_h = anchor.y.abs_diff(current.y);
        let (w, h) = match aspect {
            Some(spec) => spec.shrink_to_ratio(raw_w, raw_h),
            None => (raw_w, raw_h),
        };
        let w = w.max(1);
        let h = h.max(1);

        // Keep the anchor corner fixed when the ratio shrinks the box.
        let x = if current.x >= anchor.x { anchor.x } else { anchor.x - w };
        let y = if current.y >= anchor.y { anchor.y } else { anchor.y - h };

        engine.apply_drag(CropRect::new(x, y, w, h));
    }

    /// End the drag. In ratio mode the dragged size becomes the aspect spec's
    /// locked value so later numeric edits start from it.
    pub fn pointer_up(&mut self, engine: &mut CropEngine) {
        if !self.is_dragging() {
            return;
        }
        self.state = DragState::Idle;
        if engine.is_enabled() && engine.is_ratio_locked() {
            engine.commit_drag_extent();
        }
    }

    /// Pointer left the surface; same as releasing it.
    pub fn pointer_cancel(&mut self, engine: &mut CropEngine) {
        self.pointer_up(engine);
    }
}
