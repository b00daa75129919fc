use tracing::debug;

use crate::error::{Result, WebpressError};
use crate::geometry::{simplify, CoordinateMapper, ImageGeometry, PixelPoint};

use super::aspect::{AspectSpec, LockedDimension};
use super::rect::{CropField, CropRect};

/// How width and height are edited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CropMode {
    /// Width and height are edited independently.
    #[default]
    Manual,
    /// Width and height follow the active [`AspectSpec`].
    RatioLocked,
}

/// Owns the crop rectangle of the active image and keeps it valid.
///
/// Every operation leaves the rect inside the image with both sides >= 1.
/// Edits that cannot satisfy that are rejected and the previous rect stays.
#[derive(Clone, Debug)]
pub struct CropEngine {
    geometry: ImageGeometry,
    rect: CropRect,
    enabled: bool,
    mode: CropMode,
    aspect: AspectSpec,
}

impl CropEngine {
    pub fn new(geometry: ImageGeometry) -> Result<Self> {
        check_loaded(&geometry)?;
        Ok(Self {
            geometry,
            rect: CropRect::full(&geometry),
            enabled: false,
            mode: CropMode::Manual,
            aspect: full_image_aspect(&geometry),
        })
    }

    /// Switch to a new image. The rect and aspect spec reset to the full
    /// image; mode and the enabled flag carry over.
    pub fn load(&mut self, geometry: ImageGeometry) -> Result<()> {
        check_loaded(&geometry)?;
        self.geometry = geometry;
        self.rect = CropRect::full(&geometry);
        self.aspect = full_image_aspect(&geometry);
        Ok(())
    }

    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(self.geometry)
    }

    pub fn rect(&self) -> CropRect {
        self.rect
    }

    pub fn aspect(&self) -> AspectSpec {
        self.aspect
    }

    pub fn mode(&self) -> CropMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_ratio_locked(&self) -> bool {
        self.mode == CropMode::RatioLocked
    }

    /// Disabling resets the rect to the full image. Enabling in ratio mode
    /// sizes the rect from the current aspect spec.
    pub fn set_enabled(&mut self, enabled: bool) {
        let was_enabled = self.enabled;
        self.enabled = enabled;
        if !enabled {
            self.select_full_image();
        } else if !was_enabled && self.mode == CropMode::RatioLocked {
            self.reapply_aspect();
        }
    }

    /// Switching into ratio mode recomputes the rect from the current aspect
    /// spec; a degenerate result leaves the rect as it was.
    pub fn set_mode(&mut self, mode: CropMode) {
        self.mode = mode;
        if self.enabled && mode == CropMode::RatioLocked {
            self.reapply_aspect();
        }
    }

    /// Apply a numeric edit to one field, then clamp against the image.
    ///
    /// In ratio mode a width or height edit pins that side as the locked
    /// dimension, and an origin edit re-derives the size from the aspect spec.
    pub fn set_manual_field(&mut self, field: CropField, value: i64) -> Result<()> {
        if !self.enabled {
            return Err(WebpressError::CropDisabled);
        }

        if self.mode == CropMode::RatioLocked {
            return self.set_ratio_field(field, value);
        }

        let (nat_w, nat_h) = self.natural_size();
        let mut rect = self.rect;
        match field {
            CropField::X => rect.x = clamp_to(value, 0, nat_w as i64 - 1),
            CropField::Y => rect.y = clamp_to(value, 0, nat_h as i64 - 1),
            CropField::Width => rect.width = clamp_to(value, 1, (nat_w - rect.x) as i64),
            CropField::Height => rect.height = clamp_to(value, 1, (nat_h - rect.y) as i64),
        }
        // An origin move may push the existing size past the edge.
        self.rect = rect.clamped(nat_w, nat_h);
        Ok(())
    }

    fn set_ratio_field(&mut self, field: CropField, value: i64) -> Result<()> {
        let (nat_w, nat_h) = self.natural_size();
        match field {
            CropField::Width | CropField::Height => {
                let locked = if field == CropField::Width {
                    LockedDimension::Width
                } else {
                    LockedDimension::Height
                };
                let locked_value = value.clamp(0, u32::MAX as i64) as u32;
                self.set_aspect_spec(AspectSpec {
                    locked,
                    locked_value,
                    ..self.aspect
                })
            }
            CropField::X | CropField::Y => {
                let mut origin = self.rect;
                if field == CropField::X {
                    origin.x = clamp_to(value, 0, nat_w as i64 - 1);
                } else {
                    origin.y = clamp_to(value, 0, nat_h as i64 - 1);
                }
                let sized = self.aspect_rect_at(&self.aspect, origin.x, origin.y)?;
                self.rect = sized;
                Ok(())
            }
        }
    }

    /// Adopt a new aspect spec. In ratio mode (while enabled) the rect is
    /// recomputed from it; if that would be degenerate, both the rect and the
    /// previous spec are kept.
    pub fn set_aspect_spec(&mut self, spec: AspectSpec) -> Result<()> {
        spec.validate()?;
        if self.enabled && self.mode == CropMode::RatioLocked {
            let rect = self.aspect_rect_at(&spec, self.rect.x, self.rect.y)?;
            self.rect = rect;
        }
        self.aspect = spec;
        Ok(())
    }

    pub fn select_full_image(&mut self) {
        self.rect = CropRect::full(&self.geometry);
    }

    /// Keep the current size and move it to the middle of the image.
    pub fn center_crop(&mut self) {
        let (nat_w, nat_h) = self.natural_size();
        self.rect.x = nat_w.saturating_sub(self.rect.width) / 2;
        self.rect.y = nat_h.saturating_sub(self.rect.height) / 2;
        self.rect = self.rect.clamped(nat_w, nat_h);
    }

    /// Use the current selection's reduced ratio as the aspect spec. The rect
    /// itself does not change.
    pub fn derive_ratio_from_current(&mut self) -> AspectSpec {
        let (ratio_w, ratio_h) = simplify(self.rect.width as f64, self.rect.height as f64);
        self.aspect = AspectSpec {
            ratio_w,
            ratio_h,
            ..self.aspect
        }
        .with_extent(self.rect.width, self.rect.height);
        self.aspect
    }

    /// Start of a drag: a minimal selection at `anchor`.
    pub(crate) fn begin_selection(&mut self, anchor: PixelPoint) {
        let (nat_w, nat_h) = self.natural_size();
        self.rect = CropRect::new(anchor.x, anchor.y, 1, 1).clamped(nat_w, nat_h);
    }

    pub(crate) fn apply_drag(&mut self, rect: CropRect) {
        let (nat_w, nat_h) = self.natural_size();
        self.rect = rect.clamped(nat_w, nat_h);
    }

    /// Pin the aspect spec's locked side to the size that was just dragged.
    pub(crate) fn commit_drag_extent(&mut self) {
        self.aspect = self.aspect.with_extent(self.rect.width, self.rect.height);
    }

    fn reapply_aspect(&mut self) {
        match self.aspect_rect_at(&self.aspect, self.rect.x, self.rect.y) {
            Ok(rect) => self.rect = rect,
            Err(e) => debug!(error = %e, "Aspect spec not applied"),
        }
    }

    fn aspect_rect_at(&self, spec: &AspectSpec, x: u32, y: u32) -> Result<CropRect> {
        let (nat_w, nat_h) = self.natural_size();
        let (w, h) = spec.extent();
        let w = w.min((nat_w - x) as i64);
        let h = h.min((nat_h - y) as i64);
        if w <= 0 || h <= 0 {
            debug!(width = w, height = h, %spec, "Rejected degenerate aspect crop");
            return Err(WebpressError::DegenerateCrop { width: w, height: h });
        }
        Ok(CropRect::new(x, y, w as u32, h as u32))
    }

    fn natural_size(&self) -> (u32, u32) {
        (self.geometry.natural_width, self.geometry.natural_height)
    }
}

/// The image's own reduced ratio, locked on its full width.
fn full_image_aspect(geometry: &ImageGeometry) -> AspectSpec {
    let (ratio_w, ratio_h) = simplify(geometry.natural_width as f64, geometry.natural_height as f64);
    AspectSpec {
        ratio_w,
        ratio_h,
        locked: LockedDimension::Width,
        locked_value: geometry.natural_width,
    }
}

fn check_loaded(geometry: &ImageGeometry) -> Result<()> {
    if !geometry.is_loaded() {
        return Err(WebpressError::InvalidDimensions {
            width: geometry.natural_width,
            height: geometry.natural_height,
        });
    }
    Ok(())
}

fn clamp_to(value: i64, min: i64, max: i64) -> u32 {
    value.clamp(min, max.max(min)) as u32
}
