use super::{ImageGeometry, PixelPoint, Point};

/// Converts positions between display space and natural space.
///
/// X and Y use independent scale factors; the preview is never forced square.
/// Inputs are clamped to the source space before scaling and results are
/// rounded to the nearest pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CoordinateMapper {
    geometry: ImageGeometry,
}

impl CoordinateMapper {
    pub fn new(geometry: ImageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    fn is_degenerate(&self) -> bool {
        !self.geometry.is_loaded()
    }

    /// Display-space point to natural-space pixel. `(0,0)` before an image is loaded.
    pub fn to_natural(&self, p: Point) -> PixelPoint {
        if self.is_degenerate() {
            return PixelPoint::default();
        }
        let g = &self.geometry;
        let scale_x = g.natural_width as f64 / g.display_width as f64;
        let scale_y = g.natural_height as f64 / g.display_height as f64;
        PixelPoint {
            x: scale_axis(p.x, g.display_width, scale_x),
            y: scale_axis(p.y, g.display_height, scale_y),
        }
    }

    /// Natural-space point to display-space pixel. `(0,0)` before an image is loaded.
    pub fn to_display(&self, p: Point) -> PixelPoint {
        if self.is_degenerate() {
            return PixelPoint::default();
        }
        let g = &self.geometry;
        let scale_x = g.display_width as f64 / g.natural_width as f64;
        let scale_y = g.display_height as f64 / g.natural_height as f64;
        PixelPoint {
            x: scale_axis(p.x, g.natural_width, scale_x),
            y: scale_axis(p.y, g.natural_height, scale_y),
        }
    }
}

fn scale_axis(value: f64, bound: u32, scale: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    (value.clamp(0.0, bound as f64) * scale).round() as u32
}
