use serde::{Deserialize, Serialize};

use crate::error::{Result, WebpressError};
use crate::geometry::ImageGeometry;

/// A rectangle in natural-space pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The whole image.
    pub fn full(geometry: &ImageGeometry) -> Self {
        Self {
            x: 0,
            y: 0,
            width: geometry.natural_width,
            height: geometry.natural_height,
        }
    }

    /// True when the rect is non-empty and lies entirely inside a `src_w x src_h` image.
    pub fn fits_within(&self, src_w: u32, src_h: u32) -> bool {
        self.width >= 1
            && self.height >= 1
            && self.x < src_w
            && self.y < src_h
            && self.x as u64 + self.width as u64 <= src_w as u64
            && self.y as u64 + self.height as u64 <= src_h as u64
    }

    /// Validate the rect against source dimensions.
    pub fn validated(&self, src_w: u32, src_h: u32) -> Result<CropRect> {
        if self.width == 0 || self.height == 0 {
            return Err(WebpressError::InvalidCrop(
                "Crop width and height must be > 0".into(),
            ));
        }

        if !self.fits_within(src_w, src_h) {
            return Err(WebpressError::InvalidCrop(format!(
                "Crop region ({},{} {}x{}) exceeds source dimensions ({src_w}x{src_h})",
                self.x, self.y, self.width, self.height
            )));
        }

        Ok(*self)
    }

    /// Clamp origin into the image, then size into what remains past the origin.
    pub(crate) fn clamped(self, src_w: u32, src_h: u32) -> CropRect {
        let x = self.x.min(src_w.saturating_sub(1));
        let y = self.y.min(src_h.saturating_sub(1));
        CropRect {
            x,
            y,
            width: self.width.clamp(1, (src_w - x).max(1)),
            height: self.height.clamp(1, (src_h - y).max(1)),
        }
    }
}

/// One of the four numeric crop fields a user can edit directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropField {
    X,
    Y,
    Width,
    Height,
}

impl std::fmt::Display for CropField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => write!(f, "x"),
            Self::Y => write!(f, "y"),
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}
