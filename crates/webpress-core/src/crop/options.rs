use serde::{Deserialize, Serialize};

use crate::error::{Result, WebpressError};
use crate::geometry::ImageGeometry;

use super::engine::CropEngine;
use super::rect::CropRect;

/// Crop parameters as submitted with a conversion job.
///
/// `crop_size_*` is the size of the surface the rect was specified on; the
/// converter rescales `crop_top_*` / `crop_w` / `crop_h` from that surface to
/// the decoded image. A crop is only applied when all six fields are set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_size_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_size_h: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_top_x: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_top_y: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_w: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crop_h: Option<u32>,
}

impl CropOptions {
    /// Options for a natural-space rect. The surface is the natural image, so
    /// the converter's rescale is exact.
    pub fn from_rect(rect: &CropRect, geometry: &ImageGeometry) -> Self {
        Self {
            crop_size_w: Some(geometry.natural_width),
            crop_size_h: Some(geometry.natural_height),
            crop_top_x: Some(rect.x),
            crop_top_y: Some(rect.y),
            crop_w: Some(rect.width),
            crop_h: Some(rect.height),
        }
    }

    /// Options for the engine's current state; empty while cropping is disabled.
    pub fn from_engine(engine: &CropEngine) -> Self {
        if !engine.is_enabled() {
            return Self::default();
        }
        Self::from_rect(&engine.rect(), engine.geometry())
    }

    pub fn has_crop(&self) -> bool {
        self.crop_size_w.is_some()
            && self.crop_size_h.is_some()
            && self.crop_top_x.is_some()
            && self.crop_top_y.is_some()
            && self.crop_w.is_some()
            && self.crop_h.is_some()
    }

    /// Rescale the submitted rect onto a `natural_w x natural_h` image.
    ///
    /// Half pixels round to even. Returns `Ok(None)` when no crop was requested.
    pub fn resolve(&self, natural_w: u32, natural_h: u32) -> Result<Option<CropRect>> {
        let (Some(size_w), Some(size_h), Some(top_x), Some(top_y), Some(w), Some(h)) = (
            self.crop_size_w,
            self.crop_size_h,
            self.crop_top_x,
            self.crop_top_y,
            self.crop_w,
            self.crop_h,
        ) else {
            return Ok(None);
        };

        if size_w == 0 || size_h == 0 {
            return Err(WebpressError::InvalidCrop(format!(
                "Crop surface must be non-empty, got {size_w}x{size_h}"
            )));
        }

        let scale_x = natural_w as f64 / size_w as f64;
        let scale_y = natural_h as f64 / size_h as f64;
        let rect = CropRect {
            x: (top_x as f64 * scale_x).round_ties_even() as u32,
            y: (top_y as f64 * scale_y).round_ties_even() as u32,
            width: (w as f64 * scale_x).round_ties_even() as u32,
            height: (h as f64 * scale_y).round_ties_even() as u32,
        };

        rect.validated(natural_w, natural_h).map(Some)
    }
}
