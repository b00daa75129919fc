//! Image geometry shared by the crop engine.
//!
//! Two coordinate systems are in play:
//!
//! - **Natural space**: the image's true pixel grid, natural width by natural height.
//! - **Display space**: the downscaled preview the user interacts with,
//!   bounded by a maximum box.
//!
//! Origin is the top-left corner in both.

pub mod mapper;
pub mod ratio;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WebpressError};

pub use mapper::CoordinateMapper;
pub use ratio::{gcd, simplify};

/// A position in either space, as delivered by a pointer (may be fractional).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A whole-pixel position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: u32,
    pub y: u32,
}

impl PixelPoint {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<PixelPoint> for Point {
    fn from(p: PixelPoint) -> Self {
        Point::new(p.x as f64, p.y as f64)
    }
}

/// Natural and display dimensions of the active image.
///
/// Replaced wholesale when the active image changes. The default value is
/// the "not yet loaded" geometry with every dimension at zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGeometry {
    pub natural_width: u32,
    pub natural_height: u32,
    pub display_width: u32,
    pub display_height: u32,
}

impl ImageGeometry {
    /// Fit a `natural_width x natural_height` image into a `max_width x max_height`
    /// preview box, preserving aspect ratio. Images smaller than the box keep
    /// their natural size.
    pub fn fit(natural_width: u32, natural_height: u32, max_width: u32, max_height: u32) -> Result<Self> {
        if natural_width == 0 || natural_height == 0 {
            return Err(WebpressError::InvalidDimensions {
                width: natural_width,
                height: natural_height,
            });
        }
        if max_width == 0 || max_height == 0 {
            return Err(WebpressError::InvalidDimensions {
                width: max_width,
                height: max_height,
            });
        }

        let scale = (max_width as f64 / natural_width as f64)
            .min(max_height as f64 / natural_height as f64)
            .min(1.0);

        let display_width = ((natural_width as f64 * scale).round() as u32).clamp(1, natural_width);
        let display_height = ((natural_height as f64 * scale).round() as u32).clamp(1, natural_height);

        Ok(Self {
            natural_width,
            natural_height,
            display_width,
            display_height,
        })
    }

    /// Geometry where display and natural space coincide.
    pub fn unscaled(width: u32, height: u32) -> Result<Self> {
        Self::fit(width, height, width, height)
    }

    pub fn is_loaded(&self) -> bool {
        self.natural_width > 0
            && self.natural_height > 0
            && self.display_width > 0
            && self.display_height > 0
    }
}
