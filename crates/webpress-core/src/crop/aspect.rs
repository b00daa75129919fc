use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WebpressError};

/// Which side of the crop the user pinned while in ratio-locked mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockedDimension {
    #[default]
    Width,
    Height,
}

impl fmt::Display for LockedDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Width => write!(f, "width"),
            Self::Height => write!(f, "height"),
        }
    }
}

/// Ratio-locked crop parameters.
///
/// The locked dimension takes `locked_value` pixels and the other side is
/// derived from `ratio_w:ratio_h`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectSpec {
    pub ratio_w: u32,
    pub ratio_h: u32,
    pub locked: LockedDimension,
    pub locked_value: u32,
}

impl AspectSpec {
    pub fn new(ratio_w: u32, ratio_h: u32, locked: LockedDimension, locked_value: u32) -> Result<Self> {
        let spec = Self {
            ratio_w,
            ratio_h,
            locked,
            locked_value,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<()> {
        if self.ratio_w == 0 || self.ratio_h == 0 {
            return Err(WebpressError::InvalidRatio {
                ratio_w: self.ratio_w,
                ratio_h: self.ratio_h,
            });
        }
        Ok(())
    }

    /// Width and height implied by the locked side, before any clamping.
    pub fn extent(&self) -> (i64, i64) {
        let value = self.locked_value as i64;
        let rw = self.ratio_w.max(1) as f64;
        let rh = self.ratio_h.max(1) as f64;
        match self.locked {
            LockedDimension::Width => (value, (value as f64 * rh / rw).round() as i64),
            LockedDimension::Height => ((value as f64 * rw / rh).round() as i64, value),
        }
    }

    /// Shrink whichever side of `width x height` over-extends relative to the
    /// ratio. Neither side ever grows.
    pub fn shrink_to_ratio(&self, width: u32, height: u32) -> (u32, u32) {
        let rw = self.ratio_w.max(1) as u64;
        let rh = self.ratio_h.max(1) as u64;
        if width as u64 * rh > height as u64 * rw {
            let w = (height as f64 * rw as f64 / rh as f64).round() as u32;
            (w.min(width), height)
        } else {
            let h = (width as f64 * rh as f64 / rw as f64).round() as u32;
            (width, h.min(height))
        }
    }

    /// Same ratio, with the locked side pinned to the matching side of `width x height`.
    pub fn with_extent(&self, width: u32, height: u32) -> Self {
        let locked_value = match self.locked {
            LockedDimension::Width => width,
            LockedDimension::Height => height,
        };
        Self {
            locked_value,
            ..*self
        }
    }
}

impl Default for AspectSpec {
    fn default() -> Self {
        Self {
            ratio_w: 1,
            ratio_h: 1,
            locked: LockedDimension::Width,
            locked_value: 1,
        }
    }
}

impl fmt::Display for AspectSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} ({} locked at {} px)",
            self.ratio_w, self.ratio_h, self.locked, self.locked_value
        )
    }
}

/// Crop aspect ratio presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectPreset {
    #[default]
    Free,
    Square,
    ThreeByFour,
    FourByThree,
    SixteenByNine,
}

impl AspectPreset {
    pub const ALL: &[Self] = &[
        Self::Free,
        Self::Square,
        Self::ThreeByFour,
        Self::FourByThree,
        Self::SixteenByNine,
    ];

    /// Return the `w:h` terms, or `None` for free.
    pub fn ratio(&self) -> Option<(u32, u32)> {
        match self {
            Self::Free => None,
            Self::Square => Some((1, 1)),
            Self::ThreeByFour => Some((3, 4)),
            Self::FourByThree => Some((4, 3)),
            Self::SixteenByNine => Some((16, 9)),
        }
    }

    /// Ratio-locked spec for this preset, or `None` for free.
    pub fn to_spec(&self, locked: LockedDimension, locked_value: u32) -> Option<AspectSpec> {
        self.ratio().map(|(ratio_w, ratio_h)| AspectSpec {
            ratio_w,
            ratio_h,
            locked,
            locked_value,
        })
    }

    /// Parse the label form used by [`fmt::Display`] (`"free"`, `"16:9"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.to_string().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for AspectPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "Free"),
            Self::Square => write!(f, "1:1"),
            Self::ThreeByFour => write!(f, "3:4"),
            Self::FourByThree => write!(f, "4:3"),
            Self::SixteenByNine => write!(f, "16:9"),
        }
    }
}
