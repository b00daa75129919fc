//! Interactive crop specification.
//!
//! [`CropEngine`] owns the crop rectangle in natural-space pixels and keeps it
//! inside the image under manual or ratio-locked editing. [`DragSession`]
//! feeds it pointer gestures made on the display-space preview, and
//! [`CropOptions`] is the form the finished crop is submitted in.
//!
//! # Invariants
//!
//! After every operation, for an image of `W x H` natural pixels:
//!
//! - `0 <= x < W` and `0 <= y < H`
//! - `width >= 1` and `height >= 1`
//! - `x + width <= W` and `y + height <= H`

mod aspect;
mod drag;
mod engine;
mod options;
mod rect;

pub use aspect::{AspectPreset, AspectSpec, LockedDimension};
pub use drag::{DragSession, DragState};
pub use engine::{CropEngine, CropMode};
pub use options::CropOptions;
pub use rect::{CropField, CropRect};
