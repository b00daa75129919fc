use thiserror::Error;

#[derive(Error, Debug)]
pub enum WebpressError {
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Invalid aspect ratio {ratio_w}:{ratio_h} (both terms must be >= 1)")]
    InvalidRatio { ratio_w: u32, ratio_h: u32 },

    #[error("Crop would be degenerate: {width}x{height}")]
    DegenerateCrop { width: i64, height: i64 },

    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    #[error("Cropping is disabled")]
    CropDisabled,
}

pub type Result<T> = std::result::Result<T, WebpressError>;

/// Failure of a single poll request. Never surfaced past the poll loop.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Poll request failed: {0}")]
    Request(String),

    #[error("Malformed poll response: {0}")]
    Malformed(#[from] serde_json::Error),
}
