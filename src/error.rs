//! Error types for atlas mapping operations

use thiserror::Error;

/// Everything that can reject an atlas-mapper operation.
///
/// None of these are fatal: an operation that returns an error leaves the
/// session exactly as it was.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Mask and atlas rasters differ in size
    #[error(
        "Mask dimensions {mask_width}x{mask_height} must match atlas dimensions {atlas_width}x{atlas_height}"
    )]
    MaskSizeMismatch {
        mask_width: u32,
        mask_height: u32,
        atlas_width: u32,
        atlas_height: u32,
    },

    /// A mask was supplied before any atlas
    #[error("Load the atlas image before the mask")]
    AtlasMissing,

    /// Raw pixel bytes do not cover width * height RGBA pixels
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON document has no `frames` object
    #[error("Invalid JSON format: missing `frames` object")]
    MissingFrames,

    #[error("Frame `{name}` is malformed: {source}")]
    InvalidFrame {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Nothing to export")]
    NothingToExport,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for atlas-mapper operations
pub type Result<T> = std::result::Result<T, AtlasError>;
