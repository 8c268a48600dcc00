//! Custom error types for srpairs.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the srpairs library.
#[derive(Error, Debug)]
pub enum Error {
    /// The source directory does not exist or cannot be listed.
    #[error("source directory {path} not found or not readable: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value is out of its valid range.
    #[error("invalid configuration {name}: {reason}")]
    InvalidConfiguration { name: String, reason: String },

    /// Sample index outside `[0, len)`.
    #[error("sample index {index} out of range for dataset of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Failed to open or decode an image file.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to save an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Shape mismatch in tensor operations.
    #[error("tensor shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },
}

/// Result type alias for srpairs operations.
pub type Result<T> = std::result::Result<T, Error>;
