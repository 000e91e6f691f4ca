//! I/O error types
//!
//! Provides a unified error type for all bitmap I/O operations. The PNG
//! codec and the bitmap-set reader map their failures into `IoError`
//! variants so that callers only need to handle one error type.

use thiserror::Error;

/// Bitmap I/O error type
#[derive(Error, Debug)]
pub enum IoError {
    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported format or pixel layout
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or corrupt data
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Decode error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encode error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// No file matched a directory search
    #[error("no files matching '{pattern}' in {dir}")]
    NoMatchingFiles { dir: String, pattern: String },

    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphtrain_core::Error),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;
