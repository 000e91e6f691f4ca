//! Error types for glyphtrain-transform

use thiserror::Error;

/// Errors that can occur during transform operations
#[derive(Debug, Error)]
pub enum TransformError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphtrain_core::Error),

    /// Invalid scale factor or target size
    #[error("invalid scale factor: {0}")]
    InvalidScaleFactor(String),
}

/// Result type for transform operations
pub type TransformResult<T> = Result<T, TransformError>;
