//! Error types for glyphtrain-region

use thiserror::Error;

/// Errors that can occur during region operations
#[derive(Debug, Error)]
pub enum RegionError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphtrain_core::Error),

    /// Unsupported pixel depth
    #[error("unsupported depth: expected {expected}, got {actual}")]
    UnsupportedDepth { expected: &'static str, actual: u32 },
}

/// Result type for region operations
pub type RegionResult<T> = Result<T, RegionError>;
