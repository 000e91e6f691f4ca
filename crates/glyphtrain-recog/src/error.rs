//! Error types for glyphtrain-recog

use crate::recog::{CharsetType, TrainingState};
use thiserror::Error;

/// Errors that can occur during recognizer training
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] glyphtrain_core::Error),

    /// Morphology error
    #[error("morph error: {0}")]
    Morph(#[from] glyphtrain_morph::MorphError),

    /// Connected component error
    #[error("region error: {0}")]
    Region(#[from] glyphtrain_region::RegionError),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] glyphtrain_transform::TransformError),

    /// Bitmap or bitmap-set I/O error
    #[error("io error: {0}")]
    Io(#[from] glyphtrain_io::IoError),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Operation not allowed in the recognizer's current training state
    #[error("{operation} not allowed in training state {state:?}")]
    WrongState {
        operation: &'static str,
        state: TrainingState,
    },

    /// Segmentation found a different number of characters than the label
    #[error("segmentation found {components} components for {characters} characters")]
    SegmentationMismatch { components: usize, characters: usize },

    /// No content found in image
    #[error("no content found: {0}")]
    NoContent(String),

    /// No bootstrap set exists for the character set
    #[error("no bootstrap set available for charset {0:?}")]
    CharsetUnavailable(CharsetType),

    /// Training failed
    #[error("training error: {0}")]
    TrainingError(String),

    /// Identification failed
    #[error("identification error: {0}")]
    IdentificationError(String),
}

/// Result type for recognizer operations
pub type RecogResult<T> = Result<T, RecogError>;
