//! glyphtrain-transform - Bitmap scaling
//!
//! Training samples are normalized to a recognizer's configured size with
//! [`scale_to_size`]; a zero target on one axis keeps the aspect ratio.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{scale_by_sampling, scale_to_size};
