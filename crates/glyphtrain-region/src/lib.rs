//! glyphtrain-region - Connected-component analysis
//!
//! Finds the connected foreground components of a 1 bpp image and
//! reports their bounding boxes, which is how multi-character training
//! input is split into one bitmap per character.

pub mod conncomp;
mod error;

pub use conncomp::{ConnectivityType, find_connected_components};
pub use error::{RegionError, RegionResult};
