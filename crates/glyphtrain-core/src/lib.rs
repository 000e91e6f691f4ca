//! glyphtrain-core - Bitmap data structures for character training
//!
//! This crate provides the fundamental data structures used throughout
//! the glyphtrain workspace:
//!
//! - [`Pix`] / [`PixMut`] - The bitmap container (immutable / mutable)
//! - [`Box`] / [`Boxa`] - Rectangle regions
//! - [`Pixa`] / [`Pixaa`] - Arrays of bitmaps
//!
//! It also carries the bitmap primitives training depends on: clipping,
//! binarization, centroid and area measurement, raster compositing, and
//! the two-bitmap [`correlation_score_simple`].

pub mod box_;
pub mod error;
pub mod pix;
pub mod pixa;

pub use box_::{Box, Boxa, SizeRelation, SizeSelectType};
pub use error::{Error, Result};
pub use pix::access::{compose_rgb, extract_rgb};
pub use pix::{Color, Pix, PixMut, PixelDepth, RopOp, correlation_score_simple};
pub use pixa::{Pixa, Pixaa};
