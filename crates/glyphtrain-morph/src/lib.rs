//! glyphtrain-morph - Binary morphology
//!
//! Brick (rectangular structuring element) erosion, dilation and closing
//! of 1 bpp images, plus [`extend_by_erosion`] which grows a labelled
//! bitmap set with progressively thinner renditions of each glyph.
//!
//! # Example
//!
//! ```
//! use glyphtrain_core::{Pix, PixelDepth};
//! use glyphtrain_morph::{dilate_brick, erode_brick};
//!
//! let mut pm = Pix::new(9, 9, PixelDepth::Bit1).unwrap().to_mut();
//! pm.set_pixel(4, 4, 1).unwrap();
//! let dot: Pix = pm.into();
//!
//! let grown = dilate_brick(&dot, 3, 3).unwrap();
//! assert_eq!(grown.count_pixels().unwrap(), 9);
//! let back = erode_brick(&grown, 3, 3).unwrap();
//! assert_eq!(back.count_pixels().unwrap(), 1);
//! ```

pub mod binary;
mod error;
pub mod extend;

pub use binary::{close_brick, close_safe_brick, dilate_brick, erode_brick};
pub use error::{MorphError, MorphResult};
pub use extend::extend_by_erosion;
