//! Character recognizer training
//!
//! This module builds template recognizers from labelled bitmaps.
//!
//! # Overview
//!
//! A recognizer is trained by:
//! 1. Adding labelled samples, which are cropped, binarized and sorted
//!    into one class per label
//! 2. Finishing training, which scales every sample and computes the
//!    centroid-aligned average template of each class
//! 3. Optionally removing outliers and padding sparse classes from
//!    donor recognizers
//!
//! # Example
//!
//! ```no_run
//! use glyphtrain_recog::recog::{Recog, TemplateUse};
//! use glyphtrain_recog::recog::boot::{BootSet, boot_digit_pixa};
//!
//! // Train from the built-in digits, scaled to height 32
//! let digits = boot_digit_pixa(BootSet::Gen1).unwrap();
//! let mut recog = Recog::create_from_pixa(&digits, 0, 32, TemplateUse::Average, 128, 1).unwrap();
//!
//! // Drop poor samples, then pad sparse classes from donor sets on disk
//! recog.remove_outliers(0.8, 0.5).unwrap();
//! match recog.pad_training_set() {
//!     Ok(outcome) => println!("{:?}", outcome),
//!     Err(e) => eprintln!("padding failed: {}", e),
//! }
//! ```

mod average;
pub mod boot;
mod debug;
mod finish;
mod ident;
mod outliers;
mod pad;
mod recoga;
mod train;
mod types;

pub use average::{MAX_SAMPLES_TO_AVERAGE, accumulate_samples};
pub use debug::default_debug_dir;
pub use outliers::{DEFAULT_MIN_FRACTION, DEFAULT_TARGET_SCORE};
pub use pad::{PadMatch, best_correl_for_padding, correl_averages};
pub use recoga::RecognizerSet;
pub use train::map_index_to_index;
pub use types::*;
