//! glyphtrain-recog - Template-based character recognizer training
//!
//! This crate builds and maintains template recognizers for machine-printed
//! characters:
//!
//! - **Ingestion**: Crop, binarize and optionally segment labelled bitmaps,
//!   then sort the samples into per-character classes
//! - **Averaging**: Centroid-aligned majority-vote templates per class
//! - **Outlier removal**: Drop samples that correlate poorly with their
//!   class template
//! - **Bootstrapping**: Label unlabelled bitmaps with an existing recognizer
//!   and train a new one from the accepted results
//! - **Padding**: Fill under-populated classes from donor recognizers
//!
//! # Quick Start
//!
//! ```no_run
//! use glyphtrain_recog::recog::{Recog, TemplateUse};
//! use glyphtrain_core::{Pix, PixelDepth};
//!
//! let mut recog = Recog::create(0, 40, TemplateUse::All, 150, 1).unwrap();
//! let glyph = Pix::new(12, 20, PixelDepth::Bit1).unwrap();
//! let _ = recog.train_labelled(&glyph, None, Some("7"), false, false);
//! recog.training_finished().unwrap();
//! recog.remove_outliers(0.8, 0.5).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`recog`]: The recognizer, its training lifecycle and padding

mod error;
pub mod recog;

pub use error::{RecogError, RecogResult};

// Re-export commonly used types
pub use recog::{
    CharsetType, PadMatch, PadOutcome, PadParams, Rch, Recog, RecognizerSet, TemplateUse,
    TrainingState, boot,
};

// Re-export core for convenience
pub use glyphtrain_core;
