//! glyphtrain - Template-based character recognizer trainer
//!
//! # Overview
//!
//! glyphtrain builds recognizers for machine-printed characters from
//! labelled bitmaps:
//!
//! - Sample ingestion with cropping, binarization and segmentation
//! - Centroid-aligned class averages
//! - Outlier removal
//! - Bootstrap labelling with a built-in digit recognizer
//! - Padding sparse classes from donor bitmap sets
//!
//! # Example
//!
//! ```
//! use glyphtrain::recog::boot::{BootSet, boot_digit_pixa};
//! use glyphtrain::recog::{Recog, TemplateUse};
//!
//! let digits = boot_digit_pixa(BootSet::Gen1).unwrap();
//! let recog = Recog::create_from_pixa(&digits, 0, 32, TemplateUse::All, 128, 1).unwrap();
//! assert_eq!(recog.set_size(), 10);
//! assert!(recog.averages_valid());
//! ```

// Re-export core types (primary data structures used everywhere)
pub use glyphtrain_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use glyphtrain_io as io;
pub use glyphtrain_morph as morph;
pub use glyphtrain_recog as recog;
pub use glyphtrain_region as region;
pub use glyphtrain_transform as transform;
