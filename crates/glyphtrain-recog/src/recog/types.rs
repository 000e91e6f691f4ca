//! Type definitions for recognizer training
//!
//! This module contains the recognizer itself, its lifecycle state, the
//! padding configuration and the identification result.

use glyphtrain_core::Pix;
use std::path::PathBuf;

/// Default upper bound on the number of classes
pub const DEFAULT_MAX_ARRAY_SIZE: usize = 256;

/// Character set type for recognition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharsetType {
    /// Character set type is not specified
    Unknown = 0,
    /// Arabic numerals: 0-9 (10 characters)
    #[default]
    ArabicNumerals = 1,
    /// Lowercase Roman numerals: i, v, x, l, c, d, m (7 characters)
    LcRomanNumerals = 2,
    /// Uppercase Roman numerals: I, V, X, L, C, D, M (7 characters)
    UcRomanNumerals = 3,
    /// Lowercase letters: a-z (26 characters)
    LcAlpha = 4,
    /// Uppercase letters: A-Z (26 characters)
    UcAlpha = 5,
}

impl CharsetType {
    /// Returns the expected number of characters in this charset
    pub fn expected_size(&self) -> usize {
        match self {
            CharsetType::Unknown => 0,
            CharsetType::ArabicNumerals => 10,
            CharsetType::LcRomanNumerals | CharsetType::UcRomanNumerals => 7,
            CharsetType::LcAlpha | CharsetType::UcAlpha => 26,
        }
    }

    /// Whether a bootstrap bitmap set exists for this charset.
    ///
    /// Only the digits have one.
    pub fn is_available(&self) -> bool {
        matches!(self, CharsetType::ArabicNumerals)
    }
}

/// Template usage mode for identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemplateUse {
    /// Match against every scaled sample (default)
    #[default]
    All = 0,
    /// Match against the scaled class averages
    Average = 1,
}

/// Training lifecycle of a recognizer
///
/// ```text
/// Open --training_finished--> Closed --average--> AveragesFresh
///                                                  |        ^
///                                    remove_outliers|        |average
///                                                  v        |
///                                              AveragesStale
/// ```
///
/// Padding may reopen a finished recognizer to `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrainingState {
    /// Accepting samples; no scaled storage, no averages
    #[default]
    Open,
    /// Training closed, averages not yet computed
    Closed,
    /// Training closed, averages out of date with the samples
    AveragesStale,
    /// Training closed, averages match the current samples
    AveragesFresh,
}

impl TrainingState {
    /// Whether training has been closed
    pub fn is_closed(self) -> bool {
        self != TrainingState::Open
    }
}

/// Padding policy of a recognizer
///
/// ```
/// use glyphtrain_recog::PadParams;
///
/// let params = PadParams::default().with_min_nopad(5).with_max_afterpad(20);
/// assert_eq!(params.min_samples, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PadParams {
    /// Directory holding donor bitmap-set files
    pub boot_dir: PathBuf,
    /// Substring that donor file names must contain
    pub boot_pattern: String,
    /// Bitmap-set file replacing the built-in digit set for a full replacement
    pub boot_path: Option<PathBuf>,
    /// Erosion rounds applied to the replacement bitmap set
    pub boot_iters: u32,
    /// Character set the recognizer is expected to cover
    pub charset_type: CharsetType,
    /// Classes with fewer samples than this get padded; 0 disables padding
    pub min_nopad: usize,
    /// Sample count a padded class is filled up to
    pub max_afterpad: usize,
    /// Below this many samples in total, the recognizer is replaced outright
    pub min_samples: usize,
}

impl Default for PadParams {
    fn default() -> Self {
        Self {
            boot_dir: PathBuf::from("recog/digits"),
            boot_pattern: "digit_set".to_string(),
            boot_path: None,
            boot_iters: 0,
            charset_type: CharsetType::ArabicNumerals,
            min_nopad: 3,
            max_afterpad: 15,
            min_samples: 10,
        }
    }
}

impl PadParams {
    /// Set the donor directory
    pub fn with_boot_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.boot_dir = dir.into();
        self
    }

    /// Set the donor file name pattern
    pub fn with_boot_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.boot_pattern = pattern.into();
        self
    }

    /// Set the replacement bitmap-set file
    pub fn with_boot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.boot_path = Some(path.into());
        self
    }

    /// Set the number of erosion rounds for the replacement set
    pub fn with_boot_iters(mut self, iters: u32) -> Self {
        self.boot_iters = iters;
        self
    }

    /// Set the character set
    pub fn with_charset_type(mut self, charset_type: CharsetType) -> Self {
        self.charset_type = charset_type;
        self
    }

    /// Set the per-class minimum below which padding happens
    pub fn with_min_nopad(mut self, min_nopad: usize) -> Self {
        self.min_nopad = min_nopad;
        self
    }

    /// Set the per-class fill level
    pub fn with_max_afterpad(mut self, max_afterpad: usize) -> Self {
        self.max_afterpad = max_afterpad;
        self
    }

    /// Set the total sample count below which the recognizer is replaced
    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }
}

/// Character recognizer
///
/// Holds the per-class samples of a template recognizer in two domains:
/// unscaled (as ingested) and scaled (normalized by `scale_w`/`scale_h`),
/// each with per-sample centroids and foreground areas, plus one averaged
/// template per class and domain.
///
/// Class indices are assigned in order of first appearance and never
/// change.
#[derive(Debug, Clone)]
pub struct Recog {
    // Scaling parameters
    /// Horizontal scale target (0 = no horizontal scaling)
    pub scale_w: u32,
    /// Vertical scale target (0 = no vertical scaling)
    pub scale_h: u32,

    // Identification parameters
    /// Template usage mode (all or average)
    pub templ_use: TemplateUse,
    /// Binarization threshold for input deeper than 1 bpp
    pub threshold: u32,
    /// Maximum vertical shift allowed during matching
    pub max_y_shift: u32,

    /// Maximum number of classes
    pub max_array_size: usize,
    /// Total number of training samples
    pub num_samples: usize,

    // Template size info
    /// Minimum width of unscaled averages
    pub minwidth_u: u32,
    /// Maximum width of unscaled averages
    pub maxwidth_u: u32,
    /// Minimum height of unscaled averages
    pub minheight_u: u32,
    /// Maximum height of unscaled averages
    pub maxheight_u: u32,
    /// Minimum width of scaled averages
    pub minwidth: u32,
    /// Maximum width of scaled averages
    pub maxwidth: u32,

    // Splitting parameters
    /// Minimum component width kept in splitting
    pub min_split_w: u32,
    /// Minimum component height kept in splitting
    pub min_split_h: u32,
    /// Maximum component height kept in splitting
    pub max_split_h: u32,

    /// Directory for diagnostic images; `None` disables them
    pub debug_dir: Option<PathBuf>,

    pub(crate) pad: PadParams,
    pub(crate) state: TrainingState,

    // Class vocabulary
    pub(crate) class_keys: Vec<u32>,
    pub(crate) class_labels: Vec<String>,

    // Samples (unscaled)
    pub(crate) pixaa_u: Vec<Vec<Pix>>,
    pub(crate) ptaa_u: Vec<Vec<(f32, f32)>>,
    pub(crate) naasum_u: Vec<Vec<u32>>,

    // Samples (scaled)
    pub(crate) pixaa: Vec<Vec<Pix>>,
    pub(crate) ptaa: Vec<Vec<(f32, f32)>>,
    pub(crate) naasum: Vec<Vec<u32>>,

    // Averaged templates
    pub(crate) pixa_u: Vec<Pix>,
    pub(crate) pta_u: Vec<(f32, f32)>,
    pub(crate) nasum_u: Vec<u32>,
    pub(crate) pixa: Vec<Pix>,
    pub(crate) pta: Vec<(f32, f32)>,
    pub(crate) nasum: Vec<u32>,
}

impl Recog {
    /// Current training state
    pub fn state(&self) -> TrainingState {
        self.state
    }

    /// Whether training has been closed
    pub fn training_done(&self) -> bool {
        self.state.is_closed()
    }

    /// Whether the averages reflect the current samples
    pub fn averages_valid(&self) -> bool {
        self.state == TrainingState::AveragesFresh
    }

    /// Number of classes
    pub fn set_size(&self) -> usize {
        self.class_labels.len()
    }

    /// Expected number of classes, derived from the charset type
    pub fn charset_size(&self) -> usize {
        self.pad.charset_type.expected_size()
    }

    /// Padding policy
    pub fn pad_params(&self) -> &PadParams {
        &self.pad
    }

    /// Label of a class
    pub fn class_label(&self, index: usize) -> Option<&str> {
        self.class_labels.get(index).map(String::as_str)
    }

    /// All class labels in index order
    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    /// Number of unscaled samples in each class
    pub fn class_counts(&self) -> Vec<usize> {
        self.pixaa_u.iter().map(Vec::len).collect()
    }

    /// Unscaled samples of a class
    pub fn samples(&self, index: usize) -> Option<&[Pix]> {
        self.pixaa_u.get(index).map(Vec::as_slice)
    }

    /// Scaled samples of a class; empty until training is finished
    pub fn scaled_samples(&self, index: usize) -> Option<&[Pix]> {
        self.pixaa.get(index).map(Vec::as_slice)
    }

    /// Centroids of the unscaled samples of a class
    pub fn sample_centroids(&self, index: usize) -> Option<&[(f32, f32)]> {
        self.ptaa_u.get(index).map(Vec::as_slice)
    }

    /// Unscaled averaged templates, one per class
    pub fn averages_unscaled(&self) -> &[Pix] {
        &self.pixa_u
    }

    /// Scaled averaged templates, one per class
    pub fn averages(&self) -> &[Pix] {
        &self.pixa
    }

    /// Centroids of the unscaled averaged templates
    pub fn average_centroids_unscaled(&self) -> &[(f32, f32)] {
        &self.pta_u
    }

    /// Centroids of the scaled averaged templates
    pub fn average_centroids(&self) -> &[(f32, f32)] {
        &self.pta
    }

    /// Foreground areas of the unscaled averaged templates
    pub fn average_areas_unscaled(&self) -> &[u32] {
        &self.nasum_u
    }

    /// Foreground areas of the scaled averaged templates
    pub fn average_areas(&self) -> &[u32] {
        &self.nasum
    }

    /// Capacity of the per-class storage
    pub(crate) fn class_capacity(&self) -> usize {
        self.pixaa_u.capacity()
    }
}

/// Identification result for a single character
#[derive(Debug, Clone, PartialEq)]
pub struct Rch {
    /// Index of best matching class
    pub index: usize,
    /// Correlation score of best match
    pub score: f32,
    /// Label of the best matching class
    pub text: String,
    /// Index of best sample within the class (0 when matching averages)
    pub sample: usize,
}

/// Result of [`Recog::pad_training_set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadOutcome {
    /// Too few samples; the recognizer was rebuilt from the bootstrap set
    Replaced,
    /// The recognizer already had enough samples
    Unchanged,
    /// Donor samples were added and training was finished again
    Padded {
        /// Number of samples added
        added: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_sizes() {
        assert_eq!(CharsetType::Unknown.expected_size(), 0);
        assert_eq!(CharsetType::ArabicNumerals.expected_size(), 10);
        assert_eq!(CharsetType::UcRomanNumerals.expected_size(), 7);
        assert_eq!(CharsetType::LcAlpha.expected_size(), 26);
        assert!(CharsetType::ArabicNumerals.is_available());
        assert!(!CharsetType::UcAlpha.is_available());
    }

    #[test]
    fn test_pad_params_defaults_and_builders() {
        let p = PadParams::default();
        assert_eq!(p.boot_dir, PathBuf::from("recog/digits"));
        assert_eq!(p.boot_pattern, "digit_set");
        assert_eq!(p.boot_path, None);
        assert_eq!((p.min_nopad, p.max_afterpad, p.min_samples), (3, 15, 10));
        assert_eq!(p.charset_type, CharsetType::ArabicNumerals);

        let p = p.with_boot_path("/tmp/set.pa").with_boot_iters(2);
        assert_eq!(p.boot_path, Some(PathBuf::from("/tmp/set.pa")));
        assert_eq!(p.boot_iters, 2);
    }

    #[test]
    fn test_state_closed() {
        assert!(!TrainingState::Open.is_closed());
        assert!(TrainingState::Closed.is_closed());
        assert!(TrainingState::AveragesStale.is_closed());
        assert!(TrainingState::AveragesFresh.is_closed());
    }
}
