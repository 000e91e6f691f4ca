//! Sample ingestion for character recognition
//!
//! This module creates recognizers and sorts labelled samples into
//! per-class buckets. Two preprocessors prepare raw bitmaps:
//! [`Recog::process_labelled`] for a bitmap holding one character and
//! [`Recog::process_multiple`] for a bitmap holding a short string.

use glyphtrain_core::{Box, Pix, Pixa, SizeRelation, SizeSelectType};
use glyphtrain_morph::close_safe_brick;
use glyphtrain_region::{ConnectivityType, find_connected_components};
use tracing::{debug, warn};

use crate::error::{RecogError, RecogResult};

use super::types::{DEFAULT_MAX_ARRAY_SIZE, PadParams, Recog, TemplateUse, TrainingState};

/// Height of the vertical closing that joins broken strokes
const SEGMENT_CLOSE_HEIGHT: u32 = 70;
/// Components must be wider than this to count as characters
const SEGMENT_MIN_WIDTH: i32 = 2;
/// Components must be taller than this to count as characters
const SEGMENT_MIN_HEIGHT: i32 = 8;

/// Parse a label into its class key.
///
/// The UTF-8 bytes of the label are packed big-endian into a `u32`, so a
/// key holds at most 4 bytes. Empty and longer labels have no key.
pub(crate) fn class_key(text: &str) -> Option<u32> {
    let bytes = text.as_bytes();
    if bytes.is_empty() || bytes.len() > 4 {
        return None;
    }
    Some(bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b)))
}

/// The supplied label if non-empty, otherwise the bitmap's own.
fn sample_label<'a>(text: Option<&'a str>, pix: &'a Pix) -> RecogResult<&'a str> {
    text.filter(|t| !t.is_empty())
        .or(pix.text())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| RecogError::InvalidParameter("sample has no label".to_string()))
}

/// Map every class of `recog1` to the class of `recog2` with the same label.
///
/// The result has one entry per class in `recog1`; classes whose label
/// does not occur in `recog2` map to `None`.
pub fn map_index_to_index(recog1: &Recog, recog2: &Recog) -> Vec<Option<usize>> {
    recog1
        .class_labels
        .iter()
        .map(|label| recog2.string_to_index(label))
        .collect()
}

impl Recog {
    /// Creates an empty character recognizer
    ///
    /// # Arguments
    ///
    /// * `scale_w` - Target width for scaling (0 = no horizontal scaling)
    /// * `scale_h` - Target height for scaling (0 = no vertical scaling)
    /// * `templ_use` - Match against all samples or against class averages
    /// * `threshold` - Binarization threshold for depth > 1, in 0..=255
    /// * `max_y_shift` - Maximum vertical shift during matching (0, 1 or 2)
    ///
    /// # Returns
    ///
    /// A new open recognizer with the default [`PadParams`]
    pub fn create(
        scale_w: i32,
        scale_h: i32,
        templ_use: TemplateUse,
        threshold: i32,
        max_y_shift: i32,
    ) -> RecogResult<Recog> {
        if scale_w < 0 || scale_h < 0 {
            return Err(RecogError::InvalidParameter(format!(
                "scale sizes must be >= 0, got {}x{}",
                scale_w, scale_h
            )));
        }
        if !(0..=255).contains(&threshold) {
            return Err(RecogError::InvalidParameter(format!(
                "threshold must be in 0..=255, got {}",
                threshold
            )));
        }
        if !(0..=2).contains(&max_y_shift) {
            return Err(RecogError::InvalidParameter(
                "max_y_shift must be 0, 1, or 2".to_string(),
            ));
        }

        Ok(Recog {
            scale_w: scale_w as u32,
            scale_h: scale_h as u32,
            templ_use,
            threshold: threshold as u32,
            max_y_shift: max_y_shift as u32,
            max_array_size: DEFAULT_MAX_ARRAY_SIZE,
            num_samples: 0,
            minwidth_u: 0,
            maxwidth_u: 0,
            minheight_u: 0,
            maxheight_u: 0,
            minwidth: 0,
            maxwidth: 0,
            min_split_w: 0,
            min_split_h: 0,
            max_split_h: 0,
            debug_dir: None,
            pad: PadParams::default(),
            state: TrainingState::Open,
            class_keys: Vec::with_capacity(DEFAULT_MAX_ARRAY_SIZE),
            class_labels: Vec::with_capacity(DEFAULT_MAX_ARRAY_SIZE),
            pixaa_u: Vec::with_capacity(DEFAULT_MAX_ARRAY_SIZE),
            ptaa_u: Vec::new(),
            naasum_u: Vec::new(),
            pixaa: Vec::new(),
            ptaa: Vec::new(),
            naasum: Vec::new(),
            pixa_u: Vec::new(),
            pta_u: Vec::new(),
            nasum_u: Vec::new(),
            pixa: Vec::new(),
            pta: Vec::new(),
            nasum: Vec::new(),
        })
    }

    /// Replace the padding policy.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] unless
    /// `max_afterpad > min_nopad`.
    pub fn set_pad_params(&mut self, params: PadParams) -> RecogResult<()> {
        if params.max_afterpad <= params.min_nopad {
            return Err(RecogError::InvalidParameter(format!(
                "max_afterpad ({}) must exceed min_nopad ({})",
                params.max_afterpad, params.min_nopad
            )));
        }
        self.pad = params;
        Ok(())
    }

    /// Index of the class whose label is exactly `text`
    pub fn string_to_index(&self, text: &str) -> Option<usize> {
        self.class_labels.iter().position(|label| label == text)
    }

    /// Fail with [`RecogError::WrongState`] unless training is open.
    pub(crate) fn require_open(&self, operation: &'static str) -> RecogResult<()> {
        if self.state != TrainingState::Open {
            return Err(RecogError::WrongState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Fail with [`RecogError::WrongState`] unless training is closed.
    pub(crate) fn require_closed(&self, operation: &'static str) -> RecogResult<()> {
        if !self.state.is_closed() {
            return Err(RecogError::WrongState {
                operation,
                state: self.state,
            });
        }
        Ok(())
    }

    /// Add a batch of samples to the class buckets.
    ///
    /// With `class_index` set, every sample goes to that class regardless
    /// of its label. Otherwise each sample's label selects its class, and
    /// a label seen for the first time creates a new class. Samples with a
    /// missing or unparsable label are skipped.
    ///
    /// # Returns
    ///
    /// The number of samples accepted.
    ///
    /// # Errors
    ///
    /// - [`RecogError::WrongState`] if training is closed
    /// - [`RecogError::InvalidParameter`] for an empty batch or an unknown
    ///   `class_index`
    /// - [`RecogError::TrainingError`] if the new labels would exceed
    ///   `max_array_size` classes
    ///
    /// Nothing is added when an error is returned.
    pub fn add_samples(&mut self, samples: &Pixa, class_index: Option<usize>) -> RecogResult<usize> {
        self.require_open("add_samples")?;
        if samples.is_empty() {
            return Err(RecogError::InvalidParameter("empty sample batch".to_string()));
        }

        if let Some(index) = class_index {
            if index >= self.set_size() {
                return Err(RecogError::InvalidParameter(format!(
                    "class index {} out of range (set size {})",
                    index,
                    self.set_size()
                )));
            }
            self.pixaa_u[index].extend(samples.iter().cloned());
            self.num_samples += samples.len();
            debug!(class = index, count = samples.len(), "added forced-class samples");
            return Ok(samples.len());
        }

        // Check class capacity before touching any bucket.
        let mut new_keys: Vec<u32> = Vec::new();
        for key in samples.iter().filter_map(|pix| pix.text().and_then(class_key)) {
            if !self.class_keys.contains(&key) && !new_keys.contains(&key) {
                new_keys.push(key);
            }
        }
        if self.set_size() + new_keys.len() > self.max_array_size {
            return Err(RecogError::TrainingError(format!(
                "{} new classes would exceed the limit of {}",
                new_keys.len(),
                self.max_array_size
            )));
        }

        let mut accepted = 0;
        for (i, pix) in samples.iter().enumerate() {
            let Some(text) = pix.text() else {
                warn!(sample = i, "skipping sample without a label");
                continue;
            };
            let Some(key) = class_key(text) else {
                warn!(sample = i, label = text, "skipping sample with unparsable label");
                continue;
            };
            let index = match self.class_keys.iter().position(|&k| k == key) {
                Some(index) => index,
                None => {
                    self.class_keys.push(key);
                    self.class_labels.push(text.to_string());
                    self.pixaa_u.push(Vec::new());
                    debug!(class = self.set_size() - 1, label = text, "new class");
                    self.set_size() - 1
                }
            };
            self.pixaa_u[index].push(pix.clone());
            self.num_samples += 1;
            accepted += 1;
        }
        Ok(accepted)
    }

    /// Crop and binarize an input bitmap.
    fn crop_and_binarize(&self, pix: &Pix, region: Option<&Box>) -> RecogResult<Pix> {
        let cropped = match region {
            Some(b) => pix.clip_rectangle(b)?,
            None => pix.clone(),
        };
        Ok(cropped.convert_to_1(self.threshold)?)
    }

    /// Prepare a bitmap holding a single character.
    ///
    /// The bitmap is cropped to `region`, binarized with the recognizer's
    /// threshold and clipped to its foreground. The label is `text`, or
    /// the bitmap's own label if `text` is `None` or empty.
    ///
    /// # Errors
    ///
    /// - [`RecogError::InvalidParameter`] if there is no label
    /// - [`RecogError::NoContent`] if nothing is left after clipping
    pub fn process_labelled(&self, pix: &Pix, region: Option<&Box>, text: Option<&str>) -> RecogResult<Pix> {
        let label = sample_label(text, pix)?;
        let bin = self.crop_and_binarize(pix, region)?;
        let (clipped, _) = bin
            .clip_to_foreground()?
            .ok_or_else(|| RecogError::NoContent("no foreground in labelled sample".to_string()))?;
        Ok(clipped.with_text(Some(label)))
    }

    /// Prepare a bitmap holding several characters, one per label character.
    ///
    /// After cropping and binarizing, a tall vertical closing joins the
    /// broken parts of each character. 8-connected components are merged
    /// where their boxes overlap, and only components wider than 2 and
    /// taller than 8 pixels are kept. The count must equal the number of
    /// characters in the label; the components are then taken left to
    /// right, each labelled with its character.
    ///
    /// With `debug` set and a debug directory configured, a mismatch
    /// writes the component boxes over the input.
    ///
    /// # Errors
    ///
    /// - [`RecogError::InvalidParameter`] if there is no label
    /// - [`RecogError::SegmentationMismatch`] if the component count
    ///   differs from the character count; nothing is returned in that case
    pub fn process_multiple(
        &self,
        pix: &Pix,
        region: Option<&Box>,
        text: Option<&str>,
        debug: bool,
    ) -> RecogResult<Pixa> {
        let label = sample_label(text, pix)?;
        let chars: Vec<char> = label.chars().collect();
        let bin = self.crop_and_binarize(pix, region)?;

        let closed = close_safe_brick(&bin, 1, SEGMENT_CLOSE_HEIGHT)?;
        let mut boxa = find_connected_components(&closed, ConnectivityType::EightWay)?
            .combine_overlaps()
            .select_by_size(
                SEGMENT_MIN_WIDTH,
                SEGMENT_MIN_HEIGHT,
                SizeSelectType::Both,
                SizeRelation::GreaterThan,
            );

        if boxa.len() != chars.len() {
            warn!(
                components = boxa.len(),
                characters = chars.len(),
                label,
                "segmentation mismatch; rejecting batch"
            );
            if debug {
                self.debug_segmentation(&bin, &boxa);
            }
            return Err(RecogError::SegmentationMismatch {
                components: boxa.len(),
                characters: chars.len(),
            });
        }

        boxa.sort_by_x();
        let mut pixa = Pixa::with_capacity(chars.len());
        for (b, ch) in boxa.iter().zip(chars) {
            let glyph = bin.clip_rectangle(b)?.with_text(Some(ch.to_string().as_str()));
            pixa.push_with_box(glyph, *b);
        }
        Ok(pixa)
    }

    /// Train on one labelled bitmap.
    ///
    /// # Arguments
    ///
    /// * `pix` - Input bitmap of any depth
    /// * `region` - Optional crop box
    /// * `text` - Label; falls back to the bitmap's own label when absent or empty
    /// * `multi` - Whether the bitmap holds one character per label character
    /// * `debug` - Write diagnostics for rejected multi-character input
    ///
    /// # Returns
    ///
    /// The number of samples added.
    pub fn train_labelled(
        &mut self,
        pix: &Pix,
        region: Option<&Box>,
        text: Option<&str>,
        multi: bool,
        debug: bool,
    ) -> RecogResult<usize> {
        self.require_open("train_labelled")?;
        let batch = if multi {
            self.process_multiple(pix, region, text, debug)?
        } else {
            let sample = self.process_labelled(pix, region, text)?;
            std::iter::once(sample).collect()
        };
        self.add_samples(&batch, None)
    }
}
