//! Padding under-populated recognizers
//!
//! [`Recog::pad_training_set`] applies a three-tier policy:
//!
//! 1. Too few samples overall: replace the recognizer with one built from
//!    the bootstrap bitmap set.
//! 2. Every expected class present with enough samples: leave it alone.
//! 3. Otherwise: borrow samples from donor recognizers loaded from disk,
//!    choosing for each class the donor whose average correlates best.
//!
//! Correlation between recognizers is only meaningful when both were
//! built at the same height, so the recognizer being padded is first
//! rebuilt at the donors' scale.

use glyphtrain_core::{Pix, Pixa, correlation_score_simple};
use glyphtrain_io::{read_pixa_from_file, read_pixaa_from_files};
use glyphtrain_morph::extend_by_erosion;
use glyphtrain_transform::scale_to_size;
use tracing::{debug, info, warn};

use crate::error::{RecogError, RecogResult};

use super::boot::{BootSet, boot_digit_pixa};
use super::recoga::RecognizerSet;
use super::train::map_index_to_index;
use super::types::{PadOutcome, Recog, TemplateUse};

/// Height at which donors and the padded recognizer are compared
const PAD_SCALE_H: i32 = 32;
/// Binarization threshold of rebuilt and donor recognizers
const PAD_THRESHOLD: i32 = 100;
/// Size of a recognizer that replaces one with too few samples
const REPLACE_SCALE_W: i32 = 20;
const REPLACE_SCALE_H: i32 = 32;

/// Best donor class for one class of the recognizer being padded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PadMatch {
    /// Index of the donor in the [`RecognizerSet`]
    pub set_index: usize,
    /// Index of the matching class in that donor
    pub class_index: usize,
    /// Correlation between the two class averages
    pub score: f32,
}

fn require_averages(recog: &Recog, operation: &'static str) -> RecogResult<()> {
    if !recog.averages_valid() {
        return Err(RecogError::WrongState {
            operation,
            state: recog.state(),
        });
    }
    Ok(())
}

/// Correlate the scaled class averages of two recognizers.
///
/// Classes are paired by label. Both recognizers should be scaled to the
/// same height; widths may differ by up to 0.6 times the scale height of
/// `recog1`, heights must agree exactly.
///
/// # Returns
///
/// For each class of `recog1`, the matching class of `recog2` and the
/// score; unmatched classes get `None` and 0.0.
///
/// # Errors
///
/// Returns [`RecogError::WrongState`] unless both recognizers have fresh
/// averages.
pub fn correl_averages(recog1: &Recog, recog2: &Recog) -> RecogResult<(Vec<Option<usize>>, Vec<f32>)> {
    require_averages(recog1, "correl_averages")?;
    require_averages(recog2, "correl_averages")?;

    let lut = map_index_to_index(recog1, recog2);
    let wvar = (0.6 * recog1.scale_h as f32) as u32;
    let mut scores = vec![0.0f32; lut.len()];
    for (i1, mapped) in lut.iter().enumerate() {
        let Some(i2) = *mapped else {
            debug!(class = i1, "no corresponding class");
            continue;
        };
        let (x1, y1) = recog1.pta[i1];
        let (x2, y2) = recog2.pta[i2];
        scores[i1] = correlation_score_simple(
            &recog1.pixa[i1],
            &recog2.pixa[i2],
            recog1.nasum[i1],
            recog2.nasum[i2],
            x1 - x2,
            y1 - y2,
            wvar,
            0,
        )?;
    }
    Ok((lut, scores))
}

/// Find, for each class of `recog`, the best matching class over all donors.
///
/// A donor only displaces the current best on a strictly higher score,
/// starting from 0, so classes scoring 0 everywhere get no match.
///
/// # Returns
///
/// The best match per class, and for each donor its summed score over
/// the matched classes divided by the number of classes in `recog`.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if `recog` has no classes or
/// `set` is empty, and [`RecogError::WrongState`] unless all averages
/// are fresh.
pub fn best_correl_for_padding(
    recog: &Recog,
    set: &RecognizerSet,
) -> RecogResult<(Vec<Option<PadMatch>>, Vec<f32>)> {
    require_averages(recog, "best_correl_for_padding")?;
    let n = recog.set_size();
    if n == 0 || set.is_empty() {
        return Err(RecogError::InvalidParameter(
            "recognizer or donor set is empty".to_string(),
        ));
    }

    let correlations = set
        .iter()
        .map(|donor| correl_averages(recog, donor))
        .collect::<RecogResult<Vec<_>>>()?;

    let mut sums = vec![0.0f32; set.len()];
    let mut matches = Vec::with_capacity(n);
    for i in 0..n {
        let mut best: Option<PadMatch> = None;
        let mut max_score = 0.0f32;
        for (j, (lut, scores)) in correlations.iter().enumerate() {
            let Some(index) = lut[i] else {
                continue;
            };
            let score = scores[i];
            sums[j] += score;
            if score > max_score {
                max_score = score;
                best = Some(PadMatch {
                    set_index: j,
                    class_index: index,
                    score,
                });
            }
        }
        matches.push(best);
    }
    let means = sums.into_iter().map(|s| s / n as f32).collect();
    Ok((matches, means))
}

/// Index of the first largest value
fn first_max_index(values: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        if best.is_none_or(|(_, b)| v > b) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}

/// Scale donor samples to `height` and give them `label`.
fn donor_batch(samples: &[Pix], height: u32, label: &str) -> RecogResult<Pixa> {
    samples
        .iter()
        .map(|pix| -> RecogResult<Pix> {
            Ok(scale_to_size(pix, 0, height)?.with_text(Some(label)))
        })
        .collect()
}

impl Recog {
    /// Average unscaled height of each class, and their overall average.
    ///
    /// Per class the mean is rounded; the overall value is the truncated
    /// mean of the per-class values. Classes without samples report 0.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] if there are no classes.
    pub fn average_class_heights(&self) -> RecogResult<(Vec<u32>, u32)> {
        let nclass = self.set_size();
        if nclass == 0 {
            return Err(RecogError::InvalidParameter("no classes".to_string()));
        }
        let heights: Vec<u32> = self
            .pixaa_u
            .iter()
            .map(|samples| {
                if samples.is_empty() {
                    return 0;
                }
                let sum: u32 = samples.iter().map(Pix::height).sum();
                (sum as f32 / samples.len() as f32 + 0.5) as u32
            })
            .collect();
        let total: u32 = heights.iter().sum();
        Ok((heights, total / nclass as u32))
    }

    /// Pad the training set according to the recognizer's [`PadParams`].
    ///
    /// - If `num_samples < min_samples`, the recognizer is replaced by
    ///   one built at 20x32 from the bootstrap bitmap set (`boot_path`,
    ///   or the built-in digits), extended by `boot_iters` erosions.
    /// - If padding is disabled (`min_nopad == 0`), or every expected
    ///   class is present with at least `min_nopad` samples, nothing
    ///   changes.
    /// - Otherwise donors are loaded from the files in `boot_dir` whose
    ///   names contain `boot_pattern`. The recognizer is rebuilt at
    ///   height 32 in average mode, each class short of `min_nopad` is
    ///   filled up to `max_afterpad` from its best donor class, classes
    ///   missing entirely are imported from the donor with the best mean
    ///   score, and training is finished again.
    ///
    /// The padding policy and debug directory are kept across a
    /// replacement or rebuild, and a rebuild also keeps the class limit.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::CharsetUnavailable`] when the charset has no
    /// bootstrap set, and I/O errors when the bootstrap or donor files
    /// cannot be read. Padding works on a rebuilt copy, so the
    /// recognizer is unchanged after any error.
    ///
    /// [`PadParams`]: super::PadParams
    pub fn pad_training_set(&mut self) -> RecogResult<PadOutcome> {
        let params = self.pad.clone();

        if self.num_samples < params.min_samples {
            warn!(
                samples = self.num_samples,
                min_samples = params.min_samples,
                "too few samples; replacing with bootstrap recognizer"
            );
            if !params.charset_type.is_available() {
                return Err(RecogError::CharsetUnavailable(params.charset_type));
            }
            let boot = match &params.boot_path {
                Some(path) => {
                    info!(path = %path.display(), "reading bootstrap set");
                    read_pixa_from_file(path)?
                }
                None => {
                    info!("no bootstrap path; using generic digits");
                    boot_digit_pixa(BootSet::Gen1)?
                }
            };
            let extended = extend_by_erosion(&boot, params.boot_iters)?;
            let mut replacement = Recog::create_from_pixa(
                &extended,
                REPLACE_SCALE_W,
                REPLACE_SCALE_H,
                TemplateUse::Average,
                PAD_THRESHOLD,
                1,
            )?;
            replacement.pad = params;
            replacement.debug_dir = self.debug_dir.clone();
            *self = replacement;
            return Ok(PadOutcome::Replaced);
        }

        if params.min_nopad == 0 {
            return Ok(PadOutcome::Unchanged);
        }
        let counts = self.class_counts();
        let all_classes = counts.len() == self.charset_size();
        let min_count = counts.iter().copied().min().unwrap_or(0);
        if all_classes && min_count >= params.min_nopad {
            debug!(min_count, "no padding needed");
            return Ok(PadOutcome::Unchanged);
        }

        if !params.charset_type.is_available() {
            return Err(RecogError::CharsetUnavailable(params.charset_type));
        }
        info!(
            dir = %params.boot_dir.display(),
            pattern = %params.boot_pattern,
            min_nopad = params.min_nopad,
            max_afterpad = params.max_afterpad,
            "padding from donor sets"
        );
        let paa = read_pixaa_from_files(&params.boot_dir, &params.boot_pattern)?;
        let donors = RecognizerSet::create_from_pixaa(
            &paa,
            0,
            PAD_SCALE_H,
            TemplateUse::Average,
            PAD_THRESHOLD,
            1,
        )?;

        let mut target = Recog::create_from_recog(
            self,
            0,
            PAD_SCALE_H,
            TemplateUse::Average,
            PAD_THRESHOLD,
            1,
        )?;
        target.pad = params.clone();
        target.debug_dir = self.debug_dir.clone();
        target.max_array_size = self.max_array_size;

        let (matches, means) = best_correl_for_padding(&target, &donors)?;
        target.debug_pad_matches(&donors, &matches);

        target.reopen();
        let (heights, ave_height) = target.average_class_heights()?;
        let counts = target.class_counts();
        let nclass = counts.len();
        let mut added = 0;

        for (i, &npix) in counts.iter().enumerate() {
            if npix >= params.min_nopad {
                continue;
            }
            let Some(m) = matches[i] else {
                warn!(class = i, "no donor class matches; not padded");
                continue;
            };
            let Some(donor_samples) = donors.get(m.set_index).and_then(|d| d.samples(m.class_index))
            else {
                warn!(class = i, set = m.set_index, "donor class not found");
                continue;
            };
            let ntoadd = params.max_afterpad.saturating_sub(npix).min(donor_samples.len());
            if ntoadd == 0 || heights[i] == 0 {
                continue;
            }
            info!(
                class = i,
                count = ntoadd,
                donor = m.set_index,
                donor_class = m.class_index,
                score = m.score,
                "padding class"
            );
            let label = target.class_labels[i].clone();
            let batch = donor_batch(&donor_samples[..ntoadd], heights[i], &label)?;
            added += target.add_samples(&batch, Some(i))?;
        }

        if let Some(best) = first_max_index(&means) {
            if let Some(boot) = donors.get(best) {
                if boot.set_size() > nclass && ave_height > 0 {
                    info!(
                        count = boot.set_size() - nclass,
                        donor = best,
                        "adding missing classes"
                    );
                    for (i, mapped) in map_index_to_index(boot, &target).into_iter().enumerate() {
                        if mapped.is_some() {
                            continue;
                        }
                        let Some(samples) = boot.samples(i) else {
                            continue;
                        };
                        let ntoadd = params.max_afterpad.min(samples.len());
                        if ntoadd == 0 {
                            continue;
                        }
                        let label = boot.class_labels[i].clone();
                        debug!(label = %label, count = ntoadd, "importing class");
                        let batch = donor_batch(&samples[..ntoadd], ave_height, &label)?;
                        added += target.add_samples(&batch, None)?;
                    }
                }
            }
        }

        target.training_finished()?;
        *self = target;
        info!(added, "padding finished");
        Ok(PadOutcome::Padded { added })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_max_index() {
        assert_eq!(first_max_index(&[0.2, 0.7, 0.7, 0.1]), Some(1));
        assert_eq!(first_max_index(&[]), None);
    }

    #[test]
    fn test_average_class_heights() {
        let mut recog = Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap();
        let mk = |h: u32, label: &str| {
            Pix::new(3, h, glyphtrain_core::PixelDepth::Bit1)
                .unwrap()
                .invert()
                .unwrap()
                .with_text(Some(label))
        };
        let batch: Pixa = [mk(10, "a"), mk(11, "a"), mk(20, "b")].into_iter().collect();
        recog.add_samples(&batch, None).unwrap();
        let (heights, overall) = recog.average_class_heights().unwrap();
        // 10.5 rounds up; (11 + 20) / 2 truncates
        assert_eq!(heights, vec![11, 20]);
        assert_eq!(overall, 15);
        let empty = Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap();
        assert!(empty.average_class_heights().is_err());
    }

    #[test]
    fn test_tier_b_unchanged_when_disabled() {
        let mut recog = Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap();
        recog.num_samples = 0;
        let params = recog
            .pad_params()
            .clone()
            .with_min_samples(0)
            .with_min_nopad(0)
            .with_max_afterpad(1);
        recog.set_pad_params(params).unwrap();
        assert_eq!(recog.pad_training_set().unwrap(), PadOutcome::Unchanged);
    }

    #[test]
    fn test_unavailable_charset_fails_replacement() {
        let mut recog = Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap();
        let params = recog
            .pad_params()
            .clone()
            .with_charset_type(super::super::CharsetType::UcAlpha);
        recog.set_pad_params(params).unwrap();
        assert!(matches!(
            recog.pad_training_set(),
            Err(RecogError::CharsetUnavailable(_))
        ));
        assert_eq!(recog.state(), super::super::TrainingState::Open);
    }
}
