//! Outlier removal
//!
//! Every scaled sample is scored against its class average. Within a
//! class the samples are ranked by score, and a sample survives if its
//! rank is inside the retained prefix. The prefix is long enough to hold
//! a minimum fraction of the class and every sample scoring at least the
//! target, plus the first one below it; it never drops below one sample.

use glyphtrain_core::correlation_score_simple;
use tracing::{debug, info};

use crate::error::{RecogError, RecogResult};

use super::types::{Recog, TrainingState};

/// Default score a sample should reach against its class average
pub const DEFAULT_TARGET_SCORE: f32 = 0.75;
/// Default fraction of each class that is always kept
pub const DEFAULT_MIN_FRACTION: f32 = 0.5;

/// Size tolerance when correlating a sample with its class average
const OUTLIER_MAX_DIFF: u32 = 5;

/// Number of top-ranked samples to keep out of `sorted` scores.
///
/// `sorted` must be in decreasing order.
fn retained_count(sorted: &[f32], target_score: f32, min_fraction: f32) -> usize {
    let n = sorted.len();
    let nkeep = (min_fraction * n as f32 + 0.5) as usize;
    let ngood = sorted
        .iter()
        .position(|&score| score < target_score)
        .map_or(n, |j| j + 1);
    nkeep.max(ngood).max(1)
}

/// Rank of every score when sorted in decreasing order.
///
/// Equal scores keep their original order.
fn decreasing_ranks(scores: &[f32]) -> (Vec<f32>, Vec<usize>) {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    let mut ranks = vec![0; scores.len()];
    for (rank, &index) in order.iter().enumerate() {
        ranks[index] = rank;
    }
    let sorted = order.iter().map(|&i| scores[i]).collect();
    (sorted, ranks)
}

/// Keep the entries of `v` whose flag is set, preserving order.
fn compact<T>(v: &mut Vec<T>, keep: &[bool]) {
    let mut flags = keep.iter();
    v.retain(|_| flags.next().copied().unwrap_or(false));
}

impl Recog {
    /// Score every scaled sample of class `index` against the class average.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::WrongState`] unless the averages are fresh and
    /// [`RecogError::InvalidParameter`] for an unknown class.
    pub fn class_scores(&self, index: usize) -> RecogResult<Vec<f32>> {
        if !self.averages_valid() {
            return Err(RecogError::WrongState {
                operation: "class_scores",
                state: self.state,
            });
        }
        if index >= self.set_size() {
            return Err(RecogError::InvalidParameter(format!(
                "class index {} out of range (set size {})",
                index,
                self.set_size()
            )));
        }
        let average = &self.pixa[index];
        let (x1, y1) = self.pta[index];
        let area1 = self.nasum[index];
        self.pixaa[index]
            .iter()
            .zip(&self.ptaa[index])
            .zip(&self.naasum[index])
            .map(|((pix, &(x2, y2)), &area2)| -> RecogResult<f32> {
                let score = correlation_score_simple(
                    average,
                    pix,
                    area1,
                    area2,
                    x1 - x2,
                    y1 - y2,
                    OUTLIER_MAX_DIFF,
                    OUTLIER_MAX_DIFF,
                )?;
                if score == 0.0 {
                    debug!(class = index, "zero score, likely a large size difference");
                }
                Ok(score)
            })
            .collect()
    }

    /// Remove samples that correlate poorly with their class average.
    ///
    /// # Arguments
    ///
    /// * `target_score` - Score a sample should reach; values above 1 are
    ///   clamped and values `<= 0` select [`DEFAULT_TARGET_SCORE`]
    /// * `min_fraction` - Fraction of each class always kept; clamped and
    ///   defaulted the same way with [`DEFAULT_MIN_FRACTION`]
    ///
    /// # Returns
    ///
    /// The number of samples removed. If any were removed the averages
    /// are recomputed.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::WrongState`] while training is open.
    pub fn remove_outliers(&mut self, target_score: f32, min_fraction: f32) -> RecogResult<usize> {
        self.require_closed("remove_outliers")?;
        self.average_samples(false)?;

        let mut target_score = target_score.min(1.0);
        if target_score <= 0.0 {
            target_score = DEFAULT_TARGET_SCORE;
        }
        let mut min_fraction = min_fraction.min(1.0);
        if min_fraction <= 0.0 {
            min_fraction = DEFAULT_MIN_FRACTION;
        }

        // Score everything first so that a failure leaves the samples intact.
        let scores = (0..self.set_size())
            .map(|i| self.class_scores(i))
            .collect::<RecogResult<Vec<_>>>()?;

        let mut nremoved = 0;
        for (i, scores) in scores.iter().enumerate() {
            let n = scores.len();
            if n == 0 {
                continue;
            }
            let (sorted, ranks) = decreasing_ranks(scores);
            let nkeep = retained_count(&sorted, target_score, min_fraction);
            if nkeep >= n {
                continue;
            }
            let keep: Vec<bool> = ranks.iter().map(|&rank| rank < nkeep).collect();
            compact(&mut self.pixaa[i], &keep);
            compact(&mut self.ptaa[i], &keep);
            compact(&mut self.naasum[i], &keep);
            compact(&mut self.pixaa_u[i], &keep);
            compact(&mut self.ptaa_u[i], &keep);
            compact(&mut self.naasum_u[i], &keep);
            debug!(class = i, removed = n - nkeep, of = n, "removed outliers");
            nremoved += n - nkeep;
        }

        if nremoved > 0 {
            info!(removed = nremoved, "outlier removal");
            self.num_samples -= nremoved;
            self.state = TrainingState::AveragesStale;
            self.average_samples(false)?;
        }
        Ok(nremoved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retained_count() {
        // All good: keep everything
        assert_eq!(retained_count(&[0.9, 0.9, 0.8], 0.75, 0.5), 3);
        // First bad score at sorted index 1: keep 2, but the fraction asks for 3
        assert_eq!(retained_count(&[0.9, 0.5, 0.4, 0.3, 0.2], 0.75, 0.5), 3);
        // Fraction rounds half up
        assert_eq!(retained_count(&[0.1, 0.1, 0.1], 0.75, 0.5), 2);
        // Never below one
        assert_eq!(retained_count(&[0.1], 0.75, 0.1), 1);
        assert_eq!(retained_count(&[0.1, 0.05, 0.0, 0.0], 0.75, 0.1), 1);
    }

    #[test]
    fn test_decreasing_ranks() {
        let (sorted, ranks) = decreasing_ranks(&[0.2, 0.9, 0.5, 0.9]);
        assert_eq!(sorted, vec![0.9, 0.9, 0.5, 0.2]);
        assert_eq!(ranks, vec![3, 0, 2, 1]);
    }

    #[test]
    fn test_compact() {
        let mut v = vec!['a', 'b', 'c', 'd'];
        compact(&mut v, &[true, false, true, false]);
        assert_eq!(v, vec!['a', 'c']);
    }
}
