//! Arrays of recognizers
//!
//! A [`RecognizerSet`] holds donor recognizers for padding, typically one
//! per bitmap-set file, in insertion order.

use glyphtrain_core::Pixaa;
use tracing::warn;

use crate::error::{RecogError, RecogResult};

use super::types::{PadOutcome, Recog, TemplateUse};

/// Ordered collection of recognizers
#[derive(Debug, Clone, Default)]
pub struct RecognizerSet {
    recogs: Vec<Recog>,
}

impl RecognizerSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one finished recognizer per non-empty bitmap set.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] if no recognizer could be
    /// built, and the first construction error otherwise.
    pub fn create_from_pixaa(
        paa: &Pixaa,
        scale_w: i32,
        scale_h: i32,
        templ_use: TemplateUse,
        threshold: i32,
        max_y_shift: i32,
    ) -> RecogResult<RecognizerSet> {
        let mut set = RecognizerSet::new();
        for (i, pixa) in paa.iter().enumerate() {
            if pixa.is_empty() {
                warn!(set = i, "skipping empty bitmap set");
                continue;
            }
            set.push(Recog::create_from_pixa(
                pixa,
                scale_w,
                scale_h,
                templ_use,
                threshold,
                max_y_shift,
            )?);
        }
        if set.is_empty() {
            return Err(RecogError::InvalidParameter(
                "no recognizer could be built from the bitmap sets".to_string(),
            ));
        }
        Ok(set)
    }

    /// Number of recognizers
    pub fn len(&self) -> usize {
        self.recogs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.recogs.is_empty()
    }

    /// Append a recognizer
    pub fn push(&mut self, recog: Recog) {
        self.recogs.push(recog);
    }

    /// Get a recognizer by index
    pub fn get(&self, index: usize) -> Option<&Recog> {
        self.recogs.get(index)
    }

    /// Get a mutable recognizer by index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Recog> {
        self.recogs.get_mut(index)
    }

    /// Iterate over the recognizers
    pub fn iter(&self) -> impl Iterator<Item = &Recog> {
        self.recogs.iter()
    }

    /// Put `recog` at `index`, returning the recognizer it displaces.
    pub fn replace(&mut self, index: usize, recog: Recog) -> RecogResult<Recog> {
        let len = self.recogs.len();
        let slot = self.recogs.get_mut(index).ok_or_else(|| {
            RecogError::InvalidParameter(format!("index {} out of range (len {})", index, len))
        })?;
        Ok(std::mem::replace(slot, recog))
    }

    /// Whether every recognizer has finished training
    pub fn training_done(&self) -> bool {
        self.recogs.iter().all(Recog::training_done)
    }

    /// Pad the recognizer at `index` in place.
    ///
    /// A replacement made by [`Recog::pad_training_set`] takes the
    /// member's slot, so the set always holds the current recognizer.
    pub fn pad_member(&mut self, index: usize) -> RecogResult<PadOutcome> {
        let len = self.recogs.len();
        let recog = self.recogs.get_mut(index).ok_or_else(|| {
            RecogError::InvalidParameter(format!("index {} out of range (len {})", index, len))
        })?;
        recog.pad_training_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphtrain_core::{Pix, Pixa, PixelDepth};

    fn labelled(label: &str) -> Pix {
        let mut pm = Pix::new(4, 10, PixelDepth::Bit1).unwrap().to_mut();
        for y in 0..10 {
            pm.set_pixel(1, y, 1).unwrap();
            pm.set_pixel(2, y, 1).unwrap();
        }
        pm.set_text(Some(label.to_string()));
        pm.into()
    }

    #[test]
    fn test_create_from_pixaa_skips_empty() {
        let a: Pixa = [labelled("1"), labelled("1")].into_iter().collect();
        let b: Pixa = [labelled("7")].into_iter().collect();
        let paa: Pixaa = [a, Pixa::new(), b].into_iter().collect();
        let set = RecognizerSet::create_from_pixaa(&paa, 0, 32, TemplateUse::Average, 100, 1).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.training_done());
        assert_eq!(set.get(1).unwrap().class_label(0), Some("7"));

        let empty: Pixaa = [Pixa::new()].into_iter().collect();
        assert!(RecognizerSet::create_from_pixaa(&empty, 0, 32, TemplateUse::Average, 100, 1).is_err());
    }

    #[test]
    fn test_replace() {
        let mut set = RecognizerSet::new();
        set.push(Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap());
        let other = Recog::create(0, 40, TemplateUse::All, 150, 1).unwrap();
        let old = set.replace(0, other).unwrap();
        assert_eq!(old.scale_h, 0);
        assert_eq!(set.get(0).unwrap().scale_h, 40);
        assert!(!set.training_done());
        let spare = Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap();
        assert!(set.replace(3, spare).is_err());
    }
}
