//! Closing training and rebuilding recognizers
//!
//! [`Recog::training_finished`] turns the open sample buckets into the
//! closed two-domain layout: every unscaled sample gets its centroid,
//! area and scaled counterpart, and the class averages are computed.

use glyphtrain_core::{Pix, Pixa};
use glyphtrain_transform::scale_to_size;
use tracing::{debug, info, warn};

use crate::error::{RecogError, RecogResult};

use super::types::{Recog, TemplateUse, TrainingState};

impl Recog {
    /// Scale a sample the way training samples are scaled.
    ///
    /// An axis with a scale target of 0 keeps its aspect ratio. When no
    /// scaling is configured, or the sample already has the target size,
    /// the sample itself is returned.
    pub fn scale_character(&self, pix: &Pix) -> RecogResult<Pix> {
        let w_ok = self.scale_w == 0 || self.scale_w == pix.width();
        let h_ok = self.scale_h == 0 || self.scale_h == pix.height();
        if w_ok && h_ok {
            return Ok(pix.clone());
        }
        Ok(scale_to_size(pix, self.scale_w, self.scale_h)?)
    }

    /// Close training and compute the class averages.
    ///
    /// Builds, for every unscaled sample, its centroid and area and its
    /// scaled counterpart with centroid and area; then averages both
    /// domains and trims the per-class storage to the number of classes.
    /// Does nothing if training is already closed.
    pub fn training_finished(&mut self) -> RecogResult<()> {
        if self.state.is_closed() {
            return Ok(());
        }
        if self.set_size() == 0 {
            warn!("finishing training with no classes");
        }

        let capacity = self.max_array_size;
        let mut ptaa_u = Vec::with_capacity(capacity);
        let mut naasum_u = Vec::with_capacity(capacity);
        let mut pixaa = Vec::with_capacity(capacity);
        let mut ptaa = Vec::with_capacity(capacity);
        let mut naasum = Vec::with_capacity(capacity);
        for samples in &self.pixaa_u {
            let n = samples.len();
            let mut pta_u = Vec::with_capacity(n);
            let mut nasum_u = Vec::with_capacity(n);
            let mut pixa = Vec::with_capacity(n);
            let mut pta = Vec::with_capacity(n);
            let mut nasum = Vec::with_capacity(n);
            for pix in samples {
                pta_u.push(pix.centroid()?);
                nasum_u.push(pix.count_pixels()?);
                let scaled = self.scale_character(pix)?;
                pta.push(scaled.centroid()?);
                nasum.push(scaled.count_pixels()?);
                pixa.push(scaled);
            }
            ptaa_u.push(pta_u);
            naasum_u.push(nasum_u);
            pixaa.push(pixa);
            ptaa.push(pta);
            naasum.push(nasum);
        }

        self.ptaa_u = ptaa_u;
        self.naasum_u = naasum_u;
        self.pixaa = pixaa;
        self.ptaa = ptaa;
        self.naasum = naasum;
        self.state = TrainingState::Closed;

        self.average_samples(self.debug_dir.is_some())?;

        self.class_keys.shrink_to_fit();
        self.class_labels.shrink_to_fit();
        self.pixaa_u.shrink_to_fit();
        self.ptaa_u.shrink_to_fit();
        self.naasum_u.shrink_to_fit();
        self.pixaa.shrink_to_fit();
        self.ptaa.shrink_to_fit();
        self.naasum.shrink_to_fit();
        debug!(
            classes = self.set_size(),
            samples = self.num_samples,
            "training finished"
        );
        Ok(())
    }

    /// Reopen a finished recognizer for more samples.
    ///
    /// The scaled samples and averages are kept until the next
    /// [`Recog::training_finished`], which rebuilds them.
    pub(crate) fn reopen(&mut self) {
        self.state = TrainingState::Open;
        self.pixaa_u.reserve(self.max_array_size.saturating_sub(self.pixaa_u.len()));
    }

    /// Copy out every unscaled sample, labelled with its class.
    ///
    /// Samples are returned in class order, and in insertion order within
    /// a class.
    pub fn extract_pixa(&self) -> Pixa {
        let mut pixa = Pixa::with_capacity(self.num_samples);
        for (label, samples) in self.class_labels.iter().zip(&self.pixaa_u) {
            for pix in samples {
                pixa.push(pix.deep_clone().with_text(Some(label)));
            }
        }
        pixa
    }

    /// Create a finished recognizer from labelled bitmaps.
    ///
    /// Each bitmap is trained as a single labelled character. Bitmaps
    /// without a label, or with nothing left after clipping, are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] for an empty input and
    /// [`RecogError::TrainingError`] if no bitmap could be used.
    pub fn create_from_pixa(
        pixa: &Pixa,
        scale_w: i32,
        scale_h: i32,
        templ_use: TemplateUse,
        threshold: i32,
        max_y_shift: i32,
    ) -> RecogResult<Recog> {
        if pixa.is_empty() {
            return Err(RecogError::InvalidParameter("empty pixa".to_string()));
        }
        let mut recog = Recog::create(scale_w, scale_h, templ_use, threshold, max_y_shift)?;
        for (i, pix) in pixa.iter().enumerate() {
            if pix.text().is_none_or(str::is_empty) {
                warn!(sample = i, "skipping unlabelled bitmap");
                continue;
            }
            match recog.train_labelled(pix, None, None, false, false) {
                Ok(_) => {}
                Err(RecogError::NoContent(_)) => {
                    warn!(sample = i, "skipping empty bitmap");
                }
                Err(e) => return Err(e),
            }
        }
        if recog.num_samples == 0 {
            return Err(RecogError::TrainingError(
                "no usable labelled bitmaps".to_string(),
            ));
        }
        recog.training_finished()?;
        info!(
            classes = recog.set_size(),
            samples = recog.num_samples,
            "created recognizer from pixa"
        );
        Ok(recog)
    }

    /// Create a finished recognizer from the samples of another one,
    /// with new scaling and matching parameters.
    pub fn create_from_recog(
        recog: &Recog,
        scale_w: i32,
        scale_h: i32,
        templ_use: TemplateUse,
        threshold: i32,
        max_y_shift: i32,
    ) -> RecogResult<Recog> {
        let pixa = recog.extract_pixa();
        Recog::create_from_pixa(&pixa, scale_w, scale_h, templ_use, threshold, max_y_shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphtrain_core::PixelDepth;

    fn bar(w: u32, h: u32, label: &str) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit1).unwrap().to_mut();
        for y in 0..h {
            for x in 0..w {
                if x == 0 || y == 0 || x == w - 1 {
                    pm.set_pixel(x, y, 1).unwrap();
                }
            }
        }
        pm.set_text(Some(label.to_string()));
        pm.into()
    }

    fn trained(scale_w: i32, scale_h: i32) -> Recog {
        let mut recog = Recog::create(scale_w, scale_h, TemplateUse::All, 150, 1).unwrap();
        let batch: Pixa = [
            bar(6, 12, "0"),
            bar(7, 12, "0"),
            bar(5, 10, "1"),
            bar(6, 14, "0"),
        ]
        .into_iter()
        .collect();
        recog.add_samples(&batch, None).unwrap();
        recog
    }

    #[test]
    fn test_scale_character() {
        let recog = Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap();
        let pix = bar(6, 12, "0");
        assert!(recog.scale_character(&pix).unwrap().ptr_eq(&pix));

        let recog = Recog::create(0, 24, TemplateUse::All, 150, 1).unwrap();
        let scaled = recog.scale_character(&pix).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (12, 24));

        let recog = Recog::create(6, 12, TemplateUse::All, 150, 1).unwrap();
        assert!(recog.scale_character(&pix).unwrap().ptr_eq(&pix));
    }

    #[test]
    fn test_finish_builds_both_domains() {
        let mut recog = trained(0, 20);
        recog.training_finished().unwrap();
        assert_eq!(recog.state(), TrainingState::AveragesFresh);
        assert!(recog.training_done());
        assert_eq!(recog.set_size(), 2);
        assert_eq!(recog.class_capacity(), 2);
        for i in 0..recog.set_size() {
            assert_eq!(recog.samples(i).unwrap().len(), recog.scaled_samples(i).unwrap().len());
        }
        for pix in recog.scaled_samples(0).unwrap() {
            assert_eq!(pix.height(), 20);
        }
        assert_eq!(recog.averages().len(), 2);
        assert_eq!(recog.averages_unscaled().len(), 2);
        assert!(recog.average_areas().iter().all(|&a| a > 0));
        assert_eq!((recog.minheight_u, recog.maxheight_u), (10, 14));
        assert_eq!(recog.max_split_h, 26);
        assert_eq!(recog.min_split_w, 5);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut recog = trained(0, 0);
        recog.training_finished().unwrap();
        let before: Vec<Vec<u32>> = recog.averages().iter().map(|p| p.data().to_vec()).collect();
        let centroids = recog.average_centroids().to_vec();
        recog.training_finished().unwrap();
        let after: Vec<Vec<u32>> = recog.averages().iter().map(|p| p.data().to_vec()).collect();
        assert_eq!(before, after);
        assert_eq!(centroids, recog.average_centroids());
    }

    #[test]
    fn test_no_samples_after_finish() {
        let mut recog = trained(0, 0);
        recog.training_finished().unwrap();
        let batch: Pixa = [bar(6, 12, "0")].into_iter().collect();
        assert!(matches!(
            recog.add_samples(&batch, None),
            Err(RecogError::WrongState { .. })
        ));
        assert_eq!(recog.num_samples, 4);
    }

    #[test]
    fn test_extract_and_rebuild() {
        let mut recog = trained(0, 0);
        recog.training_finished().unwrap();
        let pixa = recog.extract_pixa();
        let labels: Vec<&str> = pixa.iter().filter_map(|p| p.text()).collect();
        assert_eq!(labels, vec!["0", "0", "0", "1"]);

        let rebuilt = Recog::create_from_recog(&recog, 0, 32, TemplateUse::Average, 100, 1).unwrap();
        assert_eq!(rebuilt.num_samples, 4);
        assert_eq!(rebuilt.class_labels(), recog.class_labels());
        assert!(rebuilt.averages_valid());
        assert_eq!(rebuilt.scaled_samples(1).unwrap()[0].height(), 32);
    }

    #[test]
    fn test_create_from_pixa_skips_unlabelled() {
        let unlabelled = Pix::new(5, 5, PixelDepth::Bit1).unwrap();
        let pixa: Pixa = [bar(6, 12, "4"), unlabelled].into_iter().collect();
        let recog = Recog::create_from_pixa(&pixa, 0, 0, TemplateUse::All, 150, 1).unwrap();
        assert_eq!(recog.num_samples, 1);
        assert!(Recog::create_from_pixa(&Pixa::new(), 0, 0, TemplateUse::All, 150, 1).is_err());
    }
}
