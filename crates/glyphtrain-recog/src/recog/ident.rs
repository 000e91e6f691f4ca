//! Single-character identification
//!
//! A bitmap is prepared like a training sample and correlated with the
//! templates of every class; the best score wins.

use glyphtrain_core::{Pix, correlation_score_simple};

use crate::error::{RecogError, RecogResult};

use super::types::{Rch, Recog, TemplateUse};

impl Recog {
    /// Identify a single character.
    ///
    /// The bitmap is binarized with the recognizer's threshold, clipped to
    /// its foreground and scaled like a training sample. It is then
    /// correlated, centroids aligned, with every scaled sample
    /// ([`TemplateUse::All`]) or every scaled class average
    /// ([`TemplateUse::Average`]). Each template is also tried shifted
    /// vertically by up to `max_y_shift` pixels, and may differ from the
    /// input by up to half the larger size on each axis.
    ///
    /// # Errors
    ///
    /// - [`RecogError::WrongState`] unless the averages are fresh
    /// - [`RecogError::IdentificationError`] if the recognizer has no classes
    /// - [`RecogError::NoContent`] if the bitmap has no foreground
    pub fn identify_pix(&self, pix: &Pix) -> RecogResult<Rch> {
        if !self.averages_valid() {
            return Err(RecogError::WrongState {
                operation: "identify_pix",
                state: self.state,
            });
        }
        if self.set_size() == 0 {
            return Err(RecogError::IdentificationError(
                "recognizer has no classes".to_string(),
            ));
        }

        let bin = pix.convert_to_1(self.threshold)?;
        let (clipped, _) = bin
            .clip_to_foreground()?
            .ok_or_else(|| RecogError::NoContent("no foreground to identify".to_string()))?;
        let scaled = self.scale_character(&clipped)?;
        let (x1, y1) = scaled.centroid()?;
        let area1 = scaled.count_pixels()?;
        let shift = self.max_y_shift as i32;

        // (class, sample, score)
        let mut best: Option<(usize, usize, f32)> = None;
        for class in 0..self.set_size() {
            let candidates: Vec<(&Pix, (f32, f32), u32)> = match self.templ_use {
                TemplateUse::All => self.pixaa[class]
                    .iter()
                    .zip(&self.ptaa[class])
                    .zip(&self.naasum[class])
                    .map(|((t, &c), &a)| (t, c, a))
                    .collect(),
                TemplateUse::Average => vec![(&self.pixa[class], self.pta[class], self.nasum[class])],
            };
            for (sample, (template, (x2, y2), area2)) in candidates.into_iter().enumerate() {
                let maxdiffw = scaled.width().max(template.width()) / 2;
                let maxdiffh = scaled.height().max(template.height()) / 2;
                for dy in -shift..=shift {
                    let score = correlation_score_simple(
                        &scaled,
                        template,
                        area1,
                        area2,
                        x1 - x2,
                        y1 - y2 + dy as f32,
                        maxdiffw,
                        maxdiffh,
                    )?;
                    if best.is_none_or(|(_, _, s)| score > s) {
                        best = Some((class, sample, score));
                    }
                }
            }
        }

        let (index, sample, score) = best.ok_or_else(|| {
            RecogError::IdentificationError("no templates to match".to_string())
        })?;
        Ok(Rch {
            index,
            score,
            text: self.class_labels[index].clone(),
            sample,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphtrain_core::{Pixa, PixelDepth};
    use glyphtrain_test::pix_from_rows;

    fn shape(rows: &[&str], label: &str) -> Pix {
        pix_from_rows(rows).unwrap().with_text(Some(label))
    }

    fn recog(templ_use: TemplateUse) -> Recog {
        let bar = shape(&["##", "##", "##", "##", "##", "##", "##", "##"], "1");
        let ring = shape(
            &["######", "#....#", "#....#", "#....#", "#....#", "#....#", "#....#", "######"],
            "0",
        );
        let pixa: Pixa = [bar, ring].into_iter().collect();
        Recog::create_from_pixa(&pixa, 0, 0, templ_use, 150, 1).unwrap()
    }

    #[test]
    fn test_identify_exact_match() {
        for templ_use in [TemplateUse::All, TemplateUse::Average] {
            let recog = recog(templ_use);
            let ring = shape(
                &["######", "#....#", "#....#", "#....#", "#....#", "#....#", "#....#", "######"],
                "",
            );
            let rch = recog.identify_pix(&ring).unwrap();
            assert_eq!(rch.text, "0");
            assert!((rch.score - 1.0).abs() < 1e-6);
            assert_eq!(rch.sample, 0);
        }
    }

    #[test]
    fn test_identify_requires_fresh_averages() {
        let open = Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap();
        let pix = Pix::new(3, 3, PixelDepth::Bit1).unwrap().invert().unwrap();
        assert!(matches!(
            open.identify_pix(&pix),
            Err(RecogError::WrongState { .. })
        ));
        let recog = recog(TemplateUse::All);
        let empty = Pix::new(3, 3, PixelDepth::Bit1).unwrap();
        assert!(matches!(recog.identify_pix(&empty), Err(RecogError::NoContent(_))));
    }
}
