//! Diagnostic images
//!
//! Only written when [`Recog::debug_dir`] is set. Failures are logged and
//! otherwise ignored, so diagnostics never change a training result.

use std::fmt;
use std::path::PathBuf;

use glyphtrain_core::{Boxa, Color, Pix, Pixa, Pixaa};
use glyphtrain_io::write_png_to_file;
use tracing::{debug, warn};

use crate::error::{RecogError, RecogResult};

use super::pad::PadMatch;
use super::recoga::RecognizerSet;
use super::types::Recog;

const DISPLAY_SPACING: u32 = 4;

/// Conventional location for diagnostic images: `<tmp>/glyphtrain/recog`
pub fn default_debug_dir() -> PathBuf {
    std::env::temp_dir().join("glyphtrain").join("recog")
}

fn segmentation_overlay(pix: &Pix, boxa: &Boxa) -> RecogResult<Pix> {
    let mut overlay = pix.convert_1_to_32()?.to_mut();
    for b in boxa.iter() {
        overlay.render_box(b, 1, Color::RED)?;
    }
    Ok(overlay.into())
}

fn averages_display(recog: &Recog) -> RecogResult<Pix> {
    let rows: Pixaa = [
        recog.averages_unscaled().iter().cloned().collect::<Pixa>(),
        recog.averages().iter().cloned().collect::<Pixa>(),
    ]
    .into_iter()
    .collect();
    Ok(rows.display_rows(DISPLAY_SPACING)?)
}

fn pad_match_display(
    recog: &Recog,
    donors: &RecognizerSet,
    matches: &[Option<PadMatch>],
) -> RecogResult<Pix> {
    let mut rows = Pixaa::new();
    for (i, m) in matches.iter().enumerate() {
        let Some(m) = m else {
            continue;
        };
        let Some(donor) = donors.get(m.set_index) else {
            continue;
        };
        let (Some(target), Some(source)) = (recog.averages().get(i), donor.averages().get(m.class_index))
        else {
            continue;
        };
        rows.push([target.clone(), source.clone()].into_iter().collect());
    }
    if rows.is_empty() {
        return Err(RecogError::NoContent("no padding matches".to_string()));
    }
    Ok(rows.display_rows(DISPLAY_SPACING)?)
}

impl Recog {
    fn write_debug_image(&self, name: &str, image: RecogResult<Pix>) {
        let Some(dir) = &self.debug_dir else {
            return;
        };
        let pix = match image {
            Ok(pix) => pix,
            Err(e) => {
                warn!(name, error = %e, "could not compose debug image");
                return;
            }
        };
        if let Err(e) = std::fs::create_dir_all(dir) {
            warn!(dir = %dir.display(), error = %e, "could not create debug directory");
            return;
        }
        let path = dir.join(name);
        match write_png_to_file(&pix, &path) {
            Ok(()) => debug!(path = %path.display(), "wrote debug image"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not write debug image"),
        }
    }

    /// Component boxes in red over a rejected multi-character sample.
    pub(crate) fn debug_segmentation(&self, pix: &Pix, boxa: &Boxa) {
        if self.debug_dir.is_some() {
            self.write_debug_image("segmentation_mismatch.png", segmentation_overlay(pix, boxa));
        }
    }

    /// Unscaled averages above scaled averages.
    pub(crate) fn debug_averages(&self) {
        if self.debug_dir.is_some() {
            self.write_debug_image("averages.png", averages_display(self));
        }
    }

    /// One row per padded class: own average, then the donor's.
    pub(crate) fn debug_pad_matches(&self, donors: &RecognizerSet, matches: &[Option<PadMatch>]) {
        if self.debug_dir.is_some() {
            self.write_debug_image("padmatch.png", pad_match_display(self, donors, matches));
        }
    }
}

impl fmt::Display for Recog {
    /// Text summary of the classes, their sample counts and the template
    /// size ranges.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Recog: scale {}x{}, templates {:?}, state {:?}",
            self.scale_w, self.scale_h, self.templ_use, self.state
        )?;
        writeln!(f, "  {} classes, {} samples", self.set_size(), self.num_samples)?;
        for (i, (label, samples)) in self.class_labels.iter().zip(&self.pixaa_u).enumerate() {
            write!(f, "  [{i}] {label:?}: {} samples", samples.len())?;
            if let Some(avg) = self.pixa_u.get(i) {
                write!(f, ", average {}x{}", avg.width(), avg.height())?;
            }
            writeln!(f)?;
        }
        if !self.pixa_u.is_empty() {
            writeln!(
                f,
                "  unscaled width {}..{}, height {}..{}",
                self.minwidth_u, self.maxwidth_u, self.minheight_u, self.maxheight_u
            )?;
            writeln!(f, "  scaled width {}..{}", self.minwidth, self.maxwidth)?;
        }
        Ok(())
    }
}

impl fmt::Display for RecognizerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "RecognizerSet: {} recognizers", self.len())?;
        for (i, recog) in self.iter().enumerate() {
            writeln!(
                f,
                "  [{i}] {} classes, {} samples: {}",
                recog.set_size(),
                recog.num_samples,
                recog.class_labels.join(" ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recog::TemplateUse;
    use glyphtrain_core::{Box, PixelDepth};

    #[test]
    fn test_default_debug_dir() {
        let dir = default_debug_dir();
        assert!(dir.ends_with("glyphtrain/recog"));
    }

    #[test]
    fn test_segmentation_overlay_draws_boxes() {
        let pix = Pix::new(10, 10, PixelDepth::Bit1).unwrap();
        let mut boxa = Boxa::new();
        boxa.push(Box::new(2, 2, 4, 4).unwrap());
        let overlay = segmentation_overlay(&pix, &boxa).unwrap();
        assert_eq!(overlay.depth(), PixelDepth::Bit32);
        assert_ne!(overlay.get_pixel(2, 2), overlay.get_pixel(0, 0));
    }

    #[test]
    fn test_debug_images_written_only_with_dir() {
        let dir = std::env::temp_dir().join("glyphtrain_debug_unit");
        let _ = std::fs::remove_dir_all(&dir);
        let mut pm = Pix::new(4, 8, PixelDepth::Bit1).unwrap().to_mut();
        for y in 0..8 {
            pm.set_pixel(1, y, 1).unwrap();
        }
        pm.set_text(Some("1".to_string()));
        let pixa: Pixa = std::iter::once(Pix::from(pm)).collect();

        let mut recog = Recog::create_from_pixa(&pixa, 0, 0, TemplateUse::All, 150, 1).unwrap();
        recog.debug_averages();
        assert!(!dir.exists());

        recog.debug_dir = Some(dir.clone());
        recog.debug_averages();
        assert!(dir.join("averages.png").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_display_lists_classes() {
        let glyph = |w: u32, label: &str| {
            let mut pm = Pix::new(w, 8, PixelDepth::Bit1).unwrap().to_mut();
            for y in 0..8 {
                for x in 0..w {
                    pm.set_pixel(x, y, 1).unwrap();
                }
            }
            pm.set_text(Some(label.to_string()));
            Pix::from(pm)
        };
        let pixa: Pixa = [glyph(2, "1"), glyph(2, "1"), glyph(5, "0")].into_iter().collect();

        let mut recog = Recog::create(0, 0, TemplateUse::All, 150, 1).unwrap();
        recog.add_samples(&pixa, None).unwrap();
        let open = recog.to_string();
        assert!(open.contains("2 classes, 3 samples"));
        assert!(open.contains("[0] \"1\": 2 samples"));
        assert!(!open.contains("unscaled width"));

        recog.training_finished().unwrap();
        let done = recog.to_string();
        assert!(done.contains("[1] \"0\": 1 samples, average 5x8"));
        assert!(done.contains("unscaled width 2..5, height 8..8"));

        let mut set = RecognizerSet::new();
        set.push(recog);
        let listing = set.to_string();
        assert!(listing.starts_with("RecognizerSet: 1 recognizers"));
        assert!(listing.contains("[0] 2 classes, 3 samples: 1 0"));
    }
}
