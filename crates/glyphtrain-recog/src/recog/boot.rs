//! Built-in bootstrap digits and bootstrap training
//!
//! The digits 0-9 are drawn from an embedded 8x12 bitmap font and
//! rendered in three styles, giving a generic recognizer that can label
//! the first samples of a new document.

use glyphtrain_core::{Box, Pix, Pixa, PixelDepth};
use glyphtrain_morph::{dilate_brick, extend_by_erosion};
use glyphtrain_transform::scale_by_sampling;
use tracing::{debug, info};

use crate::error::{RecogError, RecogResult};

use super::types::{Recog, TemplateUse};

/// Width of the scratch and bootstrap recognizers
pub const BOOT_SCALE_W: i32 = 20;
/// Height of the scratch and bootstrap recognizers
pub const BOOT_SCALE_H: i32 = 32;
/// Binarization threshold of the bootstrap recognizer
pub const BOOT_THRESHOLD: i32 = 128;

const GLYPH_W: u32 = 8;
const GLYPH_H: u32 = 12;

#[rustfmt::skip]
const DIGIT_GLYPHS: [[&str; 12]; 10] = [
    [
        "..####..", ".##..##.", "##....##", "##....##", "##....##", "##....##",
        "##....##", "##....##", "##....##", "##....##", ".##..##.", "..####..",
    ],
    [
        "...##...", "..###...", ".####...", "...##...", "...##...", "...##...",
        "...##...", "...##...", "...##...", "...##...", "...##...", ".######.",
    ],
    [
        "..####..", ".##..##.", "##....##", "......##", ".....##.", "....##..",
        "...##...", "..##....", ".##.....", "##......", "##......", "########",
    ],
    [
        ".#####..", "##...##.", "......##", "......##", ".....##.", "..####..",
        ".....##.", "......##", "......##", "......##", "##...##.", ".#####..",
    ],
    [
        ".....##.", "....###.", "...####.", "..##.##.", ".##..##.", "##...##.",
        "##...##.", "########", ".....##.", ".....##.", ".....##.", ".....##.",
    ],
    [
        "########", "##......", "##......", "##......", "######..", ".....##.",
        "......##", "......##", "......##", "......##", "##...##.", ".#####..",
    ],
    [
        "..####..", ".##.....", "##......", "##......", "######..", "###..##.",
        "##....##", "##....##", "##....##", "##....##", ".##..##.", "..####..",
    ],
    [
        "########", "......##", "......##", ".....##.", ".....##.", "....##..",
        "....##..", "...##...", "...##...", "..##....", "..##....", "..##....",
    ],
    [
        "..####..", ".##..##.", "##....##", "##....##", ".##..##.", "..####..",
        ".##..##.", "##....##", "##....##", "##....##", ".##..##.", "..####..",
    ],
    [
        "..####..", ".##..##.", "##....##", "##....##", "##....##", ".##..###",
        "..######", "......##", "......##", ".....##.", "....##..", ".####...",
    ],
];

/// Rendition of the built-in digit set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootSet {
    /// 3x upscale of the base font
    Gen1,
    /// 2x upscale, emboldened with a 2x2 dilation
    Gen2,
    /// Condensed: 2x horizontally, 3x vertically
    Gen3,
}

fn digit_glyph(digit: usize) -> RecogResult<Pix> {
    let rows = &DIGIT_GLYPHS[digit];
    let mut pm = Pix::new(GLYPH_W, GLYPH_H, PixelDepth::Bit1)?.to_mut();
    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.bytes().enumerate() {
            if c == b'#' {
                pm.set_pixel(x as u32, y as u32, 1)?;
            }
        }
    }
    pm.set_text(Some(digit.to_string()));
    Ok(pm.into())
}

/// Render the digits 0-9, labelled, in one style.
pub fn boot_digit_pixa(set: BootSet) -> RecogResult<Pixa> {
    (0..DIGIT_GLYPHS.len())
        .map(|digit| {
            let glyph = digit_glyph(digit)?;
            let pix = match set {
                BootSet::Gen1 => scale_by_sampling(&glyph, 3.0, 3.0)?,
                BootSet::Gen2 => dilate_brick(&scale_by_sampling(&glyph, 2.0, 2.0)?, 2, 2)?,
                BootSet::Gen3 => scale_by_sampling(&glyph, 2.0, 3.0)?,
            };
            Ok(pix)
        })
        .collect()
}

/// Build the generic digit recognizer.
///
/// The three styles are extended by 2, 1 and 2 rounds of erosion
/// respectively and trained at 20x32.
pub fn make_boot_digit_recog(templ_use: TemplateUse, max_y_shift: i32) -> RecogResult<Recog> {
    let mut pixa = Pixa::new();
    for (set, iters) in [(BootSet::Gen1, 2), (BootSet::Gen2, 1), (BootSet::Gen3, 2)] {
        pixa.join(&extend_by_erosion(&boot_digit_pixa(set)?, iters)?);
    }
    debug!(samples = pixa.len(), "bootstrap digit set");
    Recog::create_from_pixa(
        &pixa,
        BOOT_SCALE_W,
        BOOT_SCALE_H,
        templ_use,
        BOOT_THRESHOLD,
        max_y_shift,
    )
}

/// A bootstrap recognizer lent by the caller or generated on the spot.
enum BootRecog<'a> {
    Borrowed(&'a Recog),
    Generated(Recog),
}

impl BootRecog<'_> {
    fn get(&self) -> &Recog {
        match self {
            BootRecog::Borrowed(recog) => *recog,
            BootRecog::Generated(recog) => recog,
        }
    }
}

impl Recog {
    /// Label one unlabelled bitmap with `boot` and train on it.
    ///
    /// The bitmap is cropped to `region` and binarized. If `boot`
    /// identifies it with a score of at least `min_score`, it is added to
    /// this recognizer under the identified label; otherwise it is
    /// dropped.
    ///
    /// # Returns
    ///
    /// Whether the sample was accepted.
    pub fn train_unlabelled(
        &mut self,
        boot: &Recog,
        pix: &Pix,
        region: Option<&Box>,
        min_score: f32,
    ) -> RecogResult<bool> {
        self.require_open("train_unlabelled")?;
        let cropped = match region {
            Some(b) => pix.clip_rectangle(b)?,
            None => pix.clone(),
        };
        let bin = cropped.convert_to_1(self.threshold)?;
        let rch = boot.identify_pix(&bin)?;
        if rch.score < min_score {
            debug!(score = rch.score, label = %rch.text, "rejected unlabelled sample");
            return Ok(false);
        }
        let sample = bin.with_text(Some(rch.text.as_str()));
        let batch: Pixa = std::iter::once(sample).collect();
        Ok(self.add_samples(&batch, None)? == 1)
    }

    /// Train a new recognizer from unlabelled bitmaps.
    ///
    /// Each bitmap is labelled with `boot`, or with the built-in digit
    /// recognizer when `boot` is `None`, and kept if its score reaches
    /// `min_score`. The accepted samples are collected at 20x32 and then
    /// used to build the returned recognizer with the caller's scaling
    /// and template mode.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::InvalidParameter`] for an empty input and
    /// [`RecogError::TrainingError`] if no bitmap was accepted.
    pub fn train_from_boot(
        pixa: &Pixa,
        boot: Option<&Recog>,
        min_score: f32,
        threshold: i32,
        scale_w: i32,
        scale_h: i32,
        templ_use: TemplateUse,
    ) -> RecogResult<Recog> {
        if pixa.is_empty() {
            return Err(RecogError::InvalidParameter("empty pixa".to_string()));
        }
        let mut scratch = Recog::create(BOOT_SCALE_W, BOOT_SCALE_H, TemplateUse::All, threshold, 1)?;
        let inputs = pixa
            .iter()
            .map(|pix| pix.convert_to_1(scratch.threshold))
            .collect::<Result<Vec<Pix>, _>>()?;

        let boot = match boot {
            Some(recog) => BootRecog::Borrowed(recog),
            None => BootRecog::Generated(make_boot_digit_recog(TemplateUse::Average, 1)?),
        };

        let mut accepted = 0;
        for pix in &inputs {
            match scratch.train_unlabelled(boot.get(), pix, None, min_score) {
                Ok(true) => accepted += 1,
                Ok(false) | Err(RecogError::NoContent(_)) => {}
                Err(e) => return Err(e),
            }
        }
        info!(accepted, of = inputs.len(), "bootstrap labelling");
        if accepted == 0 {
            return Err(RecogError::TrainingError(
                "no sample reached the minimum score".to_string(),
            ));
        }
        scratch.training_finished()?;

        let labelled = scratch.extract_pixa();
        Recog::create_from_pixa(&labelled, scale_w, scale_h, templ_use, threshold, 1)
    }
}
