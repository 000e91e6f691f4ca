//! Growing a labelled bitmap set by repeated erosion

use crate::{MorphResult, erode_brick};
use glyphtrain_core::Pixa;

/// Extend a bitmap set with eroded renditions of every image.
///
/// The result holds the originals followed by `niters` rounds; round `i`
/// contains each original eroded `i` times with a 2x2 brick. Text labels
/// are carried over to the eroded copies.
///
/// # Arguments
///
/// * `pixa` - 1 bpp images, typically labelled glyphs
/// * `niters` - Number of erosion rounds; 0 returns a copy of the input
pub fn extend_by_erosion(pixa: &Pixa, niters: u32) -> MorphResult<Pixa> {
    let mut out = Pixa::with_capacity(pixa.len() * (niters as usize + 1));
    out.join(pixa);

    let mut current = pixa.clone();
    for _ in 0..niters {
        let eroded = current
            .iter()
            .map(|pix| erode_brick(pix, 2, 2))
            .collect::<MorphResult<Pixa>>()?;
        out.join(&eroded);
        current = eroded;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphtrain_core::{Pix, PixelDepth};

    #[test]
    fn test_extend_by_erosion() {
        let mut pm = Pix::new(8, 8, PixelDepth::Bit1).unwrap().to_mut();
        for y in 1..7 {
            for x in 1..7 {
                pm.set_pixel(x, y, 1).unwrap();
            }
        }
        pm.set_text(Some("8".to_string()));
        let pixa: Pixa = [Pix::from(pm)].into_iter().collect();

        let extended = extend_by_erosion(&pixa, 2).unwrap();
        assert_eq!(extended.len(), 3);
        let counts: Vec<u32> = extended.iter().map(|p| p.count_pixels().unwrap()).collect();
        assert_eq!(counts, vec![36, 25, 16]);
        assert!(extended.iter().all(|p| p.text() == Some("8")));

        assert_eq!(extend_by_erosion(&pixa, 0).unwrap().len(), 1);
    }
}
