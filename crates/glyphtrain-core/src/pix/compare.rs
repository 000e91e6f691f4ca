//! Two-bitmap correlation scoring
//!
//! The correlation between two 1 bpp bitmaps is the squared count of
//! their shared foreground, normalized by the product of their areas.
//! It reaches 1.0 only for identical aligned bitmaps.

use super::{Pix, PixelDepth};
use crate::error::{Error, Result};

/// Correlation score of two 1 bpp bitmaps after centroid alignment.
///
/// `pix2` is placed over `pix1` shifted by `(delx, dely)` rounded to the
/// nearest pixel; normally the difference between the centroid of `pix1`
/// and the centroid of `pix2`. The score is
/// `count(pix1 AND shifted pix2)^2 / (area1 * area2)`.
///
/// # Arguments
///
/// * `area1`, `area2` - Foreground pixel counts of the two bitmaps
/// * `delx`, `dely` - Offset at which `pix2` is laid over `pix1`
/// * `maxdiffw`, `maxdiffh` - Largest allowed difference in width and height
///
/// # Returns
///
/// A score in `[0.0, 1.0]`. Returns 0.0 without comparing pixels when the
/// sizes differ by more than the tolerance or either area is zero.
///
/// # Errors
///
/// Returns [`Error::UnsupportedDepth`] unless both images are 1 bpp.
#[allow(clippy::too_many_arguments)]
pub fn correlation_score_simple(
    pix1: &Pix,
    pix2: &Pix,
    area1: u32,
    area2: u32,
    delx: f32,
    dely: f32,
    maxdiffw: u32,
    maxdiffh: u32,
) -> Result<f32> {
    for pix in [pix1, pix2] {
        if pix.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(pix.depth().bits()));
        }
    }
    if pix1.width().abs_diff(pix2.width()) > maxdiffw
        || pix1.height().abs_diff(pix2.height()) > maxdiffh
    {
        return Ok(0.0);
    }
    if area1 == 0 || area2 == 0 {
        return Ok(0.0);
    }

    let idelx = delx.round() as i32;
    let idely = dely.round() as i32;

    // Count pix1 AND (pix2 at offset), restricted to the overlap.
    let (w1, h1) = (pix1.width() as i32, pix1.height() as i32);
    let x_start = idelx.max(0);
    let y_start = idely.max(0);
    let x_end = (idelx + pix2.width() as i32).min(w1);
    let y_end = (idely + pix2.height() as i32).min(h1);
    let mut count = 0u64;
    for y in y_start..y_end {
        let sy = (y - idely) as u32;
        for x in x_start..x_end {
            if pix1.get_pixel_unchecked(x as u32, y as u32) != 0
                && pix2.get_pixel_unchecked((x - idelx) as u32, sy) != 0
            {
                count += 1;
            }
        }
    }

    let score = (count * count) as f64 / (f64::from(area1) * f64::from(area2));
    Ok(score as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(w: u32, h: u32, x0: u32, y0: u32, bw: u32, bh: u32) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit1).unwrap().to_mut();
        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                pm.set_pixel(x, y, 1).unwrap();
            }
        }
        pm.into()
    }

    #[test]
    fn test_identical_scores_one() {
        let pix = block(10, 12, 2, 2, 5, 6);
        let area = pix.count_pixels().unwrap();
        let score = correlation_score_simple(&pix, &pix, area, area, 0.0, 0.0, 5, 5).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_offset_alignment_recovers_match() {
        let a = block(10, 10, 1, 1, 4, 4);
        let b = block(10, 10, 5, 5, 4, 4);
        let (ax, ay) = a.centroid().unwrap();
        let (bx, by) = b.centroid().unwrap();
        let unaligned = correlation_score_simple(&a, &b, 16, 16, 0.0, 0.0, 5, 5).unwrap();
        let aligned =
            correlation_score_simple(&a, &b, 16, 16, ax - bx, ay - by, 5, 5).unwrap();
        assert_eq!(unaligned, 0.0);
        assert!((aligned - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_size_mismatch_scores_zero() {
        let a = block(10, 10, 0, 0, 10, 10);
        let b = block(20, 10, 0, 0, 20, 10);
        let score = correlation_score_simple(&a, &b, 100, 200, 0.0, 0.0, 5, 5).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = block(4, 4, 0, 0, 4, 2);
        let b = block(4, 4, 0, 0, 4, 4);
        let score = correlation_score_simple(&a, &b, 8, 16, 0.0, 0.0, 0, 0).unwrap();
        assert!((score - 0.5).abs() < 1e-6);
    }
}
