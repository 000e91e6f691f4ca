//! Sampling-based scaling
//!
//! Each destination pixel takes the value of the source pixel under its
//! center. Sampling keeps binary images binary, which is what character
//! templates need; it works for every depth.

use crate::{TransformError, TransformResult};
use glyphtrain_core::Pix;

/// Scale by independent horizontal and vertical factors.
///
/// The output size is `round(w * scalex)` x `round(h * scaley)`, at least
/// 1x1. The text label is carried over.
///
/// # Errors
///
/// Returns [`TransformError::InvalidScaleFactor`] for non-positive factors.
pub fn scale_by_sampling(pix: &Pix, scalex: f32, scaley: f32) -> TransformResult<Pix> {
    if !(scalex > 0.0 && scaley > 0.0) {
        return Err(TransformError::InvalidScaleFactor(format!(
            "scale factors must be positive: {} x {}",
            scalex, scaley
        )));
    }
    let wd = ((pix.width() as f32 * scalex + 0.5) as u32).max(1);
    let hd = ((pix.height() as f32 * scaley + 0.5) as u32).max(1);
    sample_to(pix, wd, hd)
}

/// Scale to a target size.
///
/// A target of 0 on one axis preserves the aspect ratio, scaling that
/// axis by the same factor as the other. When the target equals the
/// current size the input is returned as a shared clone.
///
/// # Errors
///
/// Returns [`TransformError::InvalidScaleFactor`] if both targets are 0.
pub fn scale_to_size(pix: &Pix, wd: u32, hd: u32) -> TransformResult<Pix> {
    let (ws, hs) = (pix.width(), pix.height());
    let (wd, hd) = match (wd, hd) {
        (0, 0) => {
            return Err(TransformError::InvalidScaleFactor(
                "at least one target dimension must be > 0".to_string(),
            ));
        }
        (0, hd) => (((ws as f32 * hd as f32 / hs as f32) + 0.5) as u32, hd),
        (wd, 0) => (wd, ((hs as f32 * wd as f32 / ws as f32) + 0.5) as u32),
        (wd, hd) => (wd, hd),
    };
    let (wd, hd) = (wd.max(1), hd.max(1));
    if wd == ws && hd == hs {
        return Ok(pix.clone());
    }
    sample_to(pix, wd, hd)
}

fn sample_to(pix: &Pix, wd: u32, hd: u32) -> TransformResult<Pix> {
    let (ws, hs) = (pix.width(), pix.height());
    let mut out = Pix::new(wd, hd, pix.depth())?.to_mut();
    out.set_text(pix.text().map(str::to_string));
    out.set_spp(pix.spp());

    let xmap: Vec<u32> = (0..wd)
        .map(|xd| ((((xd as f32 + 0.5) * ws as f32) / wd as f32) as u32).min(ws - 1))
        .collect();
    for yd in 0..hd {
        let ys = ((((yd as f32 + 0.5) * hs as f32) / hd as f32) as u32).min(hs - 1);
        for (xd, &xs) in xmap.iter().enumerate() {
            let v = pix.get_pixel_unchecked(xs, ys);
            if v != 0 {
                out.set_pixel_unchecked(xd as u32, yd, v);
            }
        }
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphtrain_core::PixelDepth;

    fn checker(w: u32, h: u32) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit1).unwrap().to_mut();
        for y in 0..h {
            for x in 0..w {
                if (x + y) % 2 == 0 {
                    pm.set_pixel(x, y, 1).unwrap();
                }
            }
        }
        pm.set_text(Some("x".to_string()));
        pm.into()
    }

    #[test]
    fn test_scale_to_size_preserves_aspect() {
        let pix = Pix::new(10, 20, PixelDepth::Bit1).unwrap();
        let scaled = scale_to_size(&pix, 0, 32).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (16, 32));
        let scaled = scale_to_size(&pix, 5, 0).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (5, 10));
        assert!(scale_to_size(&pix, 0, 0).is_err());
    }

    #[test]
    fn test_scale_to_same_size_shares() {
        let pix = checker(4, 4);
        let same = scale_to_size(&pix, 4, 4).unwrap();
        assert!(same.ptr_eq(&pix));
    }

    #[test]
    fn test_integer_upscale_replicates() {
        let pix = checker(3, 2);
        let up = scale_by_sampling(&pix, 2.0, 3.0).unwrap();
        assert_eq!((up.width(), up.height()), (6, 6));
        assert_eq!(up.text(), Some("x"));
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(up.get_pixel(x, y), pix.get_pixel(x / 2, y / 3));
            }
        }
        assert!(scale_by_sampling(&pix, 0.0, 1.0).is_err());
    }
}
