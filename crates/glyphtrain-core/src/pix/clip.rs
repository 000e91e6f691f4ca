//! Rectangle clipping and foreground bounding
//!
//! Cropping a sample to a caller-supplied box and trimming it to the
//! bounding box of its foreground pixels are the first steps applied to
//! every training bitmap.

use super::{Pix, PixelDepth};
use crate::box_::Box;
use crate::error::{Error, Result};

impl Pix {
    /// Extract the part of the image covered by `region`.
    ///
    /// The box is first clipped to the image bounds; the text label is
    /// carried over to the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the box does not overlap
    /// the image.
    pub fn clip_rectangle(&self, region: &Box) -> Result<Pix> {
        let clipped = region
            .clip(self.width() as i32, self.height() as i32)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "box {:?} does not overlap {}x{} image",
                    region,
                    self.width(),
                    self.height()
                ))
            })?;

        let out = Pix::new(clipped.w as u32, clipped.h as u32, self.depth())?;
        let mut out = out.to_mut();
        out.set_text(self.text().map(str::to_string));
        out.set_spp(self.spp());
        let (x0, y0) = (clipped.x as u32, clipped.y as u32);
        for y in 0..clipped.h as u32 {
            for x in 0..clipped.w as u32 {
                let v = self.get_pixel_unchecked(x0 + x, y0 + y);
                if v != 0 {
                    out.set_pixel_unchecked(x, y, v);
                }
            }
        }
        Ok(out.into())
    }

    /// Find the bounding box of the foreground (ON) pixels of a 1 bpp image.
    ///
    /// Returns `None` when the image has no foreground.
    pub fn foreground_box(&self) -> Result<Option<Box>> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let (w, h) = (self.width(), self.height());
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for y in 0..h {
            let line = self.row_data(y);
            if line.iter().all(|&word| word == 0) {
                continue;
            }
            for x in 0..w {
                if super::access::get_data_bit(line, x) == 0 {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        Ok(bounds.map(|(x0, y0, x1, y1)| {
            Box::new_unchecked(
                x0 as i32,
                y0 as i32,
                (x1 - x0 + 1) as i32,
                (y1 - y0 + 1) as i32,
            )
        }))
    }

    /// Clip a 1 bpp image to the bounding box of its foreground.
    ///
    /// # Returns
    ///
    /// `Some((clipped, box))` with the box in the input's coordinates,
    /// or `None` if the image is empty.
    pub fn clip_to_foreground(&self) -> Result<Option<(Pix, Box)>> {
        match self.foreground_box()? {
            None => Ok(None),
            Some(fg) => Ok(Some((self.clip_rectangle(&fg)?, fg))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pix_with_dots(w: u32, h: u32, dots: &[(u32, u32)]) -> Pix {
        let mut pm = Pix::new(w, h, PixelDepth::Bit1).unwrap().to_mut();
        for &(x, y) in dots {
            pm.set_pixel(x, y, 1).unwrap();
        }
        pm.into()
    }

    #[test]
    fn test_clip_rectangle_clips_to_image() {
        let pix = pix_with_dots(10, 10, &[(9, 9), (5, 5)]);
        let clipped = pix.clip_rectangle(&Box::new_unchecked(5, 5, 20, 20)).unwrap();
        assert_eq!((clipped.width(), clipped.height()), (5, 5));
        assert_eq!(clipped.get_pixel(0, 0), Some(1));
        assert_eq!(clipped.get_pixel(4, 4), Some(1));
        assert!(pix.clip_rectangle(&Box::new_unchecked(20, 20, 3, 3)).is_err());
    }

    #[test]
    fn test_clip_to_foreground() {
        let pix = pix_with_dots(40, 20, &[(3, 4), (35, 10)]);
        let (clipped, fg) = pix.clip_to_foreground().unwrap().unwrap();
        assert_eq!(fg, Box::new_unchecked(3, 4, 33, 7));
        assert_eq!((clipped.width(), clipped.height()), (33, 7));
        assert_eq!(clipped.get_pixel(0, 0), Some(1));
        assert_eq!(clipped.get_pixel(32, 6), Some(1));
    }

    #[test]
    fn test_clip_to_foreground_empty() {
        let pix = Pix::new(8, 8, PixelDepth::Bit1).unwrap();
        assert!(pix.clip_to_foreground().unwrap().is_none());
    }
}
