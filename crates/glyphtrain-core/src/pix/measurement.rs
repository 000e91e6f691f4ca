//! Foreground area and centroid measurement

use super::{Pix, PixelDepth};
use crate::error::{Error, Result};

impl Pix {
    /// Count the foreground (ON) pixels of a 1 bpp image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the image is not 1 bpp.
    pub fn count_pixels(&self) -> Result<u32> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        Ok(self.data().iter().map(|word| word.count_ones()).sum())
    }

    /// Compute the pixel-mass center of a 1 bpp image.
    ///
    /// An image with no foreground reports its geometric center.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the image is not 1 bpp.
    pub fn centroid(&self) -> Result<(f32, f32)> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }

        let mut count = 0u64;
        let mut xsum = 0u64;
        let mut ysum = 0u64;
        for y in 0..self.height() {
            let line = self.row_data(y);
            for (iw, &word) in line.iter().enumerate() {
                if word == 0 {
                    continue;
                }
                let base = (iw as u64) * 32;
                let mut bits = word;
                while bits != 0 {
                    let lead = bits.leading_zeros();
                    xsum += base + u64::from(lead);
                    ysum += u64::from(y);
                    count += 1;
                    bits &= !(0x8000_0000u32 >> lead);
                }
            }
        }

        if count == 0 {
            return Ok((self.width() as f32 / 2.0, self.height() as f32 / 2.0));
        }
        Ok((
            (xsum as f64 / count as f64) as f32,
            (ysum as f64 / count as f64) as f32,
        ))
    }
}
