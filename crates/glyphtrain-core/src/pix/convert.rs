//! Depth conversion and binarization

use super::access::{compose_rgb, extract_rgb};
use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

impl Pix {
    /// Binarize an 8 bpp image.
    ///
    /// Pixels with value `< thresh` become foreground (1), all others
    /// background (0), so dark ink on a light page comes out ON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] if the image is not 8 bpp.
    pub fn threshold_to_binary(&self, thresh: u32) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit8 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let mut out = Pix::new(self.width(), self.height(), PixelDepth::Bit1)?.to_mut();
        out.set_text(self.text().map(str::to_string));
        for y in 0..self.height() {
            for x in 0..self.width() {
                if self.get_pixel_unchecked(x, y) < thresh {
                    out.set_pixel_unchecked(x, y, 1);
                }
            }
        }
        Ok(out.into())
    }

    /// Convert an image of any depth to 1 bpp.
    ///
    /// 1 bpp input is returned as a shared clone. 32 bpp input is first
    /// reduced to luminance; 2, 4 and 16 bpp values are rescaled to the
    /// 0..=255 range before `threshold` is applied.
    pub fn convert_to_1(&self, threshold: u32) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit1 => Ok(self.clone()),
            PixelDepth::Bit8 => self.threshold_to_binary(threshold),
            depth => {
                let mut gray = Pix::new(self.width(), self.height(), PixelDepth::Bit8)?.to_mut();
                gray.set_text(self.text().map(str::to_string));
                let max = depth.max_value();
                for y in 0..self.height() {
                    for x in 0..self.width() {
                        let v = self.get_pixel_unchecked(x, y);
                        let g = if depth == PixelDepth::Bit32 {
                            let (r, g, b) = extract_rgb(v);
                            (0.3 * f32::from(r) + 0.5 * f32::from(g) + 0.2 * f32::from(b) + 0.5)
                                as u32
                        } else {
                            ((u64::from(v) * 255) / u64::from(max)) as u32
                        };
                        gray.set_pixel_unchecked(x, y, g.min(255));
                    }
                }
                Pix::from(gray).threshold_to_binary(threshold)
            }
        }
    }

    /// Render a 1 bpp image as 32 bpp RGB: foreground black, background white.
    pub fn convert_1_to_32(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let mut out = Pix::new(self.width(), self.height(), PixelDepth::Bit32)?.to_mut();
        out.set_text(self.text().map(str::to_string));
        let white = compose_rgb(255, 255, 255);
        let black = compose_rgb(0, 0, 0);
        for y in 0..self.height() {
            for x in 0..self.width() {
                let v = if self.get_pixel_unchecked(x, y) != 0 {
                    black
                } else {
                    white
                };
                out.set_pixel_unchecked(x, y, v);
            }
        }
        Ok(out.into())
    }

    /// Invert a 1 bpp image.
    pub fn invert(&self) -> Result<Pix> {
        if self.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let mut out = self.to_mut();
        out.invert_in_place();
        Ok(out.into())
    }
}

impl PixMut {
    /// Invert a 1 bpp image in place, keeping row padding bits clear.
    pub fn invert_in_place(&mut self) {
        let width = self.width();
        let end_bits = width % 32;
        let last = (self.wpl() - 1) as usize;
        for y in 0..self.height() {
            let line = self.row_data_mut(y);
            for word in line.iter_mut() {
                *word = !*word;
            }
            if end_bits != 0 {
                line[last] &= !(u32::MAX >> end_bits);
            }
        }
    }
}
