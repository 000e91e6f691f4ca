//! Raster operations
//!
//! Composite one image into another at an offset. The source is clipped
//! against the destination, so offsets may be negative or place the
//! source partly outside.

use super::{Pix, PixMut};
use crate::error::{Error, Result};

/// Raster operation applied when combining a source with a destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RopOp {
    /// Destination takes the source value
    Src,
    /// Bitwise OR of source and destination
    Or,
    /// Bitwise AND of source and destination
    And,
    /// Bitwise XOR of source and destination
    Xor,
}

impl PixMut {
    /// Combine all of `src` into this image with its origin at `(dx, dy)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleDepths`] if the depths differ.
    pub fn rasterop(&mut self, dx: i32, dy: i32, op: RopOp, src: &Pix) -> Result<()> {
        if self.depth() != src.depth() {
            return Err(Error::IncompatibleDepths(
                self.depth().bits(),
                src.depth().bits(),
            ));
        }
        let (dw, dh) = (self.width() as i32, self.height() as i32);
        let x_start = dx.max(0);
        let y_start = dy.max(0);
        let x_end = (dx + src.width() as i32).min(dw);
        let y_end = (dy + src.height() as i32).min(dh);

        for y in y_start..y_end {
            let sy = (y - dy) as u32;
            for x in x_start..x_end {
                let s = src.get_pixel_unchecked((x - dx) as u32, sy);
                let (ux, uy) = (x as u32, y as u32);
                let v = match op {
                    RopOp::Src => s,
                    RopOp::Or => self.get_pixel_unchecked(ux, uy) | s,
                    RopOp::And => self.get_pixel_unchecked(ux, uy) & s,
                    RopOp::Xor => self.get_pixel_unchecked(ux, uy) ^ s,
                };
                self.set_pixel_unchecked(ux, uy, v);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PixelDepth;

    fn solid(w: u32, h: u32) -> Pix {
        Pix::new(w, h, PixelDepth::Bit1).unwrap().invert().unwrap()
    }

    #[test]
    fn test_rasterop_clips_negative_offset() {
        let mut dst = Pix::new(10, 10, PixelDepth::Bit1).unwrap().to_mut();
        dst.rasterop(-2, -3, RopOp::Src, &solid(4, 4)).unwrap();
        let dst: Pix = dst.into();
        assert_eq!(dst.count_pixels().unwrap(), 2);
        assert_eq!(dst.get_pixel(1, 0), Some(1));
        assert_eq!(dst.get_pixel(2, 0), Some(0));
    }

    #[test]
    fn test_rasterop_and() {
        let mut dst = solid(6, 6).to_mut();
        let mut mask = Pix::new(6, 6, PixelDepth::Bit1).unwrap().to_mut();
        mask.set_pixel(3, 3, 1).unwrap();
        dst.rasterop(0, 0, RopOp::And, &mask.into()).unwrap();
        let dst: Pix = dst.into();
        assert_eq!(dst.count_pixels().unwrap(), 1);
    }

    #[test]
    fn test_rasterop_depth_mismatch() {
        let mut dst = Pix::new(4, 4, PixelDepth::Bit8).unwrap().to_mut();
        assert!(dst.rasterop(0, 0, RopOp::Or, &solid(2, 2)).is_err());
    }
}
