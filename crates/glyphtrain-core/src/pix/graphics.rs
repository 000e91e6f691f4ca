//! Box outline rendering for diagnostic composites

use super::access::compose_rgb;
use super::{PixMut, PixelDepth};
use crate::box_::Box;
use crate::error::{Error, Result};

/// RGB drawing color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color { r: 255, g: 0, b: 0 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255 };

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

impl PixMut {
    /// Draw the outline of `b` with the given line width on a 32 bpp image.
    ///
    /// Parts of the outline falling outside the image are skipped.
    pub fn render_box(&mut self, b: &Box, line_width: u32, color: Color) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let val = compose_rgb(color.r, color.g, color.b);
        let lw = line_width.max(1) as i32;
        let (w, h) = (self.width() as i32, self.height() as i32);
        let mut plot = |x: i32, y: i32| {
            if x >= 0 && y >= 0 && x < w && y < h {
                self.set_pixel_unchecked(x as u32, y as u32, val);
            }
        };
        for t in 0..lw {
            for x in b.x..b.right() {
                plot(x, b.y + t);
                plot(x, b.bottom() - 1 - t);
            }
            for y in b.y..b.bottom() {
                plot(b.x + t, y);
                plot(b.right() - 1 - t, y);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pix;

    #[test]
    fn test_render_box_outline() {
        let mut pm = Pix::new(10, 10, PixelDepth::Bit32).unwrap().to_mut();
        pm.render_box(&Box::new_unchecked(2, 2, 5, 4), 1, Color::RED)
            .unwrap();
        let pix: Pix = pm.into();
        assert_eq!(pix.get_rgb(2, 2), Some((255, 0, 0)));
        assert_eq!(pix.get_rgb(6, 5), Some((255, 0, 0)));
        assert_eq!(pix.get_rgb(4, 4), Some((0, 0, 0)));
    }

    #[test]
    fn test_render_box_requires_rgb() {
        let mut pm = Pix::new(4, 4, PixelDepth::Bit1).unwrap().to_mut();
        assert!(pm.render_box(&Box::new_unchecked(0, 0, 2, 2), 1, Color::RED).is_err());
    }
}
