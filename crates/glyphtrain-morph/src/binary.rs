//! Binary brick morphology
//!
//! A brick is an `hsize` x `vsize` rectangle with its origin at
//! `(hsize / 2, vsize / 2)`. Bricks are separable, so each operation is
//! a horizontal pass followed by a vertical pass.
//!
//! Pixels outside the image are treated as OFF for both dilation and
//! erosion; erosion therefore clears foreground touching the image edge.
//! [`close_safe_brick`] pads the image first so that closing never loses
//! edge pixels.

use crate::{MorphError, MorphResult};
use glyphtrain_core::{Pix, PixelDepth};

fn check_binary(pix: &Pix) -> MorphResult<()> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(MorphError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }
    Ok(())
}

fn check_size(hsize: u32, vsize: u32) -> MorphResult<()> {
    if hsize == 0 || vsize == 0 {
        return Err(MorphError::InvalidParameters(format!(
            "brick size must be at least 1x1, got {}x{}",
            hsize, vsize
        )));
    }
    Ok(())
}

/// Unpacked working grid, one byte per pixel.
struct Grid {
    w: usize,
    h: usize,
    px: Vec<u8>,
}

impl Grid {
    fn from_pix(pix: &Pix) -> Self {
        let (w, h) = (pix.width() as usize, pix.height() as usize);
        let mut px = vec![0u8; w * h];
        for y in 0..h {
            for x in 0..w {
                px[y * w + x] = pix.get_pixel_unchecked(x as u32, y as u32) as u8;
            }
        }
        Grid { w, h, px }
    }

    fn to_pix(&self, template: &Pix) -> MorphResult<Pix> {
        let mut out = template.create_template().to_mut();
        for y in 0..self.h {
            for x in 0..self.w {
                if self.px[y * self.w + x] != 0 {
                    out.set_pixel_unchecked(x as u32, y as u32, 1);
                }
            }
        }
        Ok(out.into())
    }

    #[inline]
    fn at(&self, x: isize, y: isize) -> u8 {
        if x < 0 || y < 0 || x >= self.w as isize || y >= self.h as isize {
            0
        } else {
            self.px[y as usize * self.w + x as usize]
        }
    }

    /// One separable pass. `horizontal` selects the axis; `dilate`
    /// selects OR over reflected offsets versus AND over direct offsets.
    fn pass(&self, size: u32, horizontal: bool, dilate: bool) -> Grid {
        if size == 1 {
            return Grid {
                w: self.w,
                h: self.h,
                px: self.px.clone(),
            };
        }
        let origin = (size / 2) as isize;
        let mut px = vec![0u8; self.px.len()];
        for y in 0..self.h as isize {
            for x in 0..self.w as isize {
                let mut acc = if dilate { 0u8 } else { 1u8 };
                for j in 0..size as isize {
                    let off = j - origin;
                    let (sx, sy) = match (horizontal, dilate) {
                        (true, true) => (x - off, y),
                        (true, false) => (x + off, y),
                        (false, true) => (x, y - off),
                        (false, false) => (x, y + off),
                    };
                    let v = self.at(sx, sy);
                    if dilate && v != 0 {
                        acc = 1;
                        break;
                    }
                    if !dilate && v == 0 {
                        acc = 0;
                        break;
                    }
                }
                px[y as usize * self.w + x as usize] = acc;
            }
        }
        Grid {
            w: self.w,
            h: self.h,
            px,
        }
    }
}

/// Dilate a 1 bpp image with an `hsize` x `vsize` brick.
///
/// # Errors
///
/// Returns [`MorphError::UnsupportedDepth`] for non-binary input and
/// [`MorphError::InvalidParameters`] for a zero brick dimension.
pub fn dilate_brick(pix: &Pix, hsize: u32, vsize: u32) -> MorphResult<Pix> {
    check_binary(pix)?;
    check_size(hsize, vsize)?;
    if hsize == 1 && vsize == 1 {
        return Ok(pix.clone());
    }
    let grid = Grid::from_pix(pix)
        .pass(hsize, true, true)
        .pass(vsize, false, true);
    grid.to_pix(pix)
}

/// Erode a 1 bpp image with an `hsize` x `vsize` brick.
///
/// # Errors
///
/// Same conditions as [`dilate_brick`].
pub fn erode_brick(pix: &Pix, hsize: u32, vsize: u32) -> MorphResult<Pix> {
    check_binary(pix)?;
    check_size(hsize, vsize)?;
    if hsize == 1 && vsize == 1 {
        return Ok(pix.clone());
    }
    let grid = Grid::from_pix(pix)
        .pass(hsize, true, false)
        .pass(vsize, false, false);
    grid.to_pix(pix)
}

/// Close a 1 bpp image (dilation followed by erosion).
///
/// Foreground near the image edge may be eroded away; see
/// [`close_safe_brick`].
pub fn close_brick(pix: &Pix, hsize: u32, vsize: u32) -> MorphResult<Pix> {
    let dilated = dilate_brick(pix, hsize, vsize)?;
    erode_brick(&dilated, hsize, vsize)
}

/// Close a 1 bpp image without losing foreground at the edges.
///
/// The image is padded by the larger brick dimension before closing and
/// the padding is removed afterward, so the result is always a superset
/// of the input.
pub fn close_safe_brick(pix: &Pix, hsize: u32, vsize: u32) -> MorphResult<Pix> {
    check_binary(pix)?;
    check_size(hsize, vsize)?;
    let border = hsize.max(vsize);
    let padded = pix.add_border(border, 0)?;
    let closed = close_brick(&padded, hsize, vsize)?;
    Ok(closed.remove_border(border)?)
}
