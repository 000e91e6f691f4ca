//! Pixel access functions
//!
//! Low-level functions for getting and setting individual pixels.
//!
//! # Pixel packing
//!
//! Pixels are packed MSB-to-LSB within each 32-bit word. For example,
//! in a 1-bit image, pixel 0 occupies bit 31 (MSB) of the first word.

use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

/// Read the `n`th 1-bit value of a row.
#[inline]
pub fn get_data_bit(line: &[u32], n: u32) -> u32 {
    (line[(n >> 5) as usize] >> (31 - (n & 31))) & 1
}

/// Set the `n`th 1-bit value of a row to `val & 1`.
#[inline]
pub fn set_data_bit_val(line: &mut [u32], n: u32, val: u32) {
    let word = &mut line[(n >> 5) as usize];
    let shift = 31 - (n & 31);
    *word = (*word & !(1 << shift)) | ((val & 1) << shift);
}

/// Read the `n`th 2-bit value of a row.
#[inline]
fn get_data_dibit(line: &[u32], n: u32) -> u32 {
    (line[(n >> 4) as usize] >> (2 * (15 - (n & 15)))) & 3
}

#[inline]
fn set_data_dibit(line: &mut [u32], n: u32, val: u32) {
    let word = &mut line[(n >> 4) as usize];
    let shift = 2 * (15 - (n & 15));
    *word = (*word & !(3 << shift)) | ((val & 3) << shift);
}

/// Read the `n`th 4-bit value of a row.
#[inline]
fn get_data_qbit(line: &[u32], n: u32) -> u32 {
    (line[(n >> 3) as usize] >> (4 * (7 - (n & 7)))) & 0xf
}

#[inline]
fn set_data_qbit(line: &mut [u32], n: u32, val: u32) {
    let word = &mut line[(n >> 3) as usize];
    let shift = 4 * (7 - (n & 7));
    *word = (*word & !(0xf << shift)) | ((val & 0xf) << shift);
}

/// Read the `n`th byte of a row.
#[inline]
pub fn get_data_byte(line: &[u32], n: u32) -> u32 {
    (line[(n >> 2) as usize] >> (8 * (3 - (n & 3)))) & 0xff
}

/// Set the `n`th byte of a row.
#[inline]
pub fn set_data_byte(line: &mut [u32], n: u32, val: u32) {
    let word = &mut line[(n >> 2) as usize];
    let shift = 8 * (3 - (n & 3));
    *word = (*word & !(0xff << shift)) | ((val & 0xff) << shift);
}

#[inline]
fn get_data_two_bytes(line: &[u32], n: u32) -> u32 {
    (line[(n >> 1) as usize] >> (16 * (1 - (n & 1)))) & 0xffff
}

#[inline]
fn set_data_two_bytes(line: &mut [u32], n: u32, val: u32) {
    let word = &mut line[(n >> 1) as usize];
    let shift = 16 * (1 - (n & 1));
    *word = (*word & !(0xffff << shift)) | ((val & 0xffff) << shift);
}

#[inline]
fn read_packed(line: &[u32], depth: PixelDepth, x: u32) -> u32 {
    match depth {
        PixelDepth::Bit1 => get_data_bit(line, x),
        PixelDepth::Bit2 => get_data_dibit(line, x),
        PixelDepth::Bit4 => get_data_qbit(line, x),
        PixelDepth::Bit8 => get_data_byte(line, x),
        PixelDepth::Bit16 => get_data_two_bytes(line, x),
        PixelDepth::Bit32 => line[x as usize],
    }
}

/// Compose a 32-bit RGBA pixel value.
#[inline]
pub fn compose_rgb(r: u8, g: u8, b: u8) -> u32 {
    (u32::from(r) << 24) | (u32::from(g) << 16) | (u32::from(b) << 8) | 0xff
}

/// Split a 32-bit RGBA pixel value into its color channels.
#[inline]
pub fn extract_rgb(pixel: u32) -> (u8, u8, u8) {
    ((pixel >> 24) as u8, (pixel >> 16) as u8, (pixel >> 8) as u8)
}

impl Pix {
    /// Get a pixel value at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_packed(self.row_data(y), self.depth(), x)
    }

    /// Get RGB values at (x, y).
    ///
    /// Only valid for 32-bit images.
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if self.depth() != PixelDepth::Bit32 {
            return None;
        }
        self.get_pixel(x, y).map(extract_rgb)
    }
}

impl PixMut {
    /// Get a pixel value at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_packed(self.row_data(y), self.depth(), x)
    }

    /// Set a pixel value at (x, y).
    ///
    /// The value is masked to the image depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfBounds`] if coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() {
            return Err(Error::IndexOutOfBounds {
                index: x as usize,
                len: self.width() as usize,
            });
        }
        if y >= self.height() {
            return Err(Error::IndexOutOfBounds {
                index: y as usize,
                len: self.height() as usize,
            });
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth();
        let line = self.row_data_mut(y);
        match depth {
            PixelDepth::Bit1 => set_data_bit_val(line, x, val),
            PixelDepth::Bit2 => set_data_dibit(line, x, val),
            PixelDepth::Bit4 => set_data_qbit(line, x, val),
            PixelDepth::Bit8 => set_data_byte(line, x, val),
            PixelDepth::Bit16 => set_data_two_bytes(line, x, val),
            PixelDepth::Bit32 => line[x as usize] = val,
        }
    }

    /// Set RGB values at (x, y) on a 32-bit image.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        self.set_pixel(x, y, compose_rgb(r, g, b))
    }
}
