//! PIX - The bitmap container
//!
//! `Pix` is the image type every other crate in the workspace passes
//! around. Character samples are 1 bpp; 8 and 32 bpp images appear as
//! unbinarized input and as debug composites.
//!
//! # Pixel layout
//!
//! - Image data is stored in 32-bit words
//! - Every row starts on a 32-bit boundary
//! - Pixels are packed MSB to LSB within each word
//! - For 32-bit images, color order is RGBA (red in MSB)
//! - Padding bits at the end of a row are always zero
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership). A cloned `Pix`
//! shares pixels with its source, so storing a clone in a second bucket
//! costs nothing. To modify pixel data, convert to `PixMut` via
//! [`Pix::try_into_mut`] or [`Pix::to_mut`], then convert back with
//! `Into<Pix>`.

pub mod access;
mod border;
mod clip;
pub mod compare;
mod convert;
pub mod graphics;
mod measurement;
mod rop;

pub use compare::correlation_score_simple;
pub use graphics::Color;
pub use rop::RopOp;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image
    Bit1 = 1,
    /// 2-bit image (4 levels)
    Bit2 = 2,
    /// 4-bit image (16 levels)
    Bit4 = 4,
    /// 8-bit grayscale
    Bit8 = 8,
    /// 16-bit grayscale
    Bit16 = 16,
    /// 32-bit RGB or RGBA
    Bit32 = 32,
}

impl PixelDepth {
    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Get the maximum pixel value representable at this depth.
    pub fn max_value(self) -> u32 {
        match self {
            PixelDepth::Bit32 => u32::MAX,
            _ => (1u32 << self.bits()) - 1,
        }
    }
}

/// Internal PIX data
#[derive(Debug, Clone)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// Samples per pixel (1 for grayscale, 3 for RGB, 4 for RGBA)
    spp: u32,
    /// 32-bit words per line
    wpl: u32,
    /// Text label associated with the image
    text: Option<String>,
    /// The image data (packed 32-bit words)
    data: Vec<u32>,
}

/// PIX - Main image container
///
/// `Pix` uses reference counting via `Arc`, so `clone()` is cheap and
/// shares pixel data. Use [`Pix::deep_clone`] for an independent copy.
///
/// # Examples
///
/// ```
/// use glyphtrain_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(20, 32, PixelDepth::Bit1).unwrap();
/// assert_eq!(pix.width(), 20);
/// assert_eq!(pix.height(), 32);
/// assert!(pix.text().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }

        let wpl = Self::compute_wpl(width, depth)?;
        let data = vec![0u32; (wpl as usize) * (height as usize)];
        let spp = match depth {
            PixelDepth::Bit32 => 3,
            _ => 1,
        };

        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                spp,
                wpl,
                text: None,
                data,
            }),
        })
    }

    /// Compute words per line for given width and depth.
    fn compute_wpl(width: u32, depth: PixelDepth) -> Result<u32> {
        let bits_per_line = u64::from(width) * u64::from(depth.bits());
        u32::try_from(bits_per_line.div_ceil(32)).map_err(|_| Error::InvalidDimension {
            width,
            height: 0,
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the samples per pixel.
    #[inline]
    pub fn spp(&self) -> u32 {
        self.inner.spp
    }

    /// Get the words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get the attached text label.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.inner.text.as_deref()
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get the number of strong references to this PIX.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check whether two handles share the same pixel storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Pix) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Get the words of a specific row.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y * self.inner.wpl) as usize;
        let end = start + self.inner.wpl as usize;
        &self.inner.data[start..end]
    }

    /// Create a zeroed PIX with the same dimensions, depth and text.
    pub fn create_template(&self) -> Self {
        Pix {
            inner: Arc::new(PixData {
                width: self.inner.width,
                height: self.inner.height,
                depth: self.inner.depth,
                spp: self.inner.spp,
                wpl: self.inner.wpl,
                text: self.inner.text.clone(),
                data: vec![0u32; self.inner.data.len()],
            }),
        }
    }

    /// Check if two PIX have the same width, height, and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
    }

    /// Replace the text label.
    ///
    /// The pixels are copied only when another handle still refers to
    /// them; an exclusively held image is relabelled in place.
    pub fn with_text(self, text: Option<&str>) -> Pix {
        let mut pm = match self.try_into_mut() {
            Ok(pm) => pm,
            Err(shared) => shared.to_mut(),
        };
        pm.set_text(text.map(str::to_string));
        pm.into()
    }

    /// Create a deep copy of this PIX.
    ///
    /// Unlike `clone()` which shares data via Arc, this creates
    /// a completely independent copy.
    pub fn deep_clone(&self) -> Self {
        Pix {
            inner: Arc::new((*self.inner).clone()),
        }
    }

    /// Try to get mutable access to the image data.
    ///
    /// Succeeds only if there is exactly one reference to the data.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(data) => Ok(PixMut { inner: data }),
            Err(arc) => Err(Pix { inner: arc }),
        }
    }

    /// Create a mutable copy of this PIX.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Mutable PIX
///
/// Allows modification of image data. Convert back to an immutable
/// [`Pix`] using `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the words per line.
    #[inline]
    pub fn wpl(&self) -> u32 {
        self.inner.wpl
    }

    /// Get the attached text label.
    #[inline]
    pub fn text(&self) -> Option<&str> {
        self.inner.text.as_deref()
    }

    /// Set the text label.
    pub fn set_text(&mut self, text: Option<String>) {
        self.inner.text = text;
    }

    /// Set the samples per pixel.
    pub fn set_spp(&mut self, spp: u32) {
        self.inner.spp = spp;
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u32] {
        &self.inner.data
    }

    /// Get the words of a specific row.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u32] {
        let start = (y * self.inner.wpl) as usize;
        let end = start + self.inner.wpl as usize;
        &self.inner.data[start..end]
    }

    /// Get mutable access to the words of a specific row.
    #[inline]
    pub fn row_data_mut(&mut self, y: u32) -> &mut [u32] {
        let start = (y * self.inner.wpl) as usize;
        let end = start + self.inner.wpl as usize;
        &mut self.inner.data[start..end]
    }
}

impl From<PixMut> for Pix {
    fn from(pix_mut: PixMut) -> Self {
        Pix {
            inner: Arc::new(pix_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pix_creation() {
        let pix = Pix::new(100, 200, PixelDepth::Bit8).unwrap();
        assert_eq!(pix.width(), 100);
        assert_eq!(pix.height(), 200);
        assert_eq!(pix.depth(), PixelDepth::Bit8);
        assert_eq!(pix.wpl(), 25);
        assert_eq!(pix.data().len(), 25 * 200);
    }

    #[test]
    fn test_wpl_for_binary() {
        let pix = Pix::new(33, 2, PixelDepth::Bit1).unwrap();
        assert_eq!(pix.wpl(), 2);
        let pix = Pix::new(32, 2, PixelDepth::Bit1).unwrap();
        assert_eq!(pix.wpl(), 1);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Pix::new(0, 10, PixelDepth::Bit1).is_err());
        assert!(Pix::new(10, 0, PixelDepth::Bit1).is_err());
    }

    #[test]
    fn test_clone_shares_data() {
        let pix1 = Pix::new(10, 10, PixelDepth::Bit1).unwrap();
        let pix2 = pix1.clone();
        assert!(pix1.ptr_eq(&pix2));
        assert_eq!(pix1.ref_count(), 2);

        let pix3 = pix1.deep_clone();
        assert!(!pix1.ptr_eq(&pix3));
    }

    #[test]
    fn test_try_into_mut() {
        let pix = Pix::new(10, 10, PixelDepth::Bit1).unwrap();
        let mut pm = pix.try_into_mut().unwrap();
        pm.set_text(Some("7".to_string()));
        let pix: Pix = pm.into();
        assert_eq!(pix.text(), Some("7"));

        let shared = pix.clone();
        assert!(pix.try_into_mut().is_err());
        drop(shared);
    }

    #[test]
    fn test_with_text() {
        let pix = Pix::new(4, 4, PixelDepth::Bit1).unwrap();
        let keep = pix.clone();
        let labelled = pix.with_text(Some("A"));
        assert_eq!(labelled.text(), Some("A"));
        assert!(keep.text().is_none());
        let cleared = labelled.with_text(None);
        assert!(cleared.text().is_none());
    }
}
