//! Pixa, Pixaa - Arrays of Pix images
//!
//! A `Pixa` is an ordered bitmap collection; training batches, class
//! buckets and bitmap-set files are all `Pixa`s. A `Pixaa` groups several
//! of them, e.g. one per donor file.

use crate::box_::{Box, Boxa};
use crate::error::{Error, Result};
use crate::pix::{Pix, PixelDepth, RopOp};

/// Array of Pix images
///
/// Each image may carry a bounding box giving its location in some
/// source image.
#[derive(Debug, Clone, Default)]
pub struct Pixa {
    pix: Vec<Pix>,
    boxa: Boxa,
}

impl Pixa {
    /// Create a new empty Pixa
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a Pixa with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Pixa {
            pix: Vec::with_capacity(capacity),
            boxa: Boxa::with_capacity(capacity),
        }
    }

    /// Get the number of Pix images
    #[inline]
    pub fn len(&self) -> usize {
        self.pix.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pix.is_empty()
    }

    /// Get a reference to a Pix by index
    pub fn get(&self, index: usize) -> Option<&Pix> {
        self.pix.get(index)
    }

    /// Add a Pix
    pub fn push(&mut self, pix: Pix) {
        self.pix.push(pix);
    }

    /// Add a Pix together with its bounding box
    pub fn push_with_box(&mut self, pix: Pix, b: Box) {
        self.pix.push(pix);
        self.boxa.push(b);
    }

    /// Get the boxes attached to the images
    pub fn boxa(&self) -> &Boxa {
        &self.boxa
    }

    /// Iterate over the images
    pub fn iter(&self) -> impl Iterator<Item = &Pix> {
        self.pix.iter()
    }

    /// Append every image of `other`.
    pub fn join(&mut self, other: &Pixa) {
        self.pix.extend(other.pix.iter().cloned());
    }

    /// Minimum and maximum width and height over all images.
    ///
    /// # Returns
    ///
    /// `(min_w, min_h, max_w, max_h)`, or `None` if the Pixa is empty.
    pub fn size_range(&self) -> Option<(u32, u32, u32, u32)> {
        self.pix.iter().fold(None, |acc, p| {
            let (w, h) = (p.width(), p.height());
            Some(match acc {
                None => (w, h, w, h),
                Some((minw, minh, maxw, maxh)) => {
                    (minw.min(w), minh.min(h), maxw.max(w), maxh.max(h))
                }
            })
        })
    }

    /// Lay the images out left to right on one canvas.
    ///
    /// Images are top-aligned with `spacing` background pixels between
    /// them. All images must share one depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NullInput`] for an empty Pixa and
    /// [`Error::IncompatibleDepths`] on mixed depths.
    pub fn display_row(&self, spacing: u32) -> Result<Pix> {
        let first = self.pix.first().ok_or(Error::NullInput("empty pixa"))?;
        let depth = first.depth();
        let width: u32 = self.pix.iter().map(Pix::width).sum::<u32>()
            + spacing * (self.pix.len() as u32 + 1);
        let height = self.pix.iter().map(Pix::height).max().unwrap_or(1) + 2 * spacing;

        let mut canvas = Pix::new(width, height, depth)?.to_mut();
        if depth == PixelDepth::Bit32 {
            for y in 0..height {
                for x in 0..width {
                    canvas.set_pixel_unchecked(x, y, 0xffff_ffff);
                }
            }
        }
        let mut x = spacing as i32;
        for pix in &self.pix {
            canvas.rasterop(x, spacing as i32, RopOp::Src, pix)?;
            x += (pix.width() + spacing) as i32;
        }
        Ok(canvas.into())
    }
}

impl FromIterator<Pix> for Pixa {
    fn from_iter<I: IntoIterator<Item = Pix>>(iter: I) -> Self {
        Pixa {
            pix: iter.into_iter().collect(),
            boxa: Boxa::new(),
        }
    }
}

impl IntoIterator for Pixa {
    type Item = Pix;
    type IntoIter = std::vec::IntoIter<Pix>;

    fn into_iter(self) -> Self::IntoIter {
        self.pix.into_iter()
    }
}

/// Array of Pixa
#[derive(Debug, Clone, Default)]
pub struct Pixaa {
    pixas: Vec<Pixa>,
}

impl Pixaa {
    /// Create a new empty Pixaa
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of Pixa
    #[inline]
    pub fn len(&self) -> usize {
        self.pixas.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixas.is_empty()
    }

    /// Get a Pixa by index
    pub fn get(&self, index: usize) -> Option<&Pixa> {
        self.pixas.get(index)
    }

    /// Add a Pixa
    pub fn push(&mut self, pixa: Pixa) {
        self.pixas.push(pixa);
    }

    /// Iterate over the Pixa
    pub fn iter(&self) -> impl Iterator<Item = &Pixa> {
        self.pixas.iter()
    }

    /// Stack one [`Pixa::display_row`] per non-empty Pixa, top to bottom.
    pub fn display_rows(&self, spacing: u32) -> Result<Pix> {
        let rows = self
            .pixas
            .iter()
            .filter(|pixa| !pixa.is_empty())
            .map(|pixa| pixa.display_row(spacing))
            .collect::<Result<Vec<Pix>>>()?;
        let first = rows.first().ok_or(Error::NullInput("empty pixaa"))?;
        let depth = first.depth();
        let width = rows.iter().map(Pix::width).max().unwrap_or(1);
        let height: u32 = rows.iter().map(Pix::height).sum();

        let mut canvas = Pix::new(width, height, depth)?.to_mut();
        let mut y = 0i32;
        for row in &rows {
            canvas.rasterop(0, y, RopOp::Src, row)?;
            y += row.height() as i32;
        }
        Ok(canvas.into())
    }
}

impl FromIterator<Pixa> for Pixaa {
    fn from_iter<I: IntoIterator<Item = Pixa>>(iter: I) -> Self {
        Pixaa {
            pixas: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_range() {
        let pixa: Pixa = [(4, 9), (7, 3), (5, 5)]
            .into_iter()
            .map(|(w, h)| Pix::new(w, h, PixelDepth::Bit1).unwrap())
            .collect();
        assert_eq!(pixa.size_range(), Some((4, 3, 7, 9)));
        assert_eq!(Pixa::new().size_range(), None);
    }

    #[test]
    fn test_display_row() {
        let a = Pix::new(3, 2, PixelDepth::Bit1).unwrap().invert().unwrap();
        let b = Pix::new(2, 4, PixelDepth::Bit1).unwrap().invert().unwrap();
        let pixa: Pixa = [a, b].into_iter().collect();
        let row = pixa.display_row(1).unwrap();
        assert_eq!((row.width(), row.height()), (8, 6));
        assert_eq!(row.count_pixels().unwrap(), 14);
        assert!(Pixa::new().display_row(1).is_err());
    }

    #[test]
    fn test_display_rows_skips_empty() {
        let a = Pix::new(3, 2, PixelDepth::Bit1).unwrap();
        let paa: Pixaa = [Pixa::new(), [a].into_iter().collect()].into_iter().collect();
        let pix = paa.display_rows(2).unwrap();
        assert_eq!((pix.width(), pix.height()), (7, 6));
    }
}
