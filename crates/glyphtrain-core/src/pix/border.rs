//! Border addition and removal

use super::Pix;
use crate::error::{Error, Result};

impl Pix {
    /// Add a border of `npix` pixels on every side, filled with `val`.
    pub fn add_border(&self, npix: u32, val: u32) -> Result<Pix> {
        if npix == 0 {
            return Ok(self.clone());
        }
        let mut out = Pix::new(self.width() + 2 * npix, self.height() + 2 * npix, self.depth())?
            .to_mut();
        out.set_text(self.text().map(str::to_string));
        if val != 0 {
            for y in 0..out.height() {
                for x in 0..out.width() {
                    out.set_pixel_unchecked(x, y, val);
                }
            }
        }
        out.rasterop(npix as i32, npix as i32, super::rop::RopOp::Src, self)?;
        Ok(out.into())
    }

    /// Remove `npix` pixels from every side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if nothing would remain.
    pub fn remove_border(&self, npix: u32) -> Result<Pix> {
        if npix == 0 {
            return Ok(self.clone());
        }
        if 2 * npix >= self.width() || 2 * npix >= self.height() {
            return Err(Error::InvalidParameter(format!(
                "border {} too large for {}x{} image",
                npix,
                self.width(),
                self.height()
            )));
        }
        self.clip_rectangle(&crate::Box::new_unchecked(
            npix as i32,
            npix as i32,
            (self.width() - 2 * npix) as i32,
            (self.height() - 2 * npix) as i32,
        ))
    }
}
