//! glyphtrain-io - Bitmap I/O
//!
//! - [`png`]: PNG encoding and decoding of 1, 8 and 32 bpp bitmaps
//! - [`pixa`]: the labelled bitmap-set format used for bootstrap and
//!   donor training data
//!
//! # Example
//!
//! ```no_run
//! use glyphtrain_io::{read_pixaa_from_files, write_png_to_file};
//!
//! let donors = read_pixaa_from_files("recog/digits", "digit_set").unwrap();
//! for (i, pixa) in donors.iter().enumerate() {
//!     let row = pixa.display_row(2).unwrap();
//!     write_png_to_file(&row, format!("/tmp/donor{}.png", i)).unwrap();
//! }
//! ```

mod error;
pub mod pixa;
pub mod png;

pub use error::{IoError, IoResult};
pub use pixa::{
    read_pixa, read_pixa_from_file, read_pixaa_from_files, write_pixa, write_pixa_to_file,
};
pub use self::png::{read_png, read_png_from_file, write_png, write_png_to_file};
