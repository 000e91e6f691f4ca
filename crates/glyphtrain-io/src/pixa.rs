//! Labelled bitmap-set serialization
//!
//! A bitmap set holds an ordered list of bitmaps, each with an optional
//! text label. All integers are little-endian:
//!
//! ```text
//! magic    b"GTPA"
//! version  u32 (= 1)
//! count    u32
//! count x {
//!     label_len  u32   (0 = no label)
//!     label      label_len bytes of UTF-8
//!     png_len    u32
//!     png        png_len bytes
//! }
//! ```

use crate::png::{read_png, write_png};
use crate::{IoError, IoResult};
use glyphtrain_core::{Pixa, Pixaa};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::path::Path;

const MAGIC: &[u8; 4] = b"GTPA";
const VERSION: u32 = 1;

/// Upper bound on a single entry, to reject corrupt length fields early.
const MAX_ENTRY_BYTES: u32 = 1 << 28;

fn read_u32<R: Read>(reader: &mut R) -> IoResult<u32> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_block<R: Read>(reader: &mut R, what: &str) -> IoResult<Vec<u8>> {
    let len = read_u32(reader)?;
    if len > MAX_ENTRY_BYTES {
        return Err(IoError::InvalidData(format!("{} length {} too large", what, len)));
    }
    let mut buf = vec![0u8; len as usize];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

/// Read a bitmap set.
///
/// # Errors
///
/// Returns [`IoError::InvalidData`] for a bad header, an unknown
/// version or a label that is not UTF-8.
pub fn read_pixa<R: Read>(mut reader: R) -> IoResult<Pixa> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(IoError::InvalidData("not a bitmap set file".to_string()));
    }
    let version = read_u32(&mut reader)?;
    if version != VERSION {
        return Err(IoError::InvalidData(format!(
            "unsupported bitmap set version {}",
            version
        )));
    }

    let count = read_u32(&mut reader)?;
    let mut pixa = Pixa::with_capacity(count.min(4096) as usize);
    for i in 0..count {
        let label = read_block(&mut reader, "label")?;
        let label = if label.is_empty() {
            None
        } else {
            Some(String::from_utf8(label).map_err(|_| {
                IoError::InvalidData(format!("label of entry {} is not UTF-8", i))
            })?)
        };
        let png = read_block(&mut reader, "image")?;
        let pix = read_png(Cursor::new(png))?;
        pixa.push(pix.with_text(label.as_deref()));
    }
    Ok(pixa)
}

/// Write a bitmap set.
pub fn write_pixa<W: Write>(pixa: &Pixa, mut writer: W) -> IoResult<()> {
    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    writer.write_all(&(pixa.len() as u32).to_le_bytes())?;
    for pix in pixa.iter() {
        let label = pix.text().unwrap_or("").as_bytes();
        writer.write_all(&(label.len() as u32).to_le_bytes())?;
        writer.write_all(label)?;

        let mut png = Vec::new();
        write_png(pix, &mut png)?;
        writer.write_all(&(png.len() as u32).to_le_bytes())?;
        writer.write_all(&png)?;
    }
    Ok(())
}

/// Read a bitmap set from a file.
pub fn read_pixa_from_file<P: AsRef<Path>>(path: P) -> IoResult<Pixa> {
    let file = File::open(path)?;
    read_pixa(BufReader::new(file))
}

/// Write a bitmap set to a file, creating or truncating it.
pub fn write_pixa_to_file<P: AsRef<Path>>(pixa: &Pixa, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_pixa(pixa, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Read every bitmap set in a directory whose file name contains `pattern`.
///
/// Files are read in file-name order, one [`Pixa`] per file.
///
/// # Errors
///
/// Returns [`IoError::NoMatchingFiles`] if no file matches, and the
/// first read error otherwise.
pub fn read_pixaa_from_files<P: AsRef<Path>>(dir: P, pattern: &str) -> IoResult<Pixaa> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().contains(pattern) {
            paths.push(entry.path());
        }
    }
    if paths.is_empty() {
        return Err(IoError::NoMatchingFiles {
            dir: dir.display().to_string(),
            pattern: pattern.to_string(),
        });
    }
    paths.sort();
    paths.iter().map(read_pixa_from_file).collect()
}
