//! PNG image format support
//!
//! 1 bpp bitmaps are written as 1-bit grayscale with foreground (ON)
//! pixels stored as black, so files look right in ordinary viewers;
//! reading applies the inverse mapping. 8 bpp maps to 8-bit grayscale and
//! 32 bpp to 8-bit RGB or RGBA depending on samples per pixel.

use crate::{IoError, IoResult};
use glyphtrain_core::{Pix, PixelDepth, compose_rgb};
use png::{BitDepth, ColorType, Decoder, Encoder};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Seek, Write};
use std::path::Path;

/// Read a PNG image.
///
/// Supports 1-bit and 8-bit grayscale and 8-bit RGB/RGBA.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let width = info.width;
    let height = info.height;
    let color_type = info.color_type;
    let bit_depth = info.bit_depth;

    let (pix_depth, spp) = match (color_type, bit_depth) {
        (ColorType::Grayscale, BitDepth::One) => (PixelDepth::Bit1, 1),
        (ColorType::Grayscale, BitDepth::Eight) => (PixelDepth::Bit8, 1),
        (ColorType::Rgb, BitDepth::Eight) => (PixelDepth::Bit32, 3),
        (ColorType::Rgba, BitDepth::Eight) => (PixelDepth::Bit32, 4),
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG format: {:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let mut pix_mut = Pix::new(width, height, pix_depth)?.to_mut();
    pix_mut.set_spp(spp);

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    for y in 0..height {
        let row = &data[y as usize * bytes_per_row..];
        for x in 0..width {
            let xi = x as usize;
            let val = match pix_depth {
                PixelDepth::Bit1 => u32::from(((row[xi / 8] >> (7 - (xi % 8))) & 1) ^ 1),
                PixelDepth::Bit8 => u32::from(row[xi]),
                _ => {
                    let idx = xi * spp as usize;
                    compose_rgb(row[idx], row[idx + 1], row[idx + 2])
                }
            };
            if val != 0 {
                pix_mut.set_pixel_unchecked(x, y, val);
            }
        }
    }

    Ok(pix_mut.into())
}

/// Read a PNG image from a file.
pub fn read_png_from_file<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let file = File::open(path)?;
    read_png(BufReader::new(file))
}

/// Write a PNG image.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for depths other than 1, 8
/// and 32 bpp.
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, bit_depth, bytes_per_row) = match pix.depth() {
        PixelDepth::Bit1 => (ColorType::Grayscale, BitDepth::One, width.div_ceil(8)),
        PixelDepth::Bit8 => (ColorType::Grayscale, BitDepth::Eight, width),
        PixelDepth::Bit32 if pix.spp() == 4 => (ColorType::Rgba, BitDepth::Eight, width * 4),
        PixelDepth::Bit32 => (ColorType::Rgb, BitDepth::Eight, width * 3),
        depth => {
            return Err(IoError::UnsupportedFormat(format!(
                "cannot write {} bpp image as PNG",
                depth.bits()
            )));
        }
    };
    let bytes_per_row = bytes_per_row as usize;

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(bit_depth);
    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    let mut data = vec![0u8; bytes_per_row * height as usize];
    for y in 0..height {
        let row = &mut data[y as usize * bytes_per_row..(y as usize + 1) * bytes_per_row];
        for x in 0..width {
            let xi = x as usize;
            let val = pix.get_pixel_unchecked(x, y);
            match color_type {
                ColorType::Grayscale if bit_depth == BitDepth::One => {
                    // Background is stored as white (1)
                    if val == 0 {
                        row[xi / 8] |= 1 << (7 - (xi % 8));
                    }
                }
                ColorType::Grayscale => row[xi] = val as u8,
                ColorType::Rgba => {
                    row[xi * 4..xi * 4 + 4].copy_from_slice(&val.to_be_bytes());
                }
                _ => {
                    row[xi * 3..xi * 3 + 3].copy_from_slice(&val.to_be_bytes()[..3]);
                }
            }
        }
    }

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    Ok(())
}

/// Write a PNG image to a file, creating or truncating it.
pub fn write_png_to_file<P: AsRef<Path>>(pix: &Pix, path: P) -> IoResult<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_png(pix, &mut out)?;
    out.flush()?;
    Ok(())
}
