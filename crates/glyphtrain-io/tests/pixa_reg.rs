//! Bitmap-set I/O regression test
//!
//! Labelled sets are written to disk, read back, and gathered from a
//! directory by file-name pattern.

use std::fs;
use std::path::PathBuf;

use glyphtrain_core::{Pix, Pixa, PixelDepth};
use glyphtrain_io::{
    IoError, read_pixa, read_pixa_from_file, read_pixaa_from_files, write_pixa, write_pixa_to_file,
};
use glyphtrain_test::{RegParams, pix_from_rows, regout_dir};

fn labelled_set() -> Pixa {
    let bar = pix_from_rows(&["##", "##", "##", "##"]).unwrap();
    let el = pix_from_rows(&["#..", "#..", "#..", "###"]).unwrap();
    [bar.with_text(Some("1")), el.clone().with_text(Some("L")), el.with_text(None)]
        .into_iter()
        .collect()
}

#[test]
fn pixa_reg() {
    let mut rp = RegParams::new("pixa");
    let outdir = PathBuf::from(regout_dir()).join("pixa_sets");
    let _ = fs::remove_dir_all(&outdir);
    fs::create_dir_all(&outdir).unwrap();

    // --- Test 1: labels and pixels survive a file round trip ---
    let pixa = labelled_set();
    let path = outdir.join("digit_set_1.pa");
    write_pixa_to_file(&pixa, &path).unwrap();
    let back = read_pixa_from_file(&path).unwrap();
    rp.compare_values(3.0, back.len() as f64, 0.0);
    for (orig, read) in pixa.iter().zip(back.iter()) {
        rp.compare_pix(orig, read);
        rp.compare_strings(
            orig.text().unwrap_or("").as_bytes(),
            read.text().unwrap_or("").as_bytes(),
        );
    }
    rp.compare_values(1.0, if back.get(2).unwrap().text().is_none() { 1.0 } else { 0.0 }, 0.0);

    // --- Test 2: the stream layout starts with the header ---
    let mut bytes = Vec::new();
    write_pixa(&pixa, &mut bytes).unwrap();
    rp.compare_strings(b"GTPA", &bytes[..4]);
    rp.compare_strings(&1u32.to_le_bytes(), &bytes[4..8]);
    rp.compare_strings(&3u32.to_le_bytes(), &bytes[8..12]);
    let mut corrupt = bytes.clone();
    corrupt[0] = b'X';
    let bad = matches!(read_pixa(corrupt.as_slice()), Err(IoError::InvalidData(_)));
    rp.compare_values(1.0, if bad { 1.0 } else { 0.0 }, 0.0);
    let truncated = read_pixa(&bytes[..bytes.len() - 3]).is_err();
    rp.compare_values(1.0, if truncated { 1.0 } else { 0.0 }, 0.0);

    // --- Test 3: directory reads select by pattern in name order ---
    let single: Pixa = std::iter::once(Pix::new(3, 3, PixelDepth::Bit1).unwrap().with_text(Some("0")))
        .collect();
    write_pixa_to_file(&single, outdir.join("digit_set_0.pa")).unwrap();
    write_pixa_to_file(&single, outdir.join("unrelated.pa")).unwrap();
    let paa = read_pixaa_from_files(&outdir, "digit_set").unwrap();
    rp.compare_values(2.0, paa.len() as f64, 0.0);
    rp.compare_values(1.0, paa.get(0).unwrap().len() as f64, 0.0);
    rp.compare_values(3.0, paa.get(1).unwrap().len() as f64, 0.0);

    let missing = matches!(
        read_pixaa_from_files(&outdir, "no_such_set"),
        Err(IoError::NoMatchingFiles { .. })
    );
    rp.compare_values(1.0, if missing { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "pixa regression test failed");
}
