//! Training set padding regression test
//!
//! Exercises the three padding tiers: replacement by the bootstrap
//! digits, no change, and padding from donor sets read from disk,
//! including the choice between several donor sets.

use std::path::PathBuf;

use glyphtrain_core::Pixa;
use glyphtrain_io::{read_pixaa_from_files, write_pixa_to_file};
use glyphtrain_recog::boot::{BootSet, boot_digit_pixa};
use glyphtrain_recog::recog::{best_correl_for_padding, correl_averages};
use glyphtrain_recog::{
    CharsetType, PadOutcome, Recog, RecogError, RecognizerSet, TemplateUse, TrainingState,
};
use glyphtrain_test::{RegParams, init_logging, regout_dir};
use glyphtrain_transform::scale_to_size;

/// `copies` renditions of every digit of `set`, skipping those in
/// `skip`; digit `short` gets one fewer.
fn digits_from(set: BootSet, copies: usize, short: Option<usize>, skip: &[usize]) -> Pixa {
    let rendition = boot_digit_pixa(set).unwrap();
    let mut pixa = Pixa::new();
    for (digit, pix) in rendition.iter().enumerate() {
        if skip.contains(&digit) {
            continue;
        }
        let n = if short == Some(digit) { copies - 1 } else { copies };
        for _ in 0..n {
            pixa.push(pix.clone());
        }
    }
    pixa
}

fn digits(copies: usize, short: Option<usize>, skip: &[usize]) -> Pixa {
    digits_from(BootSet::Gen1, copies, short, skip)
}

fn donor_dir() -> PathBuf {
    let dir = PathBuf::from(regout_dir()).join("pad_donors");
    std::fs::create_dir_all(&dir).unwrap();
    write_pixa_to_file(&digits(15, None, &[]), dir.join("digit_set_a.pa")).unwrap();
    // Not matched by the pattern
    write_pixa_to_file(&digits(1, None, &[0, 1, 2, 3, 4]), dir.join("other.pa")).unwrap();
    dir
}

/// Two matching donor files: the Gen1 digits, then the Gen2 digits.
fn two_donor_dir() -> PathBuf {
    let dir = PathBuf::from(regout_dir()).join("pad_donors_two");
    std::fs::create_dir_all(&dir).unwrap();
    write_pixa_to_file(&digits_from(BootSet::Gen1, 15, None, &[]), dir.join("digit_set_a.pa")).unwrap();
    write_pixa_to_file(&digits_from(BootSet::Gen2, 15, None, &[]), dir.join("digit_set_b.pa")).unwrap();
    dir
}

#[test]
fn pad_reg() {
    init_logging();
    let mut rp = RegParams::new("pad");
    let dir = donor_dir();

    // --- Test 1: too few samples replaces the recognizer ---
    let two = digits(1, None, &[2, 3, 4, 5, 6, 7, 8, 9]);
    let mut recog = Recog::create_from_pixa(&two, 0, 40, TemplateUse::All, 150, 1).unwrap();
    let params = recog.pad_params().clone().with_min_nopad(4).with_max_afterpad(12);
    recog.set_pad_params(params).unwrap();
    let outcome = recog.pad_training_set().unwrap();
    rp.compare_values(1.0, if outcome == PadOutcome::Replaced { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(10.0, recog.set_size() as f64, 0.0);
    rp.compare_values(20.0, recog.scale_w as f64, 0.0);
    rp.compare_values(32.0, recog.scale_h as f64, 0.0);
    rp.compare_values(4.0, recog.pad_params().min_nopad as f64, 0.0);
    rp.compare_values(1.0, if recog.averages_valid() { 1.0 } else { 0.0 }, 0.0);

    // --- Test 2: a complete, well-populated set is left alone ---
    let mut recog = Recog::create_from_pixa(&digits(3, None, &[]), 0, 40, TemplateUse::All, 150, 1).unwrap();
    let outcome = recog.pad_training_set().unwrap();
    rp.compare_values(1.0, if outcome == PadOutcome::Unchanged { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(40.0, recog.scale_h as f64, 0.0);

    // --- Test 3: a short class is filled from the best donor ---
    let mut recog =
        Recog::create_from_pixa(&digits(3, Some(7), &[]), 0, 40, TemplateUse::All, 150, 1).unwrap();
    let params = recog.pad_params().clone().with_boot_dir(&dir);
    recog.set_pad_params(params).unwrap();
    rp.compare_values(29.0, recog.num_samples as f64, 0.0);
    let outcome = recog.pad_training_set().unwrap();
    eprintln!("Padding outcome: {:?}", outcome);
    rp.compare_values(1.0, if outcome == (PadOutcome::Padded { added: 13 }) { 1.0 } else { 0.0 }, 0.0);
    let seven = recog.string_to_index("7").unwrap();
    rp.compare_values(15.0, recog.class_counts()[seven] as f64, 0.0);
    rp.compare_values(3.0, recog.class_counts()[0] as f64, 0.0);
    rp.compare_values(32.0, recog.scale_h as f64, 0.0);
    rp.compare_values(1.0, if recog.training_done() { 1.0 } else { 0.0 }, 0.0);
    let _ = rp.write_pix(&recog.averages()[seven]);

    // --- Test 4: matching against the donors ---
    let paa = read_pixaa_from_files(&dir, "digit_set").unwrap();
    rp.compare_values(1.0, paa.len() as f64, 0.0);
    let donors = RecognizerSet::create_from_pixaa(&paa, 0, 32, TemplateUse::Average, 100, 1).unwrap();
    let (lut, scores) = correl_averages(&recog, donors.get(0).unwrap()).unwrap();
    rp.compare_values(10.0, lut.iter().flatten().count() as f64, 0.0);
    rp.compare_values(1.0, scores[seven] as f64, 1e-4);
    let (matches, means) = best_correl_for_padding(&recog, &donors).unwrap();
    let all_matched = matches.iter().all(|m| m.is_some_and(|m| m.set_index == 0));
    rp.compare_values(1.0, if all_matched { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, means[0] as f64, 1e-4);

    // --- Test 5: a missing class is imported from the best donor ---
    let mut recog =
        Recog::create_from_pixa(&digits(3, None, &[9]), 0, 40, TemplateUse::All, 150, 1).unwrap();
    let params = recog.pad_params().clone().with_boot_dir(&dir);
    recog.set_pad_params(params).unwrap();
    let outcome = recog.pad_training_set().unwrap();
    rp.compare_values(1.0, if outcome == (PadOutcome::Padded { added: 15 }) { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(10.0, recog.set_size() as f64, 0.0);
    let nine = recog.string_to_index("9").unwrap_or(0);
    rp.compare_values(15.0, recog.class_counts()[nine] as f64, 0.0);

    // --- Test 6: a set pads its member in place ---
    let mut set = RecognizerSet::new();
    set.push(Recog::create_from_pixa(&two, 0, 40, TemplateUse::All, 150, 1).unwrap());
    let outcome = set.pad_member(0).unwrap();
    rp.compare_values(1.0, if outcome == PadOutcome::Replaced { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(10.0, set.get(0).unwrap().set_size() as f64, 0.0);

    // --- Test 7: padding needs a bootstrap set for the charset ---
    let mut recog = Recog::create_from_pixa(&digits(3, None, &[]), 0, 40, TemplateUse::All, 150, 1).unwrap();
    let params = recog
        .pad_params()
        .clone()
        .with_boot_dir(&dir)
        .with_charset_type(CharsetType::LcAlpha);
    recog.set_pad_params(params).unwrap();
    let unavailable = matches!(recog.pad_training_set(), Err(RecogError::CharsetUnavailable(_)));
    rp.compare_values(1.0, if unavailable { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(30.0, recog.num_samples as f64, 0.0);

    // --- Test 8: the donor set closest to the samples is chosen ---
    let two = two_donor_dir();
    let mut recog = Recog::create_from_pixa(
        &digits_from(BootSet::Gen2, 3, Some(7), &[9]),
        0,
        40,
        TemplateUse::All,
        150,
        1,
    )
    .unwrap();
    let paa = read_pixaa_from_files(&two, "digit_set").unwrap();
    rp.compare_values(2.0, paa.len() as f64, 0.0);
    let donors = RecognizerSet::create_from_pixaa(&paa, 0, 32, TemplateUse::Average, 100, 1).unwrap();
    let rebuilt = Recog::create_from_recog(&recog, 0, 32, TemplateUse::Average, 100, 1).unwrap();
    let (matches, means) = best_correl_for_padding(&rebuilt, &donors).unwrap();
    let all_second = matches.iter().all(|m| m.is_some_and(|m| m.set_index == 1));
    rp.compare_values(1.0, if all_second { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if means[1] > means[0] { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, means[1] as f64, 1e-4);

    let params = recog.pad_params().clone().with_boot_dir(&two);
    recog.set_pad_params(params).unwrap();
    let outcome = recog.pad_training_set().unwrap();
    eprintln!("Padding outcome with two donors: {:?}", outcome);
    rp.compare_values(1.0, if outcome == (PadOutcome::Padded { added: 28 }) { 1.0 } else { 0.0 }, 0.0);
    let seven = recog.string_to_index("7").unwrap_or(0);
    let nine = recog.string_to_index("9").unwrap_or(0);
    rp.compare_values(15.0, recog.class_counts()[seven] as f64, 0.0);
    rp.compare_values(15.0, recog.class_counts()[nine] as f64, 0.0);

    // The imported class is the Gen2 rendition scaled to the average height
    let donor = donors.get(1).unwrap();
    let source = &donor.samples(donor.string_to_index("9").unwrap()).unwrap()[0];
    let imported = &recog.samples(nine).unwrap()[0];
    let expected = scale_to_size(source, 0, imported.height()).unwrap();
    rp.compare_pix(&expected, imported);

    // --- Test 9: a pad that fails partway leaves the recognizer untouched ---
    let mut recog =
        Recog::create_from_pixa(&digits(3, Some(7), &[9]), 0, 40, TemplateUse::All, 150, 1).unwrap();
    // Room for the nine present classes only, so importing "9" fails
    recog.max_array_size = 9;
    let params = recog.pad_params().clone().with_boot_dir(&dir);
    recog.set_pad_params(params).unwrap();
    let before = recog.class_counts();
    let failed = matches!(recog.pad_training_set(), Err(RecogError::TrainingError(_)));
    rp.compare_values(1.0, if failed { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(26.0, recog.num_samples as f64, 0.0);
    rp.compare_values(1.0, if recog.class_counts() == before { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(40.0, recog.scale_h as f64, 0.0);
    rp.compare_values(1.0, if recog.templ_use == TemplateUse::All { 1.0 } else { 0.0 }, 0.0);
    rp.compare_values(1.0, if recog.state() == TrainingState::AveragesFresh { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "pad regression test failed");
}
