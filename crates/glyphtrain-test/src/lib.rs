//! glyphtrain-test - Regression test framework
//!
//! Provides [`RegParams`], which numbers each check in a regression test,
//! records failures and reports them at the end, in one of two modes:
//!
//! - **Compare**: Run every check (default)
//! - **Display**: Additionally write intermediate images under
//!   `tests/regout` for visual inspection
//!
//! # Usage
//!
//! ```ignore
//! use glyphtrain_test::RegParams;
//!
//! let mut rp = RegParams::new("recogtrain");
//! rp.compare_values(4.0, recog.num_samples() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"
//! - `RUST_LOG`: Filter for [`init_logging`] output

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use glyphtrain_core::{Pix, PixelDepth};
use std::sync::Once;
use tracing_subscriber::EnvFilter;

static LOGGING: Once = Once::new();

/// Route `tracing` output to the test harness.
///
/// Uses `RUST_LOG` when set and `info` otherwise. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Build a 1 bpp bitmap from ASCII art.
///
/// `'#'` and `'x'` are foreground; every other character is background.
/// All rows must have the same length.
pub fn pix_from_rows(rows: &[&str]) -> TestResult<Pix> {
    let width = rows.first().map_or(0, |r| r.chars().count());
    if width == 0 || rows.iter().any(|r| r.chars().count() != width) {
        return Err(TestError::BadRows(format!(
            "{} rows, expected equal non-zero lengths",
            rows.len()
        )));
    }
    let mut pm = Pix::new(width as u32, rows.len() as u32, PixelDepth::Bit1)
        .map_err(|e| TestError::BadRows(e.to_string()))?
        .to_mut();
    for (y, row) in rows.iter().enumerate() {
        for (x, c) in row.chars().enumerate() {
            if c == '#' || c == 'x' {
                pm.set_pixel_unchecked(x as u32, y as u32, 1);
            }
        }
    }
    Ok(pm.into())
}

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // glyphtrain-test is at crates/glyphtrain-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
