//! Class template averaging
//!
//! The average template of a class is built by laying every sample over
//! a common canvas so that all centroids coincide, counting how many
//! samples set each pixel, and keeping the pixels set by a majority.

use glyphtrain_core::{Error as CoreError, Pix, PixelDepth};
use tracing::{debug, warn};

use crate::error::{RecogError, RecogResult};

use super::types::{Recog, TrainingState};

/// Only the first samples of a class contribute to its average
pub const MAX_SAMPLES_TO_AVERAGE: usize = 256;

/// Sum centroid-aligned samples into an 8 bpp count image.
///
/// Only the first [`MAX_SAMPLES_TO_AVERAGE`] samples are used. Each one
/// is shifted by the truncated difference between the mean centroid and
/// its own centroid, then added to a canvas as large as the widest and
/// tallest sample. Pixels shifted off the canvas are dropped.
///
/// # Arguments
///
/// * `samples` - 1 bpp samples of one class
/// * `centroids` - Centroids of `samples`; computed here when `None`
///
/// # Returns
///
/// The count image (clamped to 255) and the mean centroid.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] for an empty sample list or a
/// centroid list of the wrong length.
pub fn accumulate_samples(
    samples: &[Pix],
    centroids: Option<&[(f32, f32)]>,
) -> RecogResult<(Pix, (f32, f32))> {
    if samples.is_empty() {
        return Err(RecogError::InvalidParameter("no samples to accumulate".to_string()));
    }
    if let Some(c) = centroids {
        if c.len() != samples.len() {
            return Err(RecogError::InvalidParameter(format!(
                "{} centroids for {} samples",
                c.len(),
                samples.len()
            )));
        }
    }
    let n = samples.len().min(MAX_SAMPLES_TO_AVERAGE);
    let samples = &samples[..n];
    for pix in samples {
        if pix.depth() != PixelDepth::Bit1 {
            return Err(CoreError::UnsupportedDepth(pix.depth().bits()).into());
        }
    }
    let centroids: Vec<(f32, f32)> = match centroids {
        Some(c) => c[..n].to_vec(),
        None => samples.iter().map(Pix::centroid).collect::<Result<_, _>>()?,
    };

    let (sumx, sumy) = centroids
        .iter()
        .fold((0.0f32, 0.0f32), |(ax, ay), &(x, y)| (ax + x, ay + y));
    let xave = sumx / n as f32;
    let yave = sumy / n as f32;

    let maxw = samples.iter().map(Pix::width).max().unwrap_or(1);
    let maxh = samples.iter().map(Pix::height).max().unwrap_or(1);
    let mut counts = vec![0u32; (maxw * maxh) as usize];

    for (pix, &(x, y)) in samples.iter().zip(&centroids) {
        let dx = (xave - x) as i32;
        let dy = (yave - y) as i32;
        for sy in 0..pix.height() {
            let ty = sy as i32 + dy;
            if ty < 0 || ty >= maxh as i32 {
                continue;
            }
            for sx in 0..pix.width() {
                let tx = sx as i32 + dx;
                if tx < 0 || tx >= maxw as i32 {
                    continue;
                }
                if pix.get_pixel_unchecked(sx, sy) != 0 {
                    counts[(ty as u32 * maxw + tx as u32) as usize] += 1;
                }
            }
        }
    }

    let mut sum = Pix::new(maxw, maxh, PixelDepth::Bit8)?.to_mut();
    for y in 0..maxh {
        for x in 0..maxw {
            let c = counts[(y * maxw + x) as usize];
            if c > 0 {
                sum.set_pixel_unchecked(x, y, c.min(255));
            }
        }
    }
    Ok((sum.into(), (xave, yave)))
}

/// Average template, centroid and area for every class of one domain.
type DomainAverages = (Vec<Pix>, Vec<(f32, f32)>, Vec<u32>);

fn average_domain(buckets: &[Vec<Pix>], centroids: &[Vec<(f32, f32)>]) -> RecogResult<DomainAverages> {
    let mut pixa = Vec::with_capacity(buckets.len());
    let mut pta = Vec::with_capacity(buckets.len());
    let mut nasum = Vec::with_capacity(buckets.len());
    for (i, samples) in buckets.iter().enumerate() {
        if samples.is_empty() {
            warn!(class = i, "class has no samples; using placeholder average");
            pixa.push(Pix::new(1, 1, PixelDepth::Bit1)?);
            pta.push((0.0, 0.0));
            nasum.push(0);
            continue;
        }
        let (sum, centroid) = accumulate_samples(samples, centroids.get(i).map(Vec::as_slice))?;
        // A pixel is foreground when more than half of the samples set it.
        let n = samples.len().min(MAX_SAMPLES_TO_AVERAGE) as u32;
        let template = sum.threshold_to_binary(n / 2 + 1)?.invert()?;
        let area = template.count_pixels()?;
        debug!(class = i, samples = n, area, "averaged class");
        pixa.push(template);
        pta.push(centroid);
        nasum.push(area);
    }
    Ok((pixa, pta, nasum))
}

/// Width and height range over the templates of classes that have samples.
fn template_size_range(templates: &[Pix], buckets: &[Vec<Pix>]) -> Option<(u32, u32, u32, u32)> {
    templates
        .iter()
        .zip(buckets)
        .filter(|(_, samples)| !samples.is_empty())
        .fold(None, |acc, (p, _)| {
            let (w, h) = (p.width(), p.height());
            Some(match acc {
                None => (w, h, w, h),
                Some((minw, minh, maxw, maxh)) => {
                    (minw.min(w), minh.min(h), maxw.max(w), maxh.max(h))
                }
            })
        })
}

impl Recog {
    /// Compute the average template of every class.
    ///
    /// Unscaled and scaled samples are averaged independently. The
    /// recognizer-wide size range and the splitting bounds are derived
    /// from the unscaled averages. Does nothing when the averages are
    /// already fresh.
    ///
    /// With `debug` set and a debug directory configured, the averages
    /// are written as an image.
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::WrongState`] while training is open.
    pub fn average_samples(&mut self, debug: bool) -> RecogResult<()> {
        self.require_closed("average_samples")?;
        if self.state == TrainingState::AveragesFresh {
            if debug {
                self.debug_averages();
            }
            return Ok(());
        }

        let (pixa_u, pta_u, nasum_u) = average_domain(&self.pixaa_u, &self.ptaa_u)?;
        let (pixa, pta, nasum) = average_domain(&self.pixaa, &self.ptaa)?;

        let (minw_u, minh_u, maxw_u, maxh_u) =
            template_size_range(&pixa_u, &self.pixaa_u).unwrap_or((0, 0, 0, 0));
        let (minw, _, maxw, _) = template_size_range(&pixa, &self.pixaa).unwrap_or((0, 0, 0, 0));

        self.pixa_u = pixa_u;
        self.pta_u = pta_u;
        self.nasum_u = nasum_u;
        self.pixa = pixa;
        self.pta = pta;
        self.nasum = nasum;

        self.minwidth_u = minw_u;
        self.minheight_u = minh_u;
        self.maxwidth_u = maxw_u;
        self.maxheight_u = maxh_u;
        self.minwidth = minw;
        self.maxwidth = maxw;
        self.min_split_w = minw_u.saturating_sub(5).max(5);
        self.min_split_h = minh_u.saturating_sub(5).max(5);
        // Allow for skew
        self.max_split_h = maxh_u + 12;

        self.state = TrainingState::AveragesFresh;
        if debug {
            self.debug_averages();
        }
        Ok(())
    }
}
