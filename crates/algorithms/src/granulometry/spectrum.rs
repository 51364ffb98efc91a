//! Granulometric size spectrum
//!
//! The image is (optionally) rescaled and background-corrected, then opened
//! with area openings of increasing disk-equivalent area. The intensity
//! removed between consecutive openings, as a percentage of the corrected
//! image's total, forms the loss curve. Finally the curve is normalized so
//! that its area over the diameter axis equals the mean intensity of the
//! original image, which makes spectra of dim and bright images comparable.
//!
//! Every opening is applied to the same corrected image; openings are never
//! chained.

use granulo_core::image::{Connectivity, Image, Sample};
use granulo_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::maybe_rayon::*;
use crate::morphology::{remove_background, MaxTree};
use crate::resample::rescale;

use super::diameters::{circle_area, diameter_sequence};
use super::integrate::trapezoid;

/// How the per-diameter openings are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    /// One opening after the other on the calling thread
    Sequential,
    /// Openings fanned out over the rayon pool (sequential without the
    /// `parallel` feature)
    #[default]
    Parallel,
}

/// Parameters for the size spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumParams {
    /// Resampling factor applied before measuring (0.25 shrinks each axis 4x)
    pub scale: f64,
    /// Spacing between probe diameters, in original pixels
    pub step: usize,
    /// Exclusive upper bound on probe diameters, in original pixels
    pub end: usize,
    /// Rolling-ball diameter in original pixels; 0 disables background removal
    pub background_diameter: f64,
    /// Pixel adjacency for the area openings
    pub connectivity: Connectivity,
    /// Scheduling of the opening sweep
    pub mode: SweepMode,
}

impl Default for SpectrumParams {
    fn default() -> Self {
        Self {
            scale: 0.25,
            step: 5,
            end: 150,
            background_diameter: 50.0,
            connectivity: Connectivity::Eight,
            mode: SweepMode::Parallel,
        }
    }
}

impl SpectrumParams {
    /// Check every parameter before any pixel is touched
    pub fn validate(&self) -> Result<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(Error::invalid_parameter(
                "scale",
                self.scale,
                "scale must be finite and positive",
            ));
        }
        if !self.background_diameter.is_finite() {
            return Err(Error::invalid_parameter(
                "background_diameter",
                self.background_diameter,
                "background diameter must be finite",
            ));
        }
        diameter_sequence(self.step, self.end).map(|_| ())
    }
}

/// Percentage of corrected intensity removed at each probe diameter
#[derive(Debug, Clone, PartialEq)]
pub struct LossProfile {
    /// Probe diameters in original pixels
    pub diameters: Vec<f64>,
    /// Intensity removed at each step, in percent of `total_intensity`
    pub percent: Vec<f64>,
    /// Intensity removed at each step, in image units
    pub raw_loss: Vec<f64>,
    /// Sum of the background-corrected working image
    pub total_intensity: f64,
    /// Mean of the original, unscaled image
    pub original_mean: f64,
}

/// Normalized granulometric size spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct SizeSpectrum {
    /// Probe diameters in original pixels
    pub diameters: Vec<f64>,
    /// Spectrum values; their trapezoidal area equals `original_mean`
    pub spectrum: Vec<f64>,
    /// Intermediate percentage-loss curve
    pub percent_loss: Vec<f64>,
    /// Sum of the background-corrected working image
    pub total_intensity: f64,
    /// Mean of the original, unscaled image
    pub original_mean: f64,
    /// Area under `percent_loss` over `diameters`
    pub normalizer: f64,
}

impl SizeSpectrum {
    /// Number of probe diameters
    pub fn len(&self) -> usize {
        self.diameters.len()
    }

    /// Whether the spectrum has no samples
    pub fn is_empty(&self) -> bool {
        self.diameters.is_empty()
    }

    /// Diameter and value of the largest spectrum sample
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.diameters
            .iter()
            .copied()
            .zip(self.spectrum.iter().copied())
            .fold(None, |best: Option<(f64, f64)>, (d, v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((d, v)),
            })
    }

    /// Trapezoidal area under the spectrum
    ///
    /// Fails with [`Error::InvalidParameter`] if `diameters` and `spectrum`
    /// have been edited to different lengths.
    pub fn area(&self) -> Result<f64> {
        trapezoid(&self.spectrum, &self.diameters)
    }

    /// Split into `(diameters, spectrum)`
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.diameters, self.spectrum)
    }
}

/// Size spectrum algorithm
#[derive(Debug, Clone, Default)]
pub struct SizeSpectrumAlgorithm;

impl Algorithm for SizeSpectrumAlgorithm {
    type Input = Image<f64>;
    type Output = SizeSpectrum;
    type Params = SpectrumParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "SizeSpectrum"
    }

    fn description(&self) -> &'static str {
        "Granulometric size spectrum from area openings of increasing size"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        compute_size_spectrum(&input, &params)
    }
}

/// Intensity removed by area openings at each diameter
///
/// `diameters` are in pixels of `image` and must be positive and strictly
/// increasing. Entry `i` is `sum(open(d[i-1])) - sum(open(d[i]))`, with the
/// unopened image standing in for `d[-1]`. The max-tree is built once and
/// shared read-only by every opening.
///
/// # Arguments
/// * `image` - Background-corrected image
/// * `diameters` - Probe diameters in pixels
/// * `connectivity` - Pixel adjacency for the openings
/// * `mode` - Sequential or parallel sweep; results are identical
pub fn intensity_loss(
    image: &Image<f64>,
    diameters: &[f64],
    connectivity: Connectivity,
    mode: SweepMode,
) -> Result<Vec<f64>> {
    if let Some(&bad) = diameters.iter().find(|d| !d.is_finite() || **d <= 0.0) {
        return Err(Error::invalid_parameter(
            "diameters",
            bad,
            "diameters must be finite and positive",
        ));
    }
    if diameters.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::invalid_parameter(
            "diameters",
            format!("{:?}", diameters),
            "diameters must be strictly increasing",
        ));
    }

    let tree = MaxTree::build(image, connectivity)?;
    let areas: Vec<f64> = diameters.iter().map(|&d| circle_area(d)).collect();
    debug!(
        nodes = tree.node_count(),
        steps = areas.len(),
        ?mode,
        "sweeping area openings"
    );

    let sums: Vec<f64> = match mode {
        SweepMode::Sequential => areas
            .iter()
            .map(|&a| tree.filtered_sum(a))
            .collect::<Result<Vec<f64>>>()?,
        SweepMode::Parallel => areas
            .par_iter()
            .map(|&a| tree.filtered_sum(a))
            .collect::<Result<Vec<f64>>>()?,
    };

    let mut previous = image.sum();
    let losses: Vec<f64> = diameters
        .iter()
        .zip(sums)
        .map(|(&d, current)| {
            let loss = previous - current;
            trace!(diameter = d, remaining = current, loss, "opening step");
            previous = current;
            loss
        })
        .collect();

    Ok(losses)
}

/// Percentage intensity-loss curve of an image, before final normalization
///
/// Runs the rescale, background and sweep stages and expresses each loss
/// as a percentage of the corrected image's total intensity. Diameters are
/// reported in original pixels.
///
/// Fails with [`Error::DegenerateImage`] when the corrected image sums to
/// zero.
pub fn loss_profile<T: Sample>(image: &Image<T>, params: &SpectrumParams) -> Result<LossProfile> {
    params.validate()?;
    image.ensure_not_empty()?;
    image.ensure_finite()?;

    let scale = params.scale;
    let probe: Vec<f64> = diameter_sequence(params.step, params.end)?
        .into_iter()
        .map(|d| d * scale)
        .collect();

    let working = image.to_f64();
    let original_mean = working.sum() / working.len() as f64;
    debug!(
        rows = working.rows(),
        cols = working.cols(),
        original_mean,
        scale,
        "computing size spectrum"
    );

    let working = if scale != 1.0 {
        rescale(&working, scale)?
    } else {
        working
    };

    let corrected = if params.background_diameter > 0.0 {
        remove_background(&working, params.background_diameter * scale)?
    } else {
        debug!("background removal disabled");
        working
    };

    let total_intensity = corrected.sum();
    if !total_intensity.is_finite() || total_intensity == 0.0 {
        return Err(Error::DegenerateImage(format!(
            "corrected image intensity sums to {}",
            total_intensity
        )));
    }

    let raw_loss = intensity_loss(&corrected, &probe, params.connectivity, params.mode)?;
    let percent = raw_loss
        .iter()
        .map(|loss| loss / total_intensity * 100.0)
        .collect();
    let diameters = probe.iter().map(|d| d / scale).collect();

    Ok(LossProfile {
        diameters,
        percent,
        raw_loss,
        total_intensity,
        original_mean,
    })
}

/// Compute the granulometric size spectrum of an image
///
/// The spectrum is the percentage-loss curve scaled so that its
/// trapezoidal area over the diameters equals the original image mean.
///
/// # Errors
/// * [`Error::InvalidParameter`] for a non-positive scale, `step == 0` or
///   `end <= step`
/// * [`Error::DegenerateImage`] when the corrected image sums to zero or
///   the loss curve integrates to zero (e.g. a flat image)
/// * [`Error::InvalidDimensions`] / [`Error::NonFiniteSample`] for empty or
///   non-finite input
pub fn compute_size_spectrum<T: Sample>(
    image: &Image<T>,
    params: &SpectrumParams,
) -> Result<SizeSpectrum> {
    let profile = loss_profile(image, params)?;

    let normalizer = trapezoid(&profile.percent, &profile.diameters)?;
    if !normalizer.is_finite() || normalizer.abs() <= f64::EPSILON {
        return Err(Error::DegenerateImage(format!(
            "intensity-loss curve integrates to {}",
            normalizer
        )));
    }

    let spectrum = profile
        .percent
        .iter()
        .map(|g| profile.original_mean * (g / normalizer))
        .collect();
    debug!(normalizer, "size spectrum normalized");

    Ok(SizeSpectrum {
        diameters: profile.diameters,
        spectrum,
        percent_loss: profile.percent,
        total_intensity: profile.total_intensity,
        original_mean: profile.original_mean,
        normalizer,
    })
}
