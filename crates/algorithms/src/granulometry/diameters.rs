//! Probe diameters and their equivalent areas

use granulo_core::{Error, Result};
use std::f64::consts::PI;

/// Build the probe diameter sequence `1, step, 2·step, …` below `end`
///
/// The sequence is strictly increasing: with `step == 1` the leading 1 is
/// not repeated. Values are in pixels of the original (unscaled) image.
///
/// Fails when `step == 0` or `end <= step`, which would leave no probe
/// beyond the trivial single-pixel one.
pub fn diameter_sequence(step: usize, end: usize) -> Result<Vec<f64>> {
    if step == 0 {
        return Err(Error::invalid_parameter("step", step, "step must be at least 1"));
    }
    if end <= step {
        return Err(Error::invalid_parameter(
            "end",
            end,
            format!("end must be greater than step ({})", step),
        ));
    }

    let mut diameters = vec![1.0];
    diameters.extend(
        (step..end)
            .step_by(step)
            .filter(|&d| d > 1)
            .map(|d| d as f64),
    );
    Ok(diameters)
}

/// Area in pixels of a disk of the given diameter, `π·(d/2)²`
#[inline]
pub fn circle_area(diameter: f64) -> f64 {
    PI * (diameter / 2.0).powi(2)
}
