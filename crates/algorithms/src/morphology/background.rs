//! Rolling-ball background estimation and subtraction
//!
//! The background is the grey-level opening of the image by a ball: the
//! surface traced by the top of a ball rolled underneath the intensity
//! landscape. Subtracting it is a white top-hat with a ball element.

use granulo_core::image::Image;
use granulo_core::{Algorithm, Error, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::maybe_rayon::*;

use super::element::BallElement;
use super::image_from_data;
use super::opening::opening;

/// Parameters for background removal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundParams {
    /// Ball diameter in pixels. Zero or negative skips background removal.
    pub diameter: f64,
}

impl Default for BackgroundParams {
    fn default() -> Self {
        Self { diameter: 80.0 }
    }
}

/// Background removal algorithm
#[derive(Debug, Clone, Default)]
pub struct RemoveBackground;

impl Algorithm for RemoveBackground {
    type Input = Image<f64>;
    type Output = Image<f64>;
    type Params = BackgroundParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "RemoveBackground"
    }

    fn description(&self) -> &'static str {
        "Subtract a rolling-ball background estimate from the image"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        remove_background(&input, params.diameter)
    }
}

/// Estimate the rolling-ball background of an image
///
/// The returned surface never exceeds the image at any pixel.
///
/// # Arguments
/// * `image` - Input image
/// * `radius` - Ball radius in pixels (must be positive)
pub fn rolling_ball_background(image: &Image<f64>, radius: f64) -> Result<Image<f64>> {
    let ball = BallElement::new(radius)?;
    debug!(radius, footprint = ball.len(), "estimating rolling-ball background");
    opening(image, &ball)
}

/// Remove the rolling-ball background from an image
///
/// Returns `image - background` with the ball radius `diameter / 2`. The
/// result is not clipped; it is non-negative up to rounding because the
/// background lies under the image.
///
/// A `diameter <= 0` disables background removal and returns an unchanged
/// copy of the image.
///
/// # Arguments
/// * `image` - Input image
/// * `diameter` - Ball diameter in pixels
pub fn remove_background(image: &Image<f64>, diameter: f64) -> Result<Image<f64>> {
    if !diameter.is_finite() {
        return Err(Error::invalid_parameter(
            "diameter",
            diameter,
            "background diameter must be finite",
        ));
    }
    image.ensure_not_empty()?;

    if diameter <= 0.0 {
        debug!(diameter, "background removal disabled");
        return Ok(image.clone());
    }

    let background = rolling_ball_background(image, diameter / 2.0)?;
    let (rows, cols) = image.shape();

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0.0; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                let orig = unsafe { image.get_unchecked(row, col) };
                let bg = unsafe { background.get_unchecked(row, col) };
                *out = orig - bg;
            }
            row_data
        })
        .collect();

    image_from_data(rows, cols, output_data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilted_with_spots(rows: usize, cols: usize) -> Image<f64> {
        let mut image = Image::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                image.set(row, col, 0.5 * row as f64 + 0.25 * col as f64).unwrap();
            }
        }
        for &(r, c) in &[(5usize, 5usize), (12, 20), (25, 8)] {
            let base = image.get(r, c).unwrap();
            image.set(r, c, base + 40.0).unwrap();
        }
        image
    }

    #[test]
    fn test_zero_diameter_is_identity() {
        let image = tilted_with_spots(20, 20);
        let result = remove_background(&image, 0.0).unwrap();
        assert_eq!(result, image);
        let result = remove_background(&image, -5.0).unwrap();
        assert_eq!(result, image);
    }

    #[test]
    fn test_nan_diameter_rejected() {
        let image = Image::filled(5, 5, 1.0);
        assert!(matches!(
            remove_background(&image, f64::NAN),
            Err(Error::InvalidParameter { name: "diameter", .. })
        ));
    }

    #[test]
    fn test_background_below_image() {
        let image = tilted_with_spots(30, 30);
        let background = rolling_ball_background(&image, 4.0).unwrap();
        for (a, b) in image.data().iter().zip(background.data().iter()) {
            assert!(*b <= *a + 1e-9, "background {} above image {}", b, a);
        }
    }

    #[test]
    fn test_corrected_non_negative_and_keeps_spots() {
        let image = tilted_with_spots(30, 30);
        let corrected = remove_background(&image, 8.0).unwrap();
        assert_eq!(corrected.shape(), image.shape());
        for &v in corrected.data().iter() {
            assert!(v >= -1e-9, "corrected value {} is negative", v);
        }
        // Single-pixel spots survive almost entirely
        assert!(corrected.get(12, 20).unwrap() > 35.0);
        // The gentle ramp under them is removed
        assert!(corrected.get(15, 15).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_flat_image_corrects_to_zero() {
        let image = Image::filled(16, 16, 7.0);
        let corrected = remove_background(&image, 6.0).unwrap();
        assert!(corrected.data().iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_algorithm_trait() {
        let image = Image::filled(8, 8, 3.0);
        let algo = RemoveBackground;
        assert_eq!(algo.name(), "RemoveBackground");
        let out = algo
            .execute(image.clone(), BackgroundParams { diameter: 0.0 })
            .unwrap();
        assert_eq!(out, image);
    }
}
