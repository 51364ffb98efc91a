//! Grey-level opening with a ball (erosion followed by dilation)
//!
//! Removes bright features the ball cannot fit into while leaving the
//! slowly-varying surface underneath.

use granulo_core::image::Image;
use granulo_core::Result;

use super::dilate::dilate;
use super::element::BallElement;
use super::erode::erode;

/// Perform grey-level opening of an image by a ball
///
/// Opening = erode then dilate. The result never exceeds the input at any
/// pixel and is idempotent up to floating point rounding.
///
/// # Arguments
/// * `image` - Input image
/// * `element` - Ball structuring element
pub fn opening(image: &Image<f64>, element: &BallElement) -> Result<Image<f64>> {
    let eroded = erode(image, element)?;
    dilate(&eroded, element)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(rows: usize, cols: usize) -> Image<f64> {
        let mut image = Image::new(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                image.set(row, col, ((row * 7 + col * 13) % 31) as f64).unwrap();
            }
        }
        image
    }

    #[test]
    fn test_opening_uniform() {
        let image = Image::filled(11, 11, 5.0);
        let ball = BallElement::new(2.0).unwrap();
        let result = opening(&image, &ball).unwrap();
        let val = result.get(5, 5).unwrap();
        assert!((val - 5.0).abs() < 1e-12, "got {}", val);
    }

    #[test]
    fn test_opening_removes_bright_spot() {
        let mut image = Image::filled(11, 11, 5.0);
        image.set(5, 5, 100.0).unwrap();
        let ball = BallElement::new(2.0).unwrap();
        let result = opening(&image, &ball).unwrap();
        let val = result.get(5, 5).unwrap();
        assert!((val - 5.0).abs() < 1e-12, "got {}", val);
    }

    #[test]
    fn test_opening_anti_extensive() {
        let image = ramp(15, 17);
        let ball = BallElement::new(2.5).unwrap();
        let result = opening(&image, &ball).unwrap();
        for (a, b) in image.data().iter().zip(result.data().iter()) {
            assert!(*b <= *a + 1e-9, "opening raised {} to {}", a, b);
        }
    }

    #[test]
    fn test_opening_idempotent() {
        let image = ramp(15, 15);
        let ball = BallElement::new(2.0).unwrap();
        let once = opening(&image, &ball).unwrap();
        let twice = opening(&once, &ball).unwrap();
        for (a, b) in once.data().iter().zip(twice.data().iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }
}
