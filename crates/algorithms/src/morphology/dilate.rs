//! Grey-level dilation with a ball structuring element
//!
//! Traces the upper envelope of the ball positions produced by erosion.

use crate::maybe_rayon::*;
use granulo_core::image::Image;
use granulo_core::Result;

use super::element::BallElement;
use super::image_from_data;

/// Perform non-flat dilation of an image by a ball
///
/// `out(x) = max over footprint k of f(x + k) - depth(k)`.
/// The ball is symmetric, so this is the adjoint of [`erode`](super::erode).
/// Footprint cells outside the image are ignored.
///
/// # Arguments
/// * `image` - Input image
/// * `element` - Ball structuring element
pub fn dilate(image: &Image<f64>, element: &BallElement) -> Result<Image<f64>> {
    image.ensure_not_empty()?;

    let (rows, cols) = image.shape();
    let cells: Vec<((isize, isize), f64)> = element.cells().collect();

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NEG_INFINITY; cols];
            let r = row as isize;

            for (col, out) in row_data.iter_mut().enumerate() {
                let c = col as isize;
                let mut max_val = f64::NEG_INFINITY;

                for &((dr, dc), depth) in &cells {
                    let nr = r + dr;
                    let nc = c + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let v = unsafe { image.get_unchecked(nr as usize, nc as usize) } - depth;
                    if v > max_val {
                        max_val = v;
                    }
                }

                *out = max_val;
            }

            row_data
        })
        .collect();

    image_from_data(rows, cols, output_data)
}
