//! Grey-level erosion with a ball structuring element
//!
//! Each output pixel is the lowest point the ball's apex can sit at while
//! the ball stays at or below the surface within its footprint.

use crate::maybe_rayon::*;
use granulo_core::image::Image;
use granulo_core::Result;

use super::element::BallElement;
use super::image_from_data;

/// Perform non-flat erosion of an image by a ball
///
/// `out(x) = min over footprint k of f(x + k) + depth(k)`.
/// Footprint cells falling outside the image are ignored, so the output
/// keeps the input shape and has no undefined border.
///
/// # Arguments
/// * `image` - Input image
/// * `element` - Ball structuring element
pub fn erode(image: &Image<f64>, element: &BallElement) -> Result<Image<f64>> {
    image.ensure_not_empty()?;

    let (rows, cols) = image.shape();
    let cells: Vec<((isize, isize), f64)> = element.cells().collect();

    let output_data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::INFINITY; cols];
            let r = row as isize;

            for (col, out) in row_data.iter_mut().enumerate() {
                let c = col as isize;
                let mut min_val = f64::INFINITY;

                for &((dr, dc), depth) in &cells {
                    let nr = r + dr;
                    let nc = c + dc;
                    if nr < 0 || nc < 0 || nr >= rows as isize || nc >= cols as isize {
                        continue;
                    }
                    let v = unsafe { image.get_unchecked(nr as usize, nc as usize) } + depth;
                    if v < min_val {
                        min_val = v;
                    }
                }

                *out = min_val;
            }

            row_data
        })
        .collect();

    image_from_data(rows, cols, output_data)
}
