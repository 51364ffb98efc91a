//! Mathematical morphology for grayscale images
//!
//! - **Area opening**: removes bright components below a pixel-count
//!   threshold, using a max-tree built once per image
//! - **Erosion / dilation / opening** with a non-flat ball element
//! - **Rolling-ball background**: ball opening, and its subtraction
//!   (white top-hat) for background removal

mod area_opening;
mod background;
mod dilate;
mod element;
mod erode;
mod opening;

pub use area_opening::{area_opening, AreaOpening, AreaOpeningParams, MaxTree};
pub use background::{remove_background, rolling_ball_background, BackgroundParams, RemoveBackground};
pub use dilate::dilate;
pub use element::BallElement;
pub use erode::erode;
pub use opening::opening;

use granulo_core::image::Image;
use granulo_core::{Error, Result};
use ndarray::Array2;

/// Wrap a row-major buffer produced by a row-parallel loop into an image
pub(crate) fn image_from_data(rows: usize, cols: usize, data: Vec<f64>) -> Result<Image<f64>> {
    let array =
        Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    Ok(Image::from_array(array))
}
