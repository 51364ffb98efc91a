//! Resampling primitives
//!
//! - **Rescale**: bilinear resize by a uniform factor, with Gaussian
//!   anti-aliasing when shrinking

mod gaussian;
mod rescale;

pub use rescale::{rescale, rescale_with, scaled_len, Rescale, RescaleParams};
