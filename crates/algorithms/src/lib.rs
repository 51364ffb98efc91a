//! # granulo algorithms
//!
//! Image analysis algorithms for granulometric size spectra.
//!
//! ## Available Algorithm Categories
//!
//! - **morphology**: Area opening (max-tree), ball erosion/dilation/opening,
//!   rolling-ball background removal
//! - **resample**: Rescaling with anti-aliasing
//! - **granulometry**: Diameter sequences, intensity-loss sweep, size spectrum

pub(crate) mod maybe_rayon;

pub mod granulometry;
pub mod morphology;
pub mod resample;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::granulometry::{
        compute_size_spectrum, diameter_sequence, loss_profile, trapezoid, SizeSpectrum,
        SpectrumParams, SweepMode,
    };
    pub use crate::morphology::{
        area_opening, remove_background, rolling_ball_background, AreaOpening,
        AreaOpeningParams, BackgroundParams, MaxTree, RemoveBackground,
    };
    pub use crate::resample::{rescale, RescaleParams};
    pub use granulo_core::prelude::*;
}
