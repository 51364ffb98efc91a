//! Granulometry: intensity-weighted size distributions
//!
//! - **Diameter sequence**: probe sizes and their disk-equivalent areas
//! - **Size spectrum**: background correction, area-opening sweep and
//!   normalization into a distribution over structure diameter
//! - **Trapezoid**: numeric integration used for the normalization

mod diameters;
mod integrate;
mod spectrum;

pub use diameters::{circle_area, diameter_sequence};
pub use integrate::trapezoid;
pub use spectrum::{
    compute_size_spectrum, intensity_loss, loss_profile, LossProfile, SizeSpectrum,
    SizeSpectrumAlgorithm, SpectrumParams, SweepMode,
};
