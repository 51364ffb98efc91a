//! # granulo core
//!
//! Core types and traits shared by the granulo crates.
//!
//! This crate provides:
//! - `Image<T>`: single-channel 2D image grid
//! - `Sample`: the pixel value trait (integers and floats)
//! - `Connectivity`: 4/8 pixel adjacency for component operations
//! - `Error`/`Result`: the error taxonomy used across the workspace
//! - Algorithm trait for a consistent API

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::{Connectivity, Image, Sample};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{Connectivity, Image, ImageStatistics, Sample};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in granulo.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
