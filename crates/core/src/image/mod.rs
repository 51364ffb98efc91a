//! Image data structures and operations

mod element;
mod grid;
mod neighborhood;

pub use element::Sample;
pub use grid::{Image, ImageStatistics};
pub use neighborhood::Connectivity;
