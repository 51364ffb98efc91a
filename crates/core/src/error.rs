//! Error types for granulo

use thiserror::Error;

/// Main error type for granulo operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid image dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Index out of bounds: ({row}, {col}) in image of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Buffer size mismatch: expected {expected} samples for ({rows}, {cols}), got {actual}")]
    SizeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite sample at ({row}, {col})")]
    NonFiniteSample { row: usize, col: usize },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Degenerate image: {0}")]
    DegenerateImage(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for granulo operations
pub type Result<T> = std::result::Result<T, Error>;
