//! Ball-shaped structuring element for grey-level morphology
//!
//! The rolling ball is a non-flat element: each footprint cell carries a
//! height offset, so erosion and dilation add/subtract the ball profile
//! instead of taking a plain min/max.

use granulo_core::{Error, Result};

/// Non-flat ball structuring element of a given radius (in pixels)
#[derive(Debug, Clone, PartialEq)]
pub struct BallElement {
    radius: f64,
    offsets: Vec<(isize, isize)>,
    /// `radius - sqrt(radius² - dr² - dc²)` per offset (0 at the center)
    depth: Vec<f64>,
}

impl BallElement {
    /// Build a ball of the given radius
    ///
    /// The footprint contains every cell with `dr² + dc² <= radius²`.
    pub fn new(radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(Error::invalid_parameter(
                "radius",
                radius,
                "ball radius must be finite and positive",
            ));
        }

        let half = radius.ceil() as isize;
        let r2 = radius * radius;
        let mut offsets = Vec::new();
        let mut depth = Vec::new();

        for dr in -half..=half {
            for dc in -half..=half {
                let d2 = (dr * dr + dc * dc) as f64;
                if d2 > r2 {
                    continue;
                }
                offsets.push((dr, dc));
                depth.push(if d2 == 0.0 { 0.0 } else { radius - (r2 - d2).sqrt() });
            }
        }

        Ok(Self {
            radius,
            offsets,
            depth,
        })
    }

    /// Ball radius in pixels
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Half-width of the footprint's bounding square
    pub fn half_width(&self) -> usize {
        self.radius.ceil() as usize
    }

    /// Number of footprint cells
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Whether the footprint is empty (never true for a valid ball)
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Iterate `((dr, dc), depth)` over the footprint
    pub fn cells(&self) -> impl Iterator<Item = ((isize, isize), f64)> + '_ {
        self.offsets.iter().copied().zip(self.depth.iter().copied())
    }
}
