//! Main Image type

use crate::error::{Error, Result};
use crate::image::Sample;
use ndarray::Array2;

/// A single-channel 2D image.
///
/// `Image<T>` stores samples of type `T` in row-major order. Every
/// transform in this workspace takes `&Image` and returns a new image, so
/// inputs are never modified.
///
/// # Example
///
/// ```ignore
/// use granulo_core::Image;
///
/// let mut image: Image<f64> = Image::new(64, 64);
/// image.set(10, 20, 42.0)?;
/// assert_eq!(image.get(10, 20)?, 42.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T: Sample> {
    /// Samples stored as (row, col)
    data: Array2<T>,
}

impl<T: Sample> Image<T> {
    /// Create a new image filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Create a new image filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create an image from a row-major buffer
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::SizeMismatch {
                rows,
                cols,
                expected: rows * cols,
                actual: data.len(),
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    /// Create an image from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self { data }
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of pixels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image has no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    /// Consume the image and return the underlying array
    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    /// Samples in raster order (row by row)
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().copied().collect()
    }

    // Conversion and validation

    /// Convert every sample to `f64`
    pub fn to_f64(&self) -> Image<f64> {
        Image {
            data: self.data.mapv(|v| v.to_f64()),
        }
    }

    /// Fail with [`Error::InvalidDimensions`] if the image has no pixels
    pub fn ensure_not_empty(&self) -> Result<()> {
        if self.is_empty() {
            let (rows, cols) = self.shape();
            return Err(Error::InvalidDimensions { rows, cols });
        }
        Ok(())
    }

    /// Fail with [`Error::NonFiniteSample`] at the first NaN or infinite pixel
    pub fn ensure_finite(&self) -> Result<()> {
        match self
            .data
            .indexed_iter()
            .find(|(_, v)| !v.is_finite_sample())
        {
            Some(((row, col), _)) => Err(Error::NonFiniteSample { row, col }),
            None => Ok(()),
        }
    }

    // Statistics

    /// Sum of all samples as f64
    pub fn sum(&self) -> f64 {
        self.data.iter().map(|&v| v.to_f64()).sum()
    }

    /// Mean of all samples, `None` for an empty image
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.sum() / self.len() as f64)
        }
    }

    /// Calculate basic statistics (min, max, sum, mean)
    pub fn statistics(&self) -> ImageStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum: f64 = 0.0;

        for &value in self.data.iter() {
            if min.map_or(true, |m| value < m) {
                min = Some(value);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
            }
            sum += value.to_f64();
        }

        let count = self.len();
        let mean = if count > 0 {
            Some(sum / count as f64)
        } else {
            None
        };

        ImageStatistics {
            min,
            max,
            sum,
            mean,
            count,
        }
    }
}

/// Basic statistics for an image
#[derive(Debug, Clone)]
pub struct ImageStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub sum: f64,
    pub mean: Option<f64>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_creation() {
        let image: Image<f32> = Image::new(100, 200);
        assert_eq!(image.rows(), 100);
        assert_eq!(image.cols(), 200);
        assert_eq!(image.shape(), (100, 200));
    }

    #[test]
    fn test_image_access() {
        let mut image: Image<f32> = Image::new(10, 10);
        image.set(5, 5, 42.0).unwrap();
        assert_eq!(image.get(5, 5).unwrap(), 42.0);
        assert!(image.get(10, 0).is_err());
        assert!(image.set(0, 10, 1.0).is_err());
    }

    #[test]
    fn test_from_vec_size_mismatch() {
        let err = Image::from_vec(vec![1.0f64; 5], 2, 3).unwrap_err();
        assert!(matches!(err, Error::SizeMismatch { expected: 6, actual: 5, .. }));
    }

    #[test]
    fn test_image_statistics() {
        let mut image: Image<u16> = Image::new(10, 10);
        for i in 0..10 {
            for j in 0..10 {
                image.set(i, j, (i * 10 + j) as u16).unwrap();
            }
        }

        let stats = image.statistics();
        assert_eq!(stats.min, Some(0));
        assert_eq!(stats.max, Some(99));
        assert_eq!(stats.count, 100);
        assert!((stats.sum - 4950.0).abs() < 1e-12);
        assert!((stats.mean.unwrap() - 49.5).abs() < 1e-12);
    }

    #[test]
    fn test_to_f64_preserves_values() {
        let image = Image::from_vec(vec![0u8, 128, 255, 7], 2, 2).unwrap();
        let converted = image.to_f64();
        assert_eq!(converted.to_vec(), vec![0.0, 128.0, 255.0, 7.0]);
    }

    #[test]
    fn test_from_array_widens_any_sample_type() {
        let strided = Array2::from_shape_vec((3, 2), vec![1u16, 2, 3, 4, 60000, 6]).unwrap();
        // Column-major copy: same logical values, different memory order
        let transposed = strided.t().to_owned();
        let image = Image::from_array(transposed.t().to_owned()).to_f64();
        assert_eq!(image.shape(), (3, 2));
        assert_eq!(image.to_vec(), vec![1.0, 2.0, 3.0, 4.0, 60000.0, 6.0]);

        let floats = Image::from_array(Array2::from_elem((2, 2), 0.25f32)).to_f64();
        assert!(floats.to_vec().iter().all(|&v| v == 0.25));
    }

    #[test]
    fn test_ensure_not_empty() {
        let image: Image<f64> = Image::new(0, 5);
        assert!(matches!(
            image.ensure_not_empty(),
            Err(Error::InvalidDimensions { rows: 0, cols: 5 })
        ));
        assert!(image.mean().is_none());
    }

    #[test]
    fn test_ensure_finite() {
        let mut image: Image<f64> = Image::filled(3, 3, 1.0);
        assert!(image.ensure_finite().is_ok());
        image.set(2, 1, f64::NAN).unwrap();
        assert!(matches!(
            image.ensure_finite(),
            Err(Error::NonFiniteSample { row: 2, col: 1 })
        ));
    }
}
