//! Separable Gaussian smoothing used as an anti-aliasing prefilter

use crate::maybe_rayon::*;
use granulo_core::{Error, Result};
use ndarray::Array2;

/// Smooth a grid with independent row/column sigmas.
///
/// Kernels are truncated at 3σ; near the borders the weights are
/// renormalized over the cells that exist, so a constant grid stays
/// constant. A sigma of zero leaves that axis untouched.
pub(crate) fn gaussian_smooth(
    data: &Array2<f64>,
    sigma_rows: f64,
    sigma_cols: f64,
) -> Result<Array2<f64>> {
    let (rows, cols) = data.dim();
    let mut current = data.clone();

    if sigma_cols > 0.0 {
        let kernel = make_gaussian_kernel(sigma_cols);
        let half = (kernel.len() / 2) as isize;
        let src = &current;
        let smoothed: Vec<f64> = (0..rows)
            .into_par_iter()
            .flat_map(|row| {
                let mut out = vec![0.0; cols];
                for (col, o) in out.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    let mut wsum = 0.0;
                    for (ki, &kw) in kernel.iter().enumerate() {
                        let c = col as isize + ki as isize - half;
                        if c >= 0 && c < cols as isize {
                            sum += kw * src[[row, c as usize]];
                            wsum += kw;
                        }
                    }
                    *o = sum / wsum;
                }
                out
            })
            .collect();
        current = Array2::from_shape_vec((rows, cols), smoothed)
            .map_err(|e| Error::Other(e.to_string()))?;
    }

    if sigma_rows > 0.0 {
        let kernel = make_gaussian_kernel(sigma_rows);
        let half = (kernel.len() / 2) as isize;
        let src = &current;
        let smoothed: Vec<f64> = (0..rows)
            .into_par_iter()
            .flat_map(|row| {
                let mut out = vec![0.0; cols];
                for (col, o) in out.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    let mut wsum = 0.0;
                    for (ki, &kw) in kernel.iter().enumerate() {
                        let r = row as isize + ki as isize - half;
                        if r >= 0 && r < rows as isize {
                            sum += kw * src[[r as usize, col]];
                            wsum += kw;
                        }
                    }
                    *o = sum / wsum;
                }
                out
            })
            .collect();
        current = Array2::from_shape_vec((rows, cols), smoothed)
            .map_err(|e| Error::Other(e.to_string()))?;
    }

    Ok(current)
}

/// Create a 1D Gaussian kernel truncated at 3σ.
fn make_gaussian_kernel(sigma: f64) -> Vec<f64> {
    let half = (3.0 * sigma).ceil() as usize;
    let size = 2 * half + 1;
    let mut kernel = Vec::with_capacity(size);
    let denom = 2.0 * sigma * sigma;

    for i in 0..size {
        let x = i as f64 - half as f64;
        kernel.push((-x * x / denom).exp());
    }

    let sum: f64 = kernel.iter().sum();
    for v in &mut kernel {
        *v /= sum;
    }

    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_kernel() {
        let k = make_gaussian_kernel(1.0);
        assert_eq!(k.len(), 7);
        let sum: f64 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        // Symmetric, peaked at the center
        assert!((k[0] - k[6]).abs() < 1e-15);
        assert!(k[3] > k[2] && k[2] > k[1]);
    }

    #[test]
    fn test_constant_stays_constant() {
        let data = Array2::from_elem((6, 9), 4.0);
        let out = gaussian_smooth(&data, 1.5, 0.7).unwrap();
        for &v in out.iter() {
            assert!((v - 4.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let data = Array2::from_shape_fn((4, 5), |(r, c)| (r * 5 + c) as f64);
        let out = gaussian_smooth(&data, 0.0, 0.0).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn test_spike_spreads() {
        let mut data = Array2::zeros((15, 15));
        data[[7, 7]] = 1.0;
        let out = gaussian_smooth(&data, 1.0, 1.0).unwrap();
        assert!(out[[7, 7]] < 1.0);
        assert!(out[[7, 8]] > 0.0);
        // Mass away from the border is preserved
        let total: f64 = out.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
