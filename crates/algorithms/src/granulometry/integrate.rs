//! Trapezoidal integration over a sampled curve

use granulo_core::{Error, Result};

/// Definite integral of `y` over the abscissae `x` by the trapezoidal rule
///
/// Returns 0 for fewer than two samples.
pub fn trapezoid(y: &[f64], x: &[f64]) -> Result<f64> {
    if y.len() != x.len() {
        return Err(Error::invalid_parameter(
            "x",
            format!("{} samples", x.len()),
            format!("expected {} samples to match y", y.len()),
        ));
    }

    Ok(x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_exact() {
        let x = [0.0, 1.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        // ∫0..4 (2x + 1) dx = 20
        assert!((trapezoid(&y, &x).unwrap() - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_triangle() {
        let x = [1.0, 5.0, 10.0, 15.0];
        let y = [0.0, 0.0, 100.0, 0.0];
        assert!((trapezoid(&y, &x).unwrap() - 500.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_and_mismatched() {
        assert_eq!(trapezoid(&[3.0], &[1.0]).unwrap(), 0.0);
        assert_eq!(trapezoid(&[], &[]).unwrap(), 0.0);
        assert!(trapezoid(&[1.0, 2.0], &[1.0]).is_err());
    }
}
