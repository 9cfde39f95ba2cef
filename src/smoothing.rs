//! # Savitzky-Golay smoothing
//!
//! Local least-squares polynomial convolution over a sliding window. Interior
//! samples use the symmetric (centre) coefficients; the first and last
//! `window / 2` samples are evaluated from a polynomial fitted to the first or
//! last full window, so the output has the same length as the input and the
//! filter reproduces any polynomial of degree `<= order` exactly, edges included.
//!
//! Coefficients are computed on sample positions, so the filter assumes
//! approximately uniform sampling (as instrument traces are).

use log::debug;

use crate::error::{ProcessingError, Result};
use crate::numeric::solve_linear_system;
use crate::series::Series;

/// Savitzky-Golay filter with precomputed coefficients
#[derive(Debug, Clone)]
pub struct SavitzkyGolay {
    window: usize,
    order: usize,
    /// `coefficients[p]` evaluates the window's fitted polynomial at window position `p`
    coefficients: Vec<Vec<f64>>,
}

impl SavitzkyGolay {
    /// Create a filter, validating window length and polynomial order
    pub fn new(window: usize, order: usize) -> Result<Self> {
        validate_parameters(window, order)?;
        let coefficients = compute_coefficients(window, order)?;
        Ok(Self {
            window,
            order,
            coefficients,
        })
    }

    /// Window length
    pub fn window(&self) -> usize {
        self.window
    }

    /// Polynomial order
    pub fn order(&self) -> usize {
        self.order
    }

    /// Smooth a raw intensity slice
    pub fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        let n = data.len();
        if self.window > n {
            return Err(ProcessingError::config(format!(
                "smoothing window {} exceeds series length {}",
                self.window, n
            )));
        }

        let half = self.window / 2;
        let centre = &self.coefficients[half];
        let mut out = Vec::with_capacity(n);

        let head = &data[..self.window];
        for p in 0..half {
            out.push(dot(&self.coefficients[p], head));
        }
        for i in half..n - half {
            out.push(dot(centre, &data[i - half..=i + half]));
        }
        let tail = &data[n - self.window..];
        for p in half + 1..self.window {
            out.push(dot(&self.coefficients[p], tail));
        }

        Ok(out)
    }

    /// Smooth the intensities of a series; times are unchanged
    pub fn smooth(&self, series: &Series) -> Result<Series> {
        let smoothed = self.apply(series.intensity())?;
        debug!(
            "Savitzky-Golay smoothing (window {}, order {}) over {} samples",
            self.window,
            self.order,
            series.len()
        );
        series.with_intensity(smoothed)
    }
}

/// Check window/order constraints
pub fn validate_parameters(window: usize, order: usize) -> Result<()> {
    if window < 3 {
        return Err(ProcessingError::config(format!(
            "smoothing window must be at least 3, got {window}"
        )));
    }
    if window % 2 == 0 {
        return Err(ProcessingError::config(format!(
            "smoothing window must be odd, got {window}"
        )));
    }
    if order >= window {
        return Err(ProcessingError::config(format!(
            "smoothing order {order} must be less than window {window}"
        )));
    }
    Ok(())
}

fn dot(coefficients: &[f64], values: &[f64]) -> f64 {
    coefficients.iter().zip(values).map(|(c, v)| c * v).sum()
}

/// Rows of the window's least-squares projection matrix `A (A^T A)^-1 A^T`.
fn compute_coefficients(window: usize, order: usize) -> Result<Vec<Vec<f64>>> {
    let half = (window / 2) as f64;
    let terms = order + 1;
    let positions: Vec<f64> = (0..window).map(|k| (k as f64 - half) / half).collect();

    // Vandermonde rows: vander[k][j] = z_k^j
    let vander: Vec<Vec<f64>> = positions
        .iter()
        .map(|&z| {
            let mut row = Vec::with_capacity(terms);
            let mut p = 1.0;
            for _ in 0..terms {
                row.push(p);
                p *= z;
            }
            row
        })
        .collect();

    let normal: Vec<Vec<f64>> = (0..terms)
        .map(|i| {
            (0..terms)
                .map(|j| vander.iter().map(|row| row[i] * row[j]).sum())
                .collect()
        })
        .collect();

    // pseudo[j][k] = ((A^T A)^-1 A^T)[j][k], one solve per window sample
    let mut pseudo = vec![vec![0.0; window]; terms];
    for (k, row) in vander.iter().enumerate() {
        let column = solve_linear_system(normal.clone(), row.clone())?;
        for (j, value) in column.into_iter().enumerate() {
            pseudo[j][k] = value;
        }
    }

    Ok(vander
        .iter()
        .map(|eval_row| {
            (0..window)
                .map(|k| (0..terms).map(|j| eval_row[j] * pseudo[j][k]).sum())
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_validation() {
        assert!(SavitzkyGolay::new(4, 2).is_err());
        assert!(SavitzkyGolay::new(1, 0).is_err());
        assert!(SavitzkyGolay::new(5, 5).is_err());
        assert!(SavitzkyGolay::new(5, 4).is_ok());
    }

    #[test]
    fn test_known_quadratic_coefficients() {
        // Classic 5-point quadratic smoothing weights: (-3, 12, 17, 12, -3) / 35
        let filter = SavitzkyGolay::new(5, 2).unwrap();
        let expected = [-3.0, 12.0, 17.0, 12.0, -3.0].map(|v| v / 35.0);
        for (c, e) in filter.coefficients[2].iter().zip(expected) {
            assert!((c - e).abs() < 1e-12);
        }
    }

    #[test]
    fn test_constant_preserved_including_edges() {
        let filter = SavitzkyGolay::new(11, 3).unwrap();
        let data = vec![4.25; 40];
        let out = filter.apply(&data).unwrap();
        assert_eq!(out.len(), data.len());
        assert!(out.iter().all(|v| (v - 4.25).abs() < 1e-9));
    }

    #[test]
    fn test_polynomial_reproduced_exactly() {
        let filter = SavitzkyGolay::new(7, 2).unwrap();
        let data: Vec<f64> = (0..30).map(|i| {
            let x = i as f64;
            1.0 + 0.5 * x - 0.02 * x * x
        }).collect();
        let out = filter.apply(&data).unwrap();
        for (a, b) in out.iter().zip(&data) {
            assert!((a - b).abs() < 1e-8);
        }
    }

    #[test]
    fn test_window_longer_than_series() {
        let filter = SavitzkyGolay::new(9, 2).unwrap();
        assert!(matches!(
            filter.apply(&[1.0; 5]),
            Err(ProcessingError::Configuration(_))
        ));
    }

    #[test]
    fn test_smooth_preserves_time() {
        let series = Series::from_pairs((0..25).map(|i| (i as f64 * 0.1, (i % 3) as f64))).unwrap();
        let filter = SavitzkyGolay::new(5, 2).unwrap();
        let smoothed = filter.smooth(&series).unwrap();
        assert_eq!(smoothed.time(), series.time());
        assert_eq!(smoothed.len(), series.len());
    }

    #[test]
    fn test_reduces_noise() {
        let data: Vec<f64> = (0..101).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let filter = SavitzkyGolay::new(9, 2).unwrap();
        let out = filter.apply(&data).unwrap();
        let raw_energy: f64 = data[10..90].iter().map(|v| v * v).sum();
        let smoothed_energy: f64 = out[10..90].iter().map(|v| v * v).sum();
        assert!(smoothed_energy < raw_energy * 0.1);
    }
}
