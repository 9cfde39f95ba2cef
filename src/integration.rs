//! Peak area and height over an inclusive index range.
//!
//! Both rules work on the actual `(time, intensity)` pairs, so non-uniform
//! sampling is respected.

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};
use crate::series::Series;

/// Numerical integration rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationMethod {
    /// Composite Simpson's rule for irregular spacing; an odd interval count
    /// integrates the last interval with the trapezoid rule
    #[default]
    Simpson,
    /// Composite trapezoidal rule
    Trapezoid,
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationMethod::Simpson => write!(f, "simpson"),
            IntegrationMethod::Trapezoid => write!(f, "trapezoid"),
        }
    }
}

/// Area and height of one bounded peak
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integral {
    /// Area under the curve between the borders
    pub area: f64,
    /// Maximum intensity between the borders
    pub height: f64,
}

/// Integrates bounded regions of a series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeakIntegrator {
    /// Rule used for the area
    pub method: IntegrationMethod,
}

impl PeakIntegrator {
    /// Create an integrator using `method`
    pub fn new(method: IntegrationMethod) -> Self {
        Self { method }
    }

    /// Integrate the inclusive index range `[left, right]`
    pub fn integrate(&self, series: &Series, left: usize, right: usize) -> Result<Integral> {
        if right >= series.len() || left > right {
            return Err(ProcessingError::config(format!(
                "integration range [{left}, {right}] is outside a {}-sample series",
                series.len()
            )));
        }

        let x = &series.time()[left..=right];
        let y = &series.intensity()[left..=right];
        if x.len() < 2 {
            return Err(ProcessingError::insufficient("peak integration", 2, x.len()));
        }

        let area = match self.method {
            IntegrationMethod::Simpson => simpson(x, y),
            IntegrationMethod::Trapezoid => trapezoid(x, y),
        };
        let height = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Integral { area, height })
    }
}

/// Composite trapezoidal rule over `(x, y)` pairs
pub fn trapezoid(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| 0.5 * (xs[1] - xs[0]) * (ys[0] + ys[1]))
        .sum()
}

/// Composite Simpson's rule for irregularly spaced `x`.
///
/// Pairs of intervals are integrated with the parabola through their three
/// points; a leftover final interval uses the trapezoid rule.
pub fn simpson(x: &[f64], y: &[f64]) -> f64 {
    let intervals = x.len().saturating_sub(1);
    let paired = intervals - intervals % 2;

    let mut area = 0.0;
    for i in (0..paired).step_by(2) {
        let h0 = x[i + 1] - x[i];
        let h1 = x[i + 2] - x[i + 1];
        let span = h0 + h1;
        area += span / 6.0
            * ((2.0 - h1 / h0) * y[i]
                + span * span / (h0 * h1) * y[i + 1]
                + (2.0 - h0 / h1) * y[i + 2]);
    }
    if paired < intervals {
        area += trapezoid(&x[paired..], &y[paired..]);
    }
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(x: Vec<f64>, y: Vec<f64>) -> Series {
        Series::from_columns(x, y).unwrap()
    }

    #[test]
    fn test_trapezoid_rectangular_pulse() {
        // Unit pulse of width 2.0 sampled every 0.1
        let x: Vec<f64> = (0..=40).map(|i| i as f64 * 0.1).collect();
        let y: Vec<f64> = x.iter().map(|&t| if (1.0..=3.0).contains(&t) { 1.0 } else { 0.0 }).collect();
        let s = series(x, y);
        let integral = PeakIntegrator::new(IntegrationMethod::Trapezoid)
            .integrate(&s, 0, 40)
            .unwrap();
        assert!((integral.area - 2.0).abs() < 0.11);
        assert_eq!(integral.height, 1.0);
    }

    #[test]
    fn test_simpson_exact_for_quadratic_on_irregular_grid() {
        let x = vec![0.0, 0.3, 1.0, 1.2, 2.0];
        let y: Vec<f64> = x.iter().map(|t| t * t).collect();
        // Parabolas are exact per pair of intervals
        assert!((simpson(&x, &y) - 8.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_simpson_odd_intervals_falls_back_on_last() {
        let x = vec![0.0, 1.0, 2.0, 3.0];
        let y = vec![0.0, 1.0, 4.0, 9.0];
        let expected = 8.0 / 3.0 + 0.5 * (4.0 + 9.0);
        assert!((simpson(&x, &y) - expected).abs() < 1e-12);
        // Single interval is a plain trapezoid
        assert_eq!(simpson(&[0.0, 2.0], &[1.0, 3.0]), 4.0);
    }

    #[test]
    fn test_methods_converge_with_density() {
        let gap = |n: usize| {
            let x: Vec<f64> = (0..=n).map(|i| i as f64 * std::f64::consts::PI / n as f64).collect();
            let y: Vec<f64> = x.iter().map(|t| t.sin()).collect();
            (simpson(&x, &y) - trapezoid(&x, &y)).abs()
        };
        assert!(gap(200) < gap(20));
        assert!(gap(200) < 1e-4);
    }

    #[test]
    fn test_sub_range_and_height() {
        let s = series(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 2.0, 5.0, 2.0, 0.0]);
        let integral = PeakIntegrator::default().integrate(&s, 1, 3).unwrap();
        assert_eq!(integral.height, 5.0);
        // Parabola through (1,2), (2,5), (3,2)
        assert!((integral.area - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_too_few_points() {
        let s = series(vec![0.0, 1.0, 2.0], vec![1.0, 2.0, 1.0]);
        assert!(matches!(
            PeakIntegrator::default().integrate(&s, 1, 1),
            Err(ProcessingError::InsufficientData { .. })
        ));
        assert!(PeakIntegrator::default().integrate(&s, 1, 3).is_err());
    }
}
