//! Small dense linear algebra shared by the smoother and the baseline fit.
//!
//! Systems here are tiny (polynomial degree + 1 unknowns), so normal equations
//! solved by Gaussian elimination with partial pivoting are sufficient as long
//! as the abscissa is centred and scaled to `[-1, 1]` first.

// Indexed loops read closer to the textbook elimination than iterator chains
#![allow(clippy::needless_range_loop)]

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// Relative pivot size below which a system is treated as singular
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Intensity differences below this fraction of a trace's full scale are
/// numerical noise (least-squares round-off), not signal.
pub const RELATIVE_RESOLUTION: f64 = 1e-9;

/// Absolute resolution of `data`: [`RELATIVE_RESOLUTION`] times its largest magnitude
pub fn resolution(data: &[f64]) -> f64 {
    RELATIVE_RESOLUTION * data.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

/// Solve `a * x = b` in place by Gaussian elimination with partial pivoting.
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(ProcessingError::Numerical(format!(
            "linear system is not square ({} rows, {} unknowns)",
            a.len(),
            n
        )));
    }

    let scale = a
        .iter()
        .flat_map(|row| row.iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return Err(ProcessingError::Numerical("linear system matrix is zero".into()));
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot_row][col].abs() <= SINGULAR_TOLERANCE * scale {
            return Err(ProcessingError::Numerical(format!(
                "singular system (pivot {:e} in column {col})",
                a[pivot_row][col]
            )));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

/// Polynomial in a centred and scaled variable `u = (x - center) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    /// Coefficients in ascending power order, applied to `u`
    pub coefficients: Vec<f64>,
    /// Centre of the fitted abscissa range
    pub center: f64,
    /// Half-width of the fitted abscissa range
    pub scale: f64,
}

impl Polynomial {
    /// Polynomial degree
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluate at `x` (Horner)
    pub fn evaluate(&self, x: f64) -> f64 {
        let u = (x - self.center) / self.scale;
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * u + c)
    }
}

/// Least-squares polynomial fit of fixed `degree` to `(x, y)`.
///
/// `x` must hold at least `degree + 1` distinct values.
pub fn fit_polynomial(x: &[f64], y: &[f64], degree: usize) -> Result<Polynomial> {
    let terms = degree + 1;
    if x.len() != y.len() {
        return Err(ProcessingError::Numerical(format!(
            "fit abscissa has {} values, ordinate has {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < terms {
        return Err(ProcessingError::insufficient("polynomial fit", terms, x.len()));
    }

    let (lo, hi) = x
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let center = 0.5 * (lo + hi);
    let scale = if hi > lo { 0.5 * (hi - lo) } else { 1.0 };

    // Accumulate the normal equations: moments of u and u^k * y
    let mut moments = vec![0.0; 2 * degree + 1];
    let mut rhs = vec![0.0; terms];
    for (&xi, &yi) in x.iter().zip(y) {
        let u = (xi - center) / scale;
        let mut p = 1.0;
        for k in 0..moments.len() {
            moments[k] += p;
            if k < terms {
                rhs[k] += p * yi;
            }
            p *= u;
        }
    }
    let normal: Vec<Vec<f64>> = (0..terms)
        .map(|i| (0..terms).map(|j| moments[i + j]).collect())
        .collect();

    let coefficients = solve_linear_system(normal, rhs)?;
    Ok(Polynomial {
        coefficients,
        center,
        scale,
    })
}
