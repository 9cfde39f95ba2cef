//! # Baseline estimation and correction
//!
//! Fits one global polynomial of fixed degree to the background samples (the
//! trace with a symmetric window excised around each provisional peak center)
//! and subtracts it from every sample. A single global polynomial cannot follow
//! regionally varying baselines; it is used because it does not overfit short
//! traces.

use log::{debug, warn};

use crate::error::{ProcessingError, Result};
use crate::numeric::{fit_polynomial, resolution, Polynomial};
use crate::series::Series;

/// Mark background samples: `true` unless within `half_width` samples of a center.
pub fn background_mask(len: usize, centers: &[usize], half_width: usize) -> Vec<bool> {
    let mut mask = vec![true; len];
    for &center in centers {
        if center >= len {
            continue;
        }
        let start = center.saturating_sub(half_width);
        let end = (center + half_width).min(len - 1);
        mask[start..=end].iter_mut().for_each(|m| *m = false);
    }
    mask
}

/// Outcome of a baseline correction
#[derive(Debug, Clone)]
pub struct BaselineCorrection {
    /// Baseline-corrected series (same times and length as the input)
    pub series: Series,
    /// Fitted baseline polynomial
    pub baseline: Polynomial,
    /// Number of background samples used for the fit
    pub background_points: usize,
    /// Constant added after subtraction when shifting to non-negative values
    pub shift: f64,
}

/// Polynomial baseline estimator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaselineEstimator {
    /// Polynomial degree
    pub degree: usize,
    /// Samples excised on each side of a provisional center
    pub half_width: usize,
    /// Shift the corrected trace so its minimum is zero
    pub shift_to_zero: bool,
}

impl Default for BaselineEstimator {
    fn default() -> Self {
        Self {
            degree: 3,
            half_width: 50,
            shift_to_zero: false,
        }
    }
}

impl BaselineEstimator {
    /// Create an estimator without the non-negative shift
    pub fn new(degree: usize, half_width: usize) -> Self {
        Self {
            degree,
            half_width,
            shift_to_zero: false,
        }
    }

    /// Enable or disable shifting the corrected trace to a zero minimum
    pub fn with_shift(mut self, shift_to_zero: bool) -> Self {
        self.shift_to_zero = shift_to_zero;
        self
    }

    /// Fit the baseline polynomial to the background of `series`
    pub fn estimate(&self, series: &Series, provisional_centers: &[usize]) -> Result<(Polynomial, usize)> {
        if provisional_centers.is_empty() {
            warn!("No provisional peak centers; fitting baseline to the whole trace");
        }

        let mask = background_mask(series.len(), provisional_centers, self.half_width);
        let (x, y): (Vec<f64>, Vec<f64>) = series
            .samples()
            .zip(&mask)
            .filter_map(|(sample, &keep)| keep.then_some(sample))
            .unzip();

        let required = self.degree + 1;
        if x.len() < required {
            return Err(ProcessingError::insufficient("baseline fit", required, x.len()));
        }

        let baseline = fit_polynomial(&x, &y, self.degree)?;
        debug!(
            "Baseline degree {} fitted to {} of {} samples ({} excised windows)",
            self.degree,
            x.len(),
            series.len(),
            provisional_centers.len()
        );
        Ok((baseline, x.len()))
    }

    /// Estimate the baseline and subtract it from every sample
    pub fn correct(&self, series: &Series, provisional_centers: &[usize]) -> Result<BaselineCorrection> {
        let (baseline, background_points) = self.estimate(series, provisional_centers)?;

        let mut corrected: Vec<f64> = series
            .samples()
            .map(|(t, y)| y - baseline.evaluate(t))
            .collect();

        // Fit round-off would otherwise leave sub-resolution ripple on flat traces
        let floor = resolution(series.intensity());
        corrected
            .iter_mut()
            .filter(|v| v.abs() <= floor)
            .for_each(|v| *v = 0.0);

        let mut shift = 0.0;
        if self.shift_to_zero {
            if let Some(min) = corrected.iter().copied().reduce(f64::min) {
                shift = -min;
                corrected.iter_mut().for_each(|v| *v += shift);
            }
        }

        Ok(BaselineCorrection {
            series: series.with_intensity(corrected)?,
            baseline,
            background_points,
            shift,
        })
    }
}
