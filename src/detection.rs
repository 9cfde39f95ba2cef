//! # Peak center detection
//!
//! All strategies share the same skeleton:
//!
//! 1. enumerate local maxima (strict rise then strict fall, plateaus collapse to
//!    their midpoint);
//! 2. apply the strategy filter ([`DetectionStrategy`]);
//! 3. apply the shared minimum-width constraint (width at half prominence);
//! 4. apply the shared minimum-distance constraint, greedily keeping the higher
//!    candidate.
//!
//! The result is ordered by index. An empty result is valid.

use std::cmp::Ordering;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::ProcessingConfig;
use crate::numeric::resolution;
use crate::series::Series;

/// Detection strategy selector, as named in configuration files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMethod {
    /// First-derivative sign change with local-minimum prominence
    #[default]
    Gradient,
    /// Full width at half maximum within an accepted range
    Fwhm,
    /// Topographic prominence threshold
    Prominence,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DetectionMethod::Gradient => "gradient",
            DetectionMethod::Fwhm => "fwhm",
            DetectionMethod::Prominence => "prominence",
        };
        f.write_str(name)
    }
}

/// Detection strategy with its own parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DetectionStrategy {
    /// Keep maxima where the derivative turns from positive to negative and the
    /// apex rises at least `min_prominence` above the nearest local minimum on
    /// each side.
    Gradient {
        /// Minimum height above the higher of the two neighbouring minima
        min_prominence: f64,
    },
    /// Keep maxima whose full width at half maximum (in samples) lies in
    /// `[min_width, max_width]`.
    Fwhm {
        /// Smallest accepted FWHM
        min_width: f64,
        /// Largest accepted FWHM, unbounded when `None`
        max_width: Option<f64>,
    },
    /// Keep maxima whose topographic prominence is at least `min_prominence`.
    Prominence {
        /// Minimum prominence
        min_prominence: f64,
    },
}

impl DetectionStrategy {
    /// Build the strategy selected by `config.peak_detection_method`
    pub fn from_config(config: &ProcessingConfig) -> Self {
        match config.peak_detection_method {
            DetectionMethod::Gradient => DetectionStrategy::Gradient {
                min_prominence: config.peak_prominence,
            },
            DetectionMethod::Fwhm => DetectionStrategy::Fwhm {
                min_width: config.min_peak_width,
                max_width: config.max_peak_width,
            },
            DetectionMethod::Prominence => DetectionStrategy::Prominence {
                min_prominence: config.peak_prominence,
            },
        }
    }

    /// Selector for this strategy
    pub fn method(&self) -> DetectionMethod {
        match self {
            DetectionStrategy::Gradient { .. } => DetectionMethod::Gradient,
            DetectionStrategy::Fwhm { .. } => DetectionMethod::Fwhm,
            DetectionStrategy::Prominence { .. } => DetectionMethod::Prominence,
        }
    }
}

/// A local maximum that survived detection, with its shape measures
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCandidate {
    /// Apex index
    pub index: usize,
    /// Apex intensity
    pub height: f64,
    /// Topographic prominence
    pub prominence: f64,
    /// Width at half prominence, in samples
    pub width: f64,
    /// Full width at half maximum in samples; `None` when the apex is not positive
    pub fwhm: Option<f64>,
}

/// Local-maximum peak detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDetector {
    /// Strategy-specific filter
    pub strategy: DetectionStrategy,
    /// Minimum distance between kept centers, in samples
    pub min_distance: usize,
    /// Minimum width at half prominence, in samples
    pub min_width: f64,
}

impl PeakDetector {
    /// Create a detector
    pub fn new(strategy: DetectionStrategy, min_distance: usize, min_width: f64) -> Self {
        Self {
            strategy,
            min_distance,
            min_width,
        }
    }

    /// Create the detector described by a processing configuration
    pub fn from_config(config: &ProcessingConfig) -> Self {
        Self::new(
            DetectionStrategy::from_config(config),
            config.min_peak_distance,
            config.min_peak_width,
        )
    }

    /// Detect peak centers in a series, ordered by index
    pub fn detect(&self, series: &Series) -> Vec<PeakCandidate> {
        self.detect_in(series.intensity())
    }

    /// Detect peak centers in a raw intensity slice
    pub fn detect_in(&self, data: &[f64]) -> Vec<PeakCandidate> {
        let tolerance = resolution(data);
        let maxima = local_maxima(data);
        let enumerated = maxima.len();
        let diffs = match self.strategy {
            DetectionStrategy::Gradient { .. } => differences(data),
            _ => Vec::new(),
        };

        let mut candidates: Vec<PeakCandidate> = maxima
            .into_iter()
            .filter(|&i| self.accepts(data, &diffs, i, tolerance))
            .map(|i| measure(data, i))
            .filter(|c| c.width >= self.min_width)
            .collect();
        let after_filters = candidates.len();

        candidates = filter_by_distance(candidates, self.min_distance);
        debug!(
            "{} detection: {} local maxima, {} pass filters, {} kept after distance {}",
            self.strategy.method(),
            enumerated,
            after_filters,
            candidates.len(),
            self.min_distance
        );
        candidates
    }

    /// Detected center indices only
    pub fn detect_centers(&self, series: &Series) -> Vec<usize> {
        self.detect(series).into_iter().map(|c| c.index).collect()
    }

    fn accepts(&self, data: &[f64], diffs: &[f64], peak: usize, tolerance: f64) -> bool {
        match self.strategy {
            DetectionStrategy::Gradient { min_prominence } => {
                gradient_turns_negative(diffs, peak, tolerance)
                    && valley_prominence(data, peak, tolerance) >= min_prominence
            }
            DetectionStrategy::Fwhm {
                min_width,
                max_width,
            } => match full_width_half_max(data, peak) {
                Some(fwhm) => fwhm >= min_width && max_width.map_or(true, |max| fwhm <= max),
                None => false,
            },
            DetectionStrategy::Prominence { min_prominence } => {
                prominence(data, peak).0 >= min_prominence
            }
        }
    }
}

/// Indices of local maxima.
///
/// A maximum needs a strict rise on its left and a strict fall on its right;
/// differences within [`resolution`] count as equal. Flat tops collapse to the
/// middle sample (left-middle for even plateaus). Endpoints are never maxima.
pub fn local_maxima(data: &[f64]) -> Vec<usize> {
    let n = data.len();
    let mut peaks = Vec::new();
    if n < 3 {
        return peaks;
    }
    let tolerance = resolution(data);

    let mut i = 1;
    while i < n - 1 {
        if data[i] - data[i - 1] > tolerance {
            let mut ahead = i + 1;
            while ahead < n - 1 && (data[ahead] - data[i]).abs() <= tolerance {
                ahead += 1;
            }
            if data[i] - data[ahead] > tolerance {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// First differences `data[i + 1] - data[i]`, one shorter than `data`
pub fn differences(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

/// Whether the trace rises into `peak` and falls out of it, judged on the
/// one-sided differences next to the apex and skipping flat stretches.
fn gradient_turns_negative(diffs: &[f64], peak: usize, tolerance: f64) -> bool {
    let before = diffs[..peak].iter().rev().find(|d| d.abs() > tolerance);
    let after = diffs[peak..].iter().find(|d| d.abs() > tolerance);
    matches!((before, after), (Some(&b), Some(&a)) if b > 0.0 && a < 0.0)
}

/// Index reached walking left from `from` while the trace keeps descending
/// (or stays flat), stopping where it starts rising again, at index 0, or after
/// `max_steps` samples.
pub fn descend_left(data: &[f64], from: usize, max_steps: usize, tolerance: f64) -> usize {
    let mut i = from;
    while i > 0 && from - i < max_steps && data[i - 1] <= data[i] + tolerance {
        i -= 1;
    }
    i
}

/// Mirror of [`descend_left`]
pub fn descend_right(data: &[f64], from: usize, max_steps: usize, tolerance: f64) -> usize {
    let last = data.len().saturating_sub(1);
    let mut i = from;
    while i < last && i - from < max_steps && data[i + 1] <= data[i] + tolerance {
        i += 1;
    }
    i
}

/// Apex height above the higher of the nearest local minimum on each side.
/// Series ends count as minima.
pub fn valley_prominence(data: &[f64], peak: usize, tolerance: f64) -> f64 {
    let left = descend_left(data, peak, usize::MAX, tolerance);
    let right = descend_right(data, peak, usize::MAX, tolerance);
    data[peak] - data[left].max(data[right])
}

/// Topographic prominence and its bases.
///
/// Searches each side until terrain strictly higher than the apex (or the
/// series end) and takes the lowest sample on the way as that side's base.
/// Returns `(prominence, left_base, right_base)`.
pub fn prominence(data: &[f64], peak: usize) -> (f64, usize, usize) {
    let apex = data[peak];

    let mut left_base = peak;
    for i in (0..peak).rev() {
        if data[i] > apex {
            break;
        }
        if data[i] < data[left_base] {
            left_base = i;
        }
    }

    let mut right_base = peak;
    for i in peak + 1..data.len() {
        if data[i] > apex {
            break;
        }
        if data[i] < data[right_base] {
            right_base = i;
        }
    }

    let base = data[left_base].max(data[right_base]);
    (apex - base, left_base, right_base)
}

/// Width (in samples, linearly interpolated) of the peak at `reference` height,
/// searching no further than `[lower, upper]`.
pub fn width_at(data: &[f64], peak: usize, reference: f64, lower: usize, upper: usize) -> f64 {
    let mut i = peak;
    while i > lower && data[i] > reference {
        i -= 1;
    }
    let left = if data[i] < reference && i < peak {
        i as f64 + (reference - data[i]) / (data[i + 1] - data[i])
    } else {
        i as f64
    };

    let mut j = peak;
    while j < upper && data[j] > reference {
        j += 1;
    }
    let right = if data[j] < reference && j > peak {
        j as f64 - (reference - data[j]) / (data[j - 1] - data[j])
    } else {
        j as f64
    };

    right - left
}

/// Full width at half maximum relative to zero intensity.
///
/// `None` when the apex is not positive (no half-maximum level exists).
pub fn full_width_half_max(data: &[f64], peak: usize) -> Option<f64> {
    let apex = data[peak];
    if apex <= 0.0 {
        return None;
    }
    Some(width_at(data, peak, apex / 2.0, 0, data.len() - 1))
}

fn measure(data: &[f64], peak: usize) -> PeakCandidate {
    let (prom, left_base, right_base) = prominence(data, peak);
    let width = width_at(data, peak, data[peak] - prom / 2.0, left_base, right_base);
    PeakCandidate {
        index: peak,
        height: data[peak],
        prominence: prom,
        width,
        fwhm: full_width_half_max(data, peak),
    }
}

/// Greedy minimum-distance filter: the higher candidate wins, ties go to the
/// lower index. Output is ordered by index.
pub fn filter_by_distance(candidates: Vec<PeakCandidate>, min_distance: usize) -> Vec<PeakCandidate> {
    if min_distance <= 1 || candidates.len() < 2 {
        return candidates;
    }

    let mut by_height = candidates;
    by_height.sort_by(|a, b| {
        b.height
            .partial_cmp(&a.height)
            .unwrap_or(Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });

    let mut kept: Vec<PeakCandidate> = Vec::with_capacity(by_height.len());
    for candidate in by_height {
        if kept
            .iter()
            .all(|k| k.index.abs_diff(candidate.index) >= min_distance)
        {
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|c| c.index);
    kept
}
