//! # Peak boundary resolution
//!
//! By default each center's borders are found by walking outward while the
//! trace keeps falling, stopping at the first local minimum or after
//! `max_excursion` samples. Two alternative [`BorderMode`]s place the borders
//! at the half-maximum crossings or at the prominence bases instead.
//! Neighbouring peaks whose ranges overlap are then split at the valley
//! between their centers, so bounded peaks never share a sample.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::detection::{descend_left, descend_right, prominence};
use crate::error::{ProcessingError, Result};
use crate::numeric::resolution;

/// Smallest center spacing that still leaves room for a non-overlapping split
pub const MIN_CENTER_SPACING: usize = 3;

/// How raw borders are placed around a center, before overlap splitting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderMode {
    /// Walk downhill to the nearest local minimum on each side
    #[default]
    Descent,
    /// First sample at or below half the apex height on each side
    HalfMaximum,
    /// Lowest sample before higher terrain on each side (prominence bases)
    ProminenceBases,
}

impl std::fmt::Display for BorderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BorderMode::Descent => "descent",
            BorderMode::HalfMaximum => "half_maximum",
            BorderMode::ProminenceBases => "prominence_bases",
        };
        f.write_str(name)
    }
}

/// Places inclusive `(left, right)` borders around peak centers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakBoundaryResolver {
    /// Maximum distance of a border from its center, in samples
    pub max_excursion: usize,
    /// Raw border placement
    pub mode: BorderMode,
}

impl Default for PeakBoundaryResolver {
    fn default() -> Self {
        Self {
            max_excursion: 200,
            mode: BorderMode::Descent,
        }
    }
}

impl PeakBoundaryResolver {
    /// Create a descent resolver
    pub fn new(max_excursion: usize) -> Self {
        Self {
            max_excursion,
            mode: BorderMode::Descent,
        }
    }

    /// Select the raw border placement
    pub fn with_mode(mut self, mode: BorderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Resolve borders for `centers`, which must be strictly increasing interior
    /// indices at least [`MIN_CENTER_SPACING`] apart.
    ///
    /// Every returned pair satisfies `left < center < right`, and consecutive
    /// pairs satisfy `right_i < left_{i+1}`.
    pub fn resolve(&self, data: &[f64], centers: &[usize]) -> Result<Vec<(usize, usize)>> {
        let n = data.len();
        if self.max_excursion == 0 {
            return Err(ProcessingError::config("max_boundary_excursion must be at least 1"));
        }
        for &c in centers {
            if c == 0 || c + 1 >= n {
                return Err(ProcessingError::config(format!(
                    "peak center {c} is not an interior index of a {n}-sample series"
                )));
            }
        }
        for pair in centers.windows(2) {
            if pair[1] < pair[0] + MIN_CENTER_SPACING {
                return Err(ProcessingError::config(format!(
                    "peak centers {} and {} are closer than {} samples",
                    pair[0], pair[1], MIN_CENTER_SPACING
                )));
            }
        }

        let tolerance = resolution(data);
        let mut borders: Vec<(usize, usize)> = centers
            .iter()
            .map(|&c| {
                let (left, right) = self.raw_borders(data, c, tolerance);
                let left = left.max(c.saturating_sub(self.max_excursion)).min(c - 1);
                let right = right.min(c.saturating_add(self.max_excursion)).max(c + 1);
                (left, right)
            })
            .collect();

        for k in 1..borders.len() {
            let (prev_center, next_center) = (centers[k - 1], centers[k]);
            if borders[k - 1].1 < borders[k].0 {
                continue;
            }

            let valley = valley_between(data, prev_center, next_center, tolerance);
            let (mut prev_right, mut next_left) = (valley, valley + 1);
            if next_left >= next_center {
                prev_right = valley - 1;
                next_left = valley;
            }
            debug!(
                "Split overlapping peaks {} and {} at valley {} ({} | {})",
                prev_center, next_center, valley, prev_right, next_left
            );
            borders[k - 1].1 = prev_right;
            borders[k].0 = next_left;
        }

        Ok(borders)
    }

    fn raw_borders(&self, data: &[f64], center: usize, tolerance: f64) -> (usize, usize) {
        match self.mode {
            BorderMode::Descent => (
                descend_left(data, center, self.max_excursion, tolerance),
                descend_right(data, center, self.max_excursion, tolerance),
            ),
            BorderMode::HalfMaximum => half_maximum_crossings(data, center),
            BorderMode::ProminenceBases => {
                let (_, left, right) = prominence(data, center);
                (left, right)
            }
        }
    }
}

/// Nearest samples at or below half the apex height on each side of `peak`,
/// or the series ends when the trace never drops that far.
pub fn half_maximum_crossings(data: &[f64], peak: usize) -> (usize, usize) {
    let half = data[peak] / 2.0;
    let mut left = peak;
    while left > 0 && data[left] > half {
        left -= 1;
    }
    let mut right = peak;
    while right + 1 < data.len() && data[right] > half {
        right += 1;
    }
    (left, right)
}

/// Lowest sample strictly between centers `a < b`.
///
/// Ties (within `tolerance`) go to the index nearest the midpoint, lower index
/// first, so a flat region between the centers splits at its middle.
pub fn valley_between(data: &[f64], a: usize, b: usize, tolerance: f64) -> usize {
    let midpoint = (a + b) as f64 / 2.0;
    let distance = |i: usize| (i as f64 - midpoint).abs();

    let mut best = a + 1;
    for i in a + 2..b {
        if data[i] < data[best] - tolerance
            || ((data[i] - data[best]).abs() <= tolerance && distance(i) < distance(best))
        {
            best = i;
        }
    }
    best
}
