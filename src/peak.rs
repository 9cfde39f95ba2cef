//! Quantified peak records.

use serde::{Deserialize, Serialize};

/// One detected, bounded and integrated chromatographic peak.
///
/// Indices refer to the processed (truncated) series the peak was detected in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChromatographicPeak {
    /// Apex index
    pub center_index: usize,

    /// Apex retention time
    pub center_time: f64,

    /// Inclusive `(left, right)` border indices, `left < center < right`
    pub peak_borders: (usize, usize),

    /// Retention times of the left and right borders
    pub border_times: (f64, f64),

    /// Maximum intensity within the borders
    pub peak_height: f64,

    /// Integrated area within the borders
    pub peak_area: f64,

    /// Topographic prominence of the apex
    pub prominence: f64,

    /// Full width at half maximum, in samples
    pub fwhm: Option<f64>,
}

impl ChromatographicPeak {
    /// Number of samples between the borders, inclusive
    pub fn point_count(&self) -> usize {
        self.peak_borders.1 - self.peak_borders.0 + 1
    }

    /// Retention-time span between the borders
    pub fn duration(&self) -> f64 {
        self.border_times.1 - self.border_times.0
    }

    /// Whether the apex time falls inside `[start, end]`
    pub fn elutes_within(&self, start: f64, end: f64) -> bool {
        (start..=end).contains(&self.center_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_measures() {
        let peak = ChromatographicPeak {
            center_index: 12,
            center_time: 1.2,
            peak_borders: (8, 17),
            border_times: (0.8, 1.7),
            peak_height: 40.0,
            peak_area: 9.5,
            prominence: 38.0,
            fwhm: Some(4.0),
        };
        assert_eq!(peak.point_count(), 10);
        assert!((peak.duration() - 0.9).abs() < 1e-12);
        assert!(peak.elutes_within(1.2, 1.2));
        assert!(!peak.elutes_within(1.3, 2.0));
    }
}
