//! Pipeline configuration.
//!
//! Every field is optional in serialized form and falls back to the defaults
//! below, so a configuration file only lists what it changes:
//!
//! ```toml
//! [processing]
//! truncate_start = 0.1
//! truncate_end = 0.15
//! peak_detection_method = "prominence"
//! peak_prominence = 0.3
//! integration_method = "trapezoid"
//! ```

use serde::{Deserialize, Serialize};

use crate::boundary::{BorderMode, MIN_CENTER_SPACING};
use crate::detection::DetectionMethod;
use crate::error::{ProcessingError, Result};
use crate::integration::IntegrationMethod;
use crate::smoothing;
use crate::truncate::validate_proportions;

/// Configuration consumed by [`crate::processor::ChromatogramProcessor`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Proportion of samples removed from the start (solvent front)
    pub truncate_start: f64,

    /// Proportion of samples removed from the end (late elution)
    pub truncate_end: f64,

    /// Apply Savitzky-Golay smoothing
    pub smoothing_enabled: bool,

    /// Smoothing window length (odd, >= 3)
    pub smoothing_window: usize,

    /// Smoothing polynomial order (< window)
    pub smoothing_order: usize,

    /// Fit and subtract a polynomial baseline
    pub baseline_correction: bool,

    /// Baseline polynomial degree
    pub baseline_degree: usize,

    /// Samples excised on each side of a provisional peak before the baseline fit
    pub background_half_width: usize,

    /// Shift the corrected trace so its minimum is zero
    pub baseline_shift: bool,

    /// Peak detection strategy
    pub peak_detection_method: DetectionMethod,

    /// Minimum distance between peak centers, in samples
    pub min_peak_distance: usize,

    /// Minimum peak width in samples (width at half prominence; lower FWHM bound
    /// for the `fwhm` strategy)
    pub min_peak_width: f64,

    /// Upper FWHM bound in samples for the `fwhm` strategy
    pub max_peak_width: Option<f64>,

    /// Prominence threshold for the `gradient` and `prominence` strategies
    pub peak_prominence: f64,

    /// Maximum samples walked outward from a center when bounding a peak
    pub max_boundary_excursion: usize,

    /// Where raw peak borders are placed before overlapping peaks are split
    pub border_mode: BorderMode,

    /// Area integration rule
    pub integration_method: IntegrationMethod,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            truncate_start: 0.0,
            truncate_end: 0.0,
            smoothing_enabled: true,
            smoothing_window: 11,
            smoothing_order: 3,
            baseline_correction: true,
            baseline_degree: 3,
            background_half_width: 50,
            baseline_shift: false,
            peak_detection_method: DetectionMethod::Gradient,
            min_peak_distance: 15,
            min_peak_width: 3.0,
            max_peak_width: None,
            peak_prominence: 1.0,
            max_boundary_excursion: 200,
            border_mode: BorderMode::Descent,
            integration_method: IntegrationMethod::Simpson,
        }
    }
}

impl ProcessingConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every parameter, reporting the first violation
    pub fn validate(&self) -> Result<()> {
        validate_proportions(self.truncate_start, self.truncate_end)?;

        if self.smoothing_enabled {
            smoothing::validate_parameters(self.smoothing_window, self.smoothing_order)?;
        }

        if self.min_peak_distance < MIN_CENTER_SPACING {
            return Err(ProcessingError::config(format!(
                "min_peak_distance must be at least {MIN_CENTER_SPACING}, got {}",
                self.min_peak_distance
            )));
        }
        if !self.min_peak_width.is_finite() || self.min_peak_width < 0.0 {
            return Err(ProcessingError::config(format!(
                "min_peak_width must be a non-negative number, got {}",
                self.min_peak_width
            )));
        }
        if let Some(max) = self.max_peak_width {
            if !(max >= self.min_peak_width) {
                return Err(ProcessingError::config(format!(
                    "max_peak_width {max} is below min_peak_width {}",
                    self.min_peak_width
                )));
            }
        }
        if !self.peak_prominence.is_finite() || self.peak_prominence < 0.0 {
            return Err(ProcessingError::config(format!(
                "peak_prominence must be a non-negative number, got {}",
                self.peak_prominence
            )));
        }
        if self.max_boundary_excursion == 0 {
            return Err(ProcessingError::config("max_boundary_excursion must be at least 1"));
        }

        Ok(())
    }

    /// Set truncation proportions
    pub fn with_truncation(mut self, start: f64, end: f64) -> Self {
        self.truncate_start = start;
        self.truncate_end = end;
        self
    }

    /// Enable or disable smoothing
    pub fn with_smoothing(mut self, enabled: bool) -> Self {
        self.smoothing_enabled = enabled;
        self
    }

    /// Set smoothing window and order
    pub fn with_smoothing_window(mut self, window: usize, order: usize) -> Self {
        self.smoothing_window = window;
        self.smoothing_order = order;
        self
    }

    /// Enable or disable baseline correction
    pub fn with_baseline_correction(mut self, enabled: bool) -> Self {
        self.baseline_correction = enabled;
        self
    }

    /// Select the detection strategy
    pub fn with_detection_method(mut self, method: DetectionMethod) -> Self {
        self.peak_detection_method = method;
        self
    }

    /// Select the raw border placement
    pub fn with_border_mode(mut self, mode: BorderMode) -> Self {
        self.border_mode = mode;
        self
    }

    /// Select the integration rule
    pub fn with_integration_method(mut self, method: IntegrationMethod) -> Self {
        self.integration_method = method;
        self
    }
}
