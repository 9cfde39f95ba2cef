//! Processing audit trail.
//!
//! A [`ProcessingReport`] records what the pipeline did to one chromatogram:
//! the configuration, each stage with its parameters and sample counts, the
//! baseline diagnostics and the resulting peaks. It serializes to JSON for
//! archiving next to the quantitation results.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ProcessingConfig;
use crate::numeric::Polynomial;
use crate::peak::ChromatographicPeak;

/// Software name recorded in reports
pub const SOFTWARE_NAME: &str = "lcpeak";

/// Software version recorded in reports
pub const SOFTWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single pipeline stage in the processing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    /// Step order (1-indexed)
    pub order: u32,

    /// Stage name (e.g., "truncation", "smoothing", "baseline correction")
    pub stage: String,

    /// When the stage completed
    pub timestamp: DateTime<Utc>,

    /// Samples entering the stage
    pub samples_in: usize,

    /// Samples leaving the stage (or items produced, for detection stages)
    pub samples_out: usize,

    /// Stage parameters
    pub parameters: BTreeMap<String, String>,
}

/// Baseline fit diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineDiagnostics {
    /// Fitted polynomial
    pub polynomial: Polynomial,

    /// Background samples used for the fit
    pub background_points: usize,

    /// Constant added to shift the corrected trace to a zero minimum
    pub shift: f64,
}

/// Full record of one chromatogram's processing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingReport {
    /// Software name
    pub software: String,

    /// Software version
    pub version: String,

    /// Configuration used
    pub config: ProcessingConfig,

    /// Samples in the raw series
    pub raw_points: usize,

    /// Samples in the processed series
    pub processed_points: usize,

    /// Samples removed from the front and back
    pub truncated: (usize, usize),

    /// Centers found by the provisional detection pass
    pub provisional_centers: Vec<usize>,

    /// Baseline diagnostics, absent when correction is disabled
    pub baseline: Option<BaselineDiagnostics>,

    /// Stages in the order they ran
    pub steps: Vec<ProcessingStep>,

    /// Detected peaks
    pub peaks: Vec<ChromatographicPeak>,
}

impl ProcessingReport {
    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Total integrated area over all peaks
    pub fn total_area(&self) -> f64 {
        self.peaks.iter().map(|p| p.peak_area).sum()
    }
}

/// Accumulates processing steps with increasing order numbers
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StepLog {
    steps: Vec<ProcessingStep>,
}

impl StepLog {
    pub(crate) fn record<I, K, V>(&mut self, stage: &str, samples_in: usize, samples_out: usize, parameters: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.steps.push(ProcessingStep {
            order: self.steps.len() as u32 + 1,
            stage: stage.to_string(),
            timestamp: Utc::now(),
            samples_in,
            samples_out,
            parameters: parameters
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
        });
    }

    pub(crate) fn steps(&self) -> &[ProcessingStep] {
        &self.steps
    }

    /// Drop every step recorded after the first `len`
    pub(crate) fn truncate(&mut self, len: usize) {
        self.steps.truncate(len);
    }

    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }
}
