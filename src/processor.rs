//! # Chromatogram processor
//!
//! Owns one chromatogram and runs the pipeline over it in a fixed order:
//!
//! ```text
//! preprocess:      truncate -> smooth -> provisional detection -> baseline correction
//! integrate_peaks: final detection -> boundary resolution -> integration
//! ```
//!
//! The processor is a small state machine ([`Stage`]). `integrate_peaks` is
//! rejected until `preprocess` has completed. Re-running `preprocess` starts
//! again from the raw series and discards previously integrated peaks.
//! A stage that fails leaves the processor exactly as it was before the call.
//!
//! Provisional detection (on the smoothed, uncorrected trace) only decides
//! which samples are excluded from the baseline fit; the peaks reported come
//! from the final detection on the corrected trace.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::baseline::BaselineEstimator;
use crate::boundary::PeakBoundaryResolver;
use crate::config::ProcessingConfig;
use crate::detection::{PeakCandidate, PeakDetector};
use crate::error::{ProcessingError, Result};
use crate::integration::PeakIntegrator;
use crate::peak::ChromatographicPeak;
use crate::report::{BaselineDiagnostics, ProcessingReport, StepLog, SOFTWARE_NAME, SOFTWARE_VERSION};
use crate::series::Series;
use crate::smoothing::SavitzkyGolay;
use crate::truncate::{truncate, truncation_counts};

/// Pipeline stage a processor has completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Constructed, nothing run yet
    Raw,
    /// Truncated, smoothed and baseline-corrected
    Preprocessed,
    /// Peaks detected, bounded and integrated
    Integrated,
}

/// Processing state for one chromatogram
#[derive(Debug, Clone)]
pub struct ChromatogramProcessor {
    raw: Series,
    config: ProcessingConfig,
    series: Series,
    stage: Stage,
    truncated: (usize, usize),
    provisional_centers: Vec<usize>,
    baseline: Option<BaselineDiagnostics>,
    peaks: Vec<ChromatographicPeak>,
    log: StepLog,
    preprocess_steps: usize,
}

impl ChromatogramProcessor {
    /// Create a processor, validating the configuration eagerly
    pub fn new(series: Series, config: ProcessingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            series: series.clone(),
            raw: series,
            config,
            stage: Stage::Raw,
            truncated: (0, 0),
            provisional_centers: Vec::new(),
            baseline: None,
            peaks: Vec::new(),
            log: StepLog::default(),
            preprocess_steps: 0,
        })
    }

    /// Truncate, smooth and baseline-correct the raw series
    pub fn preprocess(&mut self) -> Result<&mut Self> {
        let config = &self.config;
        let mut log = StepLog::default();

        let truncated = truncate(&self.raw, config.truncate_start, config.truncate_end)?;
        let counts = truncation_counts(self.raw.len(), config.truncate_start, config.truncate_end);
        log.record(
            "truncation",
            self.raw.len(),
            truncated.len(),
            [("truncate_start", config.truncate_start), ("truncate_end", config.truncate_end)],
        );

        let smoothed = if config.smoothing_enabled {
            let filter = SavitzkyGolay::new(config.smoothing_window, config.smoothing_order)?;
            let smoothed = filter.smooth(&truncated)?;
            log.record(
                "smoothing",
                truncated.len(),
                smoothed.len(),
                [("window", filter.window()), ("order", filter.order())],
            );
            smoothed
        } else {
            truncated
        };

        let (corrected, provisional_centers, baseline) = if config.baseline_correction {
            let centers = self.locate_provisional_centers(&smoothed);
            log.record(
                "provisional detection",
                smoothed.len(),
                centers.len(),
                [("method", config.peak_detection_method.to_string())],
            );

            let estimator = BaselineEstimator::new(config.baseline_degree, config.background_half_width)
                .with_shift(config.baseline_shift);
            let correction = estimator.correct(&smoothed, &centers)?;
            log.record(
                "baseline correction",
                smoothed.len(),
                correction.series.len(),
                [
                    ("degree", config.baseline_degree.to_string()),
                    ("background_half_width", config.background_half_width.to_string()),
                    ("background_points", correction.background_points.to_string()),
                    ("shift", correction.shift.to_string()),
                ],
            );
            let diagnostics = BaselineDiagnostics {
                polynomial: correction.baseline,
                background_points: correction.background_points,
                shift: correction.shift,
            };
            (correction.series, centers, Some(diagnostics))
        } else {
            (smoothed, Vec::new(), None)
        };

        debug!(
            "Preprocessed {} raw samples into {} ({} provisional centers)",
            self.raw.len(),
            corrected.len(),
            provisional_centers.len()
        );

        self.series = corrected;
        self.truncated = counts;
        self.provisional_centers = provisional_centers;
        self.baseline = baseline;
        self.peaks.clear();
        self.preprocess_steps = log.len();
        self.log = log;
        self.stage = Stage::Preprocessed;
        Ok(self)
    }

    /// Detect, bound and integrate peaks in the preprocessed series.
    ///
    /// Replaces any previously integrated peaks.
    pub fn integrate_peaks(&mut self) -> Result<&[ChromatographicPeak]> {
        if self.stage < Stage::Preprocessed {
            return Err(ProcessingError::StageOrder {
                operation: "integrate_peaks",
                required: Stage::Preprocessed,
                current: self.stage,
            });
        }

        let candidates = self.detect_peaks();
        let centers: Vec<usize> = candidates.iter().map(|c| c.index).collect();

        let resolver =
            PeakBoundaryResolver::new(self.config.max_boundary_excursion).with_mode(self.config.border_mode);
        let borders = resolver.resolve(self.series.intensity(), &centers)?;

        let integrator = PeakIntegrator::new(self.config.integration_method);
        let time = self.series.time();
        let peaks = candidates
            .iter()
            .zip(&borders)
            .map(|(candidate, &(left, right))| {
                let integral = integrator.integrate(&self.series, left, right)?;
                Ok(ChromatographicPeak {
                    center_index: candidate.index,
                    center_time: time[candidate.index],
                    peak_borders: (left, right),
                    border_times: (time[left], time[right]),
                    peak_height: integral.height,
                    peak_area: integral.area,
                    prominence: candidate.prominence,
                    fwhm: candidate.fwhm,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        self.log.truncate(self.preprocess_steps);
        self.log.record(
            "peak detection",
            self.series.len(),
            candidates.len(),
            [
                ("method", self.config.peak_detection_method.to_string()),
                ("min_peak_distance", self.config.min_peak_distance.to_string()),
                ("min_peak_width", self.config.min_peak_width.to_string()),
                ("peak_prominence", self.config.peak_prominence.to_string()),
            ],
        );
        self.log.record(
            "integration",
            candidates.len(),
            peaks.len(),
            [
                ("method", self.config.integration_method.to_string()),
                ("max_boundary_excursion", self.config.max_boundary_excursion.to_string()),
                ("border_mode", self.config.border_mode.to_string()),
            ],
        );

        info!(
            "Integrated {} peaks over {} samples (total area {:.4})",
            peaks.len(),
            self.series.len(),
            peaks.iter().map(|p| p.peak_area).sum::<f64>()
        );

        self.peaks = peaks;
        self.stage = Stage::Integrated;
        Ok(&self.peaks)
    }

    /// Provisional centers on the smoothed, uncorrected series; they only drive
    /// background isolation for the baseline fit.
    pub fn locate_provisional_centers(&self, smoothed: &Series) -> Vec<usize> {
        PeakDetector::from_config(&self.config).detect_centers(smoothed)
    }

    /// Final detection on the current (preprocessed) series
    pub fn detect_peaks(&self) -> Vec<PeakCandidate> {
        PeakDetector::from_config(&self.config).detect(&self.series)
    }

    /// Raw series as supplied
    pub fn raw_series(&self) -> &Series {
        &self.raw
    }

    /// Current series (raw until preprocessed)
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Configuration
    pub fn config(&self) -> &ProcessingConfig {
        &self.config
    }

    /// Last completed stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Integrated peaks (empty until `integrate_peaks` has run)
    pub fn peaks(&self) -> &[ChromatographicPeak] {
        &self.peaks
    }

    /// Centers found by the provisional detection pass
    pub fn provisional_centers(&self) -> &[usize] {
        &self.provisional_centers
    }

    /// Baseline diagnostics from the last `preprocess`
    pub fn baseline(&self) -> Option<&BaselineDiagnostics> {
        self.baseline.as_ref()
    }

    /// Peaks whose apex elutes within `[start, end]`
    pub fn peaks_in_time_range(&self, start: f64, end: f64) -> Vec<&ChromatographicPeak> {
        self.peaks
            .iter()
            .filter(|p| p.elutes_within(start, end))
            .collect()
    }

    /// Snapshot of everything done so far
    pub fn report(&self) -> ProcessingReport {
        ProcessingReport {
            software: SOFTWARE_NAME.to_string(),
            version: SOFTWARE_VERSION.to_string(),
            config: self.config.clone(),
            raw_points: self.raw.len(),
            processed_points: self.series.len(),
            truncated: self.truncated,
            provisional_centers: self.provisional_centers.clone(),
            baseline: self.baseline.clone(),
            steps: self.log.steps().to_vec(),
            peaks: self.peaks.clone(),
        }
    }
}

/// Run the full pipeline on one series and return its report
pub fn process(series: Series, config: ProcessingConfig) -> Result<ProcessingReport> {
    let mut processor = ChromatogramProcessor::new(series, config)?;
    processor.preprocess()?.integrate_peaks()?;
    Ok(processor.report())
}
