//! # lcpeak - Liquid Chromatography Peak Processing
//!
//! `lcpeak` turns a raw detector trace (intensity over retention time) into a
//! list of quantified chromatographic peaks.
//!
//! ## Pipeline
//!
//! ```text
//! Series ─► truncate ─► smooth ─► provisional detection ─► baseline correction
//!        ─► peak detection ─► boundary resolution ─► integration ─► peaks
//! ```
//!
//! - **Truncation** drops a proportion of samples from the solvent front and
//!   the late-elution tail.
//! - **Smoothing** applies a Savitzky-Golay filter; output length equals
//!   input length.
//! - **Baseline correction** excises a window around provisional peak centers,
//!   fits a global polynomial to the remaining background and subtracts it.
//! - **Peak detection** enumerates local maxima and filters them with one of
//!   three strategies (`gradient`, `fwhm`, `prominence`) plus a shared
//!   minimum-distance and minimum-width constraint.
//! - **Boundary resolution** walks downhill from each center and splits
//!   overlapping peaks at the valley between them.
//! - **Integration** computes area (Simpson or trapezoid on the actual time
//!   axis) and height within each peak's borders.
//!
//! ## Quick Start
//!
//! ```rust
//! use lcpeak::prelude::*;
//!
//! let series = Series::from_pairs((0..600).map(|i| {
//!     let t = i as f64 * 0.01;
//!     let peak = 50.0 * (-((i as f64 - 300.0) / 8.0).powi(2) / 2.0).exp();
//!     (t, 2.0 + 0.3 * t + peak)
//! }))?;
//!
//! let mut processor = ChromatogramProcessor::new(series, ProcessingConfig::default())?;
//! let peaks = processor.preprocess()?.integrate_peaks()?;
//!
//! assert_eq!(peaks.len(), 1);
//! println!("apex at {:.2} min, area {:.3}", peaks[0].center_time, peaks[0].peak_area);
//! # Ok::<(), lcpeak::ProcessingError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`series`]: validated `(time, intensity)` columns
//! - [`truncate`], [`smoothing`], [`baseline`]: preprocessing stages
//! - [`detection`], [`boundary`], [`integration`]: peak stages
//! - [`processor`]: the per-chromatogram state machine tying stages together
//! - [`config`]: serde-backed parameters with eager validation
//! - [`report`]: JSON audit trail of a processing run
//! - [`batch`]: independent processing of many chromatograms
//!
//! ## Feature Flags
//!
//! - `parallel`: process batches on the rayon thread pool

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod baseline;
pub mod batch;
pub mod boundary;
pub mod config;
pub mod detection;
pub mod error;
pub mod integration;
pub mod numeric;
pub mod peak;
pub mod processor;
pub mod report;
pub mod series;
pub mod smoothing;
pub mod truncate;

pub use error::{ProcessingError, Result};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::baseline::{BaselineCorrection, BaselineEstimator};
    pub use crate::batch::process_batch;
    pub use crate::boundary::{BorderMode, PeakBoundaryResolver};
    pub use crate::config::ProcessingConfig;
    pub use crate::detection::{DetectionMethod, DetectionStrategy, PeakCandidate, PeakDetector};
    pub use crate::error::{ProcessingError, Result};
    pub use crate::integration::{IntegrationMethod, PeakIntegrator};
    pub use crate::peak::ChromatographicPeak;
    pub use crate::processor::{process, ChromatogramProcessor, Stage};
    pub use crate::report::{ProcessingReport, ProcessingStep};
    pub use crate::series::Series;
    pub use crate::smoothing::SavitzkyGolay;
}
