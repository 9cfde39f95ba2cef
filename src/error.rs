//! Error taxonomy for the processing pipeline.

/// Errors that can occur while processing a chromatogram
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProcessingError {
    /// Invalid or contradictory parameters
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The series (or a slice of it) is too short for the requested operation
    #[error("Insufficient data for {operation}: need at least {required} points, got {available}")]
    InsufficientData {
        /// Operation that rejected the data
        operation: &'static str,
        /// Minimum number of points the operation needs
        required: usize,
        /// Number of points that were available
        available: usize,
    },

    /// Degenerate numerical problem, e.g. a singular least-squares system
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// A pipeline stage was invoked before its prerequisite stage completed
    #[error("Stage order violation: {operation} requires stage {required:?}, processor is at {current:?}")]
    StageOrder {
        /// Operation that was invoked
        operation: &'static str,
        /// Stage that must have completed first
        required: crate::processor::Stage,
        /// Stage the processor is currently in
        current: crate::processor::Stage,
    },

    /// Time/intensity columns that violate the series invariants
    #[error("Invalid series: {0}")]
    InvalidSeries(String),
}

impl ProcessingError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub(crate) fn insufficient(operation: &'static str, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            operation,
            required,
            available,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, ProcessingError>;
