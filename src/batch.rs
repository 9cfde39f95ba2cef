//! Many chromatograms under one configuration.
//!
//! Each chromatogram is processed independently; a failure is reported in
//! its own slot and does not affect the others. With the `parallel` feature
//! the work is spread over the rayon thread pool.

use log::{info, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::ProcessingConfig;
use crate::error::Result;
use crate::processor::process;
use crate::report::ProcessingReport;
use crate::series::Series;

/// Process every series, returning one result per input in input order
pub fn process_batch(series: Vec<Series>, config: &ProcessingConfig) -> Vec<Result<ProcessingReport>> {
    let total = series.len();

    #[cfg(feature = "parallel")]
    let results: Vec<Result<ProcessingReport>> = series
        .into_par_iter()
        .map(|s| process(s, config.clone()))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<ProcessingReport>> = series
        .into_iter()
        .map(|s| process(s, config.clone()))
        .collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        warn!("{failed} of {total} chromatograms failed to process");
    }
    info!("Processed {} chromatograms", total - failed);

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;

    fn gaussian(center: f64, len: usize) -> Series {
        Series::from_pairs((0..len).map(|i| {
            let x = i as f64;
            (x * 0.02, 1.0 + 30.0 * (-((x - center) / 7.0).powi(2) / 2.0).exp())
        }))
        .unwrap()
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_failures() {
        let inputs = vec![
            gaussian(100.0, 300),
            Series::from_pairs((0..5).map(|i| (i as f64, 1.0))).unwrap(),
            gaussian(200.0, 300),
        ];
        let results = process_batch(inputs, &ProcessingConfig::default());
        assert_eq!(results.len(), 3);

        let first = results[0].as_ref().unwrap();
        assert_eq!(first.peaks.len(), 1);
        assert!(first.peaks[0].center_index.abs_diff(100) <= 1);

        assert!(matches!(results[1], Err(ProcessingError::Configuration(_))));

        let third = results[2].as_ref().unwrap();
        assert!(third.peaks[0].center_index.abs_diff(200) <= 1);
    }
}
