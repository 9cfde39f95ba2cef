//! # Series
//!
//! An immutable, ordered sequence of `(time, intensity)` samples representing
//! one chromatographic trace. Every pipeline stage that transforms a trace
//! produces a new `Series`; times are shared unchanged by stages that only
//! touch intensities.

use serde::{Deserialize, Serialize};

use crate::error::{ProcessingError, Result};

/// A single chromatographic trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesColumns", into = "SeriesColumns")]
pub struct Series {
    time: Vec<f64>,
    intensity: Vec<f64>,
}

/// Serialized column layout, validated on the way in
#[derive(Serialize, Deserialize)]
struct SeriesColumns {
    time: Vec<f64>,
    intensity: Vec<f64>,
}

impl TryFrom<SeriesColumns> for Series {
    type Error = ProcessingError;

    fn try_from(columns: SeriesColumns) -> Result<Self> {
        Series::from_columns(columns.time, columns.intensity)
    }
}

impl From<Series> for SeriesColumns {
    fn from(series: Series) -> Self {
        Self {
            time: series.time,
            intensity: series.intensity,
        }
    }
}

impl Series {
    /// Build a series from separate time and intensity columns.
    ///
    /// Fails with [`ProcessingError::InvalidSeries`] if the columns differ in
    /// length, contain non-finite values, or time is not strictly increasing.
    pub fn from_columns(time: Vec<f64>, intensity: Vec<f64>) -> Result<Self> {
        if time.len() != intensity.len() {
            return Err(ProcessingError::InvalidSeries(format!(
                "time column has {} values, intensity column has {}",
                time.len(),
                intensity.len()
            )));
        }

        if let Some(i) = time.iter().position(|t| !t.is_finite()) {
            return Err(ProcessingError::InvalidSeries(format!(
                "non-finite time value at index {i}"
            )));
        }
        if let Some(i) = intensity.iter().position(|y| !y.is_finite()) {
            return Err(ProcessingError::InvalidSeries(format!(
                "non-finite intensity value at index {i}"
            )));
        }
        if let Some(i) = time.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ProcessingError::InvalidSeries(format!(
                "time is not strictly increasing at index {} ({} -> {})",
                i + 1,
                time[i],
                time[i + 1]
            )));
        }

        Ok(Self { time, intensity })
    }

    /// Build a series from `(time, intensity)` pairs
    pub fn from_pairs<I>(samples: I) -> Result<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (time, intensity) = samples.into_iter().unzip();
        Self::from_columns(time, intensity)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// Whether the series has no samples
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Time column
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Intensity column
    pub fn intensity(&self) -> &[f64] {
        &self.intensity
    }

    /// Iterate over `(time, intensity)` pairs
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time.iter().copied().zip(self.intensity.iter().copied())
    }

    /// New series with the same times and replaced intensities.
    ///
    /// Used by stages that correct intensities in place (smoothing, baseline
    /// subtraction); length and times are preserved.
    pub fn with_intensity(&self, intensity: Vec<f64>) -> Result<Self> {
        if intensity.len() != self.len() {
            return Err(ProcessingError::InvalidSeries(format!(
                "replacement intensity has {} values, series has {}",
                intensity.len(),
                self.len()
            )));
        }
        if let Some(i) = intensity.iter().position(|y| !y.is_finite()) {
            return Err(ProcessingError::Numerical(format!(
                "stage produced a non-finite intensity at index {i}"
            )));
        }
        Ok(Self {
            time: self.time.clone(),
            intensity,
        })
    }

    /// Contiguous sub-series `[start, end)`
    pub fn slice(&self, start: usize, end: usize) -> Self {
        let end = end.min(self.len());
        let start = start.min(end);
        Self {
            time: self.time[start..end].to_vec(),
            intensity: self.intensity[start..end].to_vec(),
        }
    }

    /// Index of the sample whose time is nearest to `time`
    pub fn index_of_time(&self, time: f64) -> Option<usize> {
        if self.is_empty() || !time.is_finite() {
            return None;
        }
        let upper = self.time.partition_point(|&t| t < time);
        if upper == 0 {
            return Some(0);
        }
        if upper == self.len() {
            return Some(self.len() - 1);
        }
        let lower = upper - 1;
        if time - self.time[lower] <= self.time[upper] - time {
            Some(lower)
        } else {
            Some(upper)
        }
    }

    /// Maximum intensity, or `None` for an empty series
    pub fn max_intensity(&self) -> Option<f64> {
        self.intensity.iter().copied().reduce(f64::max)
    }

    /// Minimum intensity, or `None` for an empty series
    pub fn min_intensity(&self) -> Option<f64> {
        self.intensity.iter().copied().reduce(f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_columns_valid() {
        let series = Series::from_columns(vec![0.0, 1.0, 2.0], vec![5.0, 6.0, 7.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.time(), &[0.0, 1.0, 2.0]);
        assert_eq!(series.max_intensity(), Some(7.0));
        assert_eq!(series.min_intensity(), Some(5.0));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = Series::from_columns(vec![0.0, 1.0], vec![1.0]).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidSeries(_)));
    }

    #[test]
    fn test_non_increasing_time_rejected() {
        assert!(Series::from_columns(vec![0.0, 1.0, 1.0], vec![1.0, 2.0, 3.0]).is_err());
        assert!(Series::from_columns(vec![0.0, 2.0, 1.0], vec![1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(Series::from_columns(vec![0.0, f64::NAN], vec![1.0, 2.0]).is_err());
        assert!(Series::from_columns(vec![0.0, 1.0], vec![1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_with_intensity_preserves_time() {
        let series = Series::from_pairs([(0.0, 1.0), (0.5, 2.0), (1.5, 3.0)]).unwrap();
        let replaced = series.with_intensity(vec![9.0, 8.0, 7.0]).unwrap();
        assert_eq!(replaced.time(), series.time());
        assert_eq!(replaced.intensity(), &[9.0, 8.0, 7.0]);
        assert!(series.with_intensity(vec![1.0]).is_err());
    }

    #[test]
    fn test_index_of_time() {
        let series = Series::from_pairs([(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (4.0, 0.0)]).unwrap();
        assert_eq!(series.index_of_time(-3.0), Some(0));
        assert_eq!(series.index_of_time(1.4), Some(1));
        assert_eq!(series.index_of_time(1.6), Some(2));
        assert_eq!(series.index_of_time(3.5), Some(3));
        assert_eq!(series.index_of_time(99.0), Some(3));
    }

    #[test]
    fn test_slice() {
        let series = Series::from_pairs((0..10).map(|i| (i as f64, i as f64 * 2.0))).unwrap();
        let sub = series.slice(2, 5);
        assert_eq!(sub.time(), &[2.0, 3.0, 4.0]);
        assert_eq!(sub.intensity(), &[4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let bad = r#"{"time":[1.0,0.0],"intensity":[1.0,2.0]}"#;
        assert!(serde_json::from_str::<Series>(bad).is_err());

        let good = r#"{"time":[0.0,1.0],"intensity":[1.0,2.0]}"#;
        let series: Series = serde_json::from_str(good).unwrap();
        assert_eq!(series.len(), 2);
    }
}
