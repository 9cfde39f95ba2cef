//! Proportional truncation of both ends of a trace (solvent front, late elution).

use log::debug;

use crate::error::{ProcessingError, Result};
use crate::series::Series;

/// Validate a pair of truncation proportions
pub fn validate_proportions(p_start: f64, p_end: f64) -> Result<()> {
    for (name, p) in [("truncate_start", p_start), ("truncate_end", p_end)] {
        if !p.is_finite() || !(0.0..1.0).contains(&p) {
            return Err(ProcessingError::config(format!(
                "{name} must be in [0, 1), got {p}"
            )));
        }
    }
    if p_start + p_end >= 1.0 {
        return Err(ProcessingError::config(format!(
            "truncate_start + truncate_end must be < 1, got {}",
            p_start + p_end
        )));
    }
    Ok(())
}

/// Number of samples removed from the front and back of a series of `len` samples
pub fn truncation_counts(len: usize, p_start: f64, p_end: f64) -> (usize, usize) {
    let n = len as f64;
    let front = (p_start * n).round() as usize;
    let back = (p_end * n).round() as usize;
    (front.min(len), back.min(len - front.min(len)))
}

/// Drop `round(p_start * N)` samples from the front and `round(p_end * N)` from the back.
///
/// Zero proportions return an equivalent series. The minimum length needed
/// downstream is enforced by the smoother, not here.
pub fn truncate(series: &Series, p_start: f64, p_end: f64) -> Result<Series> {
    validate_proportions(p_start, p_end)?;

    let (front, back) = truncation_counts(series.len(), p_start, p_end);
    if front == 0 && back == 0 {
        return Ok(series.clone());
    }

    let truncated = series.slice(front, series.len() - back);
    debug!(
        "Truncated {} -> {} samples ({} front, {} back)",
        series.len(),
        truncated.len(),
        front,
        back
    );
    Ok(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Series {
        Series::from_pairs((0..n).map(|i| (i as f64, i as f64))).unwrap()
    }

    #[test]
    fn test_no_truncation_is_noop() {
        let series = ramp(50);
        assert_eq!(truncate(&series, 0.0, 0.0).unwrap(), series);
    }

    #[test]
    fn test_truncation_counts() {
        let series = ramp(100);
        let truncated = truncate(&series, 0.1, 0.15).unwrap();
        assert_eq!(truncated.len(), 75);
        assert_eq!(truncated.time()[0], 10.0);
        assert_eq!(*truncated.time().last().unwrap(), 84.0);
    }

    #[test]
    fn test_rounding() {
        // 0.05 * 30 = 1.5 rounds to 2
        let truncated = truncate(&ramp(30), 0.05, 0.0).unwrap();
        assert_eq!(truncated.len(), 28);
    }

    #[test]
    fn test_invalid_proportions() {
        let series = ramp(10);
        assert!(matches!(
            truncate(&series, -0.1, 0.0),
            Err(ProcessingError::Configuration(_))
        ));
        assert!(truncate(&series, 1.0, 0.0).is_err());
        assert!(truncate(&series, 0.5, 0.5).is_err());
        assert!(truncate(&series, f64::NAN, 0.0).is_err());
    }
}
