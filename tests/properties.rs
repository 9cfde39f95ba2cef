//! Property-based tests for the pipeline stages

use proptest::prelude::*;

use lcpeak::baseline::BaselineEstimator;
use lcpeak::boundary::{BorderMode, PeakBoundaryResolver};
use lcpeak::detection::{DetectionStrategy, PeakDetector};
use lcpeak::integration::{simpson, trapezoid};
use lcpeak::series::Series;
use lcpeak::smoothing::SavitzkyGolay;
use lcpeak::truncate::truncate;

fn uniform_series(intensity: Vec<f64>, step: f64) -> Series {
    let time = (0..intensity.len()).map(|i| i as f64 * step).collect();
    Series::from_columns(time, intensity).unwrap()
}

/// Odd window in [3, 21] with an order below it
fn window_and_order() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=10).prop_flat_map(|half| {
        let window = 2 * half + 1;
        (Just(window), 0..window.min(6))
    })
}

proptest! {
    /// Truncation removes exactly round(p * N) samples from each end
    #[test]
    fn test_truncation_length(n in 1usize..400, p_start in 0.0f64..0.45, p_end in 0.0f64..0.45) {
        let series = uniform_series(vec![1.0; n], 0.1);
        let truncated = truncate(&series, p_start, p_end).unwrap();

        let front = (p_start * n as f64).round() as usize;
        let back = (p_end * n as f64).round() as usize;
        prop_assert_eq!(truncated.len(), n - front - back);
        if let Some(&first) = truncated.time().first() {
            prop_assert_eq!(first, series.time()[front]);
        }
    }

    /// Smoothing keeps the length and the time axis exactly
    #[test]
    fn test_smoothing_preserves_shape(
        (window, order) in window_and_order(),
        values in prop::collection::vec(-1e3f64..1e3, 21..200),
    ) {
        let series = uniform_series(values, 0.05);
        let smoothed = SavitzkyGolay::new(window, order).unwrap().smooth(&series).unwrap();
        prop_assert_eq!(smoothed.len(), series.len());
        prop_assert_eq!(smoothed.time(), series.time());
    }

    /// A constant trace is unchanged, edges included
    #[test]
    fn test_smoothing_constant(
        (window, order) in window_and_order(),
        level in -1e4f64..1e4,
        n in 21usize..150,
    ) {
        let series = uniform_series(vec![level; n], 1.0);
        let smoothed = SavitzkyGolay::new(window, order).unwrap().smooth(&series).unwrap();
        for &v in smoothed.intensity() {
            prop_assert!((v - level).abs() <= 1e-9 * level.abs().max(1.0));
        }
    }

    /// A linear background without peaks is removed completely
    #[test]
    fn test_baseline_removes_linear_background(
        intercept in -100.0f64..100.0,
        slope in -10.0f64..10.0,
        centers in prop::collection::btree_set(0usize..300, 0..4),
    ) {
        let series = Series::from_pairs((0..300).map(|i| {
            let t = i as f64 * 0.02;
            (t, intercept + slope * t)
        }))
        .unwrap();
        let centers: Vec<usize> = centers.into_iter().collect();
        let estimator = BaselineEstimator::new(3, 20);

        let correction = estimator.correct(&series, &centers).unwrap();
        let scale = intercept.abs() + slope.abs() * 6.0 + 1.0;
        for &v in correction.series.intensity() {
            prop_assert!(v.abs() < 1e-8 * scale, "residual {}", v);
        }
    }

    /// Resolved borders bracket their centers and never overlap
    #[test]
    fn test_borders_do_not_overlap(
        values in prop::collection::vec(0.0f64..100.0, 10..300),
        min_distance in 3usize..25,
        excursion in 1usize..60,
        mode in prop::sample::select(vec![BorderMode::Descent, BorderMode::HalfMaximum, BorderMode::ProminenceBases]),
    ) {
        let detector = PeakDetector::new(DetectionStrategy::Prominence { min_prominence: 0.0 }, min_distance, 0.0);
        let centers: Vec<usize> = detector.detect_in(&values).into_iter().map(|c| c.index).collect();
        let borders = PeakBoundaryResolver::new(excursion).with_mode(mode).resolve(&values, &centers).unwrap();

        prop_assert_eq!(borders.len(), centers.len());
        for (&(left, right), &center) in borders.iter().zip(&centers) {
            prop_assert!(left < center && center < right);
            prop_assert!(right < values.len());
        }
        for pair in borders.windows(2) {
            prop_assert!(pair[0].1 < pair[1].0);
        }
    }

    /// Both rules are exact for straight lines on any grid
    #[test]
    fn test_integration_exact_for_lines(
        steps in prop::collection::vec(0.01f64..1.0, 1..60),
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
    ) {
        let mut x = vec![0.0];
        for s in steps {
            let last = x[x.len() - 1];
            x.push(last + s);
        }
        let y: Vec<f64> = x.iter().map(|t| a + b * t).collect();
        let end = x[x.len() - 1];
        let exact = a * end + b * end * end / 2.0;
        let tolerance = 1e-9 * (1.0 + exact.abs() + end * end * 10.0);

        prop_assert!((trapezoid(&x, &y) - exact).abs() < tolerance);
        prop_assert!((simpson(&x, &y) - exact).abs() < tolerance);
    }
}
