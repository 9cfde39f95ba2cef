use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lcpeak::batch::process_batch;
use lcpeak::config::ProcessingConfig;
use lcpeak::detection::DetectionMethod;
use lcpeak::processor::ChromatogramProcessor;
use lcpeak::series::Series;
use lcpeak::smoothing::SavitzkyGolay;

/// Drifting baseline with a peak every 250 samples
fn synthetic_trace(len: usize) -> Series {
    Series::from_pairs((0..len).map(|i| {
        let t = i as f64 * 0.01;
        let x = (i % 250) as f64 - 125.0;
        let peak = 50.0 * (-(x / 9.0).powi(2) / 2.0).exp();
        let drift = 0.4 * (t / 3.0).sin() + 0.05 * t;
        let noise = ((i as f64 * 12.9898).sin() * 43758.5453).fract() * 0.2;
        (t, peak + drift + noise)
    }))
    .unwrap()
}

/// Benchmark Savitzky-Golay smoothing by trace length
fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("smoothing");
    let filter = SavitzkyGolay::new(11, 3).unwrap();

    for len in [1_000, 10_000, 100_000] {
        let series = synthetic_trace(len);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}pts", len)), &series, |b, s| {
            b.iter(|| black_box(filter.apply(black_box(s.intensity())).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark the full pipeline per detection strategy
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let series = synthetic_trace(10_000);
    group.throughput(Throughput::Elements(series.len() as u64));

    for method in [DetectionMethod::Gradient, DetectionMethod::Fwhm, DetectionMethod::Prominence] {
        let config = ProcessingConfig::default().with_detection_method(method);
        group.bench_with_input(BenchmarkId::from_parameter(method), &config, |b, config| {
            b.iter(|| {
                let mut processor = ChromatogramProcessor::new(series.clone(), config.clone()).unwrap();
                let peaks = processor.preprocess().unwrap().integrate_peaks().unwrap().len();
                black_box(peaks);
            });
        });
    }

    group.finish();
}

/// Benchmark batch processing of many short runs
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let config = ProcessingConfig::default();

    for count in [8, 64] {
        let traces: Vec<Series> = (0..count).map(|_| synthetic_trace(2_000)).collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}runs", count)), &traces, |b, traces| {
            b.iter(|| black_box(process_batch(traces.clone(), &config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_smoothing, bench_full_pipeline, bench_batch);
criterion_main!(benches);
