use anyhow::{Context, Result};
use log::info;
use std::f64::consts::PI;
use std::path::PathBuf;

use super::input::{DEFAULT_INTENSITY_COLUMN, DEFAULT_TIME_COLUMN};

/// Write a synthetic chromatogram to CSV
pub fn run(output: PathBuf, samples: usize) -> Result<()> {
    if samples < 3 {
        anyhow::bail!("Demo trace needs at least 3 samples, got {samples}");
    }

    info!("Generating {samples}-sample demo chromatogram");

    let mut writer =
        csv::Writer::from_path(&output).with_context(|| format!("Failed to create {}", output.display()))?;
    writer.write_record([DEFAULT_TIME_COLUMN, DEFAULT_INTENSITY_COLUMN])?;
    for (time, value) in synthetic_trace(samples) {
        writer.write_record([format!("{time:.4}"), format!("{value:.6}")])?;
    }
    writer.flush().context("Failed to flush demo CSV")?;

    info!("Demo chromatogram written to {}", output.display());
    info!("Process it with: lcpeak -v process {}", output.display());
    Ok(())
}

/// Gaussian peak (height 100, sigma 10 samples) at the midpoint over a slow
/// sinusoidal and linear drift, sampled every 0.01 min
fn synthetic_trace(samples: usize) -> impl Iterator<Item = (f64, f64)> {
    let center = (samples / 2) as f64;
    (0..samples).map(move |i| {
        let t = i as f64 * 0.01;
        let z = (i as f64 - center) / 10.0;
        let drift = 0.5 * (2.0 * PI * t / 20.0).sin() + 0.1 * t;
        (t, 100.0 * (-z * z / 2.0).exp() + drift)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::input::{read_series, ColumnNames};

    #[test]
    fn test_demo_roundtrips_through_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("demo.csv");
        run(path.clone(), 200).unwrap();

        let series = read_series(&path, &ColumnNames::default()).unwrap();
        assert_eq!(series.len(), 200);
        let apex = series
            .intensity()
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(apex, 100);
    }
}
