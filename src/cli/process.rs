use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use lcpeak::processor::ChromatogramProcessor;

use super::config::Config;
use super::input::{read_series, ColumnNames};

/// Process one chromatogram file and write the JSON report
pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    columns: ColumnNames,
    start_time: Option<f64>,
    end_time: Option<f64>,
) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    let config = match config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::from_file(&path)?
        }
        None => Config::default(),
    };

    let series = read_series(&input, &columns)?;
    info!("Read {} samples from {}", series.len(), input.display());

    let mut processor =
        ChromatogramProcessor::new(series, config.processing).context("Invalid processing configuration")?;
    processor
        .preprocess()
        .context("Preprocessing failed")?
        .integrate_peaks()
        .context("Peak integration failed")?;

    let mut report = processor.report();
    if start_time.is_some() || end_time.is_some() {
        let start = start_time.unwrap_or(f64::NEG_INFINITY);
        let end = end_time.unwrap_or(f64::INFINITY);
        report.peaks = processor
            .peaks_in_time_range(start, end)
            .into_iter()
            .cloned()
            .collect();
        info!("{} peaks elute within [{start}, {end}]", report.peaks.len());
    }

    for peak in &report.peaks {
        info!(
            "  peak at {:.3} (index {}): height {:.4}, area {:.4}, borders {:?}",
            peak.center_time, peak.center_index, peak.peak_height, peak.peak_area, peak.peak_borders
        );
    }

    let json = report.to_json().context("Failed to serialize report")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
