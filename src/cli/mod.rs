use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod demo;
mod input;
mod process;

use input::ColumnNames;

/// lcpeak - Liquid Chromatography Peak Processing
#[derive(Parser)]
#[command(name = "lcpeak")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect and integrate peaks in a chromatogram CSV export
    Process {
        /// Input CSV file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output JSON report path (defaults to stdout)
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,

        /// Path to TOML config file with processing settings
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Header of the retention time column
        #[arg(long, default_value = input::DEFAULT_TIME_COLUMN)]
        time_column: String,

        /// Header of the intensity column
        #[arg(long, default_value = input::DEFAULT_INTENSITY_COLUMN)]
        intensity_column: String,

        /// Only report peaks whose apex elutes at or after this time
        #[arg(long)]
        start_time: Option<f64>,

        /// Only report peaks whose apex elutes at or before this time
        #[arg(long)]
        end_time: Option<f64>,
    },

    /// Write a synthetic chromatogram (drifting baseline with one Gaussian peak)
    Demo {
        /// Output CSV file path
        #[arg(value_name = "OUTPUT", default_value = "demo_chromatogram.csv")]
        output: PathBuf,

        /// Number of samples
        #[arg(short = 'n', long, default_value = "1000")]
        samples: usize,
    },
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Process {
            input,
            output,
            config,
            time_column,
            intensity_column,
            start_time,
            end_time,
        } => process::run(
            input,
            output,
            config,
            ColumnNames {
                time: time_column,
                intensity: intensity_column,
            },
            start_time,
            end_time,
        ),
        Commands::Demo { output, samples } => demo::run(output, samples),
    }
}
