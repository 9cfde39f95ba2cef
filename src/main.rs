//! # lcpeak
//!
//! Command-line front end for the chromatogram processing pipeline.
//!
//! ## Usage
//!
//! ```bash
//! # Write a synthetic trace, then process it
//! lcpeak demo trace.csv
//! lcpeak -v process trace.csv --output report.json
//!
//! # Custom parameters and column headers
//! lcpeak process export.tsv --config lcpeak.toml --time-column "RT" --intensity-column "UV 254"
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbose);
    cli::dispatch(cli)
}
