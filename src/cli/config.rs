//! TOML configuration file support.
//!
//! Processing parameters can be kept in a file instead of being rebuilt per run:
//!
//! ```toml
//! # lcpeak.toml
//! [processing]
//! truncate_start = 0.1
//! truncate_end = 0.15
//! smoothing_window = 15
//! peak_detection_method = "prominence"
//! peak_prominence = 0.3
//! integration_method = "trapezoid"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use lcpeak::config::ProcessingConfig;

/// Root configuration structure for lcpeak.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Pipeline settings.
    #[serde(default)]
    pub processing: ProcessingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML configuration")?;
        config
            .processing
            .validate()
            .context("Invalid processing configuration")?;
        Ok(config)
    }
}
