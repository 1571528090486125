//! TOML configuration
//!
//! ```toml
//! [overview]
//! level = 5
//! white_tol = 230
//! black_tol = 0
//! hole_size = 3000
//!
//! [sampling]
//! level = 2
//! patch_size = 250
//! white_tol = 230
//! tissue_ratio = 0.75
//! closing_radius = 20
//! ```
//!
//! Missing keys fall back to their defaults. Command-line values are layered
//! on top with [`RoiConfig::merge_with_cli`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sampling::SamplingOptions;
use crate::tissue::OverviewOptions;
use crate::types::{Result, RoiError};

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Options for both extraction passes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    pub overview: OverviewOptions,
    pub sampling: SamplingOptions,
}

impl RoiConfig {
    /// Load configuration from a TOML file
    pub fn load_from_path(path: &Path) -> std::result::Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> std::result::Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Apply command-line overrides (CLI values win)
    #[must_use]
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> Self {
        let mut merged = self.clone();

        if let Some(level) = cli.overview_level {
            merged.overview.level = level;
        }
        if let Some(level) = cli.sampling_level {
            merged.sampling.level = level;
        }
        if let Some(tol) = cli.white_tol {
            merged.overview.white_tol = tol;
            merged.sampling.white_tol = tol;
        }
        if let Some(tol) = cli.black_tol {
            merged.overview.black_tol = tol;
        }
        if let Some(size) = cli.hole_size {
            merged.overview.hole_size = size;
        }
        if let Some(size) = cli.patch_size {
            merged.sampling.patch_size = size;
        }
        if let Some(ratio) = cli.tissue_ratio {
            merged.sampling.tissue_ratio = ratio;
        }
        if let Some(radius) = cli.closing_radius {
            merged.sampling.closing_radius = radius;
        }

        merged
    }

    /// Validate both option sets and their relation
    pub fn validate(&self) -> Result<()> {
        self.overview.validate()?;
        self.sampling.validate()?;
        if self.sampling.level >= self.overview.level {
            return Err(RoiError::invalid(format!(
                "sampling level {} must be finer than overview level {}",
                self.sampling.level, self.overview.level
            )));
        }
        Ok(())
    }
}

/// Values given on the command line; `None` keeps the file/default value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub overview_level: Option<u32>,
    pub sampling_level: Option<u32>,
    pub white_tol: Option<u8>,
    pub black_tol: Option<u8>,
    pub hole_size: Option<u32>,
    pub patch_size: Option<u32>,
    pub tissue_ratio: Option<f64>,
    pub closing_radius: Option<u8>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}
