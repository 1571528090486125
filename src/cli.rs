//! Command-line interface definitions

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::CliOverrides;
use crate::types::Roi;

/// Exit codes of the `slide-rois` binary
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_CONFIG: i32 = 2;
    pub const INPUT_NOT_FOUND: i32 = 3;
}

/// Default pyramid depth built from a raster input
pub const DEFAULT_LEVELS: u32 = 6;

#[derive(Parser, Debug)]
#[command(name = "slide-rois", version, about = "Tissue ROI extraction for whole-slide images")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect coarse tissue regions
    Overview(OverviewArgs),
    /// Detect coarse regions and sample tissue patches inside them
    Patches(PatchesArgs),
    /// Print the default configuration as TOML
    DefaultConfig,
}

/// Input, configuration and option overrides shared by the slide commands
#[derive(Args, Debug, Clone)]
pub struct SlideArgs {
    /// Raster image used as level 0 of the slide
    pub input: PathBuf,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pyramid levels built from the input
    #[arg(long, default_value_t = DEFAULT_LEVELS)]
    pub levels: u32,

    /// Write JSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pyramid level of the overview pass
    #[arg(long)]
    pub overview_level: Option<u32>,

    /// Pyramid level of the region pass
    #[arg(long)]
    pub sampling_level: Option<u32>,

    /// Glass threshold applied in both passes
    #[arg(long)]
    pub white_tol: Option<u8>,

    /// Black border threshold
    #[arg(long)]
    pub black_tol: Option<u8>,

    /// Minimum tissue component size in overview pixels
    #[arg(long)]
    pub hole_size: Option<u32>,

    /// Patch side in full-resolution pixels
    #[arg(long)]
    pub patch_size: Option<u32>,

    /// Minimum tissue fraction of a kept patch
    #[arg(long)]
    pub tissue_ratio: Option<f64>,

    /// Gap-closing radius in sampling-level pixels
    #[arg(long)]
    pub closing_radius: Option<u8>,
}

impl SlideArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            overview_level: self.overview_level,
            sampling_level: self.sampling_level,
            white_tol: self.white_tol,
            black_tol: self.black_tol,
            hole_size: self.hole_size,
            patch_size: self.patch_size,
            tissue_ratio: self.tissue_ratio,
            closing_radius: self.closing_radius,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct OverviewArgs {
    #[command(flatten)]
    pub slide: SlideArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PatchesArgs {
    #[command(flatten)]
    pub slide: SlideArgs,

    /// Sample only this coarse region: row_min,row_max,col_min,col_max
    #[arg(long, value_parser = parse_roi, allow_hyphen_values = true)]
    pub region: Option<Roi>,
}

/// Parse `row_min,row_max,col_min,col_max`
pub fn parse_roi(value: &str) -> Result<Roi, String> {
    let parts = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid coordinate '{}': {}", part.trim(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        &[row_min, row_max, col_min, col_max] => Ok(Roi::new(row_min, row_max, col_min, col_max)),
        _ => Err(format!("expected 4 comma-separated values, got {}", parts.len())),
    }
}
