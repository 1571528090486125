//! slide-rois - Tissue region and patch extraction for whole-slide images
//!
//! Two passes over a pyramidal slide:
//!
//! - **Overview pass** ([`TmaDetector`]): locate tissue-microarray cores or
//!   other tissue blobs on a coarse level and return their extents in
//!   full-resolution coordinates.
//! - **Region pass** ([`PatchSampler`]): re-read one coarse region at a finer
//!   level and return fixed-size patches that are mostly tissue.
//!
//! [`RoiPipeline`] runs both for one slide. Slide access goes through the
//! [`SlideSource`] trait; [`ImageSlide`] and [`SyntheticSlide`] are provided.
//!
//! # Example
//!
//! ```rust,no_run
//! use slide_rois::{ImageSlide, RoiConfig, RoiPipeline};
//! use std::path::Path;
//!
//! let slide = ImageSlide::open(Path::new("slide.png"), 6).unwrap();
//! let pipeline = RoiPipeline::new(RoiConfig::default());
//!
//! for region in pipeline.run(&slide).unwrap() {
//!     println!("{:?}: {} patches", region.region, region.patches.len());
//! }
//! ```

pub mod cli;
pub mod config;
pub mod pipeline;
pub mod sampling;
pub mod slide;
pub mod tissue;
pub mod types;

// Core types
pub use types::{Result, Roi, RoiError};

// Slide access
pub use slide::{
    level_downsample, FullResPoint, ImageSlide, SlideSource, SourceError, SyntheticSlide,
    MAX_PYRAMID_LEVEL,
};

// Overview pass
pub use tissue::{
    tissue_mask, CropResult, Cropper, MaskCleaner, OverviewOptions, OverviewOptionsBuilder,
    RegionLabeler, TmaDetector, DEFAULT_BLACK_TOL, DEFAULT_HOLE_SIZE, DEFAULT_OVERVIEW_LEVEL,
    DEFAULT_WHITE_TOL,
};

// Region pass
pub use sampling::{
    erode_square, PatchSampler, RegularSeed, SamplingOptions, SamplingOptionsBuilder, SeedIter,
    TissueCoverage, DEFAULT_CLOSING_RADIUS, DEFAULT_PATCH_SIZE, DEFAULT_SAMPLING_LEVEL,
    DEFAULT_TISSUE_RATIO,
};

// Pipeline
pub use pipeline::{RegionPatches, RoiPipeline};

// Config
pub use config::{CliOverrides, ConfigError, RoiConfig};

// CLI
pub use cli::{exit_codes, Cli, Commands, OverviewArgs, PatchesArgs, SlideArgs};
