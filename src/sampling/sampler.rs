//! Region pass: tissue patches inside one coarse region

use image::RgbImage;
use imageproc::distance_transform::Norm;
use imageproc::morphology::close;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::coverage::TissueCoverage;
use super::morphology::erode_square;
use super::seed::RegularSeed;
use crate::slide::{level_downsample, read_rgb, FullResPoint, SlideSource};
use crate::tissue::{tissue_mask, DEFAULT_BLACK_TOL, DEFAULT_WHITE_TOL};
use crate::types::{Result, Roi, RoiError};

// ============================================================
// Constants
// ============================================================

/// Default pyramid level read for patch sampling
pub const DEFAULT_SAMPLING_LEVEL: u32 = 2;

/// Default patch side in full-resolution pixels
pub const DEFAULT_PATCH_SIZE: u32 = 250;

/// Default minimum tissue fraction of a patch window
pub const DEFAULT_TISSUE_RATIO: f64 = 0.75;

/// Default disk radius of the gap-closing step, in sampling-level pixels
pub const DEFAULT_CLOSING_RADIUS: u8 = 20;

// ============================================================
// Options
// ============================================================

/// Patch sampling options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingOptions {
    /// Pyramid level the coarse region is re-read at
    pub level: u32,
    /// Patch side in full-resolution pixels
    pub patch_size: u32,
    /// Channel value at or above which a pixel counts as glass
    pub white_tol: u8,
    /// A patch is kept when its eroded tissue count exceeds this fraction of its area
    pub tissue_ratio: f64,
    /// Disk radius used to close small gaps in the tissue mask
    pub closing_radius: u8,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_SAMPLING_LEVEL,
            patch_size: DEFAULT_PATCH_SIZE,
            white_tol: DEFAULT_WHITE_TOL,
            tissue_ratio: DEFAULT_TISSUE_RATIO,
            closing_radius: DEFAULT_CLOSING_RADIUS,
        }
    }
}

impl SamplingOptions {
    /// Create a new options builder
    pub fn builder() -> SamplingOptionsBuilder {
        SamplingOptionsBuilder::default()
    }

    /// Patch side in sampling-level pixels
    pub fn patch_width(&self) -> Result<u32> {
        let downsample = level_downsample(self.level)?;
        let width = i64::from(self.patch_size) / downsample;
        if width == 0 {
            return Err(RoiError::invalid(format!(
                "patch_size {} is smaller than one level-{} pixel ({} px)",
                self.patch_size, self.level, downsample
            )));
        }
        Ok(width as u32)
    }

    /// Check patch size, ratio, tolerance and level
    pub fn validate(&self) -> Result<()> {
        if self.patch_size == 0 {
            return Err(RoiError::invalid("patch_size must be positive"));
        }
        if !(self.tissue_ratio > 0.0 && self.tissue_ratio <= 1.0) {
            return Err(RoiError::invalid(format!(
                "tissue_ratio {} must lie in (0, 1]",
                self.tissue_ratio
            )));
        }
        if self.white_tol <= DEFAULT_BLACK_TOL {
            return Err(RoiError::invalid(format!(
                "white_tol {} must exceed black tolerance {}",
                self.white_tol, DEFAULT_BLACK_TOL
            )));
        }
        self.patch_width()?;
        Ok(())
    }
}

/// Builder for SamplingOptions
#[derive(Debug, Default)]
pub struct SamplingOptionsBuilder {
    options: SamplingOptions,
}

impl SamplingOptionsBuilder {
    /// Set sampling pyramid level
    #[must_use]
    pub fn level(mut self, level: u32) -> Self {
        self.options.level = level;
        self
    }

    /// Set patch side in full-resolution pixels
    #[must_use]
    pub fn patch_size(mut self, size: u32) -> Self {
        self.options.patch_size = size;
        self
    }

    /// Set white tolerance (0-255)
    #[must_use]
    pub fn white_tol(mut self, tol: u8) -> Self {
        self.options.white_tol = tol;
        self
    }

    /// Set minimum tissue fraction
    #[must_use]
    pub fn tissue_ratio(mut self, ratio: f64) -> Self {
        self.options.tissue_ratio = ratio;
        self
    }

    /// Set closing disk radius
    #[must_use]
    pub fn closing_radius(mut self, radius: u8) -> Self {
        self.options.closing_radius = radius;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> SamplingOptions {
        self.options
    }
}

// ============================================================
// Sampler
// ============================================================

/// Lays a patch grid over a coarse region and keeps tissue-rich cells
pub struct PatchSampler;

impl PatchSampler {
    /// Patch regions of `region` in full-resolution coordinates
    ///
    /// A region too small to hold one patch yields an empty list.
    pub fn sample<S: SlideSource + ?Sized>(
        slide: &S,
        region: &Roi,
        options: &SamplingOptions,
    ) -> Result<Vec<Roi>> {
        options.validate()?;
        if region.row_min < 0 || region.col_min < 0 || region.height() < 0 || region.width() < 0
        {
            return Err(RoiError::invalid(format!(
                "coarse region {:?} has a negative origin or inverted bounds",
                region
            )));
        }

        let downsample = level_downsample(options.level)?;
        let width = options.patch_width()?;
        let to_level = |extent: i64| {
            u32::try_from(extent / downsample).map_err(|_| {
                RoiError::invalid(format!(
                    "coarse region {:?} is too large for level {}",
                    region, options.level
                ))
            })
        };
        let size = (to_level(region.width())?, to_level(region.height())?);

        if size.0 == 0 || size.1 == 0 {
            debug!(?region, level = options.level, "region thinner than one sample pixel");
            return Ok(Vec::new());
        }

        let origin = FullResPoint::new(region.row_min as u64, region.col_min as u64);
        let sample = read_rgb(slide, origin, options.level, size)?;

        let patches: Vec<Roi> = Self::sample_in_image(&sample, width, options)?
            .into_iter()
            .map(|patch| {
                patch
                    .scaled(downsample)
                    .translated(region.row_min, region.col_min)
            })
            .collect();

        info!(
            ?region,
            patches = patches.len(),
            patch_size = options.patch_size,
            "region pass complete"
        );
        Ok(patches)
    }

    /// Patch boxes of an already-read sample, in sample coordinates
    ///
    /// `width` is the patch side in sample pixels. Seeds mark patch centres,
    /// so the first lattice row and column shift to a negative start. Those
    /// windows count no tissue and are never kept, so every box lies inside
    /// the sample.
    pub fn sample_in_image(
        sample: &RgbImage,
        width: u32,
        options: &SamplingOptions,
    ) -> Result<Vec<Roi>> {
        if width == 0 {
            return Err(RoiError::invalid("patch width must be positive"));
        }
        options.validate()?;

        let tissue = tissue_mask(sample, DEFAULT_BLACK_TOL, options.white_tol)?;
        let closed = close(&tissue, Norm::L2, options.closing_radius);
        let sampling_mask = erode_square(&closed, width / 2);
        let coverage = TissueCoverage::new(&sampling_mask);

        let (cols, rows) = sampling_mask.dimensions();
        let seeds = RegularSeed::new((rows, cols), width);
        let half = i64::from(width / 2);
        let side = i64::from(width);
        let threshold = options.tissue_ratio * (side * side) as f64;

        let patches: Vec<Roi> = seeds
            .iter()
            .filter_map(|(row, col)| {
                let i = i64::from(row) - half;
                let j = i64::from(col) - half;
                let covered = f64::from(coverage.window_sum(i, j, side));
                (covered > threshold).then(|| Roi::new(i, i + side, j, j + side))
            })
            .collect();

        debug!(
            seeds = seeds.len(),
            accepted = patches.len(),
            width,
            eroded_tissue = coverage.total(),
            "sampled patch grid"
        );
        Ok(patches)
    }
}
