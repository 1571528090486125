//! Overview pass: coarse tissue regions of a whole slide

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clean::MaskCleaner;
use super::crop::Cropper;
use super::label::RegionLabeler;
use super::threshold::{tissue_mask, tissue_pixel_count};
use super::{DEFAULT_BLACK_TOL, DEFAULT_HOLE_SIZE, DEFAULT_WHITE_TOL};
use crate::slide::{level_dimensions, level_downsample, read_rgb, FullResPoint, SlideSource};
use crate::types::{Result, RoiError};
use crate::Roi;

/// Default pyramid level read for the overview
pub const DEFAULT_OVERVIEW_LEVEL: u32 = 5;

// ============================================================
// Options
// ============================================================

/// Overview pass options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewOptions {
    /// Pyramid level of the overview image
    pub level: u32,
    /// Channel value at or above which a pixel counts as glass
    pub white_tol: u8,
    /// Channel value at or below which a pixel counts as black border
    pub black_tol: u8,
    /// Components smaller than this many overview pixels are discarded
    pub hole_size: u32,
}

impl Default for OverviewOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_OVERVIEW_LEVEL,
            white_tol: DEFAULT_WHITE_TOL,
            black_tol: DEFAULT_BLACK_TOL,
            hole_size: DEFAULT_HOLE_SIZE,
        }
    }
}

impl OverviewOptions {
    /// Create a new options builder
    pub fn builder() -> OverviewOptionsBuilder {
        OverviewOptionsBuilder::default()
    }

    /// Check tolerances and level
    pub fn validate(&self) -> Result<()> {
        if self.black_tol >= self.white_tol {
            return Err(RoiError::invalid(format!(
                "black_tol ({}) must be below white_tol ({})",
                self.black_tol, self.white_tol
            )));
        }
        level_downsample(self.level)?;
        Ok(())
    }
}

/// Builder for OverviewOptions
#[derive(Debug, Default)]
pub struct OverviewOptionsBuilder {
    options: OverviewOptions,
}

impl OverviewOptionsBuilder {
    /// Set overview pyramid level
    #[must_use]
    pub fn level(mut self, level: u32) -> Self {
        self.options.level = level;
        self
    }

    /// Set white tolerance (0-255)
    #[must_use]
    pub fn white_tol(mut self, tol: u8) -> Self {
        self.options.white_tol = tol;
        self
    }

    /// Set black tolerance (0-255)
    #[must_use]
    pub fn black_tol(mut self, tol: u8) -> Self {
        self.options.black_tol = tol;
        self
    }

    /// Set minimum component size in overview pixels
    #[must_use]
    pub fn hole_size(mut self, size: u32) -> Self {
        self.options.hole_size = size;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> OverviewOptions {
        self.options
    }
}

// ============================================================
// Detector
// ============================================================

/// Locates tissue-microarray cores (or any tissue blobs) on the overview level
pub struct TmaDetector;

impl TmaDetector {
    /// Coarse tissue regions of `slide` in full-resolution coordinates
    pub fn detect<S: SlideSource + ?Sized>(
        slide: &S,
        options: &OverviewOptions,
    ) -> Result<Vec<Roi>> {
        options.validate()?;
        let size = level_dimensions(slide, options.level)?;
        debug!(level = options.level, ?size, "reading overview");
        let overview = read_rgb(slide, FullResPoint::default(), options.level, size)?;
        Self::detect_in_overview(&overview, options)
    }

    /// Coarse tissue regions of an overview image read at `options.level`
    pub fn detect_in_overview(
        overview: &RgbImage,
        options: &OverviewOptions,
    ) -> Result<Vec<Roi>> {
        options.validate()?;
        let downsample = level_downsample(options.level)?;

        let cropped = Cropper::crop(overview, options.black_tol)?;
        let tissue = tissue_mask(&cropped.image, options.black_tol, options.white_tol)?;
        debug!(
            tissue_pixels = tissue_pixel_count(&tissue),
            "thresholded overview"
        );

        let cleaned = MaskCleaner::clean(&tissue, options.hole_size);
        let regions = RegionLabeler::regions(&cleaned, cropped.offset(), downsample);
        info!(regions = regions.len(), level = options.level, "overview pass complete");

        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{PatchSampler, SamplingOptions};
    use crate::slide::SyntheticSlide;
    use image::Rgb;

    const STAIN: Rgb<u8> = Rgb([200, 120, 160]);
    const GLASS: Rgb<u8> = Rgb([245, 245, 245]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    #[test]
    fn test_default_options() {
        let opts = OverviewOptions::default();
        assert_eq!(opts.level, 5);
        assert_eq!(opts.white_tol, 230);
        assert_eq!(opts.black_tol, 0);
        assert_eq!(opts.hole_size, 3000);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let opts = OverviewOptions::builder()
            .level(4)
            .white_tol(220)
            .black_tol(5)
            .hole_size(500)
            .build();
        assert_eq!(
            opts,
            OverviewOptions {
                level: 4,
                white_tol: 220,
                black_tol: 5,
                hole_size: 500,
            }
        );
    }

    #[test]
    fn test_invalid_tolerances() {
        let opts = OverviewOptions::builder().black_tol(200).white_tol(100).build();
        assert!(matches!(opts.validate(), Err(RoiError::InvalidParameter(_))));

        let overview = RgbImage::from_pixel(10, 10, STAIN);
        assert!(matches!(
            TmaDetector::detect_in_overview(&overview, &opts),
            Err(RoiError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_all_black_overview_is_empty_region() {
        let overview = RgbImage::new(64, 64);
        let result = TmaDetector::detect_in_overview(&overview, &OverviewOptions::default());
        assert!(matches!(result, Err(RoiError::EmptyRegion(_))));
    }

    #[test]
    fn test_glass_only_has_no_regions() {
        let overview = RgbImage::from_fn(64, 64, |x, y| {
            if (8..56).contains(&x) && (8..56).contains(&y) {
                GLASS
            } else {
                BLACK
            }
        });
        let regions =
            TmaDetector::detect_in_overview(&overview, &OverviewOptions::default()).unwrap();
        assert!(regions.is_empty());
    }

    // TC-ROI-004: block of known full-resolution position round-trips
    #[test]
    fn test_block_round_trip() {
        // block at overview rows 200..400, cols 120..320 => full res x32
        let slide = SyntheticSlide::new(16_000, 16_000, 6, |row, col| {
            if (6400..12_800).contains(&row) && (3840..10_240).contains(&col) {
                STAIN
            } else {
                BLACK
            }
        });
        let regions = TmaDetector::detect(&slide, &OverviewOptions::default()).unwrap();

        assert_eq!(regions.len(), 1);
        let roi = regions[0];
        let tolerance = 32;
        assert!((roi.row_min - 6400).abs() <= tolerance, "{:?}", roi);
        assert!((roi.row_max - 12_800).abs() <= tolerance, "{:?}", roi);
        assert!((roi.col_min - 3840).abs() <= tolerance, "{:?}", roi);
        assert!((roi.col_max - 10_240).abs() <= tolerance, "{:?}", roi);
    }

    #[test]
    fn test_cores_on_glass() {
        // two square cores on glass, framed by black slide border
        let overview = RgbImage::from_fn(300, 200, |x, y| {
            let core_a = (20..80).contains(&y) && (30..90).contains(&x);
            let core_b = (100..180).contains(&y) && (150..250).contains(&x);
            if core_a || core_b {
                STAIN
            } else if (10..190).contains(&y) && (10..290).contains(&x) {
                GLASS
            } else {
                BLACK
            }
        });
        let opts = OverviewOptions::builder().level(0).hole_size(100).build();
        let regions = TmaDetector::detect_in_overview(&overview, &opts).unwrap();

        // dilation grows each core by one pixel
        assert_eq!(
            regions,
            vec![Roi::new(19, 80, 29, 90), Roi::new(99, 180, 149, 250)]
        );
    }

    #[test]
    fn test_small_specks_dropped() {
        let overview = RgbImage::from_fn(120, 120, |x, y| {
            if (10..12).contains(&x) && (10..12).contains(&y) {
                STAIN
            } else if (40..100).contains(&x) && (40..100).contains(&y) {
                STAIN
            } else {
                GLASS
            }
        });
        let opts = OverviewOptions::builder().level(1).hole_size(50).build();
        let regions = TmaDetector::detect_in_overview(&overview, &opts).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0], Roi::new(39, 100, 39, 100).scaled(2));
    }

    #[test]
    fn test_one_pixel_strip_keeps_inclusive_extent() {
        let overview = RgbImage::from_pixel(40, 1, STAIN);
        let opts = OverviewOptions::builder().level(0).hole_size(1).build();
        let regions = TmaDetector::detect_in_overview(&overview, &opts).unwrap();
        assert_eq!(regions, vec![Roi::new(0, 0, 0, 39)]);

        let slide = SyntheticSlide::new(40, 40, 1, |_, _| STAIN);
        let patches =
            PatchSampler::sample(&slide, &regions[0], &SamplingOptions::default()).unwrap();
        assert!(patches.is_empty());
    }

    #[test]
    fn test_read_failure_surfaces() {
        let slide = SyntheticSlide::new(1000, 1000, 3, |_, _| STAIN);
        let result = TmaDetector::detect(&slide, &OverviewOptions::default());
        assert!(matches!(
            result,
            Err(RoiError::SourceReadFailure { level: 5, .. })
        ));
    }
}
