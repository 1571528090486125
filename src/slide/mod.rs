//! Pyramidal slide access
//!
//! The core never decodes slide files itself. It talks to a [`SlideSource`],
//! which reports per-level dimensions and returns pixel regions addressed by a
//! full-resolution origin.
//!
//! # Coordinates
//!
//! Level 0 is full resolution and every level halves the linear resolution, so
//! a level `L` pixel covers `2^L x 2^L` full-resolution pixels. Region origins
//! are always given in full-resolution pixels; region sizes are given in the
//! requested level's pixels.

mod raster;
mod synthetic;

pub use raster::ImageSlide;
pub use synthetic::SyntheticSlide;

use image::{DynamicImage, RgbImage};

use crate::types::{Result, RoiError};

/// Deepest pyramid level accepted by the extraction passes
pub const MAX_PYRAMID_LEVEL: u32 = 30;

/// Error returned by slide sources
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// A point in full-resolution (level 0) pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FullResPoint {
    pub row: u64,
    pub col: u64,
}

impl FullResPoint {
    pub fn new(row: u64, col: u64) -> Self {
        Self { row, col }
    }
}

/// Source of pyramidal pixel data
pub trait SlideSource {
    /// `(width, height)` of the image at `level`
    fn dimensions(&self, level: u32) -> std::result::Result<(u32, u32), SourceError>;

    /// Read `size = (width, height)` level pixels starting at `origin`
    ///
    /// The returned image may be RGB or RGBA; any alpha channel is dropped.
    fn read_region(
        &self,
        origin: FullResPoint,
        level: u32,
        size: (u32, u32),
    ) -> std::result::Result<DynamicImage, SourceError>;
}

/// Downsampling factor `2^level` between `level` and full resolution
pub fn level_downsample(level: u32) -> Result<i64> {
    if level > MAX_PYRAMID_LEVEL {
        return Err(RoiError::invalid(format!(
            "pyramid level {} exceeds maximum {}",
            level, MAX_PYRAMID_LEVEL
        )));
    }
    Ok(1i64 << level)
}

/// Query level dimensions, mapping failures to [`RoiError::SourceReadFailure`]
pub(crate) fn level_dimensions<S: SlideSource + ?Sized>(
    slide: &S,
    level: u32,
) -> Result<(u32, u32)> {
    slide
        .dimensions(level)
        .map_err(|source| RoiError::SourceReadFailure { level, source })
}

/// Read a region as RGB and check that the source honoured the requested size
pub(crate) fn read_rgb<S: SlideSource + ?Sized>(
    slide: &S,
    origin: FullResPoint,
    level: u32,
    size: (u32, u32),
) -> Result<RgbImage> {
    let region = slide
        .read_region(origin, level, size)
        .map_err(|source| RoiError::SourceReadFailure { level, source })?;

    let rgb = region.into_rgb8();
    if rgb.dimensions() != size {
        return Err(RoiError::SourceReadFailure {
            level,
            source: format!(
                "requested {}x{} pixels, source returned {}x{}",
                size.0,
                size.1,
                rgb.width(),
                rgb.height()
            )
            .into(),
        });
    }

    Ok(rgb)
}
