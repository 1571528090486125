//! In-memory pyramid built from a single raster image

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::path::Path;

use super::{FullResPoint, SlideSource, SourceError};

/// Slide backed by an in-memory pyramid
///
/// Level 0 is the source raster; each further level is the previous one
/// downscaled by two. Pixels outside the image read as black.
#[derive(Debug, Clone)]
pub struct ImageSlide {
    levels: Vec<RgbImage>,
}

impl ImageSlide {
    /// Build a pyramid of `level_count` levels (at least one) from `base`
    pub fn from_image(base: RgbImage, level_count: u32) -> Self {
        let mut levels = vec![base];
        for _ in 1..level_count.max(1) {
            let Some(previous) = levels.last() else { break };
            let (width, height) = previous.dimensions();
            let next = imageops::resize(
                previous,
                (width / 2).max(1),
                (height / 2).max(1),
                FilterType::Triangle,
            );
            levels.push(next);
        }
        Self { levels }
    }

    /// Open a raster file (any format the `image` crate decodes) as level 0
    pub fn open(path: &Path, level_count: u32) -> Result<Self, SourceError> {
        let base = image::open(path)?.into_rgb8();
        Ok(Self::from_image(base, level_count))
    }

    /// Number of pyramid levels
    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    fn level(&self, level: u32) -> Result<&RgbImage, SourceError> {
        self.levels.get(level as usize).ok_or_else(|| {
            format!(
                "level {} out of range (slide has {} levels)",
                level,
                self.levels.len()
            )
            .into()
        })
    }
}

impl SlideSource for ImageSlide {
    fn dimensions(&self, level: u32) -> Result<(u32, u32), SourceError> {
        Ok(self.level(level)?.dimensions())
    }

    fn read_region(
        &self,
        origin: FullResPoint,
        level: u32,
        size: (u32, u32),
    ) -> Result<DynamicImage, SourceError> {
        let image = self.level(level)?;
        let scale = 1u64 << level;
        let x0 = origin.col / scale;
        let y0 = origin.row / scale;

        let mut region = RgbImage::new(size.0, size.1);
        let (level_width, level_height) = image.dimensions();
        if x0 < u64::from(level_width) && y0 < u64::from(level_height) {
            let (x0, y0) = (x0 as u32, y0 as u32);
            let width = size.0.min(level_width - x0);
            let height = size.1.min(level_height - y0);
            let tile = imageops::crop_imm(image, x0, y0, width, height).to_image();
            imageops::replace(&mut region, &tile, 0, 0);
        }

        Ok(DynamicImage::ImageRgb8(region))
    }
}
