//! Procedurally painted slide

use image::{DynamicImage, Rgb, RgbImage};

use super::{FullResPoint, SlideSource, SourceError};

/// Slide whose pixels come from a paint function over full-resolution `(row, col)`
///
/// No pixel data is stored, so gigapixel extents cost nothing until a region is
/// read. Level `L` samples every `2^L`-th full-resolution pixel. Pixels outside
/// `width x height` read as black.
pub struct SyntheticSlide<F> {
    width: u64,
    height: u64,
    level_count: u32,
    paint: F,
}

impl<F> SyntheticSlide<F>
where
    F: Fn(u64, u64) -> Rgb<u8>,
{
    pub fn new(width: u64, height: u64, level_count: u32, paint: F) -> Self {
        Self {
            width,
            height,
            level_count,
            paint,
        }
    }

    /// Full-resolution `(width, height)`
    pub fn full_dimensions(&self) -> (u64, u64) {
        (self.width, self.height)
    }

    fn check_level(&self, level: u32) -> Result<u64, SourceError> {
        if level >= self.level_count || level >= 63 {
            return Err(format!(
                "level {} out of range (slide has {} levels)",
                level, self.level_count
            )
            .into());
        }
        Ok(1u64 << level)
    }
}

impl<F> std::fmt::Debug for SyntheticSlide<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticSlide")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("level_count", &self.level_count)
            .finish_non_exhaustive()
    }
}

impl<F> SlideSource for SyntheticSlide<F>
where
    F: Fn(u64, u64) -> Rgb<u8>,
{
    fn dimensions(&self, level: u32) -> Result<(u32, u32), SourceError> {
        self.check_level(level)?;
        let width = u32::try_from(self.width >> level)?;
        let height = u32::try_from(self.height >> level)?;
        Ok((width, height))
    }

    fn read_region(
        &self,
        origin: FullResPoint,
        level: u32,
        size: (u32, u32),
    ) -> Result<DynamicImage, SourceError> {
        let scale = self.check_level(level)?;
        let region = RgbImage::from_fn(size.0, size.1, |x, y| {
            let row = origin.row + u64::from(y) * scale;
            let col = origin.col + u64::from(x) * scale;
            if row < self.height && col < self.width {
                (self.paint)(row, col)
            } else {
                Rgb([0, 0, 0])
            }
        });
        Ok(DynamicImage::ImageRgb8(region))
    }
}
