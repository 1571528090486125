//! Black border removal

use image::{imageops, RgbImage};
use tracing::debug;

use crate::types::{Result, RoiError};

/// Bounding box of non-black content together with the cropped pixels
#[derive(Debug, Clone)]
pub struct CropResult {
    /// `(row_min, row_max)`, `row_max` exclusive
    pub rows: (u32, u32),
    /// `(col_min, col_max)`, `col_max` exclusive
    pub cols: (u32, u32),
    /// Pixels inside the box
    pub image: RgbImage,
}

impl CropResult {
    /// Top-left corner `(row, col)` of the box in the source image
    pub fn offset(&self) -> (u32, u32) {
        (self.rows.0, self.cols.0)
    }
}

/// Crops a uniform black border off an overview image
pub struct Cropper;

impl Cropper {
    /// Crop `image` to the bounding box of pixels whose red channel exceeds `tol`
    ///
    /// Fails with [`RoiError::EmptyRegion`] when no pixel exceeds `tol`.
    pub fn crop(image: &RgbImage, tol: u8) -> Result<CropResult> {
        let (width, height) = image.dimensions();
        let mut min_x = u32::MAX;
        let mut min_y = u32::MAX;
        let mut max_x = 0u32;
        let mut max_y = 0u32;
        let mut found = false;

        for (x, y, pixel) in image.enumerate_pixels() {
            if pixel.0[0] > tol {
                found = true;
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }

        if !found {
            return Err(RoiError::EmptyRegion(format!(
                "no pixel of the {}x{} image exceeds black tolerance {}",
                width, height, tol
            )));
        }

        let rows = (min_y, max_y + 1);
        let cols = (min_x, max_x + 1);
        debug!(?rows, ?cols, "cropped black border");

        let cropped =
            imageops::crop_imm(image, cols.0, rows.0, cols.1 - cols.0, rows.1 - rows.0).to_image();

        Ok(CropResult {
            rows,
            cols,
            image: cropped,
        })
    }
}
