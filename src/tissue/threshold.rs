//! Per-channel intensity thresholding

use image::{GrayImage, Luma, RgbImage};
use imageproc::map::map_colors;

use crate::types::{Result, RoiError};

/// Mask value for tissue pixels
pub const TISSUE: u8 = 255;

/// Mask value for background pixels
pub const BACKGROUND: u8 = 0;

/// Tissue mask of `image`
///
/// A pixel is tissue when each of its R, G and B values lies strictly between
/// `black_tol` and `white_tol`.
pub fn tissue_mask(image: &RgbImage, black_tol: u8, white_tol: u8) -> Result<GrayImage> {
    if black_tol >= white_tol {
        return Err(RoiError::invalid(format!(
            "black tolerance {} must be below white tolerance {}",
            black_tol, white_tol
        )));
    }

    Ok(map_colors(image, |pixel| {
        let tissue = pixel.0.iter().all(|&c| c > black_tol && c < white_tol);
        Luma([if tissue { TISSUE } else { BACKGROUND }])
    }))
}

/// Number of tissue pixels in `mask`
pub fn tissue_pixel_count(mask: &GrayImage) -> u64 {
    mask.pixels().filter(|p| p.0[0] != BACKGROUND).count() as u64
}
