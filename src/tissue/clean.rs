//! Morphological repair of overview tissue masks

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use imageproc::region_labelling::{connected_components, Connectivity};
use tracing::debug;

use super::threshold::{BACKGROUND, TISSUE};

/// Repairs fractures and drops specks in a tissue mask
pub struct MaskCleaner;

impl MaskCleaner {
    /// Dilate by one pixel (4-neighbourhood), then drop components below `hole_size` pixels
    ///
    /// Dilation runs first so thin fractures are bridged before component
    /// sizes are measured.
    pub fn clean(mask: &GrayImage, hole_size: u32) -> GrayImage {
        let repaired = dilate(mask, Norm::L1, 1);
        Self::remove_small_components(&repaired, hole_size)
    }

    /// Clear every 4-connected tissue component with fewer than `min_size` pixels
    pub fn remove_small_components(mask: &GrayImage, min_size: u32) -> GrayImage {
        let labels = connected_components(mask, Connectivity::Four, Luma([BACKGROUND]));

        let mut sizes: Vec<u32> = Vec::new();
        for label in labels.pixels() {
            let label = label.0[0] as usize;
            if label == 0 {
                continue;
            }
            if sizes.len() <= label {
                sizes.resize(label + 1, 0);
            }
            sizes[label] += 1;
        }

        let removed = sizes
            .iter()
            .skip(1)
            .filter(|&&size| size > 0 && size < min_size)
            .count();
        debug!(
            components = sizes.len().saturating_sub(1),
            removed, min_size, "filtered small tissue components"
        );

        let (width, height) = mask.dimensions();
        GrayImage::from_fn(width, height, |x, y| {
            let label = labels.get_pixel(x, y).0[0] as usize;
            if label != 0 && sizes[label] >= min_size {
                Luma([TISSUE])
            } else {
                Luma([BACKGROUND])
            }
        })
    }
}
