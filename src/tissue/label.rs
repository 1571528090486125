//! Connected-component labeling and region extents

use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::region_labelling::{connected_components, Connectivity};

use super::threshold::BACKGROUND;
use crate::types::Roi;

/// Inclusive pixel extent of one label
#[derive(Debug, Clone, Copy)]
struct LabelExtent {
    min_x: u32,
    max_x: u32,
    min_y: u32,
    max_y: u32,
}

impl LabelExtent {
    fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            max_x: x,
            min_y: y,
            max_y: y,
        }
    }

    fn expand_to_contain(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }
}

/// Labels tissue components and maps their extents to slide coordinates
pub struct RegionLabeler;

impl RegionLabeler {
    /// 8-connected labeling of `mask` and the number of components found
    ///
    /// Labels run from 1 in raster-scan order of each component's first pixel.
    pub fn label(mask: &GrayImage) -> (Image<Luma<u32>>, u32) {
        let labels = connected_components(mask, Connectivity::Eight, Luma([BACKGROUND]));
        let count = labels.pixels().map(|p| p.0[0]).max().unwrap_or(0);
        (labels, count)
    }

    /// One region per component, in label order
    ///
    /// Each extent is the inclusive bounding box of the component, shifted by
    /// `offset = (row, col)` and multiplied by `downsample`. A component one
    /// pixel thick gives `row_min == row_max` (or `col_min == col_max`), which
    /// the sampler treats as an empty region. An empty mask yields no regions.
    pub fn regions(mask: &GrayImage, offset: (u32, u32), downsample: i64) -> Vec<Roi> {
        let (labels, count) = Self::label(mask);

        let mut extents: Vec<Option<LabelExtent>> = vec![None; count as usize + 1];
        for (x, y, label) in labels.enumerate_pixels() {
            let label = label.0[0] as usize;
            if label == 0 {
                continue;
            }
            extents[label] = Some(match extents[label] {
                Some(mut extent) => {
                    extent.expand_to_contain(x, y);
                    extent
                }
                None => LabelExtent::at(x, y),
            });
        }

        let (row_offset, col_offset) = (i64::from(offset.0), i64::from(offset.1));
        extents
            .into_iter()
            .flatten()
            .map(|extent| {
                Roi::new(
                    i64::from(extent.min_y),
                    i64::from(extent.max_y),
                    i64::from(extent.min_x),
                    i64::from(extent.max_x),
                )
                .translated(row_offset, col_offset)
                .scaled(downsample)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tissue::threshold::TISSUE;

    fn mask_with_blocks(width: u32, height: u32, blocks: &[(u32, u32, u32, u32)]) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            let inside = blocks
                .iter()
                .any(|&(r0, r1, c0, c1)| y >= r0 && y < r1 && x >= c0 && x < c1);
            Luma([if inside { TISSUE } else { BACKGROUND }])
        })
    }

    #[test]
    fn test_single_block_extent() {
        let mask = mask_with_blocks(40, 30, &[(5, 15, 10, 30)]);
        let regions = RegionLabeler::regions(&mask, (0, 0), 1);
        assert_eq!(regions, vec![Roi::new(5, 14, 10, 29)]);
    }

    #[test]
    fn test_offset_applied_before_scaling() {
        let mask = mask_with_blocks(40, 30, &[(5, 15, 10, 30)]);
        let regions = RegionLabeler::regions(&mask, (3, 7), 32);
        assert_eq!(
            regions,
            vec![Roi::new((5 + 3) * 32, (14 + 3) * 32, (10 + 7) * 32, (29 + 7) * 32)]
        );
    }

    #[test]
    fn test_regions_follow_label_order() {
        // the lower-left block starts later in raster order than the upper-right one
        let mask = mask_with_blocks(60, 60, &[(30, 50, 2, 12), (4, 10, 40, 55)]);
        let regions = RegionLabeler::regions(&mask, (0, 0), 1);
        assert_eq!(
            regions,
            vec![Roi::new(4, 9, 40, 54), Roi::new(30, 49, 2, 11)]
        );
    }

    #[test]
    fn test_labeling_is_eight_connected() {
        let mask = mask_with_blocks(10, 10, &[(0, 3, 0, 3), (3, 6, 3, 6)]);
        let (_, count) = RegionLabeler::label(&mask);
        assert_eq!(count, 1);
        let regions = RegionLabeler::regions(&mask, (0, 0), 1);
        assert_eq!(regions, vec![Roi::new(0, 5, 0, 5)]);
    }

    #[test]
    fn test_single_row_component_has_zero_height() {
        let mask = mask_with_blocks(40, 1, &[(0, 1, 0, 40)]);
        let regions = RegionLabeler::regions(&mask, (0, 0), 1);
        assert_eq!(regions, vec![Roi::new(0, 0, 0, 39)]);
        assert_eq!(regions[0].height(), 0);
    }

    #[test]
    fn test_empty_mask_has_no_regions() {
        let mask = GrayImage::new(25, 25);
        let (_, count) = RegionLabeler::label(&mask);
        assert_eq!(count, 0);
        assert!(RegionLabeler::regions(&mask, (4, 4), 32).is_empty());
    }
}
