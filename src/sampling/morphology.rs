//! Square-footprint erosion
//!
//! `imageproc::morphology::erode` only offers odd, centred norm balls. Patch
//! sampling needs a square of arbitrary side, so the erosion is done here as
//! two separable line passes.

use image::{GrayImage, Luma};

use crate::tissue::{BACKGROUND, TISSUE};

/// Erode `mask` with a `side x side` square footprint
///
/// The footprint origin sits at index `(side - 1) / 2`, so for even sides it
/// reaches one pixel further down/right than up/left. Pixels beyond the image border
/// count as tissue, so edges are not eroded from outside. Sides of 0 or 1
/// leave the mask unchanged.
#[must_use = "returns a new eroded mask"]
pub fn erode_square(mask: &GrayImage, side: u32) -> GrayImage {
    if side <= 1 {
        return mask.clone();
    }
    let after = side / 2;
    let before = side - 1 - after;

    let horizontal = erode_lines(mask, before, after, Axis::Rows);
    erode_lines(&horizontal, before, after, Axis::Columns)
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Rows,
    Columns,
}

/// 1D erosion along every line of `axis` with window `[k - before, k + after]`
fn erode_lines(mask: &GrayImage, before: u32, after: u32, axis: Axis) -> GrayImage {
    let (width, height) = mask.dimensions();
    let (length, lines) = match axis {
        Axis::Rows => (width, height),
        Axis::Columns => (height, width),
    };
    let at = |line: u32, k: u32| match axis {
        Axis::Rows => (k, line),
        Axis::Columns => (line, k),
    };

    let mut eroded = GrayImage::new(width, height);
    // gaps[k] = background pixels among the first k pixels of the line
    let mut gaps = vec![0u32; length as usize + 1];

    for line in 0..lines {
        for k in 0..length {
            let (x, y) = at(line, k);
            let background = mask.get_pixel(x, y).0[0] == BACKGROUND;
            gaps[k as usize + 1] = gaps[k as usize] + u32::from(background);
        }
        for k in 0..length {
            let lo = k.saturating_sub(before) as usize;
            let hi = (k.saturating_add(after)).min(length - 1) as usize;
            if gaps[hi + 1] == gaps[lo] {
                let (x, y) = at(line, k);
                eroded.put_pixel(x, y, Luma([TISSUE]));
            }
        }
    }

    eroded
}
