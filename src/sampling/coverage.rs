//! Tissue counts over rectangular windows

use image::GrayImage;

use crate::tissue::BACKGROUND;

/// Summed-area table of tissue pixels
#[derive(Debug, Clone)]
pub struct TissueCoverage {
    width: usize,
    height: usize,
    integral: Vec<u32>,
}

impl TissueCoverage {
    pub fn new(mask: &GrayImage) -> Self {
        let (width, height) = (mask.width() as usize, mask.height() as usize);
        let stride = width + 1;
        let mut integral = vec![0u32; stride * (height + 1)];

        for (y, row) in mask.rows().enumerate() {
            let mut row_sum = 0u32;
            let dst = (y + 1) * stride;
            for (x, pixel) in row.enumerate() {
                row_sum += u32::from(pixel.0[0] != BACKGROUND);
                integral[dst + x + 1] = integral[dst - stride + x + 1] + row_sum;
            }
        }

        Self {
            width,
            height,
            integral,
        }
    }

    /// Tissue pixels in the `size x size` window with top-left `(row, col)`
    ///
    /// A window starting above or left of the mask counts nothing. A window
    /// running past the bottom or right edge is clipped to the mask.
    pub fn window_sum(&self, row: i64, col: i64, size: i64) -> u32 {
        if row < 0 || col < 0 {
            return 0;
        }
        let clamp = |v: i64, max: usize| v.clamp(0, max as i64) as usize;
        let y0 = clamp(row, self.height);
        let y1 = clamp(row + size, self.height);
        let x0 = clamp(col, self.width);
        let x1 = clamp(col + size, self.width);
        if y0 >= y1 || x0 >= x1 {
            return 0;
        }

        let stride = self.width + 1;
        let at = |x: usize, y: usize| self.integral[y * stride + x];
        at(x1, y1) + at(x0, y0) - at(x0, y1) - at(x1, y0)
    }

    /// Total tissue pixels
    pub fn total(&self) -> u32 {
        self.integral.last().copied().unwrap_or(0)
    }
}
