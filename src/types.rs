//! Core types shared by the overview and sampling passes

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::slide::SourceError;

// ============================================================
// Error Types
// ============================================================

/// ROI extraction error types
#[derive(Debug, Error)]
pub enum RoiError {
    #[error("Empty region: {0}")]
    EmptyRegion(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Slide read failed at level {level}: {source}")]
    SourceReadFailure {
        level: u32,
        #[source]
        source: SourceError,
    },
}

pub type Result<T> = std::result::Result<T, RoiError>;

impl RoiError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        RoiError::InvalidParameter(message.into())
    }
}

// ============================================================
// Region of interest
// ============================================================

/// Rectangular region in full-resolution slide coordinates
///
/// Coarse regions from the overview pass carry the inclusive pixel extent of a
/// tissue component scaled to level 0, so a component one pixel thick has zero
/// height or width. Patch regions from the sampler are half-open boxes of
/// exactly one patch size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roi {
    pub row_min: i64,
    pub row_max: i64,
    pub col_min: i64,
    pub col_max: i64,
}

impl Roi {
    pub fn new(row_min: i64, row_max: i64, col_min: i64, col_max: i64) -> Self {
        Self {
            row_min,
            row_max,
            col_min,
            col_max,
        }
    }

    /// Row extent (`row_max - row_min`)
    pub fn height(&self) -> i64 {
        self.row_max - self.row_min
    }

    /// Column extent (`col_max - col_min`)
    pub fn width(&self) -> i64 {
        self.col_max - self.col_min
    }

    /// Multiply every coordinate by `factor`
    #[must_use]
    pub fn scaled(&self, factor: i64) -> Self {
        Self::new(
            self.row_min * factor,
            self.row_max * factor,
            self.col_min * factor,
            self.col_max * factor,
        )
    }

    /// Shift by `drow` rows and `dcol` columns
    #[must_use]
    pub fn translated(&self, drow: i64, dcol: i64) -> Self {
        Self::new(
            self.row_min + drow,
            self.row_max + drow,
            self.col_min + dcol,
            self.col_max + dcol,
        )
    }

    /// Check whether `other` lies entirely inside this region
    pub fn contains(&self, other: &Roi) -> bool {
        other.row_min >= self.row_min
            && other.row_max <= self.row_max
            && other.col_min >= self.col_min
            && other.col_max <= self.col_max
    }

    /// `[row_min, row_max, col_min, col_max]`
    pub fn to_array(&self) -> [i64; 4] {
        [self.row_min, self.row_max, self.col_min, self.col_max]
    }
}

impl From<[i64; 4]> for Roi {
    fn from(values: [i64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }
}
