//! Tissue detection on the overview level
//!
//! Locates macroscopic tissue regions (tissue-microarray cores) on a
//! low-resolution pyramid level and reports them in full-resolution
//! coordinates.
//!
//! # Algorithm
//!
//! 1. Crop the black slide border ([`Cropper`])
//! 2. Threshold each RGB channel between black and white tolerances ([`tissue_mask`])
//! 3. Dilate by one pixel, then drop components below `hole_size` ([`MaskCleaner`])
//! 4. Label 8-connected components and map their extents to level 0 ([`RegionLabeler`])
//!
//! # Example
//!
//! ```rust,no_run
//! use slide_rois::{ImageSlide, OverviewOptions, TmaDetector};
//! use std::path::Path;
//!
//! let slide = ImageSlide::open(Path::new("overview.png"), 6).unwrap();
//! let options = OverviewOptions::builder().hole_size(2000).build();
//!
//! for roi in TmaDetector::detect(&slide, &options).unwrap() {
//!     println!("core rows {}..{} cols {}..{}", roi.row_min, roi.row_max, roi.col_min, roi.col_max);
//! }
//! ```

// Submodules
mod clean;
mod crop;
mod label;
mod overview;
mod threshold;

// Re-export public API
pub use clean::MaskCleaner;
pub use crop::{CropResult, Cropper};
pub use label::RegionLabeler;
pub use overview::{OverviewOptions, OverviewOptionsBuilder, TmaDetector, DEFAULT_OVERVIEW_LEVEL};
pub use threshold::{tissue_mask, tissue_pixel_count, BACKGROUND, TISSUE};

// ============================================================
// Constants
// ============================================================

/// Default black tolerance (channel values at or below are border)
pub const DEFAULT_BLACK_TOL: u8 = 0;

/// Default white tolerance (channel values at or above are glass)
pub const DEFAULT_WHITE_TOL: u8 = 230;

/// Default minimum tissue component size in overview pixels
pub const DEFAULT_HOLE_SIZE: u32 = 3000;
