//! Patch sampling inside coarse regions
//!
//! Re-reads one coarse region at a finer pyramid level, lays a regular grid
//! of patch-sized cells over it and keeps the cells whose eroded tissue
//! coverage exceeds the configured ratio.
//!
//! # Algorithm
//!
//! 1. Read the region at the sampling level
//! 2. Threshold below `white_tol` and close gaps with a disk ([`PatchSampler`])
//! 3. Erode with a square of half the patch width ([`erode_square`])
//! 4. For every seed of a [`RegularSeed`] lattice, count tissue in the patch
//!    window centred on it ([`TissueCoverage`]) and keep it above the ratio

// Submodules
mod coverage;
mod morphology;
mod sampler;
mod seed;

// Re-export public API
pub use coverage::TissueCoverage;
pub use morphology::erode_square;
pub use sampler::{
    PatchSampler, SamplingOptions, SamplingOptionsBuilder, DEFAULT_CLOSING_RADIUS,
    DEFAULT_PATCH_SIZE, DEFAULT_SAMPLING_LEVEL, DEFAULT_TISSUE_RATIO,
};
pub use seed::{RegularSeed, SeedIter};
