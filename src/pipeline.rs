//! Two-pass extraction pipeline for one slide

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::RoiConfig;
use crate::sampling::PatchSampler;
use crate::slide::SlideSource;
use crate::tissue::TmaDetector;
use crate::types::{Result, Roi};

/// Patches found inside one coarse region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPatches {
    pub region: Roi,
    pub patches: Vec<Roi>,
}

/// Overview pass followed by a region pass per coarse region
#[derive(Debug, Clone, Default)]
pub struct RoiPipeline {
    config: RoiConfig,
}

impl RoiPipeline {
    pub fn new(config: RoiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RoiConfig {
        &self.config
    }

    /// Coarse regions of `slide`
    pub fn overview<S: SlideSource + ?Sized>(&self, slide: &S) -> Result<Vec<Roi>> {
        TmaDetector::detect(slide, &self.config.overview)
    }

    /// Patches inside one coarse region
    pub fn patches<S: SlideSource + ?Sized>(&self, slide: &S, region: &Roi) -> Result<Vec<Roi>> {
        PatchSampler::sample(slide, region, &self.config.sampling)
    }

    /// Run both passes
    ///
    /// Regions are sampled in parallel. The result keeps overview order and the
    /// first failing region aborts the run.
    pub fn run<S: SlideSource + Sync + ?Sized>(&self, slide: &S) -> Result<Vec<RegionPatches>> {
        self.config.validate()?;
        let regions = self.overview(slide)?;

        let results = regions
            .par_iter()
            .map(|region| {
                self.patches(slide, region).map(|patches| RegionPatches {
                    region: *region,
                    patches,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            regions = results.len(),
            patches = results.iter().map(|r| r.patches.len()).sum::<usize>(),
            "pipeline complete"
        );
        Ok(results)
    }
}
