//! Title band and center regions: colors that stand apart from the background.

use super::{AccentCandidate, AccentStrategy, CandidateSource};
use crate::core_modules::color_buckets::ColorBuckets;
use crate::core_modules::cover_analyzer::CoverAnalysis;
use crate::core_modules::pixel_access::{PixelAccess, Region};

pub const CENTER_STRIDE: u32 = 3;

const CENTER_REGIONS: [Region; 4] = [
    // Upper-center title band.
    Region::new(0.1, 0.1, 0.8, 0.3),
    // Center.
    Region::new(0.2, 0.3, 0.6, 0.4),
    // Lower-center.
    Region::new(0.1, 0.6, 0.8, 0.3),
    // Dead center.
    Region::new(0.35, 0.35, 0.3, 0.3),
];

const LIGHT_COVER_MIN_DIFFERENCE: f32 = 0.25;
const DEFAULT_MIN_DIFFERENCE: f32 = 0.15;
const KEEP_MIN_SATURATION: f32 = 0.2;
const KEEP_MIN_DIFFERENCE: f32 = 0.4;
const MIN_BUCKET_COUNT: usize = 5;
const REGION_BONUS: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct CenterRegionStrategy {
    stride: u32,
}

impl Default for CenterRegionStrategy {
    fn default() -> Self {
        Self::new(CENTER_STRIDE)
    }
}

impl CenterRegionStrategy {
    pub fn new(stride: u32) -> Self {
        Self { stride }
    }

    fn scan_region(
        &self,
        pixels: &PixelAccess,
        region: Region,
        analysis: &CoverAnalysis,
    ) -> Option<AccentCandidate> {
        let min_difference = if analysis.is_light() {
            LIGHT_COVER_MIN_DIFFERENCE
        } else {
            DEFAULT_MIN_DIFFERENCE
        };

        let mut buckets = ColorBuckets::new();
        for (_, _, pixel) in pixels.sample_region(region, self.stride) {
            // Compared on the luma scale the cover average was measured on.
            let difference = (pixel.luma() - analysis.average_brightness).abs();
            if difference < min_difference {
                continue;
            }
            let hsb = pixel.hsb();
            if hsb.saturation > KEEP_MIN_SATURATION || difference > KEEP_MIN_DIFFERENCE {
                buckets.add(hsb);
            }
        }

        let best = buckets
            .top_by(1, MIN_BUCKET_COUNT, |bucket| {
                bucket.color().saturation * 2.0 + bucket.count as f32 / 100.0
            })
            .into_iter()
            .next()?;

        let color = best.color();
        let score = color.saturation * 3.0 + best.count as f32 / 100.0 + REGION_BONUS;
        Some(AccentCandidate::new(color, score, CandidateSource::Center))
    }
}

impl AccentStrategy for CenterRegionStrategy {
    fn source(&self) -> CandidateSource {
        CandidateSource::Center
    }

    fn propose(&self, pixels: &PixelAccess, analysis: &CoverAnalysis) -> Vec<AccentCandidate> {
        CENTER_REGIONS
            .iter()
            .filter_map(|region| self.scan_region(pixels, *region, analysis))
            .collect()
    }
}
