//! On very dark or very light covers, the most extreme pixel of each band.
//!
//! A single small mark (a logo, a colored rule) on an otherwise flat dark or
//! light cover is too rare to win a frequency table. This lens looks for the
//! one pixel per band that departs furthest from the cover, in brightness and
//! in saturation.

use super::{AccentCandidate, AccentStrategy, CandidateSource};
use crate::core_modules::cover_analyzer::CoverAnalysis;
use crate::core_modules::pixel_access::{PixelAccess, Region};

pub const OUTLIER_STRIDE: u32 = 5;

const DARK_COVER_MAX_BRIGHTNESS: f32 = 0.3;
const LIGHT_COVER_MIN_BRIGHTNESS: f32 = 0.7;
const MIN_OUTLIER_SCORE: f32 = 0.8;
const MIN_SATURATION: f32 = 0.3;

const OUTLIER_REGIONS: [Region; 5] = [
    // Top band.
    Region::new(0.0, 0.0, 1.0, 0.25),
    // Middle band.
    Region::new(0.0, 0.375, 1.0, 0.25),
    // Bottom band.
    Region::new(0.0, 0.75, 1.0, 0.25),
    // Left edge.
    Region::new(0.0, 0.0, 0.15, 1.0),
    // Right edge.
    Region::new(0.85, 0.0, 0.15, 1.0),
];

#[derive(Debug, Clone)]
pub struct OutlierStrategy {
    stride: u32,
}

impl Default for OutlierStrategy {
    fn default() -> Self {
        Self::new(OUTLIER_STRIDE)
    }
}

impl OutlierStrategy {
    pub fn new(stride: u32) -> Self {
        Self { stride }
    }

    fn applies_to(analysis: &CoverAnalysis) -> bool {
        analysis.average_brightness < DARK_COVER_MAX_BRIGHTNESS
            || analysis.average_brightness > LIGHT_COVER_MIN_BRIGHTNESS
    }

    fn scan_region(
        &self,
        pixels: &PixelAccess,
        region: Region,
        analysis: &CoverAnalysis,
    ) -> Option<AccentCandidate> {
        let mut best: Option<AccentCandidate> = None;
        for (_, _, pixel) in pixels.sample_region(region, self.stride) {
            let color = pixel.hsb();
            if color.saturation <= MIN_SATURATION {
                continue;
            }
            let score = 2.0 * (pixel.luma() - analysis.average_brightness).abs()
                + 1.5 * color.saturation;
            if score <= MIN_OUTLIER_SCORE {
                continue;
            }
            if best.is_none_or(|current| score > current.score) {
                best = Some(AccentCandidate::new(color, score, CandidateSource::Outlier));
            }
        }
        best
    }
}

impl AccentStrategy for OutlierStrategy {
    fn source(&self) -> CandidateSource {
        CandidateSource::Outlier
    }

    fn propose(&self, pixels: &PixelAccess, analysis: &CoverAnalysis) -> Vec<AccentCandidate> {
        if !Self::applies_to(analysis) {
            return Vec::new();
        }
        OUTLIER_REGIONS
            .iter()
            .filter_map(|region| self.scan_region(pixels, *region, analysis))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::cover_analyzer::CoverAnalyzer;
    use crate::core_modules::test_covers::{cover_with_block, solid};

    #[test]
    fn small_mark_on_black_cover_is_found() {
        // A teal logo in the right margin, 10x10 on 200x300.
        let cover =
            cover_with_block(200, 300, [8, 8, 8], [20, 190, 170], (0.9, 0.5, 0.05, 0.0334));
        let analysis = CoverAnalyzer::default().analyze(&cover);
        let candidates = OutlierStrategy::default().propose(&cover, &analysis);

        assert!(!candidates.is_empty());
        assert!(candidates.len() <= OUTLIER_REGIONS.len());
        for candidate in &candidates {
            assert!(candidate.color.saturation > 0.85);
            assert!(candidate.score > MIN_OUTLIER_SCORE);
        }
    }

    #[test]
    fn mid_brightness_covers_are_skipped() {
        let cover = cover_with_block(100, 100, [128, 128, 128], [255, 0, 0], (0.4, 0.4, 0.2, 0.2));
        let analysis = CoverAnalyzer::default().analyze(&cover);
        assert!(OutlierStrategy::default().propose(&cover, &analysis).is_empty());
    }

    #[test]
    fn unsaturated_extremes_do_not_qualify() {
        let cover = cover_with_block(100, 100, [5, 5, 5], [250, 250, 250], (0.0, 0.0, 0.1, 0.1));
        let analysis = CoverAnalyzer::default().analyze(&cover);
        assert!(OutlierStrategy::default().propose(&cover, &analysis).is_empty());
        let black = solid(10, 10, [0, 0, 0]);
        assert!(OutlierStrategy::default().propose(&black, &analysis).is_empty());
    }
}
