//! Colors on strong edges: title lettering, rules and line art.

use super::{AccentCandidate, AccentStrategy, CandidateSource};
use crate::core_modules::color_buckets::ColorBuckets;
use crate::core_modules::cover_analyzer::CoverAnalysis;
use crate::core_modules::edge_map::edge_map::EdgeMap;
use crate::core_modules::pixel::pixel::Hsb;
use crate::core_modules::pixel_access::PixelAccess;

pub const EDGE_STRIDE: u32 = 5;
pub const EDGE_THRESHOLD: f32 = 0.5;

const KEEP_MIN_SATURATION: f32 = 0.15;
const DARK_INK_MAX_BRIGHTNESS: f32 = 0.4;
const NEAR_BLACK_MAX_BRIGHTNESS: f32 = 0.2;
const NEAR_WHITE_MIN_BRIGHTNESS: f32 = 0.8;
const PURE_WHITE_MIN_BRIGHTNESS: f32 = 0.95;
const PURE_WHITE_MAX_SATURATION: f32 = 0.1;
const MAX_CANDIDATES: usize = 5;
const MIN_BUCKET_COUNT: usize = 10;
const EDGE_BONUS: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct EdgeStrategy {
    stride: u32,
    threshold: f32,
}

impl Default for EdgeStrategy {
    fn default() -> Self {
        Self::new(EDGE_STRIDE, EDGE_THRESHOLD)
    }
}

impl EdgeStrategy {
    pub fn new(stride: u32, threshold: f32) -> Self {
        Self { stride, threshold }
    }

    fn keeps(color: &Hsb, analysis: &CoverAnalysis) -> bool {
        if color.brightness > PURE_WHITE_MIN_BRIGHTNESS
            && color.saturation < PURE_WHITE_MAX_SATURATION
        {
            return false;
        }
        color.saturation > KEEP_MIN_SATURATION
            || (analysis.is_light() && color.brightness < DARK_INK_MAX_BRIGHTNESS)
            || color.brightness < NEAR_BLACK_MAX_BRIGHTNESS
            || color.brightness > NEAR_WHITE_MIN_BRIGHTNESS
    }
}

impl AccentStrategy for EdgeStrategy {
    fn source(&self) -> CandidateSource {
        CandidateSource::Edge
    }

    fn propose(&self, pixels: &PixelAccess, analysis: &CoverAnalysis) -> Vec<AccentCandidate> {
        let Some(edges) = EdgeMap::compute(pixels) else {
            return Vec::new();
        };

        let buckets: ColorBuckets = pixels
            .sample(self.stride)
            .filter(|(x, y, _)| edges.magnitude(*x, *y) > self.threshold)
            .map(|(_, _, pixel)| pixel.hsb())
            .filter(|color| Self::keeps(color, analysis))
            .collect();

        buckets
            .top_by(MAX_CANDIDATES, MIN_BUCKET_COUNT, |bucket| bucket.count as f32)
            .into_iter()
            .map(|bucket| {
                let color = bucket.color();
                let score = color.saturation * 2.0 + bucket.count as f32 / 1000.0 + EDGE_BONUS;
                AccentCandidate::new(color, score, CandidateSource::Edge)
            })
            .collect()
    }
}
