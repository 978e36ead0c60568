//! The loudest colors on a coarse copy of the cover.
//!
//! Vibrancy is `saturation x (0.5 + 0.5 x brightness)`. Light covers accept
//! quieter colors than dark ones. Monochrome covers additionally admit mid-tone
//! grays and light blue-gray covers admit dark ink, so those covers still get a
//! proposal from this lens.

use super::{AccentCandidate, AccentStrategy, CandidateSource};
use crate::core_modules::color_buckets::ColorBuckets;
use crate::core_modules::cover_analyzer::{
    ANALYSIS_MAX_HEIGHT, ANALYSIS_MAX_WIDTH, CoverAnalysis,
};
use crate::core_modules::pixel::pixel::Hsb;
use crate::core_modules::pixel_access::PixelAccess;

pub const VIBRANT_STRIDE: u32 = 3;

const LIGHT_COVER_MIN_VIBRANCY: f32 = 0.2;
const DEFAULT_MIN_VIBRANCY: f32 = 0.4;
const MONOCHROME_MAX_SATURATION: f32 = 0.2;
const MONOCHROME_MIN_BRIGHTNESS: f32 = 0.2;
const MONOCHROME_MAX_BRIGHTNESS: f32 = 0.8;
const BLUE_GRAY_INK_MAX_BRIGHTNESS: f32 = 0.4;
const MAX_CANDIDATES: usize = 5;

#[derive(Debug, Clone)]
pub struct VibrantColorStrategy {
    max_width: u32,
    max_height: u32,
    stride: u32,
}

impl Default for VibrantColorStrategy {
    fn default() -> Self {
        Self::new(ANALYSIS_MAX_WIDTH, ANALYSIS_MAX_HEIGHT, VIBRANT_STRIDE)
    }
}

impl VibrantColorStrategy {
    pub fn new(max_width: u32, max_height: u32, stride: u32) -> Self {
        Self {
            max_width,
            max_height,
            stride,
        }
    }

    fn includes(color: &Hsb, analysis: &CoverAnalysis) -> bool {
        let min_vibrancy = if analysis.is_light() {
            LIGHT_COVER_MIN_VIBRANCY
        } else {
            DEFAULT_MIN_VIBRANCY
        };
        if color.vibrancy() > min_vibrancy {
            return true;
        }
        if analysis.is_monochromatic
            && color.saturation < MONOCHROME_MAX_SATURATION
            && color.brightness > MONOCHROME_MIN_BRIGHTNESS
            && color.brightness < MONOCHROME_MAX_BRIGHTNESS
        {
            return true;
        }
        analysis.is_light_blue_gray && color.brightness < BLUE_GRAY_INK_MAX_BRIGHTNESS
    }
}

impl AccentStrategy for VibrantColorStrategy {
    fn source(&self) -> CandidateSource {
        CandidateSource::Vibrant
    }

    fn propose(&self, pixels: &PixelAccess, analysis: &CoverAnalysis) -> Vec<AccentCandidate> {
        let coarse = pixels.downsized(self.max_width, self.max_height);
        let buckets: ColorBuckets = coarse
            .sample(self.stride)
            .map(|(_, _, pixel)| pixel.hsb())
            .filter(|color| Self::includes(color, analysis))
            .collect();

        buckets
            .top_by(MAX_CANDIDATES, 0, |bucket| {
                bucket.color().vibrancy() * bucket.count as f32
            })
            .into_iter()
            .map(|bucket| {
                let color = bucket.color();
                let score = color.vibrancy() * 1.5 + bucket.count as f32 / 1000.0;
                AccentCandidate::new(color, score, CandidateSource::Vibrant)
            })
            .collect()
    }
}
