// THEORY:
// The `CoverAnalyzer` produces the global context every later stage is scored
// against. It never proposes colors; it only describes the cover.
//
// Key architectural principles:
// 1.  **Coarse by default**: statistics come from a downsized copy (at most
//     200x300) walked on a stride-2 grid. Global averages do not need native
//     resolution, and this caps the cost for very large scans.
// 2.  **Two passes over the same grid**: the first pass gathers mean luma and the
//     hue histogram; the second, now knowing the mean, gathers the spread of luma
//     together with the saturation and gray-cast statistics used for classification.
// 3.  **Classification, not tuning**: the output is a handful of flags
//     (`is_monochromatic`, `is_light_blue_gray`, `has_high_contrast`) that the
//     strategies, the ranker and the fallback branch on.

use crate::core_modules::pixel::pixel::Hsb;
use crate::core_modules::pixel_access::PixelAccess;
use tracing::trace;

pub const ANALYSIS_MAX_WIDTH: u32 = 200;
pub const ANALYSIS_MAX_HEIGHT: u32 = 300;
pub const ANALYSIS_STRIDE: u32 = 2;

const HUE_BUCKETS: usize = 12;
const HUE_SATURATION_GATE: f32 = 0.1;
const HIGH_CONTRAST_STD_DEV: f32 = 0.25;

const BLUE_GRAY_HUE_LOW: f32 = 0.5;
const BLUE_GRAY_HUE_HIGH: f32 = 0.75;
const BLUE_GRAY_MIN_SATURATION: f32 = 0.05;
const BLUE_GRAY_MAX_SATURATION: f32 = 0.3;

const MONOCHROME_MAX_SATURATION: f32 = 0.15;
const MONOCHROME_BLUE_GRAY_RATIO: f32 = 0.3;
const MONOCHROME_MAX_GRAY_DEVIATION: f32 = 0.1;

const LIGHT_BLUE_GRAY_MIN_BRIGHTNESS: f32 = 0.6;
const LIGHT_BLUE_GRAY_RATIO: f32 = 0.2;
const LIGHT_BLUE_GRAY_MAX_SATURATION: f32 = 0.25;

/// Above this mean luma a cover counts as light.
pub const LIGHT_COVER_BRIGHTNESS: f32 = 0.6;
/// Below this mean luma a cover counts as dark.
pub const DARK_COVER_BRIGHTNESS: f32 = 0.4;

/// Global statistics for one cover. Computed once per extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverAnalysis {
    /// Mean Rec. 601 luma, [0, 1].
    pub average_brightness: f32,
    /// Start of the fullest 1/12 hue bucket among saturated pixels; 0 when none.
    pub dominant_hue: f32,
    /// Luma standard deviation above 0.25.
    pub has_high_contrast: bool,
    pub is_monochromatic: bool,
    pub is_light_blue_gray: bool,
    /// Mean HSB saturation, [0, 1].
    pub average_saturation: f32,
}

impl CoverAnalysis {
    pub fn is_light(&self) -> bool {
        self.average_brightness > LIGHT_COVER_BRIGHTNESS
    }

    pub fn is_dark(&self) -> bool {
        self.average_brightness < DARK_COVER_BRIGHTNESS
    }

    /// True when the dominant hue sits in the blue/blue-gray band.
    pub fn has_blue_dominant_hue(&self) -> bool {
        (BLUE_GRAY_HUE_LOW..=BLUE_GRAY_HUE_HIGH).contains(&self.dominant_hue)
    }
}

/// Computes `CoverAnalysis` from a coarse sample of the cover.
#[derive(Debug, Clone)]
pub struct CoverAnalyzer {
    max_width: u32,
    max_height: u32,
    stride: u32,
}

impl Default for CoverAnalyzer {
    fn default() -> Self {
        Self::new(ANALYSIS_MAX_WIDTH, ANALYSIS_MAX_HEIGHT, ANALYSIS_STRIDE)
    }
}

impl CoverAnalyzer {
    pub fn new(max_width: u32, max_height: u32, stride: u32) -> Self {
        Self {
            max_width,
            max_height,
            stride,
        }
    }

    pub fn analyze(&self, pixels: &PixelAccess) -> CoverAnalysis {
        let coarse = pixels.downsized(self.max_width, self.max_height);

        // --- Pass 1: mean luma and hue histogram ---
        let mut luma_sum = 0.0f64;
        let mut sample_count = 0usize;
        let mut hue_histogram = [0usize; HUE_BUCKETS];
        for (_, _, pixel) in coarse.sample(self.stride) {
            luma_sum += pixel.luma() as f64;
            sample_count += 1;

            let hsb = pixel.hsb();
            if hsb.saturation > HUE_SATURATION_GATE {
                hue_histogram[Self::hue_bucket(&hsb)] += 1;
            }
        }

        if sample_count == 0 {
            // Unreachable for a constructed PixelAccess; keeps the math total.
            return CoverAnalysis {
                average_brightness: 0.0,
                dominant_hue: 0.0,
                has_high_contrast: false,
                is_monochromatic: true,
                is_light_blue_gray: false,
                average_saturation: 0.0,
            };
        }

        let samples = sample_count as f64;
        let average_brightness = (luma_sum / samples) as f32;
        let dominant_hue = Self::dominant_hue(&hue_histogram);

        // --- Pass 2: spread, saturation and gray cast ---
        let mut squared_deviation_sum = 0.0f64;
        let mut saturation_sum = 0.0f64;
        let mut gray_deviation_sum = 0.0f64;
        let mut blue_gray_count = 0usize;
        for (_, _, pixel) in coarse.sample(self.stride) {
            let luma_offset = pixel.luma() as f64 - average_brightness as f64;
            squared_deviation_sum += luma_offset * luma_offset;

            let hsb = pixel.hsb();
            saturation_sum += hsb.saturation as f64;
            gray_deviation_sum += pixel.gray_deviation() as f64;
            if Self::is_blue_gray(&hsb) {
                blue_gray_count += 1;
            }
        }

        let brightness_std_dev = (squared_deviation_sum / samples).sqrt() as f32;
        let average_saturation = (saturation_sum / samples) as f32;
        let average_gray_deviation = (gray_deviation_sum / samples) as f32;
        let blue_gray_ratio = (blue_gray_count as f64 / samples) as f32;

        let is_monochromatic = average_saturation < MONOCHROME_MAX_SATURATION
            || blue_gray_ratio > MONOCHROME_BLUE_GRAY_RATIO
            || average_gray_deviation < MONOCHROME_MAX_GRAY_DEVIATION;
        let is_light_blue_gray = average_brightness > LIGHT_BLUE_GRAY_MIN_BRIGHTNESS
            && blue_gray_ratio > LIGHT_BLUE_GRAY_RATIO
            && average_saturation < LIGHT_BLUE_GRAY_MAX_SATURATION;

        trace!(
            samples = sample_count,
            brightness_std_dev,
            average_gray_deviation,
            blue_gray_ratio,
            "cover statistics"
        );

        CoverAnalysis {
            average_brightness,
            dominant_hue,
            has_high_contrast: brightness_std_dev > HIGH_CONTRAST_STD_DEV,
            is_monochromatic,
            is_light_blue_gray,
            average_saturation,
        }
    }

    fn hue_bucket(hsb: &Hsb) -> usize {
        ((hsb.hue * HUE_BUCKETS as f32) as usize).min(HUE_BUCKETS - 1)
    }

    /// Fullest bucket, lowest index on ties, as a fraction of the hue circle.
    fn dominant_hue(histogram: &[usize; HUE_BUCKETS]) -> f32 {
        let mut best_index = 0usize;
        let mut best_count = 0usize;
        for (index, &count) in histogram.iter().enumerate() {
            if count > best_count {
                best_index = index;
                best_count = count;
            }
        }
        best_index as f32 / HUE_BUCKETS as f32
    }

    fn is_blue_gray(hsb: &Hsb) -> bool {
        hsb.hue_in(BLUE_GRAY_HUE_LOW, BLUE_GRAY_HUE_HIGH)
            && hsb.saturation > BLUE_GRAY_MIN_SATURATION
            && hsb.saturation < BLUE_GRAY_MAX_SATURATION
    }
}
