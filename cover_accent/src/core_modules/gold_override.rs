// THEORY:
// Gold and yellow foil is the one accent the general ranker reliably loses: it is
// rarely the most saturated element, often sits next to brighter whites, and its
// hue is close to the warm backgrounds it decorates. The `GoldOverrideDetector`
// short-circuits the pipeline for these covers.
//
// Two stages:
// 1.  **Probe**: a cheap stride-5 pass over the native image counts gold-band
//     pixels. More than 0.3% of the samples triggers the override.
// 2.  **Extraction**: three overlapping horizontal bands (middle third,
//     lower-middle, bottom third), where titles and foil stamps usually sit, are
//     scanned at stride 2. Each gold pixel is scored by how rich and how close to
//     pure gold (hue 0.125) it is; the best one is amplified and returned.
//
// Once the probe fires the detector always answers: if no pixel passes the
// stricter extraction thresholds, a fixed warm gold is returned instead.

use crate::core_modules::pixel::pixel::Hsb;
use crate::core_modules::pixel_access::{PixelAccess, Region};
use tracing::debug;

pub const GOLD_PROBE_STRIDE: u32 = 5;
pub const GOLD_TRIGGER_RATIO: f32 = 0.003;
pub const GOLD_SCAN_STRIDE: u32 = 2;

pub const GOLD_HUE_LOW: f32 = 0.05;
pub const GOLD_HUE_HIGH: f32 = 0.20;
const GOLD_HUE_PEAK: f32 = 0.125;

const PROBE_MIN_SATURATION: f32 = 0.2;
const PROBE_MIN_BRIGHTNESS: f32 = 0.3;
const SCAN_MIN_SATURATION: f32 = 0.15;
const SCAN_MIN_BRIGHTNESS: f32 = 0.25;

const SATURATION_BOOST: f32 = 1.4;
const BRIGHTNESS_BOOST: f32 = 1.2;
const BRIGHTNESS_CEILING: f32 = 0.95;

/// Returned when the probe fires but extraction finds no usable pixel.
pub const WARM_GOLD: Hsb = Hsb::new(0.125, 0.8, 0.85);

const GOLD_BANDS: [Region; 3] = [
    // Middle third.
    Region::new(0.0, 1.0 / 3.0, 1.0, 1.0 / 3.0),
    // Lower-middle.
    Region::new(0.0, 0.5, 1.0, 0.35),
    // Bottom third.
    Region::new(0.0, 2.0 / 3.0, 1.0, 1.0 / 3.0),
];

#[derive(Debug, Clone)]
pub struct GoldOverrideDetector {
    probe_stride: u32,
    trigger_ratio: f32,
    scan_stride: u32,
}

impl Default for GoldOverrideDetector {
    fn default() -> Self {
        Self::new(GOLD_PROBE_STRIDE, GOLD_TRIGGER_RATIO, GOLD_SCAN_STRIDE)
    }
}

impl GoldOverrideDetector {
    pub fn new(probe_stride: u32, trigger_ratio: f32, scan_stride: u32) -> Self {
        Self {
            probe_stride,
            trigger_ratio,
            scan_stride,
        }
    }

    /// The gold accent for this cover, or `None` when the cover is not gold-led.
    pub fn detect(&self, pixels: &PixelAccess) -> Option<Hsb> {
        let ratio = self.gold_ratio(pixels);
        if ratio <= self.trigger_ratio {
            return None;
        }

        match self.extract(pixels) {
            Some(gold) => {
                debug!(ratio, accent = %gold.hex(), "gold override triggered");
                Some(gold)
            }
            None => {
                debug!(ratio, "gold override triggered without a scorable pixel, using warm gold");
                Some(WARM_GOLD)
            }
        }
    }

    /// Fraction of probe samples inside the gold band.
    pub fn gold_ratio(&self, pixels: &PixelAccess) -> f32 {
        let mut sampled = 0usize;
        let mut gold = 0usize;
        for (_, _, pixel) in pixels.sample(self.probe_stride) {
            sampled += 1;
            let hsb = pixel.hsb();
            if is_gold_hue(&hsb)
                && hsb.saturation > PROBE_MIN_SATURATION
                && hsb.brightness > PROBE_MIN_BRIGHTNESS
            {
                gold += 1;
            }
        }
        if sampled == 0 {
            return 0.0;
        }
        gold as f32 / sampled as f32
    }

    fn extract(&self, pixels: &PixelAccess) -> Option<Hsb> {
        let mut best: Option<(f32, Hsb)> = None;
        for band in GOLD_BANDS {
            for (_, _, pixel) in pixels.sample_region(band, self.scan_stride) {
                let hsb = pixel.hsb();
                if !is_gold_hue(&hsb)
                    || hsb.saturation <= SCAN_MIN_SATURATION
                    || hsb.brightness <= SCAN_MIN_BRIGHTNESS
                {
                    continue;
                }
                let score = gold_score(&hsb);
                if best.is_none_or(|(best_score, _)| score > best_score) {
                    best = Some((score, hsb));
                }
            }
        }
        best.map(|(_, hsb)| amplify(hsb))
    }
}

fn is_gold_hue(hsb: &Hsb) -> bool {
    hsb.hue_in(GOLD_HUE_LOW, GOLD_HUE_HIGH)
}

/// Peaks at pure gold (hue 0.125) and falls off linearly across the band.
fn gold_score(hsb: &Hsb) -> f32 {
    hsb.saturation * hsb.brightness * (1.0 - 2.0 * (hsb.hue - GOLD_HUE_PEAK).abs())
}

fn amplify(hsb: Hsb) -> Hsb {
    Hsb::new(
        hsb.hue,
        (hsb.saturation * SATURATION_BOOST).min(1.0),
        (hsb.brightness * BRIGHTNESS_BOOST).min(BRIGHTNESS_CEILING),
    )
}
