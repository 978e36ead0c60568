// THEORY:
// `ColorBuckets` is the frequency table shared by the region, edge and vibrant
// strategies. Pixels are quantized on HSB axes (36 hue steps, 10 saturation
// steps, 10 brightness steps) so JPEG noise around a flat title color collapses
// into one bucket, while genuinely different design elements stay apart.
//
// Each bucket reports the mean color of its members, not the bucket corner, so a
// candidate keeps the real color of the element it came from.
//
// The table is an ordered map: iteration order, and therefore every tie between
// equally weighted buckets, is fixed for a given input.

use crate::core_modules::pixel::pixel::Hsb;
use std::collections::BTreeMap;

const HUE_STEPS: f32 = 36.0;
const SATURATION_STEPS: f32 = 10.0;
const BRIGHTNESS_STEPS: f32 = 10.0;

/// Quantized HSB coordinates of a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub hue: u8,
    pub saturation: u8,
    pub brightness: u8,
}

impl BucketKey {
    pub fn of(color: &Hsb) -> Self {
        let color = color.clamped();
        Self {
            hue: ((color.hue * HUE_STEPS) as u8).min(HUE_STEPS as u8 - 1),
            saturation: (color.saturation * SATURATION_STEPS) as u8,
            brightness: (color.brightness * BRIGHTNESS_STEPS) as u8,
        }
    }
}

/// Running totals for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColorBucket {
    pub count: usize,
    hue_sum: f32,
    saturation_sum: f32,
    brightness_sum: f32,
}

impl ColorBucket {
    fn add(&mut self, color: &Hsb) {
        self.count += 1;
        self.hue_sum += color.hue;
        self.saturation_sum += color.saturation;
        self.brightness_sum += color.brightness;
    }

    /// Mean color of the bucket's members.
    pub fn color(&self) -> Hsb {
        if self.count == 0 {
            return Hsb::default();
        }
        let count = self.count as f32;
        Hsb::new(
            self.hue_sum / count,
            self.saturation_sum / count,
            self.brightness_sum / count,
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColorBuckets {
    buckets: BTreeMap<BucketKey, ColorBucket>,
}

impl ColorBuckets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, color: Hsb) {
        self.buckets
            .entry(BucketKey::of(&color))
            .or_default()
            .add(&color);
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Buckets with more than `min_count` members, heaviest first, at most `limit`.
    /// Equal weights keep key order.
    pub fn top_by<F>(&self, limit: usize, min_count: usize, weight: F) -> Vec<ColorBucket>
    where
        F: Fn(&ColorBucket) -> f32,
    {
        let mut weighted: Vec<(f32, ColorBucket)> = self
            .buckets
            .values()
            .filter(|bucket| bucket.count > min_count)
            .map(|bucket| (weight(bucket), *bucket))
            .collect();
        weighted.sort_by(|a, b| b.0.total_cmp(&a.0));
        weighted.truncate(limit);
        weighted.into_iter().map(|(_, bucket)| bucket).collect()
    }
}

impl FromIterator<Hsb> for ColorBuckets {
    fn from_iter<I: IntoIterator<Item = Hsb>>(iter: I) -> Self {
        let mut buckets = ColorBuckets::new();
        for color in iter {
            buckets.add(color);
        }
        buckets
    }
}
