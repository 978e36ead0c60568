// THEORY:
// The `EdgeMap` turns a cover into a map of "where something is drawn". Title
// lettering, rules and line art are strong local luma transitions; flat
// backgrounds and soft gradients are not.
//
// Algorithm steps:
// 1.  **Luma plane**: the full-resolution cover is flattened to Rec. 601 luma.
// 2.  **Sobel gradient**: the classic 3x3 horizontal and vertical kernels give a
//     gradient magnitude for every interior pixel. The one-pixel border is zero.
// 3.  **Light smoothing**: a 3x3 box average spreads thin strokes so a strided
//     sampler does not step over them.
// 4.  **Normalization**: magnitudes are divided by the map maximum, so the edge
//     threshold means "at least this fraction of the strongest transition on this
//     cover". Covers whose strongest transition is negligible have no map at all.
//
// The detector is a stateless utility and reports "no edges" as `None`; callers
// treat that as zero candidates, never as a failure.

use crate::core_modules::pixel_access::PixelAccess;

pub mod edge_map {
    use super::*;

    /// Maps with a raw peak below this have no meaningful edges.
    const MIN_EDGE_ENERGY: f32 = 0.05;

    /// Normalized, smoothed gradient magnitudes in [0, 1], row-major.
    #[derive(Debug, Clone)]
    pub struct EdgeMap {
        width: u32,
        height: u32,
        magnitudes: Vec<f32>,
    }

    impl EdgeMap {
        /// Builds the map, or `None` when the cover is too small or has no edges.
        pub fn compute(pixels: &PixelAccess) -> Option<EdgeMap> {
            let width = pixels.width() as usize;
            let height = pixels.height() as usize;
            if width < 3 || height < 3 {
                return None;
            }

            // --- 1. Luma plane ---
            let luma: Vec<f32> = pixels
                .as_image()
                .pixels()
                .map(|rgb| {
                    0.299 * rgb.0[0] as f32 / 255.0
                        + 0.587 * rgb.0[1] as f32 / 255.0
                        + 0.114 * rgb.0[2] as f32 / 255.0
                })
                .collect();

            // --- 2. Sobel magnitude ---
            let mut gradient = vec![0.0f32; width * height];
            for y in 1..height - 1 {
                for x in 1..width - 1 {
                    let at = |dx: isize, dy: isize| -> f32 {
                        let sx = (x as isize + dx) as usize;
                        let sy = (y as isize + dy) as usize;
                        luma[sy * width + sx]
                    };
                    let gx = (at(1, -1) + 2.0 * at(1, 0) + at(1, 1))
                        - (at(-1, -1) + 2.0 * at(-1, 0) + at(-1, 1));
                    let gy = (at(-1, 1) + 2.0 * at(0, 1) + at(1, 1))
                        - (at(-1, -1) + 2.0 * at(0, -1) + at(1, -1));
                    gradient[y * width + x] = (gx * gx + gy * gy).sqrt();
                }
            }

            // --- 3. Box smoothing ---
            let mut smoothed = box_smooth(&gradient, width, height);

            // --- 4. Normalization ---
            let peak = smoothed.iter().copied().fold(0.0f32, f32::max);
            if peak < MIN_EDGE_ENERGY {
                return None;
            }
            for value in smoothed.iter_mut() {
                *value /= peak;
            }

            Some(EdgeMap {
                width: width as u32,
                height: height as u32,
                magnitudes: smoothed,
            })
        }

        pub fn width(&self) -> u32 {
            self.width
        }

        pub fn height(&self) -> u32 {
            self.height
        }

        /// Normalized edge strength at (x, y); zero outside the map.
        pub fn magnitude(&self, x: u32, y: u32) -> f32 {
            if x >= self.width || y >= self.height {
                return 0.0;
            }
            self.magnitudes[(y * self.width + x) as usize]
        }
    }

    /// 3x3 mean over the in-bounds neighborhood of every cell.
    fn box_smooth(values: &[f32], width: usize, height: usize) -> Vec<f32> {
        let mut smoothed = vec![0.0f32; values.len()];
        for y in 0..height {
            for x in 0..width {
                let mut sum = 0.0f32;
                let mut count = 0u32;
                for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                        sum += values[ny * width + nx];
                        count += 1;
                    }
                }
                smoothed[y * width + x] = sum / count as f32;
            }
        }
        smoothed
    }
}
