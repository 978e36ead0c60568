//! Synthetic covers shared by the unit tests.

use crate::core_modules::cover_analyzer::CoverAnalysis;
use crate::core_modules::pixel_access::PixelAccess;
use std::ops::Range;

/// Packed RGBA bytes for a `width` x `height` cover of one color.
pub fn solid_rgba(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    (0..width * height)
        .flat_map(|_| [rgb[0], rgb[1], rgb[2], 255])
        .collect()
}

pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> PixelAccess {
    PixelAccess::from_rgba(width, height, &solid_rgba(width, height, rgb)).unwrap()
}

/// A `width` x `height` cover filled with `background`, with a rectangle of
/// `block` covering normalized `(x, y, w, h)`.
pub fn cover_with_block(
    width: u32,
    height: u32,
    background: [u8; 3],
    block: [u8; 3],
    rect: (f32, f32, f32, f32),
) -> PixelAccess {
    let (bx, by, bw, bh) = rect;
    let x0 = (bx * width as f32) as u32;
    let y0 = (by * height as f32) as u32;
    let x1 = ((bx + bw) * width as f32) as u32;
    let y1 = ((by + bh) * height as f32) as u32;
    cover_with(width, height, |x, y| {
        if x >= x0 && x < x1 && y >= y0 && y < y1 {
            block
        } else {
            background
        }
    })
}

/// Full-width `block` rows on a `background` cover.
pub fn cover_with_rows(
    width: u32,
    height: u32,
    background: [u8; 3],
    block: [u8; 3],
    rows: Range<u32>,
) -> PixelAccess {
    cover_with(width, height, |_, y| if rows.contains(&y) { block } else { background })
}

fn cover_with(width: u32, height: u32, color_at: impl Fn(u32, u32) -> [u8; 3]) -> PixelAccess {
    let bytes: Vec<u8> = (0..width * height)
        .flat_map(|i| {
            let rgb = color_at(i % width, i / width);
            [rgb[0], rgb[1], rgb[2], 255]
        })
        .collect();
    PixelAccess::from_rgba(width, height, &bytes).unwrap()
}

/// A colorful mid-saturation cover with the given mean luma and no flags set.
pub fn plain_analysis(average_brightness: f32) -> CoverAnalysis {
    CoverAnalysis {
        average_brightness,
        dominant_hue: 0.0,
        has_high_contrast: false,
        is_monochromatic: false,
        is_light_blue_gray: false,
        average_saturation: 0.3,
    }
}
