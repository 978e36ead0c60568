// THEORY:
// The `FallbackGenerator` guarantees the engine always answers. It runs only when
// no candidate survives ranking, and it derives a color purely from the cover
// classification, so the same cover always falls back to the same color.
//
// The cascade, first match wins:
// 1.  Light blue-gray covers: a deep blue when the cover carries some color,
//     otherwise a neutral charcoal.
// 2.  Monochrome covers with tonal information (mean luma in [0.1, 0.9]): a
//     blue-gray echo for blue-dominant covers, otherwise a gray that contrasts
//     with the cover. Near-black and near-white flat covers skip this branch.
// 3.  Dark covers: warm orange.
// 4.  Light covers: a muted blue for blue-dominant covers, otherwise a cool dark gray.
// 5.  Everything else: a color built on the dominant hue.

use crate::core_modules::cover_analyzer::CoverAnalysis;
use crate::core_modules::pixel::pixel::Hsb;
use tracing::debug;

const LIGHT_BLUE_GRAY_MIN_SATURATION: f32 = 0.1;
const DEEP_BLUE: Hsb = Hsb::new(0.6, 0.8, 0.3);
const CHARCOAL: Hsb = Hsb::gray(0.25);

const TONAL_MIN_BRIGHTNESS: f32 = 0.1;
const TONAL_MAX_BRIGHTNESS: f32 = 0.9;
const BLUE_GRAY_SATURATION: f32 = 0.25;
const BLUE_GRAY_BRIGHTNESS: f32 = 0.55;
const LIGHT_GRAY: Hsb = Hsb::gray(0.7);
const DARK_GRAY: Hsb = Hsb::gray(0.3);

const DARK_COVER_MAX_BRIGHTNESS: f32 = 0.3;
const LIGHT_COVER_MIN_BRIGHTNESS: f32 = 0.7;
pub const WARM_ORANGE: Hsb = Hsb::new(0.08, 0.8, 0.9);

const MUTED_BLUE_SATURATION: f32 = 0.5;
const MUTED_BLUE_BRIGHTNESS: f32 = 0.6;

/// Which branch of the cascade produced the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackBranch {
    LightBlueGray,
    Monochrome,
    Dark,
    Light,
    DominantHue,
}

/// RGB (0.25, 0.25, 0.28).
pub fn cool_dark_gray() -> Hsb {
    Hsb::from_rgb(0.25, 0.25, 0.28)
}

pub fn generate(analysis: &CoverAnalysis) -> Hsb {
    let (color, branch) = generate_with_branch(analysis);
    debug!(?branch, accent = %color.hex(), "no candidate survived, using fallback");
    color
}

pub fn generate_with_branch(analysis: &CoverAnalysis) -> (Hsb, FallbackBranch) {
    let brightness = analysis.average_brightness;
    let hue = analysis.dominant_hue;

    if analysis.is_light_blue_gray {
        let color = if analysis.average_saturation > LIGHT_BLUE_GRAY_MIN_SATURATION {
            DEEP_BLUE
        } else {
            CHARCOAL
        };
        return (color, FallbackBranch::LightBlueGray);
    }

    if analysis.is_monochromatic
        && (TONAL_MIN_BRIGHTNESS..=TONAL_MAX_BRIGHTNESS).contains(&brightness)
    {
        let color = if analysis.has_blue_dominant_hue() {
            Hsb::new(hue, BLUE_GRAY_SATURATION, BLUE_GRAY_BRIGHTNESS)
        } else if brightness < DARK_COVER_MAX_BRIGHTNESS {
            LIGHT_GRAY
        } else {
            DARK_GRAY
        };
        return (color, FallbackBranch::Monochrome);
    }

    if brightness < DARK_COVER_MAX_BRIGHTNESS {
        return (WARM_ORANGE, FallbackBranch::Dark);
    }

    if brightness > LIGHT_COVER_MIN_BRIGHTNESS {
        let color = if analysis.has_blue_dominant_hue() {
            Hsb::new(hue, MUTED_BLUE_SATURATION, MUTED_BLUE_BRIGHTNESS)
        } else {
            cool_dark_gray()
        };
        return (color, FallbackBranch::Light);
    }

    let color = if !(0.1..=0.9).contains(&hue) {
        Hsb::new(hue, 0.8, 0.8)
    } else if hue <= 0.2 {
        Hsb::new(hue, 0.9, 0.85)
    } else {
        Hsb::new(hue, 0.7, 0.7)
    };
    (color, FallbackBranch::DominantHue)
}
