//! Final softening of the chosen accent.
//!
//! Saturated reds are pulled back gently, everything else that is both very
//! saturated and very bright a little harder. Hue is never touched.

use crate::core_modules::pixel::pixel::Hsb;

const RED_HUE_LOW: f32 = 0.05;
const RED_HUE_HIGH: f32 = 0.95;
const RED_MIN_SATURATION: f32 = 0.7;
const RED_MIN_BRIGHTNESS: f32 = 0.5;
const RED_SATURATION_FACTOR: f32 = 0.9;
const RED_BRIGHTNESS_FACTOR: f32 = 0.95;

const HOT_MIN_SATURATION: f32 = 0.85;
const HOT_MIN_BRIGHTNESS: f32 = 0.7;
const HOT_SATURATION_FACTOR: f32 = 0.8;
const HOT_BRIGHTNESS_FACTOR: f32 = 0.9;

pub fn soften(color: Hsb) -> Hsb {
    let color = color.clamped();
    let is_red = color.hue < RED_HUE_LOW || color.hue > RED_HUE_HIGH;

    let is_loud_red =
        is_red && color.saturation > RED_MIN_SATURATION && color.brightness > RED_MIN_BRIGHTNESS;
    let is_hot = color.saturation > HOT_MIN_SATURATION && color.brightness > HOT_MIN_BRIGHTNESS;

    let (saturation_factor, brightness_factor) = if is_loud_red {
        (RED_SATURATION_FACTOR, RED_BRIGHTNESS_FACTOR)
    } else if is_hot {
        (HOT_SATURATION_FACTOR, HOT_BRIGHTNESS_FACTOR)
    } else {
        (1.0, 1.0)
    };

    Hsb::new(
        color.hue,
        color.saturation * saturation_factor,
        color.brightness * brightness_factor,
    )
    .clamped()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn saturated_red_is_softened_gently() {
        let softened = soften(Hsb::new(0.0, 0.95, 0.9));
        assert_eq!(softened.hue, 0.0);
        assert!(close(softened.saturation, 0.855));
        assert!(close(softened.brightness, 0.855));

        let crimson = soften(Hsb::new(0.97, 0.8, 0.6));
        assert!(close(crimson.hue, 0.97));
        assert!(close(crimson.saturation, 0.72));
        assert!(close(crimson.brightness, 0.57));
    }

    #[test]
    fn hot_non_red_colors_are_toned_down() {
        let softened = soften(Hsb::new(0.3, 0.9, 0.8));
        assert!(close(softened.hue, 0.3));
        assert!(close(softened.saturation, 0.72));
        assert!(close(softened.brightness, 0.72));
    }

    #[test]
    fn moderate_colors_pass_through() {
        let color = Hsb::new(0.6, 0.5, 0.5);
        assert_eq!(soften(color), color);
        // Dark saturated red is below the brightness gate.
        let dark_red = Hsb::new(0.01, 0.9, 0.4);
        assert_eq!(soften(dark_red), dark_red);
    }
}
