// THEORY (Single-Pixel Color Heuristics):
// The `Pixel` module is the most fundamental unit of the accent engine. It is a
// "dumb" data container for a single RGB sample plus the 1-dimensional heuristics
// every strategy needs: metrics computed from this pixel alone, with no knowledge
// of neighbors. Anything that needs more than one pixel (gradients, frequency
// tables, region statistics) belongs in higher-level modules.
//
// What lives here:
// - Raw channels (RGB, alpha dropped at construction) and their normalized form.
// - Luma (Rec. 601) as the perceptual brightness used for cover statistics.
// - HSB (hue, saturation, brightness) as the color model every score is written in.
//   Hue is a fraction of the color circle in [0, 1), saturation and brightness are
//   in [0, 1]. Brightness is the HSB value (max channel), not luma.
// - Gray value and the mean channel deviation from it, used to classify covers
//   with little color variation.
//
// `Hsb` is also the engine's output type. It converts back to RGB so callers that
// theme with RGB triples do not need their own conversion.

pub mod pixel {
    pub type Channel = u8;
    pub type NormalizedChannel = f32;
    pub type Luma = f32;
    pub type Hue = f32;
    pub type Saturation = f32;
    pub type Brightness = f32;

    const RGBA_CHANNELS: usize = 4;
    const RGB_CHANNELS: usize = 3;

    /// A "dumb" data container representing a single RGB pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Self { red, green, blue }
        }

        /// Channels scaled to 0..1 (still gamma-encoded sRGB).
        #[inline]
        pub fn normalized(&self) -> (NormalizedChannel, NormalizedChannel, NormalizedChannel) {
            (
                self.red as NormalizedChannel / 255.0,
                self.green as NormalizedChannel / 255.0,
                self.blue as NormalizedChannel / 255.0,
            )
        }

        /// Perceived brightness (Rec. 601 luma) in [0, 1].
        pub fn luma(&self) -> Luma {
            let (red, green, blue) = self.normalized();
            0.299 * red + 0.587 * green + 0.114 * blue
        }

        /// HSB view of this pixel.
        pub fn hsb(&self) -> Hsb {
            let (red, green, blue) = self.normalized();
            Hsb::from_rgb(red, green, blue)
        }

        /// Unweighted channel mean in [0, 1].
        pub fn gray(&self) -> NormalizedChannel {
            let (red, green, blue) = self.normalized();
            (red + green + blue) / 3.0
        }

        /// Mean absolute distance of each channel from the pixel's own gray value.
        /// Zero for any pure gray; grows as the channels pull apart.
        pub fn gray_deviation(&self) -> NormalizedChannel {
            let (red, green, blue) = self.normalized();
            let gray = (red + green + blue) / 3.0;
            ((red - gray).abs() + (green - gray).abs() + (blue - gray).abs()) / 3.0
        }
    }

    impl From<&[u8]> for Pixel {
        /// Builds a pixel from an RGB or RGBA slice. Alpha is ignored.
        fn from(bytes: &[u8]) -> Self {
            match bytes.len() {
                RGB_CHANNELS | RGBA_CHANNELS => Pixel::new(bytes[0], bytes[1], bytes[2]),
                n => panic!("Cannot convert {} bytes into pixel.", n),
            }
        }
    }

    impl From<image::Rgb<u8>> for Pixel {
        fn from(rgb: image::Rgb<u8>) -> Self {
            Pixel::new(rgb.0[0], rgb.0[1], rgb.0[2])
        }
    }

    /// A color in hue/saturation/brightness form.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Hsb {
        /// Fraction of the color circle, [0, 1).
        pub hue: Hue,
        /// Chroma relative to brightness, [0, 1].
        pub saturation: Saturation,
        /// Maximum channel, [0, 1].
        pub brightness: Brightness,
    }

    impl Hsb {
        pub const fn new(hue: Hue, saturation: Saturation, brightness: Brightness) -> Self {
            Self {
                hue,
                saturation,
                brightness,
            }
        }

        /// An achromatic color at the given brightness.
        pub const fn gray(value: Brightness) -> Self {
            Self::new(0.0, 0.0, value)
        }

        /// Standard RGB -> HSB conversion on normalized channels.
        pub fn from_rgb(red: f32, green: f32, blue: f32) -> Self {
            let maximum_channel = red.max(green.max(blue));
            let minimum_channel = red.min(green.min(blue));
            let chroma = maximum_channel - minimum_channel;

            let saturation = if maximum_channel <= 1e-6 {
                0.0
            } else {
                chroma / maximum_channel
            };

            if chroma <= 1e-6 {
                return Self::new(0.0, saturation, maximum_channel);
            }

            let (base_difference, sector_offset) = if maximum_channel == red {
                (green - blue, 0.0)
            } else if maximum_channel == green {
                (blue - red, 2.0)
            } else {
                (red - green, 4.0)
            };

            let mut hue = (base_difference / chroma + sector_offset) / 6.0;
            if hue < 0.0 {
                hue += 1.0;
            }
            if hue >= 1.0 {
                hue -= 1.0;
            }
            Self::new(hue, saturation, maximum_channel)
        }

        /// Normalized RGB triple in [0, 1].
        pub fn to_rgb(&self) -> (f32, f32, f32) {
            let Hsb {
                hue,
                saturation,
                brightness,
            } = self.clamped();

            if saturation <= 1e-6 {
                return (brightness, brightness, brightness);
            }

            let scaled = hue * 6.0;
            let sector = scaled.floor();
            let fraction = scaled - sector;
            let p = brightness * (1.0 - saturation);
            let q = brightness * (1.0 - saturation * fraction);
            let t = brightness * (1.0 - saturation * (1.0 - fraction));

            match sector as i32 % 6 {
                0 => (brightness, t, p),
                1 => (q, brightness, p),
                2 => (p, brightness, t),
                3 => (p, q, brightness),
                4 => (t, p, brightness),
                _ => (brightness, p, q),
            }
        }

        pub fn to_rgb8(&self) -> [u8; 3] {
            let (red, green, blue) = self.to_rgb();
            [
                (red * 255.0).round() as u8,
                (green * 255.0).round() as u8,
                (blue * 255.0).round() as u8,
            ]
        }

        /// `#RRGGBB` form, for logs and the tester.
        pub fn hex(&self) -> String {
            let [red, green, blue] = self.to_rgb8();
            format!("#{red:02X}{green:02X}{blue:02X}")
        }

        /// Wraps hue into [0, 1) and clamps saturation and brightness into [0, 1].
        pub fn clamped(&self) -> Self {
            let mut hue = self.hue.rem_euclid(1.0);
            if !hue.is_finite() || hue >= 1.0 {
                hue = 0.0;
            }
            Self::new(
                hue,
                self.saturation.clamp(0.0, 1.0),
                self.brightness.clamp(0.0, 1.0),
            )
        }

        /// Rec. 601 luma of the color, on the same scale as `Pixel::luma`.
        pub fn luma(&self) -> f32 {
            let (red, green, blue) = self.to_rgb();
            0.299 * red + 0.587 * green + 0.114 * blue
        }

        /// `saturation x (0.5 + 0.5 x brightness)`: favors loud colors.
        pub fn vibrancy(&self) -> f32 {
            self.saturation * (0.5 + 0.5 * self.brightness)
        }

        /// True when hue falls inside the inclusive band `[low, high]`.
        #[inline]
        pub fn hue_in(&self, low: Hue, high: Hue) -> bool {
            self.hue >= low && self.hue <= high
        }
    }

    /// Shortest distance between two hues around the color circle, in [0, 0.5].
    pub fn hue_distance(a: Hue, b: Hue) -> Hue {
        let difference = (a - b).abs().rem_euclid(1.0);
        difference.min(1.0 - difference)
    }
}
