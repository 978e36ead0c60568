// THEORY:
// `PixelAccess` is the bridge between a decoded bitmap and every analyzer in the
// engine. It owns an RGB copy of the cover (alpha is dropped at the door) and
// offers the two read patterns the strategies need:
//
// 1.  **Strided sampling**: analyzers rarely need every pixel. `sample` and
//     `sample_region` walk a regular grid with a given stride, which bounds the work
//     of each pass to roughly pixels / stride^2.
// 2.  **Region crops**: a `Region` is a normalized rectangle. It is resolved against
//     the real image size only at use time, so the same region table works for a
//     thumbnail and a full-resolution scan.
// 3.  **Coarse copies**: statistics are computed on a copy that fits inside a small
//     box. `downsized` borrows the original when it already fits.
//
// Construction is the only fallible step. A zero-size image or a buffer whose
// length does not match its dimensions is rejected with a `PixelBufferError`;
// everything downstream can assume a non-empty, well-formed image.

use crate::core_modules::pixel::pixel::Pixel;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};
use std::borrow::Cow;
use thiserror::Error;

const RGBA_CHANNELS: usize = 4;
const RGB_CHANNELS: usize = 3;

/// Reasons a pixel buffer cannot be analyzed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PixelBufferError {
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
    #[error("pixel buffer holds {actual} bytes, expected {expected} for a {width}x{height} image")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A rectangle in normalized image coordinates (all fields in [0, 1]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A resolved region in pixel coordinates. End bounds are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSpan {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Region {
    pub const FULL: Region = Region::new(0.0, 0.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Maps the region onto a `image_width` x `image_height` image.
    /// The span is clamped to the image and always covers at least one pixel.
    pub fn resolve(&self, image_width: u32, image_height: u32) -> PixelSpan {
        let (x0, x1) = Self::resolve_axis(self.x, self.width, image_width);
        let (y0, y1) = Self::resolve_axis(self.y, self.height, image_height);
        PixelSpan { x0, y0, x1, y1 }
    }

    fn resolve_axis(start: f32, length: f32, size: u32) -> (u32, u32) {
        if size == 0 {
            return (0, 0);
        }
        let size_f = size as f32;
        let begin = ((start.clamp(0.0, 1.0) * size_f).floor() as u32).min(size - 1);
        let end = (((start + length).clamp(0.0, 1.0) * size_f).ceil() as u32)
            .clamp(begin + 1, size);
        (begin, end)
    }
}

/// Read-only view over a decoded cover image.
#[derive(Debug, Clone)]
pub struct PixelAccess {
    image: RgbImage,
}

impl PixelAccess {
    /// Wraps a tightly packed RGBA buffer. Alpha is discarded.
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, PixelBufferError> {
        Self::from_packed(width, height, bytes, RGBA_CHANNELS)
    }

    /// Wraps a tightly packed RGB buffer.
    pub fn from_rgb(width: u32, height: u32, bytes: &[u8]) -> Result<Self, PixelBufferError> {
        Self::from_packed(width, height, bytes, RGB_CHANNELS)
    }

    /// Converts any decoded image into the RGB working copy.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, PixelBufferError> {
        Self::from_image(image.to_rgb8())
    }

    pub fn from_image(image: RgbImage) -> Result<Self, PixelBufferError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PixelBufferError::EmptyImage { width, height });
        }
        Ok(Self { image })
    }

    fn from_packed(
        width: u32,
        height: u32,
        bytes: &[u8],
        channels: usize,
    ) -> Result<Self, PixelBufferError> {
        if width == 0 || height == 0 {
            return Err(PixelBufferError::EmptyImage { width, height });
        }

        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(channels))
            .unwrap_or(usize::MAX);
        let length_error = PixelBufferError::BufferLength {
            width,
            height,
            expected,
            actual: bytes.len(),
        };
        if bytes.len() != expected {
            return Err(length_error);
        }

        let raw: Vec<u8> = if channels == RGB_CHANNELS {
            bytes.to_vec()
        } else {
            bytes
                .chunks_exact(channels)
                .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                .collect()
        };

        RgbImage::from_raw(width, height, raw)
            .map(|image| Self { image })
            .ok_or(length_error)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.image
    }

    /// The pixel at (x, y). Panics when out of bounds, like `image::GenericImageView`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Pixel {
        Pixel::from(*self.image.get_pixel(x, y))
    }

    /// Walks the whole image on a `stride` grid, row by row.
    pub fn sample(&self, stride: u32) -> impl Iterator<Item = (u32, u32, Pixel)> + '_ {
        self.sample_region(Region::FULL, stride)
    }

    /// Walks `region` on a `stride` grid anchored at the region's top-left corner.
    pub fn sample_region(
        &self,
        region: Region,
        stride: u32,
    ) -> impl Iterator<Item = (u32, u32, Pixel)> + '_ {
        let span = region.resolve(self.width(), self.height());
        let step = stride.max(1) as usize;
        (span.y0..span.y1).step_by(step).flat_map(move |y| {
            (span.x0..span.x1)
                .step_by(step)
                .map(move |x| (x, y, self.pixel(x, y)))
        })
    }

    /// A copy that fits inside `max_width` x `max_height`, aspect preserved.
    /// Borrows `self` when the image already fits.
    pub fn downsized(&self, max_width: u32, max_height: u32) -> Cow<'_, PixelAccess> {
        let (width, height) = self.image.dimensions();
        if width <= max_width && height <= max_height {
            return Cow::Borrowed(self);
        }

        let scale = (max_width as f32 / width as f32).min(max_height as f32 / height as f32);
        let target_width = ((width as f32 * scale).round() as u32).clamp(1, max_width.max(1));
        let target_height = ((height as f32 * scale).round() as u32).clamp(1, max_height.max(1));
        let resized =
            imageops::resize(&self.image, target_width, target_height, FilterType::Triangle);
        Cow::Owned(Self { image: resized })
    }
}
