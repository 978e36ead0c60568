use anyhow::{Context, Result};
use cover_accent::Hsb;
use image::ImageEncoder;
use image::codecs::png::PngEncoder;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub const SWATCH_SIZE: u32 = 64;

/// Swatch file name for the `index`-th input. The index keeps names unique
/// when inputs share a file stem.
pub fn file_name(index: usize, input: &Path) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cover".to_owned());
    format!("{index:03}_{stem}_accent.png")
}

/// A square RGB buffer filled with the accent.
pub fn swatch_pixels(accent: Hsb, size: u32) -> Vec<u8> {
    let rgb = accent.to_rgb8();
    (0..size * size).flat_map(|_| rgb).collect()
}

/// Writes a `SWATCH_SIZE` square PNG of the accent to `path`.
pub fn save(path: &Path, accent: Hsb) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating swatch {}", path.display()))?;
    let encoder = PngEncoder::new(BufWriter::new(file));
    encoder
        .write_image(
            &swatch_pixels(accent, SWATCH_SIZE),
            SWATCH_SIZE,
            SWATCH_SIZE,
            image::ExtendedColorType::Rgb8,
        )
        .with_context(|| format!("encoding swatch {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_is_uniform() {
        let accent = Hsb::from_rgb(1.0, 0.0, 0.0);
        let pixels = swatch_pixels(accent, 4);
        assert_eq!(pixels.len(), 4 * 4 * 3);
        assert!(pixels.chunks(3).all(|rgb| rgb == [255, 0, 0]));
    }

    #[test]
    fn file_names_stay_unique_for_shared_stems() {
        let first = file_name(0, Path::new("fiction/cover.jpg"));
        let second = file_name(1, Path::new("poetry/cover.png"));
        assert_eq!(first, "000_cover_accent.png");
        assert_eq!(second, "001_cover_accent.png");
        assert_eq!(file_name(2, Path::new("/")), "002_cover_accent.png");
    }

    #[test]
    fn save_writes_a_decodable_png() {
        let path = std::env::temp_dir().join(format!("accent_swatch_{}.png", std::process::id()));
        save(&path, Hsb::new(0.6, 0.8, 0.3)).expect("swatch saved");

        let decoded = image::open(&path).expect("swatch decodes").to_rgb8();
        assert_eq!(decoded.dimensions(), (SWATCH_SIZE, SWATCH_SIZE));
        assert_eq!(decoded.get_pixel(0, 0).0, Hsb::new(0.6, 0.8, 0.3).to_rgb8());
        std::fs::remove_file(&path).ok();
    }
}
