use cover_accent::core_modules::fallback::{WARM_ORANGE, cool_dark_gray};
use cover_accent::core_modules::pixel::pixel::Pixel;
use cover_accent::core_modules::post_processor::soften;
use cover_accent::{
    AccentOrigin, AccentPipeline, CandidateSource, DEFAULT_ACCENT, Hsb, ParallelAccentPipeline,
    PixelAccess,
};
use std::sync::Arc;

/// RGBA bytes for a cover filled with `background` and a `block` rectangle at
/// normalized `(x, y, w, h)`.
fn cover_bytes(
    width: u32,
    height: u32,
    background: [u8; 3],
    block: [u8; 3],
    rect: (f32, f32, f32, f32),
) -> Vec<u8> {
    let (bx, by, bw, bh) = rect;
    let x0 = (bx * width as f32) as u32;
    let y0 = (by * height as f32) as u32;
    let x1 = ((bx + bw) * width as f32) as u32;
    let y1 = ((by + bh) * height as f32) as u32;
    (0..width * height)
        .flat_map(|i| {
            let (x, y) = (i % width, i / width);
            let rgb = if x >= x0 && x < x1 && y >= y0 && y < y1 {
                block
            } else {
                background
            };
            [rgb[0], rgb[1], rgb[2], 255]
        })
        .collect()
}

fn solid_bytes(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
    cover_bytes(width, height, rgb, rgb, (0.0, 0.0, 0.0, 0.0))
}

fn assert_close(actual: Hsb, expected: Hsb) {
    assert!(
        (actual.hue - expected.hue).abs() < 1e-4
            && (actual.saturation - expected.saturation).abs() < 1e-4
            && (actual.brightness - expected.brightness).abs() < 1e-4,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn identical_bytes_give_identical_accents() {
    let pipeline = AccentPipeline::default();
    let bytes = cover_bytes(160, 240, [70, 40, 110], [240, 120, 30], (0.1, 0.2, 0.5, 0.1));
    let first = pipeline.extract_from_rgba(&bytes, 160, 240);
    let second = pipeline.extract_from_rgba(&bytes, 160, 240);
    assert_eq!(first, second);
    assert_eq!(AccentPipeline::default().extract_accent(&bytes, 160, 240), first.accent);
}

#[test]
fn degenerate_input_returns_the_default_accent() {
    let pipeline = AccentPipeline::default();
    assert_eq!(pipeline.extract_accent(&[], 0, 0), DEFAULT_ACCENT);
    assert_eq!(pipeline.extract_accent(&[], 10, 0), DEFAULT_ACCENT);
    assert_eq!(pipeline.extract_accent(&[255; 7], 2, 2), DEFAULT_ACCENT);
    assert_eq!(
        pipeline.extract_from_rgba(&[255; 7], 2, 2).origin,
        AccentOrigin::DegenerateInput
    );
}

#[test]
fn accents_stay_in_range() {
    let pipeline = AccentPipeline::default();
    let covers = [
        (30, 45, solid_bytes(30, 45, [255, 0, 0])),
        (30, 45, solid_bytes(30, 45, [0, 0, 255])),
        (90, 135, cover_bytes(90, 135, [250, 250, 250], [255, 0, 255], (0.4, 0.4, 0.2, 0.2))),
        (90, 135, cover_bytes(90, 135, [0, 0, 0], [0, 255, 255], (0.0, 0.8, 1.0, 0.2))),
        (1, 1, solid_bytes(1, 1, [128, 64, 32])),
    ];
    for (width, height, bytes) in &covers {
        let accent = pipeline.extract_accent(bytes, *width, *height);
        assert!((0.0..1.0).contains(&accent.hue), "hue out of range: {accent:?}");
        assert!(
            (0.0..=1.0).contains(&accent.saturation),
            "saturation out of range: {accent:?}"
        );
        assert!(
            (0.0..=1.0).contains(&accent.brightness),
            "brightness out of range: {accent:?}"
        );
    }
}

#[test]
fn gold_covers_get_a_gold_accent() {
    // Gold title plate on navy.
    let bytes = cover_bytes(200, 300, [20, 30, 80], [220, 170, 40], (0.2, 0.5, 0.6, 0.1));
    let report = AccentPipeline::default().extract_from_rgba(&bytes, 200, 300);

    assert_eq!(report.origin, AccentOrigin::GoldOverride);
    assert!(report.candidates.is_empty());
    assert!((0.05..=0.20).contains(&report.accent.hue), "{:?}", report.accent);
}

#[test]
fn saturated_red_keeps_its_hue() {
    let softened = soften(Hsb::new(0.0, 0.95, 0.9));
    assert_eq!(softened.hue, 0.0);
    assert!((softened.saturation - 0.855).abs() < 1e-4);
    assert!((softened.brightness - 0.855).abs() < 1e-4);
}

#[test]
fn light_blue_gray_cover_does_not_echo_itself() {
    let cover_color = Pixel::new(156, 167, 184).hsb();
    let bytes = solid_bytes(100, 150, [156, 167, 184]);
    let report = AccentPipeline::default().extract_from_rgba(&bytes, 100, 150);

    let analysis = report.analysis.unwrap();
    assert!(analysis.is_light_blue_gray);
    assert_eq!(report.origin, AccentOrigin::Fallback);
    assert_ne!(report.accent, cover_color);
    assert_close(report.accent, Hsb::new(0.6, 0.8, 0.3));
}

#[test]
fn near_black_cover_falls_back_to_warm_orange() {
    let bytes = solid_bytes(80, 120, [3, 3, 3]);
    let report = AccentPipeline::default().extract_from_rgba(&bytes, 80, 120);
    assert_eq!(report.origin, AccentOrigin::Fallback);
    assert_close(report.accent, WARM_ORANGE);
}

#[test]
fn near_white_cover_falls_back_to_cool_dark_gray() {
    let bytes = solid_bytes(80, 120, [245, 245, 245]);
    let report = AccentPipeline::default().extract_from_rgba(&bytes, 80, 120);
    assert_eq!(report.origin, AccentOrigin::Fallback);
    assert_close(report.accent, cool_dark_gray());
    let (red, green, blue) = report.accent.to_rgb();
    assert!((red - 0.25).abs() < 1e-3);
    assert!((green - 0.25).abs() < 1e-3);
    assert!((blue - 0.28).abs() < 1e-3);
}

#[test]
fn bright_title_on_dark_cover_wins() {
    let title = Pixel::new(40, 200, 90).hsb();
    let bytes = cover_bytes(200, 300, [20, 20, 20], [40, 200, 90], (0.2, 0.15, 0.6, 0.15));
    let report = AccentPipeline::default().extract_from_rgba(&bytes, 200, 300);

    assert!(matches!(
        report.origin,
        AccentOrigin::Candidate(CandidateSource::Center | CandidateSource::Edge)
    ));
    assert!((report.accent.hue - title.hue).abs() < 0.02, "{:?}", report.accent);
    assert!(report.candidates.windows(2).all(|pair| pair[0].score >= pair[1].score));
}

#[tokio::test]
async fn parallel_pipeline_agrees_with_sequential() {
    let sequential = AccentPipeline::default();
    let parallel = ParallelAccentPipeline::default();

    let dark_title = cover_bytes(200, 300, [20, 20, 20], [40, 200, 90], (0.2, 0.15, 0.6, 0.15));
    let gold_plate = cover_bytes(200, 300, [20, 30, 80], [220, 170, 40], (0.2, 0.5, 0.6, 0.1));
    let covers = vec![
        PixelAccess::from_rgba(200, 300, &dark_title).unwrap(),
        PixelAccess::from_rgba(200, 300, &gold_plate).unwrap(),
        PixelAccess::from_rgba(100, 150, &solid_bytes(100, 150, [156, 167, 184])).unwrap(),
    ];

    let expected: Vec<_> = covers.iter().map(|cover| sequential.generate_report(cover)).collect();
    let batch = parallel.extract_many(covers.clone()).await;
    assert_eq!(batch, expected);

    for (cover, expected) in covers.into_iter().zip(&expected) {
        assert_eq!(&parallel.extract(Arc::new(cover)).await, expected);
    }
}
