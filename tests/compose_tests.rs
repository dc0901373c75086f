//! # Composition Tests
//!
//! End-to-end runs of the composition engine against in-memory templates.
//!
//! All tests run offline: assets come from a `MemoryFetcher` (or a temp
//! directory). Most text renders with the built-in font, so pixel positions
//! are exact and identical on every machine; the outline tests serve the
//! bundled DejaVu Sans face through the same fetcher.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use matchgen::fetch::MemoryFetcher;
use matchgen::template::{
    Alignment, ColorFilter, Element, FixtureData, HomeAway, ImageStyle, Position, TemplateSpec,
    TextStyle,
};
use matchgen::{CompositionEngine, ElementOutcome, EngineConfig, MatchgenError, SkipReason};
use pretty_assertions::assert_eq;
use std::io::Cursor;
use std::sync::Arc;

const TEMPLATE: &str = "https://cdn.example.com/templates/matchday.png";
const CLUB_LOGO: &str = "https://cdn.example.com/logos/riverside.png";
const FONT_URL: &str = "https://fonts.example.com/montserrat.ttf";
const DEJAVU_SANS: &[u8] = include_bytes!("../src/font/fonts/DejaVuSans.ttf");
const BACKGROUND: Rgba<u8> = Rgba([16, 32, 64, 255]);
const RED: Rgba<u8> = Rgba([220, 20, 20, 255]);

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn png(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

/// 800×600 flat template plus a 300×300 club logo.
fn assets() -> MemoryFetcher {
    MemoryFetcher::new()
        .with(TEMPLATE, png(RgbaImage::from_pixel(800, 600, BACKGROUND)))
        .with(CLUB_LOGO, png(RgbaImage::from_pixel(300, 300, RED)))
}

fn engine(fetcher: Arc<MemoryFetcher>) -> CompositionEngine {
    CompositionEngine::with_fetcher(EngineConfig::offline(), fetcher)
}

fn decode(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes).unwrap().to_rgba8()
}

/// Bounding box (x0, y0, x1, y1) of every pixel that differs from the background.
fn ink_bounds(canvas: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    canvas
        .enumerate_pixels()
        .filter(|(_, _, p)| **p != BACKGROUND)
        .fold(None, |acc, (x, y, _)| {
            Some(match acc {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            })
        })
}

fn club_name_element() -> Element {
    Element::text(
        "club_name",
        (400.0, 200.0),
        TextStyle {
            font_family: "Montserrat".to_string(),
            font_size: 48.0,
            color: "#FFFFFF".to_string(),
            alignment: Alignment::Center,
            ..Default::default()
        },
    )
}

fn logo_element() -> Element {
    Element::image(
        "club_logo",
        (400.0, 450.0),
        ImageStyle {
            target_width: 150,
            target_height: 150,
            maintain_aspect_ratio: true,
            home_position: Some(Position::new(200.0, 200.0)),
            away_position: Some(Position::new(600.0, 200.0)),
            ..Default::default()
        },
    )
}

// ============================================================================
// TEXT
// ============================================================================

#[tokio::test]
async fn test_centered_club_name() {
    let fixture = FixtureData::new(HomeAway::Home).with("club_name", "Riverside FC");
    let composition = engine(Arc::new(assets()))
        .compose(TEMPLATE, &[club_name_element()], &fixture)
        .await
        .unwrap();

    assert_eq!((composition.width, composition.height), (800, 600));
    assert_eq!(composition.painted_count(), 1);

    let out = decode(&composition.bytes);
    let (x0, y0, x1, y1) = ink_bounds(&out).expect("text was drawn");

    // 12 glyphs at 24px advance: a 288px line box from x=256 to x=544
    assert!(x0 >= 256 && x1 < 544, "ink spans x {}..={}", x0, x1);
    let center = (x0 + x1) as f32 / 2.0;
    assert!((center - 400.0).abs() <= 24.0, "ink centered at {}", center);

    // Sits on the baseline at y=200, nothing below it
    assert!(y1 < 200, "ink reaches y={}", y1);
    assert!(y0 >= 160, "ink starts at y={}", y0);

    // Every mark is the text color
    for (_, _, p) in out.enumerate_pixels().filter(|(_, _, p)| **p != BACKGROUND) {
        assert_eq!(*p, Rgba([255, 255, 255, 255]));
    }
}

#[tokio::test]
async fn test_wrapped_text_stays_within_max_width() {
    let mut element = club_name_element();
    if let matchgen::template::ElementKind::Text(style) = &mut element.kind {
        style.max_width = Some(200.0);
        style.alignment = Alignment::Left;
        style.font_size = 24.0;
    }
    element.position = Position::new(100.0, 100.0);
    let fixture = FixtureData::default().with("club_name", "Riverside Football Club Reserves");

    let composition = engine(Arc::new(assets()))
        .compose(TEMPLATE, &[element], &fixture)
        .await
        .unwrap();
    let (x0, _, x1, y1) = ink_bounds(&decode(&composition.bytes)).unwrap();

    assert!(x0 >= 100 && x1 < 300, "ink spans x {}..={}", x0, x1);
    // More than one line was needed
    assert!(y1 > 100);
}

#[tokio::test]
async fn test_outline_club_name_centered() {
    let fetcher = Arc::new(assets().with(FONT_URL, DEJAVU_SANS.to_vec()));
    let mut config = EngineConfig::offline();
    config.remote_fonts.insert("montserrat".to_string(), FONT_URL.to_string());
    let engine = CompositionEngine::with_fetcher(config, fetcher.clone());

    let mut opponent = club_name_element();
    opponent.content_key = "opponent".to_string();
    opponent.position = Position::new(400.0, 400.0);
    let fixture = FixtureData::new(HomeAway::Home)
        .with("club_name", "Riverside FC")
        .with("opponent", "Ashford Town");

    let composition = engine
        .compose(TEMPLATE, &[club_name_element(), opponent], &fixture)
        .await
        .unwrap();
    assert_eq!(composition.painted_count(), 2);

    // Only the upper line lies above y=300
    let out = decode(&composition.bytes);
    let upper = image::imageops::crop_imm(&out, 0, 0, 800, 300).to_image();
    let (x0, y0, x1, y1) = ink_bounds(&upper).expect("club name was drawn");
    let center = (x0 + x1) as f32 / 2.0;
    assert!((center - 400.0).abs() <= 4.0, "ink centered at {}", center);
    assert!(y1 <= 201, "ink reaches y={}", y1);
    assert!(y0 >= 150, "ink starts at y={}", y0);

    // Both elements and a second composition share one download
    engine.compose(TEMPLATE, &[club_name_element()], &fixture).await.unwrap();
    assert_eq!(fetcher.request_count(FONT_URL), 1);
}

// ============================================================================
// IMAGES
// ============================================================================

#[tokio::test]
async fn test_away_logo_resized_and_centered() {
    let fixture = FixtureData::new(HomeAway::Away).with("club_logo", CLUB_LOGO);
    let composition = engine(Arc::new(assets()))
        .compose(TEMPLATE, &[logo_element()], &fixture)
        .await
        .unwrap();

    let out = decode(&composition.bytes);
    assert_eq!(ink_bounds(&out), Some((525, 125, 674, 274)));
    assert_eq!(*out.get_pixel(600, 200), RED);
    assert_eq!(*out.get_pixel(200, 200), BACKGROUND);
}

#[tokio::test]
async fn test_home_away_selects_position() {
    let cases = [
        (HomeAway::Home, (200, 200)),
        (HomeAway::Away, (600, 200)),
        (HomeAway::Unknown, (400, 450)),
    ];

    for (flag, (cx, cy)) in cases {
        let fixture = FixtureData::new(flag).with("club_logo", CLUB_LOGO);
        let composition = engine(Arc::new(assets()))
            .compose(TEMPLATE, &[logo_element()], &fixture)
            .await
            .unwrap();
        let out = decode(&composition.bytes);
        assert_eq!(
            ink_bounds(&out),
            Some((cx - 75, cy - 75, cx + 74, cy + 74)),
            "{} layout",
            flag
        );
    }
}

#[tokio::test]
async fn test_grayscale_logo() {
    let mut element = logo_element();
    if let matchgen::template::ElementKind::Image(style) = &mut element.kind {
        style.color_filter = ColorFilter::Grayscale;
    }
    let fixture = FixtureData::new(HomeAway::Home).with("club_logo", CLUB_LOGO);
    let composition = engine(Arc::new(assets()))
        .compose(TEMPLATE, &[element], &fixture)
        .await
        .unwrap();

    let p = *decode(&composition.bytes).get_pixel(200, 200);
    assert_eq!(p[0], p[1]);
    assert_eq!(p[1], p[2]);
}

// ============================================================================
// FAILURE POLICY
// ============================================================================

#[tokio::test]
async fn test_missing_value_skips_without_drawing() {
    let fetcher = Arc::new(assets());
    let composition = engine(fetcher.clone())
        .compose(
            TEMPLATE,
            &[club_name_element(), logo_element()],
            &FixtureData::new(HomeAway::Home),
        )
        .await
        .unwrap();

    assert_eq!(composition.painted_count(), 0);
    assert_eq!(
        composition.report[0].outcome,
        ElementOutcome::Skipped(SkipReason::MissingValue("club_name".to_string()))
    );
    assert_eq!(ink_bounds(&decode(&composition.bytes)), None);
    // Only the template was fetched
    assert_eq!(fetcher.requests(), vec![TEMPLATE.to_string()]);
}

#[tokio::test]
async fn test_unfetchable_logo_does_not_abort() {
    let fixture = FixtureData::new(HomeAway::Home)
        .with("club_name", "Riverside FC")
        .with("club_logo", "https://cdn.example.com/logos/gone.png");
    let composition = engine(Arc::new(assets()))
        .compose(TEMPLATE, &[logo_element(), club_name_element()], &fixture)
        .await
        .unwrap();

    assert!(matches!(
        composition.report[0].outcome,
        ElementOutcome::Skipped(SkipReason::FetchFailed(_))
    ));
    assert_eq!(composition.report[1].outcome, ElementOutcome::Painted);
}

#[tokio::test]
async fn test_missing_template_returns_no_image() {
    let fixture = FixtureData::new(HomeAway::Home).with("club_name", "Riverside FC");
    let result = engine(Arc::new(MemoryFetcher::new()))
        .compose(TEMPLATE, &[club_name_element()], &fixture)
        .await;

    match result {
        Err(e @ MatchgenError::TemplateUnavailable(_)) => assert!(e.is_fatal()),
        other => panic!("expected TemplateUnavailable, got {:?}", other.map(|c| c.report)),
    }
}

// ============================================================================
// DETERMINISM AND TEMPLATE FILES
// ============================================================================

#[tokio::test]
async fn test_composition_is_idempotent() {
    let fixture = FixtureData::new(HomeAway::Away)
        .with("club_name", "Riverside FC")
        .with("club_logo", CLUB_LOGO);
    let elements = [logo_element(), club_name_element()];
    let engine = engine(Arc::new(assets()));

    let first = engine.compose(TEMPLATE, &elements, &fixture).await.unwrap();
    let second = engine.compose(TEMPLATE, &elements, &fixture).await.unwrap();
    assert_eq!(first.bytes, second.bytes);
    assert_eq!(first.report, second.report);
}

#[tokio::test]
async fn test_template_spec_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let template_path = dir.path().join("matchday.png");
    std::fs::write(&template_path, png(RgbaImage::from_pixel(800, 600, BACKGROUND))).unwrap();
    let logo_path = dir.path().join("riverside.png");
    std::fs::write(&logo_path, png(RgbaImage::from_pixel(300, 300, RED))).unwrap();

    let json = format!(
        r##"{{
            "image": "{}",
            "elements": [
                {{"type": "image", "name": "badge", "content_key": "club_logo",
                  "position": {{"x": 400, "y": 300}}, "target_width": 150, "target_height": 150,
                  "away_position": {{"x": 600, "y": 200}}}}
            ]
        }}"##,
        template_path.display()
    );
    let spec = TemplateSpec::from_json(&json).unwrap();
    let fixture = FixtureData::new(HomeAway::Away).with("club_logo", logo_path.display().to_string());

    let engine = CompositionEngine::new(EngineConfig::offline()).unwrap();
    let composition = engine.compose_spec(&spec, &fixture).await.unwrap();

    assert_eq!(composition.report[0].name, "badge");
    assert_eq!(composition.report[0].outcome, ElementOutcome::Painted);
    assert_eq!(*decode(&composition.bytes).get_pixel(600, 200), RED);
}
