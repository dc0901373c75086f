//! Color parsing and image color modification.
//!
//! Adjustments run first (brightness, contrast, saturation, each skipped at
//! 1.0), then the named filter. Every operation leaves alpha untouched.

use image::{DynamicImage, Rgba, RgbaImage};
use tracing::warn;

use crate::template::{ColorFilter, ImageStyle};

/// Sepia coefficients per output channel, applied to pixel luminance.
const SEPIA_R: [f32; 3] = [0.393, 0.769, 0.189];
const SEPIA_G: [f32; 3] = [0.349, 0.686, 0.168];
const SEPIA_B: [f32; 3] = [0.272, 0.534, 0.131];

/// Opacity of the flat tint layer for [`ColorFilter::Custom`].
const TINT_OPACITY: f32 = 0.5;

/// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the `#` is optional).
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return None;
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some(Rgba([rgb[0], rgb[1], rgb[2], 255]))
        }
        6 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            255,
        ])),
        8 => Some(Rgba([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            channel(&hex[6..8])?,
        ])),
        _ => None,
    }
}

/// Multipliers where 1.0 means unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustments {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for Adjustments {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl Adjustments {
    pub fn from_style(style: &ImageStyle) -> Self {
        Self {
            brightness: style.brightness,
            contrast: style.contrast,
            saturation: style.saturation,
        }
    }
}

/// ITU-R 601 luminance, as integer-weighted grayscale conversion does it.
#[inline]
fn luma(p: &Rgba<u8>) -> f32 {
    (p[0] as f32 * 299.0 + p[1] as f32 * 587.0 + p[2] as f32 * 114.0) / 1000.0
}

#[inline]
fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn map_rgb(img: &mut RgbaImage, mut f: impl FnMut(&Rgba<u8>) -> [f32; 3]) {
    for pixel in img.pixels_mut() {
        let [r, g, b] = f(pixel);
        pixel[0] = to_channel(r);
        pixel[1] = to_channel(g);
        pixel[2] = to_channel(b);
    }
}

fn brightness(img: &mut RgbaImage, factor: f32) {
    map_rgb(img, |p| {
        [
            p[0] as f32 * factor,
            p[1] as f32 * factor,
            p[2] as f32 * factor,
        ]
    });
}

/// Scale each channel away from the image's mean luminance.
fn contrast(img: &mut RgbaImage, factor: f32) {
    let count = (img.width() as u64 * img.height() as u64).max(1);
    let total: f64 = img.pixels().map(|p| luma(p) as f64).sum();
    let mean = (total / count as f64).round() as f32;

    map_rgb(img, |p| {
        [
            mean + (p[0] as f32 - mean) * factor,
            mean + (p[1] as f32 - mean) * factor,
            mean + (p[2] as f32 - mean) * factor,
        ]
    });
}

/// Scale each channel away from the pixel's own luminance.
fn saturation(img: &mut RgbaImage, factor: f32) {
    map_rgb(img, |p| {
        let l = luma(p);
        [
            l + (p[0] as f32 - l) * factor,
            l + (p[1] as f32 - l) * factor,
            l + (p[2] as f32 - l) * factor,
        ]
    });
}

fn grayscale(img: &mut RgbaImage) {
    map_rgb(img, |p| {
        let l = luma(p).round();
        [l, l, l]
    });
}

/// Sepia output for one luminance value.
///
/// Each channel sums its three coefficients against the same luminance.
pub fn sepia_tone(p: u8) -> [u8; 3] {
    let p = p as f32;
    let tone = |k: [f32; 3]| (k[0] * p + k[1] * p + k[2] * p).min(255.0);
    [
        to_channel(tone(SEPIA_R)),
        to_channel(tone(SEPIA_G)),
        to_channel(tone(SEPIA_B)),
    ]
}

fn sepia(img: &mut RgbaImage) {
    map_rgb(img, |p| {
        let [r, g, b] = sepia_tone(to_channel(luma(p)));
        [r as f32, g as f32, b as f32]
    });
}

fn invert(img: &mut RgbaImage) {
    map_rgb(img, |p| {
        [
            255.0 - p[0] as f32,
            255.0 - p[1] as f32,
            255.0 - p[2] as f32,
        ]
    });
}

fn tint(img: &mut RgbaImage, color: Rgba<u8>) {
    let keep = 1.0 - TINT_OPACITY;
    map_rgb(img, |p| {
        [
            p[0] as f32 * keep + color[0] as f32 * TINT_OPACITY,
            p[1] as f32 * keep + color[1] as f32 * TINT_OPACITY,
            p[2] as f32 * keep + color[2] as f32 * TINT_OPACITY,
        ]
    });
}

/// Apply adjustments and a color filter, returning a new RGBA image.
///
/// A missing or unparseable `tint` for [`ColorFilter::Custom`] is logged and
/// treated as [`ColorFilter::None`].
pub fn apply(
    image: &DynamicImage,
    filter: ColorFilter,
    tint_color: Option<&str>,
    adjust: Adjustments,
) -> RgbaImage {
    let mut img = image.to_rgba8();

    if adjust.brightness != 1.0 {
        brightness(&mut img, adjust.brightness);
    }
    if adjust.contrast != 1.0 {
        contrast(&mut img, adjust.contrast);
    }
    if adjust.saturation != 1.0 {
        saturation(&mut img, adjust.saturation);
    }

    match filter {
        ColorFilter::None => {}
        ColorFilter::Grayscale => grayscale(&mut img),
        ColorFilter::Sepia => sepia(&mut img),
        ColorFilter::Invert => invert(&mut img),
        ColorFilter::Custom => match tint_color.and_then(parse_hex_color) {
            Some(color) => tint(&mut img, color),
            None => warn!(
                tint = tint_color.unwrap_or(""),
                "unparseable tint color, skipping color filter"
            ),
        },
    }

    img
}
