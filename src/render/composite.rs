//! Pixel compositing onto the canvas.
//!
//! Both text and images land on the canvas through source-over blending:
//! the source color is mixed in by its effective alpha (coverage × alpha)
//! and the canvas alpha accumulates the same way.

use image::{Rgba, RgbaImage};

/// Blend `color` over the canvas pixel at (x, y) with extra `coverage`.
///
/// Out-of-bounds coordinates are ignored.
#[inline]
pub fn blend_pixel(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i32 || y >= canvas.height() as i32 {
        return;
    }
    let alpha = (color[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    if alpha >= 1.0 {
        *dst = Rgba([color[0], color[1], color[2], 255]);
        return;
    }

    let inv = 1.0 - alpha;
    for c in 0..3 {
        dst[c] = (color[c] as f32 * alpha + dst[c] as f32 * inv).round() as u8;
    }
    dst[3] = (255.0 * alpha + dst[3] as f32 * inv).round().min(255.0) as u8;
}

/// Paste `src` with its top-left at (`left`, `top`), using its alpha as mask.
///
/// Parts falling outside the canvas are clipped.
pub fn paste_masked(canvas: &mut RgbaImage, src: &RgbaImage, left: i32, top: i32) {
    for (sx, sy, pixel) in src.enumerate_pixels() {
        blend_pixel(canvas, left + sx as i32, top + sy as i32, *pixel, 1.0);
    }
}

/// Top-left paste coordinate for an image of `width`×`height` centered on (`cx`, `cy`).
pub fn centered_origin(cx: f32, cy: f32, width: u32, height: u32) -> (i32, i32) {
    (
        cx.round() as i32 - (width / 2) as i32,
        cy.round() as i32 - (height / 2) as i32,
    )
}
