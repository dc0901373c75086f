//! Image element rendering: fetch, color-modify, resize, anchor-paste.

use image::{RgbaImage, imageops::FilterType};

use super::SkipReason;
use super::color::{self, Adjustments};
use super::composite::{centered_origin, paste_masked};
use crate::fetch::Fetch;
use crate::template::ImageStyle;

/// Fetch the source bytes for an image element.
pub async fn fetch_source(fetcher: &dyn Fetch, source: &str) -> Result<Vec<u8>, SkipReason> {
    fetcher
        .fetch(source)
        .await
        .map_err(|e| SkipReason::FetchFailed(e.to_string()))
}

/// Output size for a `src_w`×`src_h` image in a `target_w`×`target_h` box.
///
/// With `keep_aspect` the image is scaled down to fit inside the box and
/// never scaled up; otherwise it is stretched to the box exactly.
pub fn fit_size(src_w: u32, src_h: u32, target_w: u32, target_h: u32, keep_aspect: bool) -> (u32, u32) {
    if !keep_aspect || src_w == 0 || src_h == 0 {
        return (target_w.max(1), target_h.max(1));
    }

    let scale = (target_w as f64 / src_w as f64)
        .min(target_h as f64 / src_h as f64)
        .min(1.0);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, target_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, target_h.max(1));
    (w, h)
}

/// Decode, color-modify and resize source bytes for `style`.
pub fn prepare(bytes: &[u8], style: &ImageStyle) -> Result<RgbaImage, SkipReason> {
    let decoded = image::load_from_memory(bytes).map_err(|e| SkipReason::DecodeFailed(e.to_string()))?;

    let colored = color::apply(
        &decoded,
        style.color_filter,
        style.tint_color.as_deref(),
        Adjustments::from_style(style),
    );

    let (w, h) = fit_size(
        colored.width(),
        colored.height(),
        style.target_width,
        style.target_height,
        style.maintain_aspect_ratio,
    );
    if (w, h) == colored.dimensions() {
        return Ok(colored);
    }
    Ok(image::imageops::resize(&colored, w, h, FilterType::Lanczos3))
}

/// Paste a prepared image element centered on `position`.
///
/// Returns the pasted size.
pub fn render(
    canvas: &mut RgbaImage,
    style: &ImageStyle,
    bytes: &[u8],
    position: (f32, f32),
) -> Result<(u32, u32), SkipReason> {
    let prepared = prepare(bytes, style)?;
    let (left, top) = centered_origin(position.0, position.1, prepared.width(), prepared.height());
    paste_masked(canvas, &prepared, left, top);
    Ok(prepared.dimensions())
}
