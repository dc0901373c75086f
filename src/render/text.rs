//! Text element rendering: wrap, align, shadow, draw.
//!
//! The element position is the anchor of the first line: its x is the
//! left edge, center or right edge depending on alignment, and its y is the
//! first line's baseline. Following lines step down by the font line height
//! times the element's `line_height` multiplier.

use image::RgbaImage;
use tracing::warn;

use super::SkipReason;
use super::color::parse_hex_color;
use super::composite::blend_pixel;
use crate::font::FontHandle;
use crate::template::{Alignment, TextStyle};

/// One line of text with its resolved draw origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Left edge of the line.
    pub x: f32,
    pub baseline_y: f32,
    pub width: f32,
}

/// Greedy word wrap.
///
/// Explicit newlines always break. Without `max_width` no other breaks are
/// added. A word wider than `max_width` on its own is kept whole on its own
/// line.
pub fn wrap_lines(font: &FontHandle, text: &str, max_width: Option<f32>, letter_spacing: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let Some(max_width) = max_width else {
            lines.push(paragraph.trim().to_string());
            continue;
        };

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if font.measure(&candidate, letter_spacing) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines.retain(|l| !l.is_empty());
    lines
}

/// Horizontal shift for a line of `width` anchored at `x`.
pub fn aligned_x(x: f32, width: f32, alignment: Alignment) -> f32 {
    match alignment {
        Alignment::Left => x,
        Alignment::Center => x - width / 2.0,
        Alignment::Right => x - width,
    }
}

/// Lay out `text` for `style` anchored at `position`.
pub fn layout(font: &FontHandle, style: &TextStyle, text: &str, position: (f32, f32)) -> Vec<PlacedLine> {
    let (x, y) = position;
    let advance = font.line_height() * style.line_height;

    wrap_lines(font, text, style.max_width, style.letter_spacing)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let width = font.measure(&line, style.letter_spacing);
            PlacedLine {
                x: aligned_x(x, width, style.alignment),
                baseline_y: y + advance * i as f32,
                width,
                text: line,
            }
        })
        .collect()
}

/// Draw a text element onto the canvas.
///
/// Empty text and an unparseable text color skip the element without
/// touching the canvas. An unparseable shadow color drops only the shadow.
pub fn render(
    canvas: &mut RgbaImage,
    style: &TextStyle,
    font: &FontHandle,
    text: &str,
    position: (f32, f32),
) -> Result<(), SkipReason> {
    if text.trim().is_empty() {
        return Err(SkipReason::EmptyValue);
    }
    let color = parse_hex_color(&style.color).ok_or_else(|| SkipReason::InvalidColor(style.color.clone()))?;

    let lines = layout(font, style, text, position);
    if lines.is_empty() {
        return Err(SkipReason::EmptyValue);
    }

    if let Some(shadow) = &style.shadow {
        match parse_hex_color(&shadow.color) {
            Some(shadow_color) => {
                let (dx, dy) = (shadow.offset_x as f32, shadow.offset_y as f32);
                for line in &lines {
                    font.rasterize(&line.text, style.letter_spacing, line.x + dx, line.baseline_y + dy, |px, py, c| {
                        blend_pixel(canvas, px, py, shadow_color, c)
                    });
                }
            }
            None => warn!(color = %shadow.color, "unparseable shadow color, drawing without shadow"),
        }
    }

    for line in &lines {
        font.rasterize(&line.text, style.letter_spacing, line.x, line.baseline_y, |px, py, c| {
            blend_pixel(canvas, px, py, color, c)
        });
    }

    Ok(())
}
