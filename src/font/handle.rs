//! A resolved, sized font: measurement and glyph rasterization.
//!
//! Outline faces go through ab_glyph; the built-in face goes through the
//! Spleen bitmaps in [`super::builtin`]. Both expose the same metrics so the
//! text renderer never branches on the face kind.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use std::fmt;
use std::path::PathBuf;

use super::builtin::{self, BuiltinMetrics};

/// Where a font handle's face came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    Remote(String),
    Local(PathBuf),
    Builtin,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Remote(url) => write!(f, "remote {}", url),
            FontSource::Local(path) => write!(f, "local {}", path.display()),
            FontSource::Builtin => f.write_str("built-in"),
        }
    }
}

#[derive(Clone)]
enum Face {
    Outline(FontArc),
    Builtin(BuiltinMetrics),
}

/// Renderable font at a fixed pixel size.
#[derive(Clone)]
pub struct FontHandle {
    face: Face,
    size: f32,
    source: FontSource,
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontHandle")
            .field("size", &self.size)
            .field("source", &self.source)
            .finish()
    }
}

/// Map an em size in pixels to ab_glyph's ascent-to-descent scale.
fn px_scale(font: &FontArc, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
        _ => PxScale::from(size),
    }
}

impl FontHandle {
    pub fn outline(font: FontArc, size: f32, source: FontSource) -> Self {
        Self {
            face: Face::Outline(font),
            size,
            source,
        }
    }

    /// The built-in bitmap face.
    pub fn builtin(size: f32) -> Self {
        Self {
            face: Face::Builtin(BuiltinMetrics::for_size(size)),
            size,
            source: FontSource::Builtin,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn source(&self) -> &FontSource {
        &self.source
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.face, Face::Builtin(_))
    }

    /// Distance from baseline to the top of the tallest glyphs.
    pub fn ascent(&self) -> f32 {
        match &self.face {
            Face::Outline(font) => font.as_scaled(px_scale(font, self.size)).ascent(),
            Face::Builtin(m) => m.ascent as f32,
        }
    }

    /// Baseline-to-baseline distance.
    pub fn line_height(&self) -> f32 {
        match &self.face {
            Face::Outline(font) => {
                let scaled = font.as_scaled(px_scale(font, self.size));
                scaled.height() + scaled.line_gap()
            }
            Face::Builtin(m) => m.cell_height as f32,
        }
    }

    /// Advance width of `text` in pixels, kerning included.
    pub fn measure(&self, text: &str, letter_spacing: f32) -> f32 {
        let count = text.chars().count();
        if count == 0 {
            return 0.0;
        }
        let spacing = letter_spacing * (count - 1) as f32;

        match &self.face {
            Face::Outline(font) => {
                let scaled = font.as_scaled(px_scale(font, self.size));
                let mut width = 0.0f32;
                let mut prev = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(prev) = prev {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    prev = Some(id);
                }
                width + spacing
            }
            Face::Builtin(m) => (count * m.cell_width) as f32 + spacing,
        }
    }

    /// Rasterize `text` with its baseline starting at (`x`, `baseline_y`).
    ///
    /// Calls `plot(px, py, coverage)` for every covered canvas pixel;
    /// coordinates may be negative or beyond the canvas.
    pub fn rasterize(
        &self,
        text: &str,
        letter_spacing: f32,
        x: f32,
        baseline_y: f32,
        mut plot: impl FnMut(i32, i32, f32),
    ) {
        match &self.face {
            Face::Outline(font) => {
                let scale = px_scale(font, self.size);
                let scaled = font.as_scaled(scale);
                let mut caret_x = x;
                let mut prev = None;

                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(prev) = prev {
                        caret_x += scaled.kern(prev, id);
                    }
                    let glyph = id.with_scale_and_position(scale, point(caret_x, baseline_y));
                    if let Some(outlined) = font.outline_glyph(glyph) {
                        let bounds = outlined.px_bounds();
                        outlined.draw(|px, py, coverage| {
                            plot(
                                bounds.min.x as i32 + px as i32,
                                bounds.min.y as i32 + py as i32,
                                coverage.min(1.0),
                            );
                        });
                    }
                    caret_x += scaled.h_advance(id) + letter_spacing;
                    prev = Some(id);
                }
            }
            Face::Builtin(m) => {
                let top = baseline_y.round() as i32 - m.ascent as i32;
                let mut caret_x = x;

                for ch in text.chars() {
                    let left = caret_x.round() as i32;
                    let bitmap = builtin::glyph(ch, self.size);
                    for row in 0..m.cell_height {
                        for col in 0..m.cell_width {
                            if bitmap[row * m.cell_width + col] == 1 {
                                plot(left + col as i32, top + row as i32, 1.0);
                            }
                        }
                    }
                    caret_x += m.cell_width as f32 + letter_spacing;
                }
            }
        }
    }
}
