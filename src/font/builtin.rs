//! Built-in fallback face using the Spleen bitmap fonts.
//!
//! Glyphs are scaled nearest-neighbor from the closest Spleen size into a
//! cell of `size` pixels high and `size / 2` wide. Characters missing from
//! Spleen draw as a box outline, so this face cannot fail.
//!
//! Source bitmaps are decoded once per face and character and kept for the
//! life of the process.

use spleen_font::{FONT_6X12, FONT_12X24, PSF2Font};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Decoded source bitmaps by character; `None` records a miss.
type GlyphTable = Mutex<HashMap<char, Option<Arc<[u8]>>>>;

static SMALL_GLYPHS: OnceLock<GlyphTable> = OnceLock::new();
static LARGE_GLYPHS: OnceLock<GlyphTable> = OnceLock::new();

/// Cell geometry of the built-in face at one pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinMetrics {
    pub cell_width: usize,
    pub cell_height: usize,
    /// Rows above the baseline.
    pub ascent: usize,
}

impl BuiltinMetrics {
    pub fn for_size(size: f32) -> Self {
        let cell_height = (size.round() as usize).max(2);
        let cell_width = (cell_height / 2).max(1);
        // Spleen's baseline sits 4 rows above the bottom of a 24-row cell
        let ascent = cell_height - cell_height / 6;
        Self {
            cell_width,
            cell_height,
            ascent,
        }
    }
}

/// One Spleen face: raw PSF2 data, cell size and its glyph table.
struct SourceFace {
    data: &'static [u8],
    width: usize,
    height: usize,
    glyphs: &'static OnceLock<GlyphTable>,
}

fn source_face(size: f32) -> SourceFace {
    if size < 18.0 {
        SourceFace {
            data: FONT_6X12,
            width: 6,
            height: 12,
            glyphs: &SMALL_GLYPHS,
        }
    } else {
        SourceFace {
            data: FONT_12X24,
            width: 12,
            height: 24,
            glyphs: &LARGE_GLYPHS,
        }
    }
}

impl SourceFace {
    fn table(&self) -> &'static GlyphTable {
        self.glyphs.get_or_init(|| Mutex::new(HashMap::new()))
    }

    /// Cached source bitmap for `ch`, decoding it on first use.
    fn bitmap(&self, ch: char) -> Option<Arc<[u8]>> {
        let table = self.table();
        if let Some(hit) = table.lock().unwrap_or_else(|e| e.into_inner()).get(&ch) {
            return hit.clone();
        }

        let decoded: Option<Arc<[u8]>> = spleen_bitmap(ch, self.data, self.width, self.height).map(Arc::from);
        table
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(ch)
            .or_insert_with(|| decoded.clone());
        decoded
    }
}

/// Source bitmap for one character, 1 = ink. `None` if Spleen lacks it.
fn spleen_bitmap(ch: char, data: &'static [u8], src_w: usize, src_h: usize) -> Option<Vec<u8>> {
    let mut font = PSF2Font::new(data).into_iter().next()?;
    let utf8 = ch.to_string();
    let glyph = font.glyph_for_utf8(utf8.as_bytes())?;

    let mut bitmap = vec![0u8; src_w * src_h];
    for (row_y, row) in glyph.enumerate() {
        for (col_x, on) in row.enumerate() {
            if row_y < src_h && col_x < src_w && on {
                bitmap[row_y * src_w + col_x] = 1;
            }
        }
    }
    Some(bitmap)
}

/// Scale a bitmap from src dimensions to dst dimensions using nearest neighbor.
fn scale_bitmap(src: &[u8], src_w: usize, src_h: usize, dst_w: usize, dst_h: usize) -> Vec<u8> {
    let mut dst = vec![0u8; dst_w * dst_h];
    for dy in 0..dst_h {
        for dx in 0..dst_w {
            let sx = dx * src_w / dst_w;
            let sy = dy * src_h / dst_h;
            if let Some(&v) = src.get(sy * src_w + sx) {
                dst[dy * dst_w + dx] = v;
            }
        }
    }
    dst
}

/// Draw a box outline in the glyph buffer.
fn draw_box(glyph: &mut [u8], width: usize, height: usize) {
    if width < 3 || height < 3 {
        return;
    }
    // Inset so the box reads as a glyph rather than a cell border
    let (x0, x1) = (1, width - 2);
    let (y0, y1) = (height / 6, height - height / 6 - 1);
    for x in x0..=x1 {
        glyph[y0 * width + x] = 1;
        glyph[y1 * width + x] = 1;
    }
    for y in y0..=y1 {
        glyph[y * width + x0] = 1;
        glyph[y * width + x1] = 1;
    }
}

/// Cell-sized bitmap for `ch` at `size`, 1 = ink.
pub fn glyph(ch: char, size: f32) -> Vec<u8> {
    let metrics = BuiltinMetrics::for_size(size);
    let face = source_face(size);

    match face.bitmap(ch) {
        Some(src) => scale_bitmap(&src, face.width, face.height, metrics.cell_width, metrics.cell_height),
        None if ch.is_whitespace() => vec![0u8; metrics.cell_width * metrics.cell_height],
        None => {
            let mut g = vec![0u8; metrics.cell_width * metrics.cell_height];
            draw_box(&mut g, metrics.cell_width, metrics.cell_height);
            g
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_scale_with_size() {
        let m = BuiltinMetrics::for_size(24.0);
        assert_eq!(m.cell_height, 24);
        assert_eq!(m.cell_width, 12);
        assert_eq!(m.ascent, 20);

        let m = BuiltinMetrics::for_size(48.0);
        assert_eq!(m.cell_width, 24);
        assert!(m.ascent < m.cell_height);
    }

    #[test]
    fn test_metrics_never_degenerate() {
        let m = BuiltinMetrics::for_size(0.2);
        assert!(m.cell_width >= 1);
        assert!(m.cell_height >= 2);
    }

    #[test]
    fn test_letter_has_ink() {
        let g = glyph('R', 36.0);
        let m = BuiltinMetrics::for_size(36.0);
        assert_eq!(g.len(), m.cell_width * m.cell_height);
        assert!(g.iter().any(|&v| v == 1));
    }

    #[test]
    fn test_space_is_blank() {
        assert!(glyph(' ', 24.0).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_small_sizes_use_small_face() {
        let g = glyph('A', 12.0);
        assert_eq!(g.len(), 6 * 12);
        assert!(g.iter().any(|&v| v == 1));
    }

    #[test]
    fn test_source_bitmaps_decoded_once() {
        let face = source_face(30.0);
        let first = face.bitmap('Q').unwrap();
        let second = face.bitmap('Q').unwrap();
        // The second lookup is served from the table, not a fresh decode
        assert!(Arc::ptr_eq(&first, &second));
        assert!(face.table().lock().unwrap().contains_key(&'Q'));

        // Scaled output is the same whichever path produced the source
        assert_eq!(glyph('Q', 30.0), glyph('Q', 30.0));
        assert_eq!(first.len(), 12 * 24);
    }

    #[test]
    fn test_missing_glyph_draws_box() {
        let mut g = vec![0u8; 12 * 24];
        draw_box(&mut g, 12, 24);
        assert!(g.iter().filter(|&&v| v == 1).count() > 20);
    }
}
