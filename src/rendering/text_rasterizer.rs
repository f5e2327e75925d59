//! Text rasterizer - renders glyph runs using tiny-skia.
//!
//! With a TrueType/OpenType font loaded, characters are drawn from the font's
//! outlines via `ttf-parser`. Without one, each character becomes a simple
//! placeholder box sized by its character class, which is enough to see where
//! recovered text lands on the page.

use crate::error::{Error, Result};
use ttf_parser::{Face, OutlineBuilder};

use tiny_skia::{Paint, PathBuilder, Pixmap, Transform};

/// Advance per character for placeholder glyphs, as a fraction of font size.
const PLACEHOLDER_ADVANCE: f32 = 0.6;

/// Rasterizer for text runs.
#[derive(Default)]
pub struct TextRasterizer {
    font: Option<Vec<u8>>,
}

impl TextRasterizer {
    /// Create a rasterizer that draws placeholder glyphs.
    pub fn new() -> Self {
        Self { font: None }
    }

    /// Create a rasterizer drawing outlines from `font_data`.
    pub fn with_font(font_data: Vec<u8>) -> Result<Self> {
        Face::parse(&font_data, 0).map_err(|e| Error::Render {
            page: 0,
            reason: format!("unusable font: {}", e),
        })?;
        Ok(Self { font: Some(font_data) })
    }

    /// Check whether a real font is loaded.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Draw `text` starting at `(x, baseline)` in page space.
    pub fn draw_text(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        baseline: f32,
        font_size: f32,
        paint: &Paint,
        transform: Transform,
    ) {
        let face = self.font.as_deref().and_then(|data| Face::parse(data, 0).ok());
        match face {
            Some(face) => self.draw_outlines(pixmap, &face, text, x, baseline, font_size, paint, transform),
            None => self.draw_placeholders(pixmap, text, x, baseline, font_size, paint, transform),
        }
    }

    fn draw_outlines(
        &self,
        pixmap: &mut Pixmap,
        face: &Face,
        text: &str,
        x: f32,
        baseline: f32,
        font_size: f32,
        paint: &Paint,
        transform: Transform,
    ) {
        let scale = font_size / face.units_per_em() as f32;
        let mut pen_x = x;

        for ch in text.chars() {
            let Some(glyph_id) = face.glyph_index(ch) else {
                pen_x += font_size * PLACEHOLDER_ADVANCE;
                continue;
            };

            let mut builder = GlyphPathBuilder {
                pb: PathBuilder::new(),
                origin_x: pen_x,
                origin_y: baseline,
                scale,
            };
            if face.outline_glyph(glyph_id, &mut builder).is_some() {
                if let Some(path) = builder.pb.finish() {
                    pixmap.fill_path(&path, paint, tiny_skia::FillRule::Winding, transform, None);
                }
            }

            let advance = face
                .glyph_hor_advance(glyph_id)
                .map(|a| a as f32 * scale)
                .unwrap_or(font_size * PLACEHOLDER_ADVANCE);
            pen_x += advance;
        }
    }

    /// Simple text rendering using rectangles as placeholder.
    fn draw_placeholders(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        x: f32,
        baseline: f32,
        font_size: f32,
        paint: &Paint,
        transform: Transform,
    ) {
        let char_width = font_size * PLACEHOLDER_ADVANCE;
        let mut pen_x = x;

        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }

            // Upper case and digits full height, lower case x-height,
            // everything else in between; spaces only advance.
            let height = if ch.is_whitespace() {
                0.0
            } else if ch.is_uppercase() || ch.is_ascii_digit() {
                font_size * 0.8
            } else if ch.is_lowercase() {
                font_size * 0.5
            } else {
                font_size * 0.6
            };

            if height > 0.0 {
                if let Some(rect) =
                    tiny_skia::Rect::from_ltrb(pen_x, baseline - height, pen_x + char_width * 0.8, baseline)
                {
                    pixmap.fill_rect(rect, paint, transform, None);
                }
            }

            pen_x += char_width;
        }
    }
}

/// Converts font units (y up) into page space (y down) around a pen origin.
struct GlyphPathBuilder {
    pb: PathBuilder,
    origin_x: f32,
    origin_y: f32,
    scale: f32,
}

impl GlyphPathBuilder {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }
}

impl OutlineBuilder for GlyphPathBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.pb.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.pb.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.pb.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.pb.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.pb.close();
    }
}
