//! Primitive page content as reported by a page content provider.
//!
//! Every page is described by three flat lists:
//!
//! - [`Shape`]: filled or stroked vector paths with a fill color
//! - [`ImageBlock`]: embedded images with a dominant-color sample
//! - [`Glyph`]: positioned characters with per-glyph boxes
//!
//! Everything downstream (detection, classification, layout, rendering)
//! consumes these immutable snapshots and never mutates them.
//!
//! ## Example
//!
//! ```
//! use pdf_unredact::elements::{Color, Glyph, PageContent, Shape};
//! use pdf_unredact::geometry::Rect;
//!
//! let page = PageContent::new(0, 612.0, 792.0)
//!     .with_shape(Shape::filled_rect(Rect::from_points(0.0, 0.0, 100.0, 20.0), Color::black()))
//!     .with_glyph(Glyph::new('A', Rect::from_points(10.0, 5.0, 20.0, 15.0), 10.0, 0));
//!
//! assert_eq!(page.shapes.len(), 1);
//! assert_eq!(page.glyphs.len(), 1);
//! ```

mod image;
mod path;
mod text;

pub use image::ImageBlock;
pub use path::{FillRule, Shape, ShapeGeometry};
pub use text::Glyph;

use serde::{Deserialize, Serialize};

/// RGB color with channels in the 0.0 - 1.0 range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a black color.
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create a white color.
    pub const fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Create a gray level color.
    pub const fn gray(level: f32) -> Self {
        Self::new(level, level, level)
    }

    /// True when every channel is at or below `threshold`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_unredact::elements::Color;
    ///
    /// assert!(Color::new(0.1, 0.12, 0.0).is_dark(0.15));
    /// assert!(!Color::new(0.1, 0.2, 0.0).is_dark(0.15));
    /// ```
    pub fn is_dark(&self, threshold: f32) -> bool {
        self.r <= threshold && self.g <= threshold && self.b <= threshold
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// All primitive content of one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageContent {
    /// Zero-based page index within the document
    pub index: usize,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Vector shapes in content-stream order
    #[serde(default)]
    pub shapes: Vec<Shape>,
    /// Image blocks in content-stream order
    #[serde(default)]
    pub images: Vec<ImageBlock>,
    /// Glyphs; each carries its own reading-order index
    #[serde(default)]
    pub glyphs: Vec<Glyph>,
}

impl PageContent {
    /// Create an empty page.
    pub fn new(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            ..Default::default()
        }
    }

    /// Add a shape.
    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Add an image block.
    pub fn with_image(mut self, image: ImageBlock) -> Self {
        self.images.push(image);
        self
    }

    /// Add a glyph.
    pub fn with_glyph(mut self, glyph: Glyph) -> Self {
        self.glyphs.push(glyph);
        self
    }

    /// Add a run of glyphs laid out left to right on one baseline.
    ///
    /// Each character gets a box `advance` wide and `font_size` tall whose
    /// bottom sits on `baseline`. Reading-order indices continue from the
    /// current glyph count.
    pub fn with_text(mut self, text: &str, x: f32, baseline: f32, font_size: f32, advance: f32) -> Self {
        let mut cursor = x;
        for ch in text.chars() {
            let order = self.glyphs.len();
            let bbox = crate::geometry::Rect::new(cursor, baseline - font_size, advance, font_size);
            self.glyphs.push(Glyph::new(ch, bbox, font_size, order).with_baseline(baseline));
            cursor += advance;
        }
        self
    }
}
