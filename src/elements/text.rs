//! Glyph element type.

use super::Color;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// A single positioned character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Glyph {
    /// The character itself
    #[serde(rename = "char")]
    pub ch: char,
    /// Bounding box of the character
    pub bbox: Rect,
    /// Font size in points
    pub font_size: f32,
    /// Baseline y coordinate
    pub baseline: f32,
    /// Reading-order index assigned by the provider
    pub order: usize,
    /// Fill color the glyph was painted with
    #[serde(default)]
    pub color: Color,
}

impl Glyph {
    /// Create a glyph whose baseline is the bottom of its box.
    pub fn new(ch: char, bbox: Rect, font_size: f32, order: usize) -> Self {
        Self {
            ch,
            bbox,
            font_size,
            baseline: bbox.bottom(),
            order,
            color: Color::black(),
        }
    }

    /// Override the baseline.
    pub fn with_baseline(mut self, baseline: f32) -> Self {
        self.baseline = baseline;
        self
    }

    /// Set the fill color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Area of the glyph box; zero for whitespace placeholders.
    pub fn area(&self) -> f32 {
        if self.bbox.is_empty() {
            0.0
        } else {
            self.bbox.area()
        }
    }

    /// Check if the character is whitespace.
    pub fn is_whitespace(&self) -> bool {
        self.ch.is_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_baseline_is_box_bottom() {
        let g = Glyph::new('A', Rect::from_points(10.0, 5.0, 20.0, 15.0), 10.0, 0);
        assert_eq!(g.baseline, 15.0);
        assert_eq!(g.area(), 100.0);
    }

    #[test]
    fn test_inverted_box_has_zero_area() {
        let g = Glyph::new(' ', Rect::new(10.0, 5.0, -2.0, 10.0), 10.0, 0);
        assert_eq!(g.area(), 0.0);
        assert!(g.is_whitespace());
    }
}
