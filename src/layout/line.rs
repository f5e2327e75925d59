//! Reconstructed text line.

use serde::{Deserialize, Serialize};

use crate::classify::ClassifiedGlyph;
use crate::geometry::Rect;

/// One character of a reconstructed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineChar {
    /// The character
    pub ch: char,
    /// True when the glyph sat under a redaction box
    pub redacted: bool,
    /// True for spaces synthesized from a horizontal gap
    pub inferred: bool,
}

/// A line of glyphs sharing a baseline band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Glyphs sorted left to right
    pub glyphs: Vec<ClassifiedGlyph>,
    /// Characters of `text` with their provenance
    pub chars: Vec<LineChar>,
    /// Reconstructed text including inferred spaces
    pub text: String,
    /// Union of all glyph boxes
    pub bbox: Rect,
    /// Mean baseline of the line's glyphs
    pub baseline: f32,
    /// Median top edge of the glyph boxes
    pub top: f32,
    /// Median font size
    pub font_size: f32,
}

impl Line {
    /// Number of redacted glyphs on the line.
    pub fn redacted_count(&self) -> usize {
        self.glyphs.iter().filter(|g| g.redacted).count()
    }

    /// Check if any glyph on the line was redacted.
    pub fn has_redacted(&self) -> bool {
        self.glyphs.iter().any(|g| g.redacted)
    }

    /// Check if every glyph on the line was redacted.
    pub fn is_fully_redacted(&self) -> bool {
        !self.glyphs.is_empty() && self.glyphs.iter().all(|g| g.redacted)
    }

    /// True when the line holds no visible characters.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Runs of consecutive redacted characters.
    ///
    /// Inferred spaces between two redacted characters stay inside the run,
    /// so a blacked-out phrase comes back as one segment.
    pub fn redacted_segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        let mut current = String::new();

        for c in &self.chars {
            if c.redacted {
                current.push(c.ch);
            } else if c.inferred && !current.is_empty() {
                current.push(c.ch);
            } else if !current.is_empty() {
                segments.push(current.trim_end().to_string());
                current.clear();
            }
        }
        if !current.trim_end().is_empty() {
            segments.push(current.trim_end().to_string());
        }
        segments
    }
}
