//! Display list types produced by the render engine.

use serde::{Deserialize, Serialize};

use crate::elements::{Color, PageContent};
use crate::geometry::Rect;
use crate::scan::PageFailure;

use super::RenderMode;

/// One drawing instruction, in output page coordinates (top-left origin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// Draw the untouched source page with its top-left corner at `(x, y)`.
    SourcePage {
        /// Horizontal offset
        x: f32,
        /// Vertical offset
        y: f32,
    },
    /// Fill a rectangle.
    FillRect {
        /// Rectangle to fill
        rect: Rect,
        /// Fill color
        color: Color,
        /// Opacity, 0 transparent to 1 opaque
        alpha: f32,
    },
    /// Draw a run of text starting at `(x, y)`, `y` being the baseline.
    Text {
        /// Left edge
        x: f32,
        /// Baseline
        y: f32,
        /// Characters to draw
        text: String,
        /// Font size in points
        font_size: f32,
        /// Text color
        color: Color,
    },
}

/// One output page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// Zero-based index of the source page
    pub index: usize,
    /// Output page width in points
    pub width: f32,
    /// Output page height in points
    pub height: f32,
    /// The source page, drawn by [`DrawOp::SourcePage`]
    pub source: PageContent,
    /// Drawing instructions, in paint order
    pub ops: Vec<DrawOp>,
    /// True when the page was copied through without any overlay
    pub passed_through: bool,
}

impl RenderedPage {
    /// A page copied through unchanged.
    pub fn pass_through(source: PageContent) -> Self {
        Self {
            index: source.index,
            width: source.width,
            height: source.height,
            ops: vec![DrawOp::SourcePage { x: 0.0, y: 0.0 }],
            source,
            passed_through: true,
        }
    }

    /// Number of overlay instructions (everything except source page draws).
    pub fn overlay_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| !matches!(op, DrawOp::SourcePage { .. }))
            .count()
    }
}

/// A rendered document, ready for an output writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedOutput {
    /// Document label
    pub name: String,
    /// Mode used
    pub mode: RenderMode,
    /// One page per source page, in order
    pub pages: Vec<RenderedPage>,
    /// Pages that could not be rendered and were passed through
    pub failures: Vec<PageFailure>,
}

impl RenderedOutput {
    /// Check if any page was passed through because of a render failure.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}
