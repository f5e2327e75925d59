//! Image block element type.

use super::Color;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// An embedded image placed on the page.
///
/// Redaction tools sometimes stamp a solid black bitmap instead of drawing a
/// rectangle, so the provider reports a dominant-color sample alongside the
/// placement rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageBlock {
    /// Placement rectangle on the page
    pub bbox: Rect,
    /// Dominant color sampled from the image pixels
    pub dominant_color: Color,
}

impl ImageBlock {
    /// Create a new image block.
    pub fn new(bbox: Rect, dominant_color: Color) -> Self {
        Self {
            bbox,
            dominant_color,
        }
    }
}
