//! Redaction box detection.
//!
//! A redaction box is an opaque dark region presumed to conceal text. Two
//! kinds of page content qualify:
//!
//! - filled vector shapes whose fill color is dark on every channel
//! - image blocks whose dominant color sample is dark on every channel
//!
//! Stroked outlines never qualify, however dark. Detection is a pure function
//! of its inputs; the output keeps input order (vector shapes first, then
//! image blocks) so box ids are stable across runs.

use serde::{Deserialize, Serialize};

use crate::config::{check_non_negative, check_unit_interval};
use crate::elements::{Color, ImageBlock, Shape};
use crate::error::Result;
use crate::geometry::Rect;

/// Where a redaction box came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A filled vector shape
    Vector,
    /// An embedded image block
    Image,
}

/// A shape or image block classified as a redaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionBox {
    /// Position of this box in the page's detection output
    pub id: usize,
    /// Axis-aligned bounds; polygons are approximated by their bounding rectangle
    pub bbox: Rect,
    /// Origin of the box
    pub source_kind: SourceKind,
    /// Index of the source shape or image block within its own list
    pub source_index: usize,
    /// Fill or dominant color
    pub color: Color,
}

/// Redaction box detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum value any RGB channel may have for a fill to count as black.
    pub black_threshold: f32,
    /// Boxes with a smaller area are ignored. Zero disables the filter.
    pub min_box_area: f32,
    /// Boxes thinner than this in either dimension are ignored, which drops
    /// hairline rules and table borders. Zero disables the filter.
    pub min_box_dimension: f32,
    /// Whether image blocks can be redaction boxes.
    pub include_images: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            black_threshold: 0.15,
            min_box_area: 0.0,
            min_box_dimension: 0.0,
            include_images: true,
        }
    }
}

impl DetectorConfig {
    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<()> {
        check_unit_interval("black_threshold", self.black_threshold)?;
        check_non_negative("min_box_area", self.min_box_area)?;
        check_non_negative("min_box_dimension", self.min_box_dimension)?;
        Ok(())
    }

    fn passes_size_filter(&self, bbox: &Rect) -> bool {
        bbox.area() >= self.min_box_area
            && bbox.width >= self.min_box_dimension
            && bbox.height >= self.min_box_dimension
    }
}

/// Check whether a shape is a redaction candidate.
pub fn is_redaction_shape(shape: &Shape, config: &DetectorConfig) -> bool {
    match shape.fill {
        Some(color) if shape.is_filled() => {
            color.is_dark(config.black_threshold) && config.passes_size_filter(&shape.bbox())
        },
        _ => false,
    }
}

/// Check whether an image block is a redaction candidate.
pub fn is_redaction_image(image: &ImageBlock, config: &DetectorConfig) -> bool {
    config.include_images
        && image.dominant_color.is_dark(config.black_threshold)
        && config.passes_size_filter(&image.bbox)
}

/// Detect redaction boxes on one page.
///
/// # Examples
///
/// ```
/// use pdf_unredact::detection::{detect_redaction_boxes, DetectorConfig, SourceKind};
/// use pdf_unredact::elements::{Color, Shape};
/// use pdf_unredact::geometry::Rect;
///
/// let shapes = vec![
///     Shape::filled_rect(Rect::new(0.0, 0.0, 100.0, 20.0), Color::black()),
///     Shape::filled_rect(Rect::new(0.0, 40.0, 100.0, 20.0), Color::new(1.0, 1.0, 0.0)),
/// ];
/// let boxes = detect_redaction_boxes(&shapes, &[], &DetectorConfig::default());
/// assert_eq!(boxes.len(), 1);
/// assert_eq!(boxes[0].source_kind, SourceKind::Vector);
/// ```
pub fn detect_redaction_boxes(
    shapes: &[Shape],
    images: &[ImageBlock],
    config: &DetectorConfig,
) -> Vec<RedactionBox> {
    let mut boxes = Vec::new();

    for (source_index, shape) in shapes.iter().enumerate() {
        if !is_redaction_shape(shape, config) {
            continue;
        }
        boxes.push(RedactionBox {
            id: boxes.len(),
            bbox: shape.bbox(),
            source_kind: SourceKind::Vector,
            source_index,
            color: shape.fill.unwrap_or_default(),
        });
    }

    for (source_index, image) in images.iter().enumerate() {
        if !is_redaction_image(image, config) {
            continue;
        }
        boxes.push(RedactionBox {
            id: boxes.len(),
            bbox: image.bbox,
            source_kind: SourceKind::Image,
            source_index,
            color: image.dominant_color,
        });
    }

    log::debug!(
        "Detected {} redaction boxes from {} shapes and {} images",
        boxes.len(),
        shapes.len(),
        images.len()
    );

    boxes
}
