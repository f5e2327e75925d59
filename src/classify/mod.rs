//! Glyph overlap classification.
//!
//! Each glyph is tested against every redaction box on its page:
//!
//! ```text
//! overlap_ratio = area(glyph.bbox ∩ box.bbox) / area(glyph.bbox)
//! redacted      = overlap_ratio >= overlap_threshold for some box
//! ```
//!
//! Classification is per character, so a word with two of five letters under
//! a box reports exactly those two letters. When several boxes reach the
//! threshold the first one in box order is recorded as the covering box.
//! That tie-break is arbitrary; only the boolean flag is consumed downstream.

use serde::{Deserialize, Serialize};

use crate::detection::RedactionBox;
use crate::elements::Glyph;
use crate::geometry::Rect;

/// A glyph with its redaction verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedGlyph {
    /// The glyph as extracted
    pub glyph: Glyph,
    /// Whether the glyph sits under a redaction box
    pub redacted: bool,
    /// Id of the covering box when redacted
    pub box_id: Option<usize>,
    /// Overlap with the covering box, or the largest overlap seen when no
    /// box reached the threshold
    pub overlap_ratio: f32,
}

impl ClassifiedGlyph {
    /// A glyph that no box covers.
    pub fn visible(glyph: Glyph) -> Self {
        Self {
            glyph,
            redacted: false,
            box_id: None,
            overlap_ratio: 0.0,
        }
    }
}

/// Text recovered from under a single redaction box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveredRegion {
    /// Id of the box on its page
    pub box_id: usize,
    /// Bounds of the box
    pub bbox: Rect,
    /// Covered characters in reading order
    pub text: String,
    /// Number of covered glyphs
    pub char_count: usize,
}

/// Fraction of `glyph` covered by `cover`.
///
/// Returns 0.0 for zero-area glyphs.
///
/// # Examples
///
/// ```
/// use pdf_unredact::classify::overlap_ratio;
/// use pdf_unredact::geometry::Rect;
///
/// let redaction = Rect::from_points(0.0, 0.0, 100.0, 20.0);
/// assert_eq!(overlap_ratio(&Rect::from_points(10.0, 5.0, 20.0, 15.0), &redaction), 1.0);
/// assert_eq!(overlap_ratio(&Rect::from_points(95.0, 5.0, 115.0, 15.0), &redaction), 0.25);
/// ```
pub fn overlap_ratio(glyph: &Rect, cover: &Rect) -> f32 {
    if glyph.is_empty() {
        return 0.0;
    }
    match glyph.intersection(cover) {
        Some(overlap) => (overlap.area() / glyph.area()).clamp(0.0, 1.0),
        None => 0.0,
    }
}

/// Classify one glyph against a page's redaction boxes.
pub fn classify_glyph(glyph: &Glyph, boxes: &[RedactionBox], threshold: f32) -> ClassifiedGlyph {
    if glyph.area() <= 0.0 {
        return ClassifiedGlyph::visible(glyph.clone());
    }

    let mut best = 0.0f32;
    for b in boxes {
        let ratio = overlap_ratio(&glyph.bbox, &b.bbox);
        if ratio >= threshold && ratio > 0.0 {
            return ClassifiedGlyph {
                glyph: glyph.clone(),
                redacted: true,
                box_id: Some(b.id),
                overlap_ratio: ratio,
            };
        }
        best = best.max(ratio);
    }

    ClassifiedGlyph {
        glyph: glyph.clone(),
        redacted: false,
        box_id: None,
        overlap_ratio: best,
    }
}

/// Classify every glyph on a page, preserving input order.
pub fn classify_glyphs(
    glyphs: &[Glyph],
    boxes: &[RedactionBox],
    threshold: f32,
) -> Vec<ClassifiedGlyph> {
    if boxes.is_empty() {
        return glyphs.iter().cloned().map(ClassifiedGlyph::visible).collect();
    }
    glyphs
        .iter()
        .map(|g| classify_glyph(g, boxes, threshold))
        .collect()
}

/// Count redacted glyphs without materializing classified copies.
pub fn count_redacted(glyphs: &[Glyph], boxes: &[RedactionBox], threshold: f32) -> usize {
    if boxes.is_empty() {
        return 0;
    }
    glyphs
        .iter()
        .filter(|g| {
            g.area() > 0.0
                && boxes.iter().any(|b| {
                    let ratio = overlap_ratio(&g.bbox, &b.bbox);
                    ratio > 0.0 && ratio >= threshold
                })
        })
        .count()
}

/// Group redacted glyphs by covering box.
///
/// Regions follow box order; text within a region follows reading order.
/// Boxes with nothing under them produce no region.
pub fn recovered_regions(classified: &[ClassifiedGlyph], boxes: &[RedactionBox]) -> Vec<RecoveredRegion> {
    let mut ordered: Vec<&ClassifiedGlyph> = classified.iter().filter(|c| c.redacted).collect();
    ordered.sort_by_key(|c| c.glyph.order);

    boxes
        .iter()
        .filter_map(|b| {
            let text: String = ordered
                .iter()
                .filter(|c| c.box_id == Some(b.id))
                .map(|c| c.glyph.ch)
                .collect();
            let char_count = text.chars().count();
            (char_count > 0).then(|| RecoveredRegion {
                box_id: b.id,
                bbox: b.bbox,
                text,
                char_count,
            })
        })
        .collect()
}
