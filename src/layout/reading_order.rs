//! Line bucketing in provider reading order.
//!
//! Glyph streams are not guaranteed to be in visual order, so lines are cut
//! while walking the provider's reading-order indices rather than after a
//! geometric sort. A line's band follows the running mean of its baselines,
//! which keeps slightly jittered baselines (superscripts aside) together.

use crate::classify::ClassifiedGlyph;
use crate::geometry::Rect;
use crate::utils::safe_float_cmp;

use super::line::{Line, LineChar};
use super::LayoutConfig;

/// Split glyphs into baseline bands, walking them in reading order.
///
/// Returns groups in the order they were cut; glyphs inside a group are still
/// in reading order.
pub fn group_into_lines<'a>(
    glyphs: &'a [ClassifiedGlyph],
    line_tolerance: f32,
) -> Vec<Vec<&'a ClassifiedGlyph>> {
    let mut ordered: Vec<&ClassifiedGlyph> = glyphs.iter().collect();
    ordered.sort_by_key(|c| c.glyph.order);

    let mut groups: Vec<Vec<&ClassifiedGlyph>> = Vec::new();
    let mut current: Vec<&ClassifiedGlyph> = Vec::new();
    let mut band = 0.0f32;

    for glyph in ordered {
        let baseline = glyph.glyph.baseline;
        if current.is_empty() {
            band = baseline;
            current.push(glyph);
            continue;
        }

        if (baseline - band).abs() <= line_tolerance {
            current.push(glyph);
            band += (baseline - band) / current.len() as f32;
        } else {
            groups.push(std::mem::take(&mut current));
            band = baseline;
            current.push(glyph);
        }
    }

    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Build a [`Line`] from one baseline band.
///
/// Returns `None` for an empty band.
pub fn build_line(band: &[&ClassifiedGlyph], config: &LayoutConfig) -> Option<Line> {
    if band.is_empty() {
        return None;
    }

    let mut glyphs: Vec<ClassifiedGlyph> = band.iter().map(|&g| g.clone()).collect();
    glyphs.sort_by(|a, b| safe_float_cmp(a.glyph.bbox.left(), b.glyph.bbox.left()));
    let first = &glyphs[0];

    let threshold = config.space_threshold();
    let mut chars = Vec::with_capacity(glyphs.len() * 2);
    let mut furthest_right: Option<f32> = None;
    let mut prev_whitespace = false;

    for g in &glyphs {
        if let Some(right) = furthest_right {
            let gap = g.glyph.bbox.left() - right;
            if gap >= threshold && !prev_whitespace && !g.glyph.is_whitespace() {
                chars.push(LineChar {
                    ch: ' ',
                    redacted: false,
                    inferred: true,
                });
            }
        }

        chars.push(LineChar {
            ch: g.glyph.ch,
            redacted: g.redacted,
            inferred: false,
        });

        let right = g.glyph.bbox.right();
        furthest_right = Some(furthest_right.map_or(right, |r| r.max(right)));
        prev_whitespace = g.glyph.is_whitespace();
    }

    let text: String = chars.iter().map(|c| c.ch).collect();
    let bbox = glyphs
        .iter()
        .skip(1)
        .fold(first.glyph.bbox, |acc, g| acc.union(&g.glyph.bbox));
    let bbox = if bbox.is_finite() { bbox } else { Rect::new(0.0, 0.0, 0.0, 0.0) };
    let baseline = glyphs.iter().map(|g| g.glyph.baseline).sum::<f32>() / glyphs.len() as f32;
    let top = median(glyphs.iter().map(|g| g.glyph.bbox.top()).collect());
    let font_size = median(glyphs.iter().map(|g| g.glyph.font_size).collect());

    Some(Line {
        glyphs,
        chars,
        text,
        bbox,
        baseline,
        top,
        font_size,
    })
}

/// Reconstruct all lines on a page.
///
/// Lines come back sorted top to bottom by baseline; lines on the same
/// baseline (side-by-side columns) keep reading order.
///
/// # Examples
///
/// ```
/// use pdf_unredact::classify::ClassifiedGlyph;
/// use pdf_unredact::elements::Glyph;
/// use pdf_unredact::geometry::Rect;
/// use pdf_unredact::layout::{reconstruct_lines, LayoutConfig};
///
/// let glyphs = vec![
///     ClassifiedGlyph::visible(Glyph::new('H', Rect::new(0.0, 0.0, 2.0, 10.0), 10.0, 0)),
///     ClassifiedGlyph::visible(Glyph::new('i', Rect::new(20.0, 0.0, 2.0, 10.0), 10.0, 1)),
/// ];
/// let config = LayoutConfig { space_unit: 4.0, min_spaces: 1, ..Default::default() };
/// let lines = reconstruct_lines(&glyphs, &config);
/// assert_eq!(lines[0].text, "H i");
/// ```
pub fn reconstruct_lines(glyphs: &[ClassifiedGlyph], config: &LayoutConfig) -> Vec<Line> {
    let mut lines: Vec<Line> = group_into_lines(glyphs, config.line_tolerance)
        .iter()
        .filter_map(|band| build_line(band, config))
        .collect();

    lines.sort_by(|a, b| safe_float_cmp(a.baseline, b.baseline));
    lines
}

fn median(mut values: Vec<f32>) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| safe_float_cmp(*a, *b));
    values[values.len() / 2]
}
