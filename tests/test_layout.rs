//! Integration tests for line reconstruction.
//!
//! These tests exercise the layout pass the way the scanner drives it:
//! classified glyphs in, ordered lines with inferred spacing out.

use pdf_unredact::classify::ClassifiedGlyph;
use pdf_unredact::elements::{Color, Glyph, PageContent, Shape};
use pdf_unredact::geometry::Rect;
use pdf_unredact::layout::{group_into_lines, lines_to_text, reconstruct_lines, LayoutConfig};
use pdf_unredact::scan::scan_page;
use pdf_unredact::ScanConfig;

// ============================================================================
// Helper Functions for Creating Mock Data
// ============================================================================

/// A visible glyph `width` wide and 10pt tall sitting on `baseline`.
fn glyph(ch: char, x: f32, width: f32, baseline: f32, order: usize) -> ClassifiedGlyph {
    ClassifiedGlyph::visible(Glyph::new(ch, Rect::new(x, baseline - 10.0, width, 10.0), 10.0, order))
}

/// Same as [`glyph`] but marked as hidden under box 0.
fn redacted(ch: char, x: f32, width: f32, baseline: f32, order: usize) -> ClassifiedGlyph {
    ClassifiedGlyph {
        redacted: true,
        box_id: Some(0),
        overlap_ratio: 1.0,
        ..glyph(ch, x, width, baseline, order)
    }
}

fn spacing(space_unit: f32, min_spaces: u32) -> LayoutConfig {
    LayoutConfig {
        space_unit,
        min_spaces,
        ..Default::default()
    }
}

// ============================================================================
// Space Inference
// ============================================================================

mod spacing {
    use super::*;

    #[test]
    fn test_wide_gap_becomes_space() {
        let glyphs = vec![glyph('H', 0.0, 2.0, 10.0, 0), glyph('i', 20.0, 2.0, 10.0, 1)];
        let lines = reconstruct_lines(&glyphs, &spacing(4.0, 1));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "H i");
    }

    #[test]
    fn test_narrow_gap_is_kerning() {
        let glyphs = vec![glyph('H', 0.0, 2.0, 10.0, 0), glyph('i', 4.0, 2.0, 10.0, 1)];
        let lines = reconstruct_lines(&glyphs, &spacing(4.0, 1));
        assert_eq!(lines[0].text, "Hi");
    }

    #[test]
    fn test_min_spaces_scales_threshold() {
        let config = spacing(3.0, 4);
        let below = vec![glyph('a', 0.0, 5.0, 10.0, 0), glyph('b', 15.0, 5.0, 10.0, 1)];
        let at = vec![glyph('a', 0.0, 5.0, 10.0, 0), glyph('b', 17.0, 5.0, 10.0, 1)];

        assert_eq!(reconstruct_lines(&below, &config)[0].text, "ab");
        assert_eq!(reconstruct_lines(&at, &config)[0].text, "a b");
    }

    #[test]
    fn test_one_space_per_gap() {
        // A huge gap still yields a single space
        let glyphs = vec![glyph('a', 0.0, 5.0, 10.0, 0), glyph('b', 200.0, 5.0, 10.0, 1)];
        assert_eq!(reconstruct_lines(&glyphs, &LayoutConfig::default())[0].text, "a b");
    }

    #[test]
    fn test_real_space_not_doubled() {
        let glyphs = vec![
            glyph('a', 0.0, 5.0, 10.0, 0),
            glyph(' ', 20.0, 5.0, 10.0, 1),
            glyph('b', 40.0, 5.0, 10.0, 2),
        ];
        assert_eq!(reconstruct_lines(&glyphs, &LayoutConfig::default())[0].text, "a b");
    }

    #[test]
    fn test_inferred_spaces_are_marked() {
        let glyphs = vec![glyph('a', 0.0, 5.0, 10.0, 0), glyph('b', 20.0, 5.0, 10.0, 1)];
        let line = &reconstruct_lines(&glyphs, &LayoutConfig::default())[0];
        let inferred: Vec<bool> = line.chars.iter().map(|c| c.inferred).collect();
        assert_eq!(inferred, vec![false, true, false]);
    }
}

// ============================================================================
// Line Grouping and Ordering
// ============================================================================

mod ordering {
    use super::*;

    #[test]
    fn test_glyphs_sorted_left_to_right() {
        let glyphs = vec![glyph('b', 6.0, 6.0, 10.0, 0), glyph('a', 0.0, 6.0, 10.0, 1)];
        assert_eq!(reconstruct_lines(&glyphs, &LayoutConfig::default())[0].text, "ab");
    }

    #[test]
    fn test_lines_sorted_top_to_bottom() {
        let glyphs = vec![glyph('2', 0.0, 6.0, 50.0, 0), glyph('1', 0.0, 6.0, 20.0, 1)];
        let lines = reconstruct_lines(&glyphs, &LayoutConfig::default());
        assert_eq!(lines_to_text(&lines), "1\n2");
    }

    #[test]
    fn test_baseline_jitter_stays_on_one_line() {
        let glyphs = vec![
            glyph('a', 0.0, 6.0, 20.0, 0),
            glyph('b', 6.0, 6.0, 21.5, 1),
            glyph('c', 12.0, 6.0, 19.0, 2),
        ];
        let groups = group_into_lines(&glyphs, 2.0);
        assert_eq!(groups.len(), 1);
        assert_eq!(reconstruct_lines(&glyphs, &LayoutConfig::default())[0].text, "abc");
    }

    #[test]
    fn test_tolerance_separates_close_lines() {
        let glyphs = vec![glyph('a', 0.0, 6.0, 20.0, 0), glyph('b', 0.0, 6.0, 23.0, 1)];
        assert_eq!(group_into_lines(&glyphs, 2.0).len(), 2);
        assert_eq!(group_into_lines(&glyphs, 3.5).len(), 1);
    }

    #[test]
    fn test_columns_do_not_merge() {
        // Left column read fully before the right one, same baselines
        let page = PageContent::new(0, 400.0, 200.0)
            .with_text("Left one", 10.0, 20.0, 10.0, 6.0)
            .with_text("Left two", 10.0, 32.0, 10.0, 6.0)
            .with_text("Right one", 220.0, 20.0, 10.0, 6.0)
            .with_text("Right two", 220.0, 32.0, 10.0, 6.0);
        let result = scan_page(&page, &ScanConfig::default());
        let texts: Vec<&str> = result.lines.iter().map(|l| l.text.as_str()).collect();

        assert_eq!(texts, vec!["Left one", "Right one", "Left two", "Right two"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(reconstruct_lines(&[], &LayoutConfig::default()).is_empty());
    }
}

// ============================================================================
// Line Metrics and Redacted Segments
// ============================================================================

mod metrics {
    use super::*;

    #[test]
    fn test_line_metrics() {
        let glyphs = vec![
            glyph('a', 0.0, 6.0, 20.0, 0),
            glyph('b', 6.0, 6.0, 20.0, 1),
            glyph('c', 12.0, 6.0, 21.0, 2),
        ];
        let line = &reconstruct_lines(&glyphs, &LayoutConfig::default())[0];

        assert_eq!(line.bbox, Rect::from_points(0.0, 10.0, 18.0, 21.0));
        assert_eq!(line.top, 10.0);
        assert_eq!(line.font_size, 10.0);
        assert!((line.baseline - 61.0 / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_fully_redacted_line() {
        let glyphs = vec![redacted('4', 0.0, 6.0, 20.0, 0), redacted('2', 6.0, 6.0, 20.0, 1)];
        let line = &reconstruct_lines(&glyphs, &LayoutConfig::default())[0];
        assert!(line.is_fully_redacted());
        assert_eq!(line.redacted_count(), 2);
        assert_eq!(line.redacted_segments(), vec!["42".to_string()]);
    }

    #[test]
    fn test_redacted_phrase_keeps_inner_space() {
        let glyphs = vec![
            glyph('N', 0.0, 6.0, 20.0, 0),
            redacted('J', 20.0, 6.0, 20.0, 1),
            redacted('o', 26.0, 6.0, 20.0, 2),
            redacted('D', 40.0, 6.0, 20.0, 3),
            glyph('.', 60.0, 6.0, 20.0, 4),
        ];
        let line = &reconstruct_lines(&glyphs, &LayoutConfig::default())[0];
        assert_eq!(line.text, "N Jo D .");
        assert_eq!(line.redacted_segments(), vec!["Jo D".to_string()]);
    }

    #[test]
    fn test_segments_from_scanned_page() {
        let page = PageContent::new(0, 200.0, 100.0)
            .with_text("N: Joe.", 10.0, 30.0, 10.0, 6.0)
            .with_shape(Shape::filled_rect(Rect::from_points(28.0, 18.0, 46.0, 32.0), Color::black()));
        let result = scan_page(&page, &ScanConfig::default());

        assert_eq!(result.lines.len(), 1);
        assert_eq!(result.lines[0].text, "N: Joe.");
        assert_eq!(result.lines[0].redacted_segments(), vec!["Joe".to_string()]);
        assert!(!result.lines[0].is_fully_redacted());
    }

    #[test]
    fn test_reconstruction_is_deterministic() {
        let page = PageContent::new(0, 300.0, 300.0)
            .with_text("alpha beta", 10.0, 40.0, 12.0, 7.0)
            .with_text("gamma", 10.0, 60.0, 12.0, 7.0);
        let a = scan_page(&page, &ScanConfig::default());
        let b = scan_page(&page, &ScanConfig::default());
        assert_eq!(a.lines, b.lines);
    }
}
