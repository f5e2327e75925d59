//! Render engine: scan results to display lists.

use crate::elements::{Color, PageContent};
use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::provider::PageContentProvider;
use crate::scan::{DocumentScanResult, PageFailure, PageScanResult};

use super::{DrawOp, RenderMode, RenderedOutput, RenderedPage};

/// Fill color of highlight rectangles.
pub const HIGHLIGHT_COLOR: Color = Color::new(1.0, 1.0, 0.0);

/// Opacity of highlight rectangles.
pub const HIGHLIGHT_ALPHA: f32 = 0.3;

/// Distance from a line's top edge to its baseline, as a fraction of font size.
pub const TEXT_BASELINE_RATIO: f32 = 0.85;

/// Produces display lists in one [`RenderMode`].
///
/// Rendering is a pure function of the scan result and the source pages:
/// the same input always yields the same output, and inputs are never
/// modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderEngine {
    mode: RenderMode,
}

impl RenderEngine {
    /// Create an engine for `mode`.
    pub fn new(mode: RenderMode) -> Self {
        Self { mode }
    }

    /// The engine's mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Render every page of a document.
    ///
    /// The output has exactly one page per source page. A page whose overlay
    /// cannot be built is copied through unchanged and listed in
    /// [`RenderedOutput::failures`]; a page missing from `result` (its scan
    /// failed) is copied through as well. Pages are composited serially.
    ///
    /// `side_by_side` and `overlay_white` draw from reconstructed lines, so
    /// they need a full scan; a triage result renders those modes without
    /// text.
    ///
    /// # Errors
    ///
    /// Returns the provider's error if a source page cannot be read, since
    /// the page count could not be preserved otherwise.
    pub fn render(&self, result: &DocumentScanResult, provider: &dyn PageContentProvider) -> Result<RenderedOutput> {
        let page_count = provider.page_count();
        let mut pages = Vec::with_capacity(page_count);
        let mut failures = Vec::new();

        for index in 0..page_count {
            let source = provider.page(index)?;
            let Some(scan) = result.page(index) else {
                log::debug!("{} page {}: no scan result, passing through", result.name, index);
                pages.push(self.unscanned_page(source));
                continue;
            };

            match self.render_page(&source, scan) {
                Ok(page) => pages.push(page),
                Err(e) => {
                    log::warn!("{}: {}", result.name, e);
                    failures.push(PageFailure::new(index, &e));
                    pages.push(RenderedPage::pass_through(source));
                },
            }
        }

        Ok(RenderedOutput {
            name: result.name.clone(),
            mode: self.mode,
            pages,
            failures,
        })
    }

    /// Copy a page that has no scan result. It keeps the output geometry of
    /// the mode, so side by side output stays uniformly doubled.
    fn unscanned_page(&self, source: PageContent) -> RenderedPage {
        let mut page = RenderedPage::pass_through(source);
        if self.mode == RenderMode::SideBySide {
            page.width *= 2.0;
        }
        page
    }

    /// Render one page.
    ///
    /// # Errors
    ///
    /// [`Error::Render`] on degenerate geometry: a non-positive or
    /// non-finite page size, a non-finite box or glyph position, or a font
    /// size that is not a positive number.
    pub fn render_page(&self, source: &PageContent, scan: &PageScanResult) -> Result<RenderedPage> {
        let index = source.index;
        if !(source.width.is_finite() && source.height.is_finite())
            || source.width <= 0.0
            || source.height <= 0.0
        {
            return Err(render_error(
                index,
                format!("degenerate page size {}x{}", source.width, source.height),
            ));
        }

        let mut ops = vec![DrawOp::SourcePage { x: 0.0, y: 0.0 }];
        let mut width = source.width;

        match self.mode {
            RenderMode::Highlight => {
                for b in &scan.boxes {
                    check_rect(index, &b.bbox)?;
                    if b.bbox.is_empty() {
                        continue;
                    }
                    ops.push(DrawOp::FillRect {
                        rect: b.bbox,
                        color: HIGHLIGHT_COLOR,
                        alpha: HIGHLIGHT_ALPHA,
                    });
                }
            },
            RenderMode::SideBySide => {
                width = source.width * 2.0;
                for line in scan.lines.iter().filter(|l| !l.is_blank()) {
                    check_rect(index, &line.bbox)?;
                    check_font_size(index, line.font_size)?;
                    ops.push(DrawOp::Text {
                        x: source.width + line.bbox.left(),
                        y: line.top + line.font_size * TEXT_BASELINE_RATIO,
                        text: line.text.clone(),
                        font_size: line.font_size,
                        color: Color::black(),
                    });
                }
            },
            RenderMode::OverlayWhite => {
                let redacted = scan.lines.iter().flat_map(|l| l.glyphs.iter()).filter(|g| g.redacted);
                for g in redacted {
                    if g.glyph.is_whitespace() {
                        continue;
                    }
                    check_rect(index, &g.glyph.bbox)?;
                    check_font_size(index, g.glyph.font_size)?;
                    if !g.glyph.baseline.is_finite() {
                        return Err(render_error(index, "non-finite glyph baseline"));
                    }
                    ops.push(DrawOp::Text {
                        x: g.glyph.bbox.left(),
                        y: g.glyph.baseline,
                        text: g.glyph.ch.to_string(),
                        font_size: g.glyph.font_size,
                        color: Color::white(),
                    });
                }
            },
        }

        Ok(RenderedPage {
            index,
            width,
            height: source.height,
            source: source.clone(),
            ops,
            passed_through: false,
        })
    }
}

fn render_error(page: usize, reason: impl Into<String>) -> Error {
    Error::Render {
        page,
        reason: reason.into(),
    }
}

fn check_rect(page: usize, rect: &Rect) -> Result<()> {
    if rect.is_finite() {
        Ok(())
    } else {
        Err(render_error(page, format!("non-finite geometry {:?}", rect)))
    }
}

fn check_font_size(page: usize, font_size: f32) -> Result<()> {
    if font_size.is_finite() && font_size > 0.0 {
        Ok(())
    } else {
        Err(render_error(page, format!("invalid font size {}", font_size)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use crate::elements::Shape;
    use crate::provider::MemoryDocument;
    use crate::scan::{aggregate, scan_page, triage_page};

    fn memo() -> MemoryDocument {
        MemoryDocument::new(
            "memo.pdf",
            vec![
                PageContent::new(0, 300.0, 400.0)
                    .with_text("Name:", 20.0, 50.0, 10.0, 6.0)
                    .with_text("Alice", 60.0, 50.0, 10.0, 6.0)
                    .with_shape(Shape::filled_rect(Rect::from_points(58.0, 38.0, 92.0, 52.0), Color::black())),
                PageContent::new(1, 300.0, 400.0).with_text("plain", 20.0, 50.0, 10.0, 6.0),
            ],
        )
    }

    fn scanned(doc: &MemoryDocument) -> DocumentScanResult {
        let config = ScanConfig::default();
        aggregate(&doc.name, doc.pages.iter().map(|p| scan_page(p, &config)).collect(), Vec::new())
    }

    #[test]
    fn test_highlight() {
        let doc = memo();
        let out = RenderEngine::new(RenderMode::Highlight).render(&scanned(&doc), &doc).unwrap();

        assert_eq!(out.pages.len(), 2);
        let page = &out.pages[0];
        assert_eq!((page.width, page.height), (300.0, 400.0));
        assert_eq!(
            page.ops[1],
            DrawOp::FillRect {
                rect: Rect::from_points(58.0, 38.0, 92.0, 52.0),
                color: HIGHLIGHT_COLOR,
                alpha: 0.3,
            }
        );
        assert_eq!(out.pages[1].overlay_count(), 0);
    }

    #[test]
    fn test_side_by_side() {
        let doc = memo();
        let out = RenderEngine::new(RenderMode::SideBySide).render(&scanned(&doc), &doc).unwrap();

        let page = &out.pages[0];
        assert_eq!(page.width, 600.0);
        assert_eq!(page.height, 400.0);
        match &page.ops[1] {
            DrawOp::Text { x, y, text, font_size, .. } => {
                assert_eq!(text, "Name: Alice");
                assert_eq!(*x, 320.0);
                assert!((*y - (40.0 + 8.5)).abs() < 1e-4);
                assert_eq!(*font_size, 10.0);
            },
            other => panic!("unexpected op {:?}", other),
        }
        assert_eq!(out.pages[1].width, 600.0);
    }

    #[test]
    fn test_overlay_white_draws_only_redacted() {
        let doc = memo();
        let out = RenderEngine::new(RenderMode::OverlayWhite).render(&scanned(&doc), &doc).unwrap();

        let page = &out.pages[0];
        assert_eq!(page.width, 300.0);
        let drawn: String = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, color, .. } if *color == Color::white() => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(drawn, "Alice");
        assert_eq!(page.overlay_count(), 5);
    }

    #[test]
    fn test_render_is_idempotent_and_pure() {
        let doc = memo();
        let result = scanned(&doc);
        let before = result.clone();
        let engine = RenderEngine::new(RenderMode::OverlayWhite);
        assert_eq!(engine.render(&result, &doc).unwrap(), engine.render(&result, &doc).unwrap());
        assert_eq!(result, before);
    }

    #[test]
    fn test_degenerate_page_passed_through() {
        let doc = MemoryDocument::new(
            "bad.pdf",
            vec![PageContent::new(0, 0.0, 400.0).with_text("x", 0.0, 10.0, 10.0, 5.0)],
        );
        let result = scanned(&doc);
        let out = RenderEngine::new(RenderMode::Highlight).render(&result, &doc).unwrap();
        assert_eq!(out.pages.len(), 1);
        assert!(out.pages[0].passed_through);
        assert!(out.is_partial());
        assert_eq!(out.failures[0].class, crate::error::ErrorClass::Render);
    }

    #[test]
    fn test_bad_font_size_is_render_error() {
        let mut page = PageContent::new(0, 100.0, 100.0).with_text("ab", 0.0, 20.0, 10.0, 5.0);
        for g in &mut page.glyphs {
            g.font_size = 0.0;
        }
        let scan = scan_page(&page, &ScanConfig::default());
        let err = RenderEngine::new(RenderMode::SideBySide).render_page(&page, &scan).unwrap_err();
        assert!(matches!(err, Error::Render { page: 0, .. }));
    }

    #[test]
    fn test_missing_scan_page_passed_through() {
        let doc = memo();
        let config = ScanConfig::default();
        let partial = aggregate(&doc.name, vec![scan_page(&doc.pages[0], &config)], Vec::new());
        let out = RenderEngine::new(RenderMode::Highlight).render(&partial, &doc).unwrap();
        assert_eq!(out.pages.len(), 2);
        assert!(out.pages[1].passed_through);
        assert!(!out.is_partial());
    }

    #[test]
    fn test_missing_scan_page_keeps_side_by_side_width() {
        let doc = memo();
        let config = ScanConfig::default();
        let partial = aggregate(&doc.name, vec![scan_page(&doc.pages[0], &config)], Vec::new());
        let out = RenderEngine::new(RenderMode::SideBySide).render(&partial, &doc).unwrap();
        assert_eq!(out.pages[0].width, 600.0);
        assert_eq!(out.pages[1].width, 600.0);
        assert_eq!(out.pages[1].ops, vec![DrawOp::SourcePage { x: 0.0, y: 0.0 }]);
        assert!(out.pages[1].passed_through);
    }

    #[test]
    fn test_triage_result_side_by_side_has_no_text() {
        let doc = memo();
        let config = ScanConfig::default();
        let triage = aggregate(&doc.name, doc.pages.iter().map(|p| triage_page(p, &config)).collect(), Vec::new());
        let out = RenderEngine::new(RenderMode::SideBySide).render(&triage, &doc).unwrap();
        assert_eq!(out.pages[0].width, 600.0);
        assert_eq!(out.pages[0].overlay_count(), 0);
    }
}
