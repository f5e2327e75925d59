//! Per-page scanning and document aggregation.
//!
//! A page goes through detection, classification and (for a full scan) line
//! reconstruction inside one worker. Only the reduced [`PageScanResult`]
//! leaves the worker; [`aggregate`] folds those into a
//! [`DocumentScanResult`].
//!
//! Two depths are offered:
//!
//! - [`ScanDepth::Triage`] skips layout and stops as soon as a page turns out
//!   to have no redaction boxes. Enough to fill a corpus report.
//! - [`ScanDepth::Full`] also reconstructs lines, which rendering and text
//!   export need.

mod document;
mod export;
mod report;

pub use document::{aggregate, DocumentScanResult, PageFailure, SampleText, SAMPLE_LIMIT};
pub use export::{export_text, PAGE_RULE_WIDTH};
pub use report::{CorpusReport, DocumentReport, RunStatus};

use serde::{Deserialize, Serialize};

use crate::classify::{classify_glyphs, recovered_regions, RecoveredRegion};
use crate::config::ScanConfig;
use crate::detection::{detect_redaction_boxes, RedactionBox};
use crate::elements::PageContent;
use crate::layout::{reconstruct_lines, Line};

/// How much work to do per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanDepth {
    /// Detection and classification only
    Triage,
    /// Detection, classification and line reconstruction
    #[default]
    Full,
}

/// Everything learned about one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageScanResult {
    /// Zero-based page index
    pub index: usize,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
    /// Detected redaction boxes
    pub boxes: Vec<RedactionBox>,
    /// Reconstructed lines, top to bottom. Empty for a triage scan.
    pub lines: Vec<Line>,
    /// Number of redaction boxes
    pub redaction_box_count: usize,
    /// Number of glyphs classified as redacted
    pub redacted_char_count: usize,
    /// Recovered text grouped by box
    pub regions: Vec<RecoveredRegion>,
}

impl PageScanResult {
    /// A page with nothing on it.
    pub fn empty(index: usize, width: f32, height: f32) -> Self {
        Self {
            index,
            width,
            height,
            boxes: Vec::new(),
            lines: Vec::new(),
            redaction_box_count: 0,
            redacted_char_count: 0,
            regions: Vec::new(),
        }
    }

    /// Check if the page hides any recoverable text.
    pub fn has_recoverable_text(&self) -> bool {
        self.redacted_char_count > 0
    }
}

/// Scan one page to the requested depth.
pub fn scan_page_with(page: &PageContent, config: &ScanConfig, depth: ScanDepth) -> PageScanResult {
    let boxes = detect_redaction_boxes(&page.shapes, &page.images, &config.detector);

    if boxes.is_empty() && depth == ScanDepth::Triage {
        return PageScanResult::empty(page.index, page.width, page.height);
    }

    let classified = classify_glyphs(&page.glyphs, &boxes, config.overlap_threshold);
    let redacted_char_count = classified.iter().filter(|c| c.redacted).count();
    let regions = recovered_regions(&classified, &boxes);
    let lines = match depth {
        ScanDepth::Full => reconstruct_lines(&classified, &config.layout),
        ScanDepth::Triage => Vec::new(),
    };

    log::trace!(
        "Page {}: {} boxes, {} redacted glyphs, {} lines",
        page.index,
        boxes.len(),
        redacted_char_count,
        lines.len()
    );

    PageScanResult {
        index: page.index,
        width: page.width,
        height: page.height,
        redaction_box_count: boxes.len(),
        redacted_char_count,
        boxes,
        lines,
        regions,
    }
}

/// Full scan of one page.
///
/// # Examples
///
/// ```
/// use pdf_unredact::elements::{Color, PageContent, Shape};
/// use pdf_unredact::geometry::Rect;
/// use pdf_unredact::scan::scan_page;
/// use pdf_unredact::ScanConfig;
///
/// let page = PageContent::new(0, 200.0, 100.0)
///     .with_text("SSN 123", 10.0, 30.0, 10.0, 6.0)
///     .with_shape(Shape::filled_rect(Rect::from_points(33.0, 18.0, 53.0, 32.0), Color::black()));
///
/// let result = scan_page(&page, &ScanConfig::default());
/// assert_eq!(result.redaction_box_count, 1);
/// assert_eq!(result.redacted_char_count, 3);
/// assert_eq!(result.lines[0].redacted_segments(), vec!["123".to_string()]);
/// ```
pub fn scan_page(page: &PageContent, config: &ScanConfig) -> PageScanResult {
    scan_page_with(page, config, ScanDepth::Full)
}

/// Triage scan of one page: counts and regions, no lines.
pub fn triage_page(page: &PageContent, config: &ScanConfig) -> PageScanResult {
    scan_page_with(page, config, ScanDepth::Triage)
}
