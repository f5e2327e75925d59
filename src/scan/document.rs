//! Document-level aggregation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorClass};

use super::PageScanResult;

/// Maximum number of recovered regions carried into a report sample.
pub const SAMPLE_LIMIT: usize = 5;

/// A page that could not be scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageFailure {
    /// Zero-based page index
    pub index: usize,
    /// Failure class
    pub class: ErrorClass,
    /// Error message
    pub message: String,
}

impl PageFailure {
    /// Record `err` against page `index`.
    pub fn new(index: usize, err: &Error) -> Self {
        Self {
            index,
            class: err.class(),
            message: err.to_string(),
        }
    }
}

/// A snippet of recovered text for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleText {
    /// Zero-based page index
    pub page: usize,
    /// Text found under one redaction box
    pub text: String,
    /// Number of recovered characters
    pub char_count: usize,
}

/// Scan results for a whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentScanResult {
    /// Document label
    pub name: String,
    /// Successfully scanned pages, by index
    pub pages: Vec<PageScanResult>,
    /// Pages the provider could not deliver
    pub failed_pages: Vec<PageFailure>,
    /// Total redaction boxes
    pub redaction_box_count: usize,
    /// Total redacted glyphs
    pub redacted_char_count: usize,
    /// At least one redaction box was found
    pub has_redaction_boxes: bool,
    /// At least one glyph sits under a box
    pub has_recoverable_text: bool,
    /// Both of the above
    pub should_process: bool,
}

/// Fold page results into a document result.
///
/// Pages are reordered by index. Counts are plain sums, so aggregating two
/// disjoint page sets and adding the totals gives the same numbers as
/// aggregating their union.
pub fn aggregate(
    name: impl Into<String>,
    mut pages: Vec<PageScanResult>,
    mut failed_pages: Vec<PageFailure>,
) -> DocumentScanResult {
    pages.sort_by_key(|p| p.index);
    failed_pages.sort_by_key(|f| f.index);

    let redaction_box_count: usize = pages.iter().map(|p| p.redaction_box_count).sum();
    let redacted_char_count: usize = pages.iter().map(|p| p.redacted_char_count).sum();
    let has_redaction_boxes = redaction_box_count > 0;
    let has_recoverable_text = redacted_char_count > 0;

    DocumentScanResult {
        name: name.into(),
        pages,
        failed_pages,
        redaction_box_count,
        redacted_char_count,
        has_redaction_boxes,
        has_recoverable_text,
        should_process: has_redaction_boxes && has_recoverable_text,
    }
}

impl DocumentScanResult {
    /// Result for a document with no pages.
    pub fn empty(name: impl Into<String>) -> Self {
        aggregate(name, Vec::new(), Vec::new())
    }

    /// Number of pages scanned successfully.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of boxes that had text underneath.
    pub fn recoverable_areas(&self) -> usize {
        self.pages.iter().map(|p| p.regions.len()).sum()
    }

    /// Check if any page failed.
    pub fn is_partial(&self) -> bool {
        !self.failed_pages.is_empty()
    }

    /// Look up a scanned page by index.
    pub fn page(&self, index: usize) -> Option<&PageScanResult> {
        self.pages
            .binary_search_by_key(&index, |p| p.index)
            .ok()
            .map(|i| &self.pages[i])
    }

    /// First `limit` recovered regions in page order.
    pub fn sample_regions(&self, limit: usize) -> Vec<SampleText> {
        self.pages
            .iter()
            .flat_map(|p| {
                p.regions.iter().map(move |r| SampleText {
                    page: p.index,
                    text: r.text.clone(),
                    char_count: r.char_count,
                })
            })
            .take(limit)
            .collect()
    }
}
