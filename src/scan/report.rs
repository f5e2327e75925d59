//! Triage report records.
//!
//! One [`DocumentReport`] per input file, gathered into a [`CorpusReport`]
//! with totals. Both serialize to JSON for downstream tooling.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorClass, Result};

use super::{DocumentScanResult, SampleText, SAMPLE_LIMIT};

/// Per-document triage record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    /// Input path as given
    pub path: String,
    /// File name component of `path`
    pub filename: String,
    /// At least one redaction box was found
    pub has_redaction_boxes: bool,
    /// At least one glyph sits under a box
    pub has_recoverable_text: bool,
    /// Total redaction boxes
    pub redaction_box_count: usize,
    /// Total redacted glyphs
    pub redacted_char_count: usize,
    /// Both flags hold and the document opened cleanly
    pub should_process: bool,
    /// Pages scanned
    pub page_count: usize,
    /// Boxes with text underneath
    pub recoverable_areas: usize,
    /// Leading recovered regions
    pub sample_text: Vec<SampleText>,
    /// Pages the provider could not deliver
    #[serde(default)]
    pub failed_pages: Vec<usize>,
    /// Why the document could not be scanned
    pub error: Option<String>,
    /// Class of `error`
    pub error_class: Option<ErrorClass>,
}

fn file_name_of(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

impl DocumentReport {
    /// Report for a scanned document.
    pub fn from_result(path: impl Into<String>, result: &DocumentScanResult) -> Self {
        let path = path.into();
        Self {
            filename: file_name_of(&path),
            path,
            has_redaction_boxes: result.has_redaction_boxes,
            has_recoverable_text: result.has_recoverable_text,
            redaction_box_count: result.redaction_box_count,
            redacted_char_count: result.redacted_char_count,
            should_process: result.should_process,
            page_count: result.page_count(),
            recoverable_areas: result.recoverable_areas(),
            sample_text: result.sample_regions(SAMPLE_LIMIT),
            failed_pages: result.failed_pages.iter().map(|f| f.index).collect(),
            error: None,
            error_class: None,
        }
    }

    /// Report for a document that could not be scanned at all.
    pub fn from_error(path: impl Into<String>, err: &Error) -> Self {
        let path = path.into();
        Self {
            filename: file_name_of(&path),
            path,
            has_redaction_boxes: false,
            has_recoverable_text: false,
            redaction_box_count: 0,
            redacted_char_count: 0,
            should_process: false,
            page_count: 0,
            recoverable_areas: 0,
            sample_text: Vec::new(),
            failed_pages: Vec::new(),
            error: Some(err.to_string()),
            error_class: Some(err.class()),
        }
    }

    /// Check if anything went wrong with this document.
    pub fn is_failure(&self) -> bool {
        self.error.is_some() || !self.failed_pages.is_empty()
    }
}

/// Corpus-wide triage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    /// RFC 3339 timestamp of report creation
    pub generated_at: String,
    /// Number of documents considered
    pub total_files: usize,
    /// Documents with at least one redaction box
    pub files_with_redaction_boxes: usize,
    /// Documents with recoverable text
    pub files_with_recoverable_text: usize,
    /// Documents worth processing
    pub files_to_process: usize,
    /// Documents that failed fully or partially
    pub files_with_errors: usize,
    /// Per-document records in input order
    pub files: Vec<DocumentReport>,
}

impl CorpusReport {
    /// Build totals over `files`.
    pub fn new(files: Vec<DocumentReport>) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            total_files: files.len(),
            files_with_redaction_boxes: files.iter().filter(|f| f.has_redaction_boxes).count(),
            files_with_recoverable_text: files.iter().filter(|f| f.has_recoverable_text).count(),
            files_to_process: files.iter().filter(|f| f.should_process).count(),
            files_with_errors: files.iter().filter(|f| f.is_failure()).count(),
            files,
        }
    }

    /// Documents flagged for processing, in input order.
    pub fn to_process(&self) -> impl Iterator<Item = &DocumentReport> {
        self.files.iter().filter(|f| f.should_process)
    }

    /// Overall outcome of the run.
    pub fn status(&self) -> RunStatus {
        if self.files_with_errors > 0 {
            RunStatus::Partial
        } else {
            RunStatus::Clean
        }
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| Error::Write {
            destination: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Outcome of a whole run, mapped to a process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Everything succeeded
    Clean,
    /// Some items failed; the rest completed
    Partial,
    /// The run was aborted before any work (invalid configuration)
    Fatal,
}

impl RunStatus {
    /// Status implied by a single error.
    pub fn from_error(err: &Error) -> Self {
        if err.is_fatal() {
            RunStatus::Fatal
        } else {
            RunStatus::Partial
        }
    }

    /// The worse of two statuses.
    pub fn combine(self, other: RunStatus) -> RunStatus {
        self.max(other)
    }

    /// Process exit code.
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Clean => 0,
            RunStatus::Partial => 1,
            RunStatus::Fatal => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{aggregate, PageScanResult};

    fn scanned(chars: usize) -> DocumentScanResult {
        let mut page = PageScanResult::empty(0, 10.0, 10.0);
        page.redaction_box_count = 1;
        page.redacted_char_count = chars;
        aggregate("x", vec![page], Vec::new())
    }

    #[test]
    fn test_document_report_from_result() {
        let report = DocumentReport::from_result("in/dir/memo.pdf", &scanned(4));
        assert_eq!(report.filename, "memo.pdf");
        assert_eq!(report.redacted_char_count, 4);
        assert!(report.should_process);
        assert!(report.error.is_none());
    }

    #[test]
    fn test_document_report_from_error() {
        let err = Error::provider("bad.pdf", "truncated xref");
        let report = DocumentReport::from_error("bad.pdf", &err);
        assert!(!report.should_process);
        assert!(report.error.as_deref().is_some_and(|e| e.contains("truncated xref")));
        assert_eq!(report.error_class, Some(ErrorClass::Provider));
    }

    #[test]
    fn test_corpus_totals() {
        let files = vec![
            DocumentReport::from_result("a.pdf", &scanned(3)),
            DocumentReport::from_error("b.pdf", &Error::provider("b.pdf", "encrypted")),
            DocumentReport::from_result("c.pdf", &scanned(0)),
        ];
        let report = CorpusReport::new(files);
        assert_eq!(report.total_files, 3);
        assert_eq!(report.files_with_redaction_boxes, 2);
        assert_eq!(report.files_with_recoverable_text, 1);
        assert_eq!(report.files_to_process, 1);
        assert_eq!(report.files_with_errors, 1);
        assert_eq!(report.status(), RunStatus::Partial);
        assert_eq!(report.to_process().count(), 1);
    }

    #[test]
    fn test_corpus_json_shape() {
        let report = CorpusReport::new(vec![DocumentReport::from_result("a.pdf", &scanned(1))]);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["total_files"], 1);
        assert_eq!(value["files"][0]["filename"], "a.pdf");
        assert_eq!(value["files"][0]["error"], serde_json::Value::Null);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        CorpusReport::new(Vec::new()).write_json(&path).unwrap();
        let back: CorpusReport = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.total_files, 0);
        assert_eq!(back.status(), RunStatus::Clean);
    }

    #[test]
    fn test_run_status() {
        assert_eq!(RunStatus::Clean.exit_code(), 0);
        assert_eq!(RunStatus::Clean.combine(RunStatus::Partial), RunStatus::Partial);
        assert_eq!(RunStatus::Fatal.combine(RunStatus::Partial), RunStatus::Fatal);
        assert_eq!(RunStatus::from_error(&Error::invalid_config("worker_count", "zero")), RunStatus::Fatal);
        assert_eq!(RunStatus::from_error(&Error::Cancelled), RunStatus::Partial);
    }
}
