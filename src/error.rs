//! Error types for redaction scanning and rendering.
//!
//! Errors fall into four classes that drive how the coordinator reacts:
//! provider and render failures are isolated to a single item, writer failures
//! go back to the caller for that item, and configuration failures abort the
//! whole run before any work is dispatched.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while scanning or rendering documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page content provider could not extract a page or document.
    #[error("Provider failed for {item}: {reason}")]
    Provider {
        /// Document path or page label the failure belongs to
        item: String,
        /// Reason reported by the provider
        reason: String,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration value for `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },

    /// A page could not be rendered (degenerate geometry, bad font size, ...).
    #[error("Render failed on page {page}: {reason}")]
    Render {
        /// Zero-based page index
        page: usize,
        /// Reason for the failure
        reason: String,
    },

    /// The output writer failed.
    #[error("Failed to write {destination}: {reason}")]
    Write {
        /// Destination path or identifier
        destination: String,
        /// Reason for the failure
        reason: String,
    },

    /// Page index outside the document.
    #[error("Page {index} out of range (document has {count} pages)")]
    PageOutOfRange {
        /// Requested page
        index: usize,
        /// Number of pages in the document
        count: usize,
    },

    /// Work unit was never started because shutdown was requested.
    #[error("Cancelled before processing started")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure taxonomy used for reporting and exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// Content extraction failed for one item
    Provider,
    /// Invalid settings; fatal for the run
    Configuration,
    /// A page could not be rendered and was passed through
    Render,
    /// Output could not be written
    Write,
}

impl Error {
    /// Shorthand for a provider failure.
    pub fn provider(item: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Provider {
            item: item.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a configuration failure.
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Classify this error.
    ///
    /// IO and JSON errors count as provider failures: they surface while
    /// loading page content. Writers wrap their own IO errors in [`Error::Write`].
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::InvalidConfig { .. } => ErrorClass::Configuration,
            Error::Render { .. } => ErrorClass::Render,
            Error::Write { .. } => ErrorClass::Write,
            Error::Provider { .. }
            | Error::PageOutOfRange { .. }
            | Error::Cancelled
            | Error::Io(_)
            | Error::Json(_) => ErrorClass::Provider,
        }
    }

    /// Whether this error must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::Configuration
    }
}
