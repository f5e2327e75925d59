//! Page content providers.
//!
//! Parsing the document byte format is not this crate's job. A provider hands
//! over the three primitive lists of each page (vector shapes, image blocks
//! and positioned glyphs) plus the page count and size. Everything downstream
//! works on those lists alone.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryDocument`]: pages held in memory, also the JSON page-content
//!   dump format read by [`JsonDocumentSource`]
//! - [`JsonDocumentSource`]: a [`DocumentSource`] that opens such dumps from disk

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coordinator::is_output_path;
use crate::elements::{Glyph, ImageBlock, PageContent, Shape};
use crate::error::{Error, Result};

/// Per-page access to a document's primitive content.
///
/// Implementations must be shareable across worker threads; each page is
/// requested by exactly one worker.
pub trait PageContentProvider: Send + Sync {
    /// Label used in logs and reports, usually the source path.
    fn name(&self) -> &str;

    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Page width and height in points.
    fn page_size(&self, page: usize) -> Result<(f32, f32)>;

    /// Vector shapes on the page, in content-stream order.
    fn shapes(&self, page: usize) -> Result<Vec<Shape>>;

    /// Image blocks on the page, in content-stream order.
    fn images(&self, page: usize) -> Result<Vec<ImageBlock>>;

    /// Glyphs on the page with their reading-order indices.
    fn glyphs(&self, page: usize) -> Result<Vec<Glyph>>;

    /// All content of one page.
    fn page(&self, page: usize) -> Result<PageContent> {
        let (width, height) = self.page_size(page)?;
        Ok(PageContent {
            index: page,
            width,
            height,
            shapes: self.shapes(page)?,
            images: self.images(page)?,
            glyphs: self.glyphs(page)?,
        })
    }
}

/// Opens documents from paths.
pub trait DocumentSource: Send + Sync {
    /// Open the document at `path`.
    ///
    /// Failures are reported as [`Error::Provider`] so the caller can record
    /// them against the item and move on.
    fn open(&self, path: &Path) -> Result<Box<dyn PageContentProvider>>;

    /// Whether this source can open the file, judged by name only.
    fn accepts(&self, path: &Path) -> bool;
}

/// A document whose pages are already in memory.
///
/// Serializes to the JSON page-content dump format:
///
/// ```json
/// {
///   "name": "memo.pdf",
///   "pages": [
///     { "index": 0, "width": 612.0, "height": 792.0,
///       "shapes": [], "images": [], "glyphs": [] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryDocument {
    /// Document label
    #[serde(default)]
    pub name: String,
    /// Pages in document order
    pub pages: Vec<PageContent>,
    #[serde(skip)]
    failures: BTreeMap<usize, String>,
}

impl MemoryDocument {
    /// Create a document from its pages.
    pub fn new(name: impl Into<String>, pages: Vec<PageContent>) -> Self {
        Self {
            name: name.into(),
            pages,
            failures: BTreeMap::new(),
        }
    }

    /// Parse a JSON page-content dump.
    pub fn from_json_str(name: impl Into<String>, json: &str) -> Result<Self> {
        let mut doc: MemoryDocument = serde_json::from_str(json)?;
        if doc.name.is_empty() {
            doc.name = name.into();
        }
        doc.check_page_indices()?;
        Ok(doc)
    }

    /// Load a JSON page-content dump from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(path.display().to_string(), &data)
    }

    /// Serialize to the JSON page-content dump format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Make every request for `page` fail with a provider error.
    ///
    /// Used to simulate damaged pages.
    pub fn with_failing_page(mut self, page: usize, reason: impl Into<String>) -> Self {
        self.failures.insert(page, reason.into());
        self
    }

    fn check_page_indices(&self) -> Result<()> {
        for (expected, page) in self.pages.iter().enumerate() {
            if page.index != expected {
                return Err(Error::provider(
                    &self.name,
                    format!("page {} stored with index {}", expected, page.index),
                ));
            }
        }
        Ok(())
    }

    fn get(&self, page: usize) -> Result<&PageContent> {
        if let Some(reason) = self.failures.get(&page) {
            return Err(Error::provider(format!("{} page {}", self.name, page), reason.clone()));
        }
        self.pages.get(page).ok_or(Error::PageOutOfRange {
            index: page,
            count: self.pages.len(),
        })
    }
}

impl PageContentProvider for MemoryDocument {
    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_size(&self, page: usize) -> Result<(f32, f32)> {
        let p = self.get(page)?;
        Ok((p.width, p.height))
    }

    fn shapes(&self, page: usize) -> Result<Vec<Shape>> {
        Ok(self.get(page)?.shapes.clone())
    }

    fn images(&self, page: usize) -> Result<Vec<ImageBlock>> {
        Ok(self.get(page)?.images.clone())
    }

    fn glyphs(&self, page: usize) -> Result<Vec<Glyph>> {
        Ok(self.get(page)?.glyphs.clone())
    }

    fn page(&self, page: usize) -> Result<PageContent> {
        self.get(page).cloned()
    }
}

/// Opens `.json` page-content dumps written by an external extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDocumentSource;

impl JsonDocumentSource {
    /// Create a new source.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentSource for JsonDocumentSource {
    fn open(&self, path: &Path) -> Result<Box<dyn PageContentProvider>> {
        let label = path.display().to_string();
        let data = std::fs::read_to_string(path).map_err(|e| Error::provider(&label, e.to_string()))?;
        let doc = MemoryDocument::from_json_str(label.clone(), &data).map_err(|e| match e {
            Error::Provider { .. } => e,
            other => Error::provider(&label, other.to_string()),
        })?;
        log::debug!("Opened {} ({} pages)", label, doc.page_count());
        Ok(Box::new(doc))
    }

    /// Accepts `.json` files, except display lists this crate wrote itself.
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            && !is_output_path(path)
    }
}
