//! Output writers.

use std::path::Path;

use crate::error::{Error, Result};

use super::RenderedOutput;

/// Persists a [`RenderedOutput`].
///
/// Failures come back as [`Error::Write`] for the item being written; the
/// caller decides whether to carry on with the rest of the batch.
pub trait OutputWriter: Send + Sync {
    /// File extension of the written output, without the dot.
    fn extension(&self) -> &'static str;

    /// Write `output` to `destination`.
    fn write(&self, output: &RenderedOutput, destination: &Path) -> Result<()>;
}

/// Writes the display list as pretty-printed JSON.
///
/// Serialization follows field and op order exactly, so identical outputs
/// produce identical bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayListWriter;

impl DisplayListWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Serialize to bytes without touching the filesystem.
    pub fn to_bytes(&self, output: &RenderedOutput) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(output)?)
    }
}

impl OutputWriter for DisplayListWriter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write(&self, output: &RenderedOutput, destination: &Path) -> Result<()> {
        let write_error = |reason: String| Error::Write {
            destination: destination.display().to_string(),
            reason,
        };

        let bytes = self.to_bytes(output).map_err(|e| write_error(e.to_string()))?;
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        std::fs::write(destination, bytes).map_err(|e| write_error(e.to_string()))?;

        log::info!("Wrote {}", destination.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::PageContent;
    use crate::rendering::{RenderMode, RenderedPage};

    fn output() -> RenderedOutput {
        RenderedOutput {
            name: "doc".to_string(),
            mode: RenderMode::Highlight,
            pages: vec![RenderedPage::pass_through(PageContent::new(0, 10.0, 10.0))],
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc_unredacted.json");
        DisplayListWriter::new().write(&output(), &path).unwrap();

        let back: RenderedOutput = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(back, output());
    }

    #[test]
    fn test_unwritable_destination_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten by a file
        let err = DisplayListWriter::new().write(&output(), dir.path()).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}
