//! Parallel scan coordination.
//!
//! A fixed-size rayon pool runs independent work units. A unit is one page
//! when scanning a single document, or one whole document when scanning a
//! corpus; the two are never nested, so a corpus worker scans its pages
//! serially.
//!
//! Units are tagged with their input index and results land in an
//! index-keyed arena, so output order never depends on scheduling. A failing
//! unit is recorded against its index and does not disturb its siblings.
//!
//! Shutdown is cooperative: after [`ShutdownSignal::request`] no new unit
//! starts, units already running finish normally, and every unit that never
//! started comes back as [`Error::Cancelled`].

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::provider::{DocumentSource, PageContentProvider};
use crate::scan::{
    aggregate, scan_page_with, CorpusReport, DocumentReport, DocumentScanResult, PageFailure,
    PageScanResult, ScanDepth,
};

/// Shared flag asking workers to stop picking up new units.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    /// Create a signal in the running state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask workers to stop. Idempotent.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check whether shutdown was requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of scanning one document of a corpus.
#[derive(Debug)]
pub struct DocumentOutcome {
    /// Input path
    pub path: PathBuf,
    /// Scan result or the error that stopped it
    pub result: Result<DocumentScanResult>,
}

impl DocumentOutcome {
    /// Report record for this document.
    pub fn report(&self) -> DocumentReport {
        let path = self.path.display().to_string();
        match &self.result {
            Ok(result) => DocumentReport::from_result(path, result),
            Err(e) => DocumentReport::from_error(path, e),
        }
    }
}

/// Build a corpus report from document outcomes, keeping input order.
pub fn corpus_report(outcomes: &[DocumentOutcome]) -> CorpusReport {
    CorpusReport::new(outcomes.iter().map(DocumentOutcome::report).collect())
}

/// Runs scans on a fixed-size worker pool.
pub struct Coordinator {
    config: ScanConfig,
    pool: rayon::ThreadPool,
    shutdown: ShutdownSignal,
}

impl std::fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("config", &self.config)
            .field("workers", &self.pool.current_num_threads())
            .field("shutdown", &self.shutdown.is_requested())
            .finish()
    }
}

impl Coordinator {
    /// Validate `config` and build a pool of `config.worker_count` threads.
    ///
    /// An invalid configuration is returned as [`Error::InvalidConfig`] before
    /// any thread is spawned.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_count)
            .thread_name(|i| format!("unredact-worker-{}", i))
            .build()
            .map_err(|e| Error::invalid_config("worker_count", e.to_string()))?;

        log::debug!("Coordinator ready with {} workers", config.worker_count);

        Ok(Self {
            config,
            pool,
            shutdown: ShutdownSignal::new(),
        })
    }

    /// Share an externally owned shutdown signal.
    pub fn with_shutdown(mut self, signal: ShutdownSignal) -> Self {
        self.shutdown = signal;
        self
    }

    /// The validated configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Handle for requesting shutdown from another thread.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `work` for every index in `0..count` on the pool.
    ///
    /// The returned vector is indexed like the input. Units that had not
    /// started when shutdown was requested yield [`Error::Cancelled`].
    pub fn run_indexed<T, F>(&self, count: usize, work: F) -> Vec<Result<T>>
    where
        T: Send,
        F: Fn(usize) -> Result<T> + Send + Sync,
    {
        let shutdown = &self.shutdown;
        let results: Vec<Result<T>> = self.pool.install(|| {
            (0..count)
                .into_par_iter()
                .map(|index| {
                    if shutdown.is_requested() {
                        return Err(Error::Cancelled);
                    }
                    work(index)
                })
                .collect()
        });

        let cancelled = results
            .iter()
            .filter(|r| matches!(r, Err(Error::Cancelled)))
            .count();
        if cancelled > 0 {
            log::info!("Shutdown requested: {} of {} units cancelled", cancelled, count);
        }

        results
    }

    /// Full scan of one document, one page per work unit.
    pub fn scan_document(&self, provider: &dyn PageContentProvider) -> Result<DocumentScanResult> {
        self.scan_document_with(provider, ScanDepth::Full)
    }

    /// Scan one document to `depth`, one page per work unit.
    ///
    /// Pages the provider cannot deliver, and pages cancelled by shutdown,
    /// are listed in [`DocumentScanResult::failed_pages`]. Returns
    /// [`Error::Cancelled`] only if shutdown was requested before the call.
    pub fn scan_document_with(
        &self,
        provider: &dyn PageContentProvider,
        depth: ScanDepth,
    ) -> Result<DocumentScanResult> {
        if self.shutdown.is_requested() {
            return Err(Error::Cancelled);
        }

        let page_count = provider.page_count();
        log::info!("Scanning {} ({} pages, {:?})", provider.name(), page_count, depth);

        let config = &self.config;
        let results = self.run_indexed(page_count, |index| {
            let page = provider.page(index)?;
            Ok(scan_page_with(&page, config, depth))
        });

        Ok(collect_pages(provider.name(), results))
    }

    /// Scan many documents, one document per work unit.
    ///
    /// Each document's pages are scanned serially by its worker. A document
    /// the source cannot open is reported with its error; the rest of the
    /// batch continues.
    pub fn scan_corpus(
        &self,
        source: &dyn DocumentSource,
        paths: &[PathBuf],
        depth: ScanDepth,
    ) -> Vec<DocumentOutcome> {
        log::info!(
            "Scanning {} documents on {} workers",
            paths.len(),
            self.worker_count()
        );

        let config = &self.config;
        let shutdown = &self.shutdown;
        let results = self.run_indexed(paths.len(), |index| {
            let provider = source.open(&paths[index])?;
            scan_serial(provider.as_ref(), config, depth, shutdown)
        });

        paths
            .iter()
            .zip(results)
            .map(|(path, result)| {
                if let Err(e) = &result {
                    log::warn!("{}: {}", path.display(), e);
                }
                DocumentOutcome {
                    path: path.clone(),
                    result,
                }
            })
            .collect()
    }

    /// Triage a corpus and build its report.
    pub fn triage_corpus(&self, source: &dyn DocumentSource, paths: &[PathBuf]) -> CorpusReport {
        corpus_report(&self.scan_corpus(source, paths, ScanDepth::Triage))
    }
}

/// Scan all pages of one document on the calling thread.
///
/// Shutdown is checked between pages; pages skipped that way are recorded as
/// cancelled.
pub fn scan_serial(
    provider: &dyn PageContentProvider,
    config: &ScanConfig,
    depth: ScanDepth,
    shutdown: &ShutdownSignal,
) -> Result<DocumentScanResult> {
    let results = (0..provider.page_count())
        .map(|index| {
            if shutdown.is_requested() {
                return Err(Error::Cancelled);
            }
            let page = provider.page(index)?;
            Ok(scan_page_with(&page, config, depth))
        })
        .collect();
    Ok(collect_pages(provider.name(), results))
}

fn collect_pages(name: &str, results: Vec<Result<PageScanResult>>) -> DocumentScanResult {
    let mut pages = Vec::with_capacity(results.len());
    let mut failures = Vec::new();

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(page) => pages.push(page),
            Err(e) => {
                if !matches!(e, Error::Cancelled) {
                    log::warn!("{} page {}: {}", name, index, e);
                }
                failures.push(PageFailure::new(index, &e));
            },
        }
    }

    aggregate(name, pages, failures)
}

/// Suffix appended to the file stem of every output this crate writes.
pub const OUTPUT_SUFFIX: &str = "_unredacted";

/// Derive the output path for a processed document: `<stem>_unredacted.<ext>`
/// next to the input, or inside `output_dir` when given.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use pdf_unredact::coordinator::output_path;
///
/// let out = output_path(Path::new("in/memo.json"), None, "png");
/// assert_eq!(out, Path::new("in/memo_unredacted.png"));
/// ```
pub fn output_path(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let file_name = format!("{}{}.{}", stem, OUTPUT_SUFFIX, extension);
    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

/// True when `path` is named like a file produced by [`output_path`],
/// including the numbered pages `<stem>_unredacted-N.<ext>` of raster output.
pub fn is_output_path(path: &Path) -> bool {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return false;
    };
    if stem.ends_with(OUTPUT_SUFFIX) {
        return true;
    }
    match stem.rsplit_once('-') {
        Some((base, page)) => {
            base.ends_with(OUTPUT_SUFFIX) && !page.is_empty() && page.bytes().all(|b| b.is_ascii_digit())
        },
        None => false,
    }
}
