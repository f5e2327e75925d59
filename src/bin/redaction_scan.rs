//! Scan documents for improper redactions and recover the hidden text.
//!
//! Input is a page-content dump (`.json`) or a directory of them. A directory
//! is triaged first, one document per worker; only documents with text under
//! a redaction box are then fully scanned and rendered.
//!
//! Usage:
//!   cargo run --release --bin redaction_scan -- <input> [options]
//!
//! Options:
//!   --mode <highlight|side_by_side|overlay_white>   Output mode (default: highlight)
//!   --scan-only                 Triage and report, render nothing
//!   --workers <n>               Worker threads (default: cores - 1)
//!   --report <path>             Write the JSON triage report
//!   -o, --output <dir>          Output directory (default: next to each input)
//!   --config <path>             JSON configuration file
//!   --exclude <pattern>         Skip paths containing pattern (repeatable)
//!   --max-files <n>             Stop after n documents
//!   --export-text               Also write reconstructed text as .txt
//!   --png                       Write page images instead of display lists
//!   --line-tol <pts>            Line grouping tolerance
//!   --space-unit <pts>          Points per inferred space
//!   --min-spaces <n>            Space units a gap must span
//!   --black-threshold <0-1>     Darkest channel value still counted as black
//!   --overlap-threshold <0-1>   Fraction of a glyph that must be covered

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use pdf_unredact::coordinator::{output_path, Coordinator};
use pdf_unredact::provider::{DocumentSource, JsonDocumentSource};
use pdf_unredact::rendering::{DisplayListWriter, OutputWriter, RenderEngine, RenderMode};
use pdf_unredact::scan::{export_text, CorpusReport, DocumentReport, RunStatus, ScanDepth};
use pdf_unredact::{Error, Result, ScanConfig};

#[derive(Debug, Default)]
struct CliArgs {
    input: Option<PathBuf>,
    mode: Option<RenderMode>,
    scan_only: bool,
    workers: Option<usize>,
    report: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    exclude: Vec<String>,
    max_files: Option<usize>,
    export_text: bool,
    png: bool,
    line_tol: Option<f32>,
    space_unit: Option<f32>,
    min_spaces: Option<u32>,
    black_threshold: Option<f32>,
    overlap_threshold: Option<f32>,
}

fn parse_value<T: std::str::FromStr>(flag: &'static str, value: Option<&String>) -> Result<T> {
    let value = value.ok_or_else(|| Error::invalid_config(flag, "missing value"))?;
    value
        .parse()
        .map_err(|_| Error::invalid_config(flag, format!("cannot parse `{}`", value)))
}

impl CliArgs {
    fn from_args() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let mut cli = CliArgs::default();

        let mut i = 1;
        while i < args.len() {
            let next = args.get(i + 1);
            match args[i].as_str() {
                "--mode" => {
                    cli.mode = Some(parse_value("mode", next)?);
                    i += 1;
                },
                "--scan-only" => cli.scan_only = true,
                "--workers" => {
                    cli.workers = Some(parse_value("worker_count", next)?);
                    i += 1;
                },
                "--report" => {
                    cli.report = Some(PathBuf::from(parse_value::<String>("report", next)?));
                    i += 1;
                },
                "-o" | "--output" => {
                    cli.output_dir = Some(PathBuf::from(parse_value::<String>("output", next)?));
                    i += 1;
                },
                "--config" => {
                    cli.config = Some(PathBuf::from(parse_value::<String>("config", next)?));
                    i += 1;
                },
                "--exclude" => {
                    cli.exclude.push(parse_value("exclude", next)?);
                    i += 1;
                },
                "--max-files" => {
                    cli.max_files = Some(parse_value("max_files", next)?);
                    i += 1;
                },
                "--export-text" => cli.export_text = true,
                "--png" => cli.png = true,
                "--line-tol" => {
                    cli.line_tol = Some(parse_value("line_tolerance", next)?);
                    i += 1;
                },
                "--space-unit" => {
                    cli.space_unit = Some(parse_value("space_unit", next)?);
                    i += 1;
                },
                "--min-spaces" => {
                    cli.min_spaces = Some(parse_value("min_spaces", next)?);
                    i += 1;
                },
                "--black-threshold" => {
                    cli.black_threshold = Some(parse_value("black_threshold", next)?);
                    i += 1;
                },
                "--overlap-threshold" => {
                    cli.overlap_threshold = Some(parse_value("overlap_threshold", next)?);
                    i += 1;
                },
                arg if arg.starts_with('-') => {
                    eprintln!("Ignoring unknown option {}", arg);
                },
                arg => cli.input = Some(PathBuf::from(arg)),
            }
            i += 1;
        }

        Ok(cli)
    }

    /// Merge file configuration and command-line overrides.
    fn scan_config(&self) -> Result<ScanConfig> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_json_file(path)?,
            None => ScanConfig::default(),
        };
        if let Some(mode) = self.mode {
            config = config.with_mode(mode);
        }
        if let Some(workers) = self.workers {
            config = config.with_workers(workers);
        }
        if let Some(tol) = self.line_tol {
            config = config.with_line_tolerance(tol);
        }
        if self.space_unit.is_some() || self.min_spaces.is_some() {
            let space_unit = self.space_unit.unwrap_or(config.layout.space_unit);
            let min_spaces = self.min_spaces.unwrap_or(config.layout.min_spaces);
            config = config.with_spacing(space_unit, min_spaces);
        }
        if let Some(t) = self.black_threshold {
            config = config.with_black_threshold(t);
        }
        if let Some(t) = self.overlap_threshold {
            config = config.with_overlap_threshold(t);
        }
        Ok(config)
    }
}

/// Collect every file under `base_dir` the source accepts, skipping excluded
/// paths and `skip` (the report written by an earlier run).
fn discover_documents(
    base_dir: &Path,
    source: &dyn DocumentSource,
    exclude: &[String],
    skip: Option<&Path>,
    found: &mut Vec<PathBuf>,
) {
    let entries = match fs::read_dir(base_dir) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", base_dir.display(), e);
            return;
        },
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        let display = path.to_string_lossy();
        if exclude.iter().any(|pattern| display.contains(pattern.as_str())) {
            continue;
        }
        if path.is_dir() {
            discover_documents(&path, source, exclude, skip, found);
        } else if skip.is_some_and(|skip| same_file(&path, skip)) {
            log::debug!("Skipping report file {}", path.display());
        } else if source.accepts(&path) {
            found.push(path);
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn select_writer(png: bool) -> Box<dyn OutputWriter> {
    #[cfg(feature = "rendering")]
    if png {
        return Box::new(pdf_unredact::rendering::PngPageWriter::default());
    }
    #[cfg(not(feature = "rendering"))]
    if png {
        eprintln!("Built without the `rendering` feature; writing display lists instead");
    }
    Box::new(DisplayListWriter::new())
}

/// Full scan, render and write one document. Returns the document's status.
fn process_document(
    path: &Path,
    coordinator: &Coordinator,
    source: &dyn DocumentSource,
    writer: &dyn OutputWriter,
    cli: &CliArgs,
) -> Result<RunStatus> {
    let provider = source.open(path)?;
    let result = coordinator.scan_document(provider.as_ref())?;
    let mut status = if result.is_partial() {
        RunStatus::Partial
    } else {
        RunStatus::Clean
    };

    if cli.export_text {
        let text_path = output_path(path, cli.output_dir.as_deref(), "txt");
        fs::write(&text_path, export_text(&result)).map_err(|e| Error::Write {
            destination: text_path.display().to_string(),
            reason: e.to_string(),
        })?;
        println!("   ✓ Text: {}", text_path.display());
    }

    let engine = RenderEngine::new(coordinator.config().mode);
    let rendered = engine.render(&result, provider.as_ref())?;
    if rendered.is_partial() {
        status = status.combine(RunStatus::Partial);
        println!("   ⚠ {} page(s) passed through unrendered", rendered.failures.len());
    }

    let destination = output_path(path, cli.output_dir.as_deref(), writer.extension());
    writer.write(&rendered, &destination)?;
    println!("   ✓ {} output: {}", engine.mode(), destination.display());

    Ok(status)
}

fn print_summary(report: &CorpusReport) {
    println!("\n{}", "=".repeat(60));
    println!("SCAN RESULTS SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Total documents scanned: {}", report.total_files);
    println!("With redaction boxes: {}", report.files_with_redaction_boxes);
    println!("With recoverable text: {}", report.files_with_recoverable_text);
    println!("To process: {}", report.files_to_process);
    println!("Errors: {}", report.files_with_errors);

    if report.files_to_process > 0 {
        println!("\nFiles with recoverable redacted text:");
        for r in report.to_process() {
            println!("   • {} ({} chars)", r.filename, r.redacted_char_count);
            for sample in &r.sample_text {
                let preview: String = sample.text.chars().take(80).collect();
                println!("       page {}: \"{}\"", sample.page + 1, preview);
            }
        }
    }
    println!("{}", "=".repeat(60));
}

fn run(cli: &CliArgs) -> Result<RunStatus> {
    let input = cli
        .input
        .clone()
        .ok_or_else(|| Error::invalid_config("input", "no input file or directory given"))?;

    let config = cli.scan_config()?;
    let coordinator = Coordinator::new(config)?;
    let source = JsonDocumentSource::new();
    let writer = select_writer(cli.png);

    if let Some(dir) = &cli.output_dir {
        fs::create_dir_all(dir).map_err(|e| Error::Write {
            destination: dir.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    let start = Instant::now();
    let mut status = RunStatus::Clean;

    let report = if input.is_dir() {
        let mut paths = Vec::new();
        discover_documents(&input, &source, &cli.exclude, cli.report.as_deref(), &mut paths);
        paths.sort();
        if let Some(max) = cli.max_files {
            paths.truncate(max);
        }
        println!("Found {} documents", paths.len());
        println!("Triaging with {} workers...", coordinator.worker_count());

        coordinator.triage_corpus(&source, &paths)
    } else if input.is_file() {
        println!("Analyzing single file: {}", input.display());
        let record = match source.open(&input) {
            Ok(provider) => match coordinator.scan_document_with(provider.as_ref(), ScanDepth::Triage) {
                Ok(result) => DocumentReport::from_result(input.display().to_string(), &result),
                Err(e) => DocumentReport::from_error(input.display().to_string(), &e),
            },
            Err(e) => DocumentReport::from_error(input.display().to_string(), &e),
        };
        CorpusReport::new(vec![record])
    } else {
        return Err(Error::invalid_config(
            "input",
            format!("{} not found", input.display()),
        ));
    };

    print_summary(&report);
    status = status.combine(report.status());

    if let Some(path) = &cli.report {
        match report.write_json(path) {
            Ok(()) => println!("\n📄 Report saved to: {}", path.display()),
            Err(e) => {
                eprintln!("❌ {}", e);
                status = status.combine(RunStatus::Partial);
            },
        }
    }

    if !cli.scan_only {
        let to_process: Vec<&DocumentReport> = report.to_process().collect();
        for (idx, record) in to_process.iter().enumerate() {
            println!("\n[{}/{}] Processing: {}", idx + 1, to_process.len(), record.filename);
            println!("   Redacted characters found: {}", record.redacted_char_count);

            match process_document(Path::new(&record.path), &coordinator, &source, writer.as_ref(), cli) {
                Ok(doc_status) => status = status.combine(doc_status),
                Err(e) => {
                    eprintln!("   ❌ Error: {}", e);
                    status = status.combine(RunStatus::from_error(&e));
                },
            }
        }
    }

    println!("\n⏱️  Total execution time: {:.2?}", start.elapsed());
    Ok(status)
}

fn main() {
    env_logger::init();

    let status = match CliArgs::from_args().and_then(|cli| run(&cli)) {
        Ok(status) => status,
        Err(e) => {
            eprintln!("❌ {}", e);
            RunStatus::from_error(&e)
        },
    };

    std::process::exit(status.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdf_unredact::elements::PageContent;
    use pdf_unredact::MemoryDocument;

    fn dump(path: &Path) {
        let doc = MemoryDocument::new("memo", vec![PageContent::new(0, 100.0, 100.0)]);
        fs::write(path, doc.to_json().unwrap()).unwrap();
    }

    #[test]
    fn test_discovery_skips_outputs_and_report() {
        let dir = tempfile::tempdir().unwrap();
        dump(&dir.path().join("memo.json"));
        dump(&dir.path().join("memo_unredacted.json"));
        let report = dir.path().join("report.json");
        CorpusReport::new(Vec::new()).write_json(&report).unwrap();

        let mut found = Vec::new();
        discover_documents(dir.path(), &JsonDocumentSource::new(), &[], Some(&report), &mut found);

        assert_eq!(found, vec![dir.path().join("memo.json")]);
    }

    #[test]
    fn test_discovery_honors_exclude() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("drafts")).unwrap();
        dump(&dir.path().join("drafts").join("a.json"));
        dump(&dir.path().join("b.json"));

        let mut found = Vec::new();
        discover_documents(dir.path(), &JsonDocumentSource::new(), &["drafts".to_string()], None, &mut found);

        assert_eq!(found, vec![dir.path().join("b.json")]);
    }
}
