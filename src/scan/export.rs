//! Plain-text dump of reconstructed lines.

use crate::layout::lines_to_text;

use super::DocumentScanResult;

/// Width of the `=` rules around page headers.
pub const PAGE_RULE_WIDTH: usize = 60;

/// Render every page's reconstructed lines as plain text.
///
/// Each page with text gets a header block:
///
/// ```text
/// ============================================================
/// PAGE 1
/// ============================================================
/// ```
///
/// Page numbers are one-based. Pages without any visible text are skipped,
/// as are blank lines. Requires a full scan; a triage result has no lines and
/// exports as an empty string.
pub fn export_text(result: &DocumentScanResult) -> String {
    let rule = "=".repeat(PAGE_RULE_WIDTH);
    let mut out = String::new();

    for page in &result.pages {
        let lines: Vec<_> = page.lines.iter().filter(|l| !l.is_blank()).cloned().collect();
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("{}\nPAGE {}\n{}\n", rule, page.index + 1, rule));
        out.push_str(&lines_to_text(&lines));
        out.push_str("\n\n");
    }

    out
}
