//! Line and word reconstruction.
//!
//! Redaction hides glyphs visually but leaves their positions untouched, so
//! the original layout can be rebuilt from geometry alone:
//!
//! 1. Walk glyphs in the provider's reading order and cut a new line whenever
//!    the baseline leaves the current line's band (`line_tolerance`).
//! 2. Sort each line left to right.
//! 3. Insert one inferred space wherever the horizontal gap reaches
//!    `space_unit * min_spaces`; smaller gaps are kerning.
//!
//! Multi-column pages are handled by the provider's ordering: a column break
//! is a baseline jump in reading order, so columns never merge into one line.

mod line;
mod reading_order;

pub use line::{Line, LineChar};
pub use reading_order::{build_line, group_into_lines, reconstruct_lines};

use serde::{Deserialize, Serialize};

use crate::config::check_positive;
use crate::error::{Error, Result};

/// Line reconstruction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Maximum baseline difference, in points, for glyphs on the same line.
    pub line_tolerance: f32,
    /// Horizontal distance, in points, that one space occupies.
    pub space_unit: f32,
    /// Number of space units a gap must span before a space is inferred.
    pub min_spaces: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            space_unit: 3.0,
            min_spaces: 1,
        }
    }
}

impl LayoutConfig {
    /// Smallest horizontal gap that produces an inferred space.
    pub fn space_threshold(&self) -> f32 {
        self.space_unit * self.min_spaces as f32
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<()> {
        check_positive("line_tolerance", self.line_tolerance)?;
        check_positive("space_unit", self.space_unit)?;
        if self.min_spaces == 0 {
            return Err(Error::invalid_config("min_spaces", "must be at least 1"));
        }
        Ok(())
    }
}

/// Join reconstructed lines into plain text, one line per row.
pub fn lines_to_text(lines: &[Line]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
