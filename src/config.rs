//! Configuration for redaction scanning.
//!
//! [`ScanConfig`] is the single value the core consumes. It nests the
//! detector and layout settings and carries the render mode and pool size.
//! Call [`ScanConfig::validate`] before dispatching any work; an invalid value
//! is fatal for the whole run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::detection::DetectorConfig;
use crate::error::{Error, Result};
use crate::layout::LayoutConfig;
use crate::rendering::RenderMode;

/// Redaction scan configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Redaction box detection settings
    pub detector: DetectorConfig,

    /// Minimum fraction of a glyph's area that must sit under a box for the
    /// glyph to count as redacted.
    pub overlap_threshold: f32,

    /// Line and word reconstruction settings
    pub layout: LayoutConfig,

    /// Output mode for rendering
    pub mode: RenderMode,

    /// Number of worker threads.
    pub worker_count: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanConfig {
    /// Default overlap threshold.
    pub const DEFAULT_OVERLAP_THRESHOLD: f32 = 0.5;

    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self {
            detector: DetectorConfig::default(),
            overlap_threshold: Self::DEFAULT_OVERLAP_THRESHOLD,
            layout: LayoutConfig::default(),
            mode: RenderMode::default(),
            worker_count: default_worker_count(),
        }
    }

    /// Load configuration from a JSON file. Missing fields take defaults.
    ///
    /// An unreadable or malformed file is a configuration error, like an
    /// out-of-range value.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| Error::invalid_config("config", format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&data)
            .map_err(|e| Error::invalid_config("config", format!("{}: {}", path.display(), e)))
    }

    /// Set the black threshold for redaction box colors.
    pub fn with_black_threshold(mut self, threshold: f32) -> Self {
        self.detector.black_threshold = threshold;
        self
    }

    /// Set the minimum redaction box area.
    pub fn with_min_box_area(mut self, area: f32) -> Self {
        self.detector.min_box_area = area;
        self
    }

    /// Set whether image blocks may be redaction boxes.
    pub fn with_images(mut self, enable: bool) -> Self {
        self.detector.include_images = enable;
        self
    }

    /// Set the glyph overlap threshold.
    pub fn with_overlap_threshold(mut self, threshold: f32) -> Self {
        self.overlap_threshold = threshold;
        self
    }

    /// Set the baseline tolerance for line grouping.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.layout.line_tolerance = tolerance;
        self
    }

    /// Set the space unit and the minimum number of units per inferred space.
    pub fn with_spacing(mut self, space_unit: f32, min_spaces: u32) -> Self {
        self.layout.space_unit = space_unit;
        self.layout.min_spaces = min_spaces;
        self
    }

    /// Set the render mode.
    pub fn with_mode(mut self, mode: RenderMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the worker pool size.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.worker_count = workers;
        self
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<()> {
        self.detector.validate()?;
        check_unit_interval("overlap_threshold", self.overlap_threshold)?;
        self.layout.validate()?;
        if self.worker_count == 0 {
            return Err(Error::invalid_config("worker_count", "must be at least 1"));
        }
        Ok(())
    }
}

/// Default pool size: all cores but one, never below one.
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}

/// Check that a value is finite and within `0.0..=1.0`.
pub(crate) fn check_unit_interval(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(Error::invalid_config(
            field,
            format!("must be within 0..=1, got {}", value),
        ));
    }
    Ok(())
}

/// Check that a value is finite and strictly positive.
pub(crate) fn check_positive(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid_config(field, format!("must be positive, got {}", value)));
    }
    Ok(())
}

/// Check that a value is finite and not negative.
pub(crate) fn check_non_negative(field: &'static str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_config(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScanConfig::default();
        assert_eq!(config.detector.black_threshold, 0.15);
        assert_eq!(config.overlap_threshold, 0.5);
        assert_eq!(config.layout.line_tolerance, 2.0);
        assert_eq!(config.layout.space_unit, 3.0);
        assert_eq!(config.layout.min_spaces, 1);
        assert_eq!(config.mode, RenderMode::Highlight);
        assert!(config.worker_count >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ScanConfig::new()
            .with_black_threshold(0.2)
            .with_overlap_threshold(0.3)
            .with_line_tolerance(3.0)
            .with_spacing(4.0, 2)
            .with_mode(RenderMode::OverlayWhite)
            .with_workers(3);
        assert_eq!(config.detector.black_threshold, 0.2);
        assert_eq!(config.overlap_threshold, 0.3);
        assert_eq!(config.layout.space_unit, 4.0);
        assert_eq!(config.layout.min_spaces, 2);
        assert_eq!(config.mode, RenderMode::OverlayWhite);
        assert_eq!(config.worker_count, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let cases = [
            ScanConfig::new().with_black_threshold(1.5),
            ScanConfig::new().with_overlap_threshold(-0.1),
            ScanConfig::new().with_overlap_threshold(f32::NAN),
            ScanConfig::new().with_line_tolerance(0.0),
            ScanConfig::new().with_spacing(0.0, 1),
            ScanConfig::new().with_spacing(3.0, 0),
            ScanConfig::new().with_min_box_area(-1.0),
            ScanConfig::new().with_workers(0),
        ];
        for config in cases {
            let err = config.validate().unwrap_err();
            assert!(err.is_fatal(), "expected configuration error, got {}", err);
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"overlap_threshold": 0.3, "mode": "side_by_side", "worker_count": 2}"#;
        let config: ScanConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.overlap_threshold, 0.3);
        assert_eq!(config.mode, RenderMode::SideBySide);
        assert_eq!(config.detector.black_threshold, 0.15);
        assert_eq!(config.layout.line_tolerance, 2.0);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.json");
        std::fs::write(&path, r#"{"detector": {"black_threshold": 0.2}}"#).unwrap();
        let config = ScanConfig::from_json_file(&path).unwrap();
        assert_eq!(config.detector.black_threshold, 0.2);
        assert_eq!(config.detector.min_box_area, 0.0);
    }

    #[test]
    fn test_bad_config_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ScanConfig::from_json_file(dir.path().join("nope.json")).unwrap_err();
        assert!(missing.is_fatal());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let broken = ScanConfig::from_json_file(&path).unwrap_err();
        assert!(matches!(broken, Error::InvalidConfig { field: "config", .. }));
    }
}
