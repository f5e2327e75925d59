//! Output rendering for scanned documents.
//!
//! The [`RenderEngine`] turns a [`DocumentScanResult`](crate::scan::DocumentScanResult)
//! into a [`RenderedOutput`]: one [`RenderedPage`] per source page, each a
//! display list of [`DrawOp`]s layered over the untouched source page. Writers
//! consume that display list; the core never touches pixels.
//!
//! ## Modes
//!
//! - [`RenderMode::Highlight`]: translucent yellow over every redaction box
//! - [`RenderMode::SideBySide`]: page width doubled, reconstructed text on the right
//! - [`RenderMode::OverlayWhite`]: redacted characters redrawn in white on top of the boxes
//!
//! ## Writers
//!
//! - [`DisplayListWriter`]: the display list as JSON
//! - `PngPageWriter` (feature `rendering`): one raster image per output page,
//!   composited with the pure-Rust `tiny-skia` library
//!
//! ## Example
//!
//! ```
//! use pdf_unredact::rendering::RenderMode;
//!
//! let mode: RenderMode = "side_by_side".parse().unwrap();
//! assert_eq!(mode, RenderMode::SideBySide);
//! assert_eq!(mode.to_string(), "side_by_side");
//! ```

mod display_list;
mod engine;
mod writer;

#[cfg(feature = "rendering")]
mod page_renderer;
#[cfg(feature = "rendering")]
mod path_rasterizer;
#[cfg(feature = "rendering")]
mod text_rasterizer;

pub use display_list::{DrawOp, RenderedOutput, RenderedPage};
pub use engine::{RenderEngine, HIGHLIGHT_ALPHA, HIGHLIGHT_COLOR, TEXT_BASELINE_RATIO};
pub use writer::{DisplayListWriter, OutputWriter};

#[cfg(feature = "rendering")]
#[cfg_attr(docsrs, doc(cfg(feature = "rendering")))]
pub use page_renderer::{ImageFormat, PageRenderer, PngPageWriter, RenderOptions, RenderedImage};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Output mode. One mode per render invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Translucent highlight over redaction boxes
    #[default]
    Highlight,
    /// Original page on the left, reconstructed text on the right
    SideBySide,
    /// Redacted characters drawn in white over the boxes
    OverlayWhite,
}

impl RenderMode {
    /// All modes, in declaration order.
    pub const ALL: [RenderMode; 3] = [RenderMode::Highlight, RenderMode::SideBySide, RenderMode::OverlayWhite];

    /// Mode name as used in configuration and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Highlight => "highlight",
            RenderMode::SideBySide => "side_by_side",
            RenderMode::OverlayWhite => "overlay_white",
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RenderMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                Error::invalid_config(
                    "mode",
                    format!("unknown mode `{}` (expected highlight, side_by_side or overlay_white)", s),
                )
            })
    }
}
