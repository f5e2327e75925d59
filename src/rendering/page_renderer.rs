//! Page renderer - composites rendered pages into raster images.

use std::path::{Path, PathBuf};

use crate::elements::PageContent;
use crate::error::{Error, Result};

use tiny_skia::{Pixmap, Transform};

use super::path_rasterizer::{create_paint, PathRasterizer};
use super::text_rasterizer::TextRasterizer;
use super::{DrawOp, OutputWriter, RenderedOutput, RenderedPage};

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless, supports transparency)
    #[default]
    Png,
    /// JPEG format (lossy, smaller file size)
    Jpeg,
}

impl ImageFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

/// Options for page rasterization.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Dots per inch (default: 150)
    pub dpi: u32,
    /// Output image format
    pub format: ImageFormat,
    /// Background color (None for transparent)
    pub background: Option<[f32; 4]>,
    /// JPEG quality (1-100, only for JPEG format)
    pub jpeg_quality: u8,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            dpi: 150,
            format: ImageFormat::Png,
            background: Some([1.0, 1.0, 1.0, 1.0]), // White background
            jpeg_quality: 85,
        }
    }
}

impl RenderOptions {
    /// Create options with custom DPI.
    pub fn with_dpi(dpi: u32) -> Self {
        Self {
            dpi,
            ..Default::default()
        }
    }

    /// Set transparent background.
    pub fn with_transparent_background(mut self) -> Self {
        self.background = None;
        self
    }

    /// Set JPEG format with quality.
    pub fn as_jpeg(mut self, quality: u8) -> Self {
        self.format = ImageFormat::Jpeg;
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }
}

/// Rendered image output.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    /// Image data in the specified format
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Output format
    pub format: ImageFormat,
}

impl RenderedImage {
    /// Save the image to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.data).map_err(|e| Error::Write {
            destination: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Get the image data as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Rasterizes [`RenderedPage`] display lists.
pub struct PageRenderer {
    options: RenderOptions,
    path_rasterizer: PathRasterizer,
    text_rasterizer: TextRasterizer,
}

impl PageRenderer {
    /// Create a new page renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            path_rasterizer: PathRasterizer::new(),
            text_rasterizer: TextRasterizer::new(),
        }
    }

    /// Use a TrueType/OpenType font for text instead of placeholder boxes.
    pub fn with_font(mut self, font_data: Vec<u8>) -> Result<Self> {
        self.text_rasterizer = TextRasterizer::with_font(font_data)?;
        Ok(self)
    }

    /// Rasterize one page.
    pub fn render_page(&self, page: &RenderedPage) -> Result<RenderedImage> {
        // Calculate pixel dimensions based on DPI
        let scale = self.options.dpi as f32 / 72.0;
        let (width, height) = pixel_size(page, scale);

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| Error::Render {
            page: page.index,
            reason: format!("Failed to create pixmap {}x{}", width, height),
        })?;

        if let Some([r, g, b, a]) = self.options.background {
            pixmap.fill(tiny_skia::Color::from_rgba(r, g, b, a).unwrap_or(tiny_skia::Color::WHITE));
        }

        // Page space is top-left origin, y down, like the pixmap
        let base = Transform::from_scale(scale, scale);

        for op in &page.ops {
            match op {
                DrawOp::SourcePage { x, y } => {
                    self.draw_source(&mut pixmap, &page.source, base.pre_translate(*x, *y));
                },
                DrawOp::FillRect { rect, color, alpha } => {
                    self.path_rasterizer.fill_rect(&mut pixmap, rect, *color, *alpha, base);
                },
                DrawOp::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => {
                    let paint = create_paint(*color, 1.0);
                    self.text_rasterizer
                        .draw_text(&mut pixmap, text, *x, *y, *font_size, &paint, base);
                },
            }
        }

        let data = match self.options.format {
            ImageFormat::Png => pixmap.encode_png().map_err(|e| Error::Render {
                page: page.index,
                reason: format!("PNG encoding failed: {}", e),
            })?,
            ImageFormat::Jpeg => self.encode_jpeg(&pixmap, page.index)?,
        };

        Ok(RenderedImage {
            data,
            width,
            height,
            format: self.options.format,
        })
    }

    /// Draw the untouched source page: shapes, image blocks, then glyphs.
    fn draw_source(&self, pixmap: &mut Pixmap, source: &PageContent, transform: Transform) {
        for shape in &source.shapes {
            self.path_rasterizer.draw_shape(pixmap, shape, transform);
        }
        for image in &source.images {
            self.path_rasterizer
                .fill_rect(pixmap, &image.bbox, image.dominant_color, 1.0, transform);
        }
        for glyph in &source.glyphs {
            let paint = create_paint(glyph.color, 1.0);
            let mut buf = [0u8; 4];
            self.text_rasterizer.draw_text(
                pixmap,
                glyph.ch.encode_utf8(&mut buf),
                glyph.bbox.left(),
                glyph.baseline,
                glyph.font_size,
                &paint,
                transform,
            );
        }
    }

    /// Encode pixmap to JPEG format.
    fn encode_jpeg(&self, pixmap: &Pixmap, page: usize) -> Result<Vec<u8>> {
        use image::codecs::jpeg::JpegEncoder;

        let width = pixmap.width();
        let height = pixmap.height();

        // Drop alpha (JPEG doesn't support it)
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        for chunk in pixmap.data().chunks(4) {
            rgb_data.extend_from_slice(&chunk[..3]);
        }

        let mut output = Vec::new();
        JpegEncoder::new_with_quality(&mut output, self.options.jpeg_quality)
            .encode(&rgb_data, width, height, image::ColorType::Rgb8)
            .map_err(|e| Error::Render {
                page,
                reason: format!("JPEG encoding failed: {}", e),
            })?;

        Ok(output)
    }
}

/// Pixel dimensions of a page at `scale` pixels per point.
///
/// A passed-through page keeps at least one pixel on each axis, so a page
/// with degenerate geometry is still emitted instead of dropped.
fn pixel_size(page: &RenderedPage, scale: f32) -> (u32, u32) {
    let to_pixels = |points: f32| {
        if points.is_finite() && points > 0.0 {
            (points * scale).ceil() as u32
        } else {
            0
        }
    };
    let (width, height) = (to_pixels(page.width), to_pixels(page.height));
    if page.passed_through {
        (width.max(1), height.max(1))
    } else {
        (width, height)
    }
}

/// Writes one raster image per output page.
///
/// For a destination `out/memo_unredacted.png`, a one-page document is
/// written to exactly that path and longer documents to
/// `out/memo_unredacted-1.png`, `out/memo_unredacted-2.png`, ...
pub struct PngPageWriter {
    renderer: PageRenderer,
    extension: &'static str,
}

impl PngPageWriter {
    /// Create a writer with the given rasterization options.
    pub fn new(options: RenderOptions) -> Self {
        let extension = options.format.extension();
        Self {
            renderer: PageRenderer::new(options),
            extension,
        }
    }

    /// Use a TrueType/OpenType font for text.
    pub fn with_font(mut self, font_data: Vec<u8>) -> Result<Self> {
        self.renderer = self.renderer.with_font(font_data)?;
        Ok(self)
    }

    /// Paths the pages of an output with `page_count` pages are written to.
    pub fn page_paths(&self, destination: &Path, page_count: usize) -> Vec<PathBuf> {
        if page_count == 1 {
            return vec![destination.to_path_buf()];
        }
        let stem = destination
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "page".to_string());
        (1..=page_count)
            .map(|n| destination.with_file_name(format!("{}-{}.{}", stem, n, self.extension)))
            .collect()
    }
}

impl Default for PngPageWriter {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

impl OutputWriter for PngPageWriter {
    fn extension(&self) -> &'static str {
        self.extension
    }

    fn write(&self, output: &RenderedOutput, destination: &Path) -> Result<()> {
        let paths = self.page_paths(destination, output.pages.len());

        // Rasterize everything before touching the filesystem
        let images = output
            .pages
            .iter()
            .zip(&paths)
            .map(|(page, path)| {
                self.renderer.render_page(page).map_err(|e| Error::Write {
                    destination: path.display().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        for (image, path) in images.iter().zip(&paths) {
            image.save(path)?;
        }
        log::info!("Wrote {} page images for {}", paths.len(), output.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Color, Shape};
    use crate::geometry::Rect;
    use crate::rendering::RenderMode;

    fn page() -> RenderedPage {
        let source = PageContent::new(0, 72.0, 72.0)
            .with_text("Hi", 10.0, 30.0, 12.0, 7.0)
            .with_shape(Shape::filled_rect(Rect::new(8.0, 16.0, 20.0, 16.0), Color::black()));
        let mut page = RenderedPage::pass_through(source);
        page.ops.push(DrawOp::FillRect {
            rect: Rect::new(8.0, 16.0, 20.0, 16.0),
            color: Color::new(1.0, 1.0, 0.0),
            alpha: 0.3,
        });
        page
    }

    #[test]
    fn test_render_options_default() {
        let opts = RenderOptions::default();
        assert_eq!(opts.dpi, 150);
        assert_eq!(opts.format, ImageFormat::Png);
        assert!(opts.background.is_some());
    }

    #[test]
    fn test_jpeg_quality_bounds() {
        assert_eq!(RenderOptions::default().as_jpeg(0).jpeg_quality, 1);
        assert_eq!(RenderOptions::default().as_jpeg(150).jpeg_quality, 100);
    }

    #[test]
    fn test_render_page_dimensions() {
        let image = PageRenderer::new(RenderOptions::with_dpi(72)).render_page(&page()).unwrap();
        assert_eq!((image.width, image.height), (72, 72));
        assert!(image.data.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_render_page_jpeg() {
        let image = PageRenderer::new(RenderOptions::with_dpi(72).as_jpeg(80))
            .render_page(&page())
            .unwrap();
        assert!(image.data.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn test_render_deterministic() {
        let renderer = PageRenderer::new(RenderOptions::default());
        let a = renderer.render_page(&page()).unwrap();
        let b = renderer.render_page(&page()).unwrap();
        assert_eq!(a.data, b.data);
    }

    #[test]
    fn test_page_paths() {
        let writer = PngPageWriter::default();
        let dest = Path::new("out/memo_unredacted.png");
        assert_eq!(writer.page_paths(dest, 1), vec![PathBuf::from("out/memo_unredacted.png")]);
        assert_eq!(
            writer.page_paths(dest, 2),
            vec![
                PathBuf::from("out/memo_unredacted-1.png"),
                PathBuf::from("out/memo_unredacted-2.png"),
            ]
        );
    }

    fn output_of(pages: Vec<RenderedPage>) -> RenderedOutput {
        RenderedOutput {
            name: "memo".to_string(),
            mode: RenderMode::Highlight,
            pages,
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_degenerate_pass_through_page_is_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let flat = RenderedPage::pass_through(PageContent::new(1, 0.0, 209.0));
        let dest = dir.path().join("memo_unredacted.png");

        PngPageWriter::new(RenderOptions::with_dpi(72))
            .write(&output_of(vec![page(), flat]), &dest)
            .unwrap();

        assert!(dir.path().join("memo_unredacted-1.png").exists());
        let second = std::fs::read(dir.path().join("memo_unredacted-2.png")).unwrap();
        let decoded = image::load_from_memory(&second).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1, 209));
    }

    #[test]
    fn test_unrasterizable_page_leaves_no_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut broken = page();
        broken.index = 1;
        broken.width = 0.0;
        broken.passed_through = false;
        let dest = dir.path().join("memo_unredacted.png");

        let err = PngPageWriter::new(RenderOptions::with_dpi(72))
            .write(&output_of(vec![page(), broken]), &dest)
            .unwrap_err();

        assert!(matches!(err, Error::Write { .. }));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_writer_writes_every_page() {
        let dir = tempfile::tempdir().unwrap();
        let output = RenderedOutput {
            name: "memo".to_string(),
            mode: RenderMode::Highlight,
            pages: vec![page(), page()],
            failures: Vec::new(),
        };
        let dest = dir.path().join("memo_unredacted.png");
        PngPageWriter::new(RenderOptions::with_dpi(36)).write(&output, &dest).unwrap();
        assert!(dir.path().join("memo_unredacted-1.png").exists());
        assert!(dir.path().join("memo_unredacted-2.png").exists());
    }
}
