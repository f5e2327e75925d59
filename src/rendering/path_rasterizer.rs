//! Path rasterizer - fills and strokes page shapes using tiny-skia.

use crate::elements::{Color, FillRule, Shape, ShapeGeometry};
use crate::geometry::{Point, Rect};
use tiny_skia::{Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Stroke width used for outlined shapes, in points.
const OUTLINE_WIDTH: f32 = 1.0;

/// Create a Paint for `color` at opacity `alpha`.
pub(crate) fn create_paint(color: Color, alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(
        tiny_skia::Color::from_rgba(
            color.r.clamp(0.0, 1.0),
            color.g.clamp(0.0, 1.0),
            color.b.clamp(0.0, 1.0),
            alpha.clamp(0.0, 1.0),
        )
        .unwrap_or(tiny_skia::Color::BLACK),
    );
    paint.anti_alias = true;
    paint
}

/// Rasterizer for vector shapes and overlay rectangles.
#[derive(Debug, Clone, Copy)]
pub struct PathRasterizer;

impl PathRasterizer {
    /// Create a new path rasterizer.
    pub fn new() -> Self {
        Self
    }

    /// Fill an axis-aligned rectangle. Empty rectangles draw nothing.
    pub fn fill_rect(&self, pixmap: &mut Pixmap, rect: &Rect, color: Color, alpha: f32, transform: Transform) {
        if let Some(r) = to_skia_rect(rect) {
            pixmap.fill_rect(r, &create_paint(color, alpha), transform, None);
        }
    }

    /// Draw a page shape with its own fill rule and color.
    ///
    /// Shapes without a color are skipped.
    pub fn draw_shape(&self, pixmap: &mut Pixmap, shape: &Shape, transform: Transform) {
        let Some(color) = shape.fill else {
            return;
        };
        let Some(path) = build_path(&shape.geometry) else {
            return;
        };
        let paint = create_paint(color, 1.0);

        match shape.fill_rule {
            FillRule::Filled => {
                pixmap.fill_path(&path, &paint, tiny_skia::FillRule::Winding, transform, None);
            },
            FillRule::Stroked => {
                let stroke = Stroke {
                    width: OUTLINE_WIDTH,
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, &paint, &stroke, transform, None);
            },
        }
    }
}

impl Default for PathRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

fn to_skia_rect(rect: &Rect) -> Option<tiny_skia::Rect> {
    if rect.is_empty() || !rect.is_finite() {
        return None;
    }
    tiny_skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height)
}

fn build_path(geometry: &ShapeGeometry) -> Option<tiny_skia::Path> {
    match geometry {
        ShapeGeometry::Rect { rect } => to_skia_rect(rect).map(PathBuilder::from_rect),
        ShapeGeometry::Polygon { points } => polygon_path(points),
    }
}

fn polygon_path(points: &[Point]) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(pixmap: &Pixmap, x: u32, y: u32) -> [u8; 4] {
        let p = pixmap.pixel(x, y).unwrap();
        [p.red(), p.green(), p.blue(), p.alpha()]
    }

    #[test]
    fn test_fill_black_rect() {
        let mut pixmap = Pixmap::new(20, 20).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        let shape = Shape::filled_rect(Rect::new(5.0, 5.0, 10.0, 10.0), Color::black());
        PathRasterizer::new().draw_shape(&mut pixmap, &shape, Transform::identity());

        assert_eq!(pixel(&pixmap, 10, 10), [0, 0, 0, 255]);
        assert_eq!(pixel(&pixmap, 1, 1), [255, 255, 255, 255]);
    }

    #[test]
    fn test_translucent_highlight_blends() {
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        pixmap.fill(tiny_skia::Color::BLACK);
        PathRasterizer::new().fill_rect(
            &mut pixmap,
            &Rect::new(0.0, 0.0, 10.0, 10.0),
            Color::new(1.0, 1.0, 0.0),
            0.3,
            Transform::identity(),
        );
        let [r, g, b, _] = pixel(&pixmap, 5, 5);
        assert!(r > 60 && r < 100);
        assert_eq!(r, g);
        assert_eq!(b, 0);
    }

    #[test]
    fn test_empty_rect_draws_nothing() {
        let mut pixmap = Pixmap::new(10, 10).unwrap();
        PathRasterizer::new().fill_rect(
            &mut pixmap,
            &Rect::new(2.0, 2.0, 0.0, 5.0),
            Color::black(),
            1.0,
            Transform::identity(),
        );
        assert!(pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_polygon_path() {
        assert!(polygon_path(&[]).is_none());
        let tri = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)];
        assert!(polygon_path(&tri).is_some());
    }
}
