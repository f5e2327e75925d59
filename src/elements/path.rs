//! Vector shape element types.
//!
//! Shapes come straight from the provider's path painting operators. Only
//! their outline, fill color, and whether they were filled matter here.

use super::Color;
use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// How a path was painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillRule {
    /// Interior painted with the fill color
    #[default]
    Filled,
    /// Only the outline was stroked
    Stroked,
}

/// Outline of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeGeometry {
    /// Axis-aligned rectangle
    Rect {
        /// The rectangle
        rect: Rect,
    },
    /// Closed polygon given by its vertices
    Polygon {
        /// Vertices in drawing order
        points: Vec<Point>,
    },
}

impl ShapeGeometry {
    /// Axis-aligned bounding rectangle.
    ///
    /// Polygons are approximated by the rectangle enclosing all vertices; an
    /// empty polygon collapses to a zero-sized rectangle at the origin.
    pub fn bounding_rect(&self) -> Rect {
        match self {
            ShapeGeometry::Rect { rect } => *rect,
            ShapeGeometry::Polygon { points } => {
                Rect::bounding(points).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
            },
        }
    }
}

/// A vector shape on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Outline geometry
    pub geometry: ShapeGeometry,
    /// Fill color (None when the path has no fill)
    #[serde(default)]
    pub fill: Option<Color>,
    /// Whether the interior was painted
    #[serde(default)]
    pub fill_rule: FillRule,
}

impl Shape {
    /// A filled rectangle.
    pub fn filled_rect(rect: Rect, color: Color) -> Self {
        Self {
            geometry: ShapeGeometry::Rect { rect },
            fill: Some(color),
            fill_rule: FillRule::Filled,
        }
    }

    /// A stroked rectangle outline.
    pub fn stroked_rect(rect: Rect, color: Color) -> Self {
        Self {
            geometry: ShapeGeometry::Rect { rect },
            fill: Some(color),
            fill_rule: FillRule::Stroked,
        }
    }

    /// A filled polygon.
    pub fn filled_polygon(points: Vec<Point>, color: Color) -> Self {
        Self {
            geometry: ShapeGeometry::Polygon { points },
            fill: Some(color),
            fill_rule: FillRule::Filled,
        }
    }

    /// Check if this shape paints its interior.
    pub fn is_filled(&self) -> bool {
        self.fill_rule == FillRule::Filled && self.fill.is_some()
    }

    /// Bounding rectangle of the outline.
    pub fn bbox(&self) -> Rect {
        self.geometry.bounding_rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_bounding_rect() {
        let tri = Shape::filled_polygon(
            vec![Point::new(10.0, 10.0), Point::new(50.0, 12.0), Point::new(30.0, 40.0)],
            Color::black(),
        );
        assert_eq!(tri.bbox(), Rect::from_points(10.0, 10.0, 50.0, 40.0));
    }

    #[test]
    fn test_empty_polygon_has_no_area() {
        let empty = Shape::filled_polygon(vec![], Color::black());
        assert_eq!(empty.bbox().area(), 0.0);
    }

    #[test]
    fn test_is_filled() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(Shape::filled_rect(rect, Color::black()).is_filled());
        assert!(!Shape::stroked_rect(rect, Color::black()).is_filled());

        let mut no_fill = Shape::filled_rect(rect, Color::black());
        no_fill.fill = None;
        assert!(!no_fill.is_filled());
    }

    #[test]
    fn test_shape_json_shape() {
        let json = r#"{
            "geometry": {"kind": "rect", "rect": {"x": 1.0, "y": 2.0, "width": 3.0, "height": 4.0}},
            "fill": {"r": 0.0, "g": 0.0, "b": 0.0}
        }"#;
        let shape: Shape = serde_json::from_str(json).unwrap();
        assert!(shape.is_filled());
        assert_eq!(shape.bbox(), Rect::new(1.0, 2.0, 3.0, 4.0));
    }
}
