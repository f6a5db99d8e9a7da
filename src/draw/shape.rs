//! Shape descriptors for canvas annotations.
//!
//! Every shape carries its own position and fill so it can be rendered and
//! recorded independently. `left`/`top` is always the top-left corner of the
//! shape's bounding box.

use super::color::Color;
use super::font::FontDescriptor;
use crate::util::{self, Point};
use serde::Serialize;

/// Content used when a text layer is added without explicit content.
pub const DEFAULT_TEXT: &str = "Your Text Here";

/// Default text position.
pub const TEXT_ORIGIN: Point = Point { x: 100.0, y: 100.0 };

/// Rectangle defaults: 100x100 at (150, 150), red at 50% alpha.
pub const RECT_ORIGIN: Point = Point { x: 150.0, y: 150.0 };
pub const RECT_SIZE: f64 = 100.0;
pub const RECT_FILL: Color = Color::from_rgba8(255, 0, 0, 0.5);

/// Circle defaults: radius 50 at (200, 200), green at 50% alpha.
pub const CIRCLE_ORIGIN: Point = Point { x: 200.0, y: 200.0 };
pub const CIRCLE_RADIUS: f64 = 50.0;
pub const CIRCLE_FILL: Color = Color::from_rgba8(0, 200, 0, 0.5);

/// Triangle defaults: 100x100 at (250, 250), blue at 50% alpha.
pub const TRIANGLE_ORIGIN: Point = Point { x: 250.0, y: 250.0 };
pub const TRIANGLE_SIZE: f64 = 100.0;
pub const TRIANGLE_FILL: Color = Color::from_rgba8(0, 0, 255, 0.5);

/// Polygon defaults: regular hexagon of circumradius 50 at (300, 300), orange at 50% alpha.
pub const POLYGON_ORIGIN: Point = Point { x: 300.0, y: 300.0 };
pub const POLYGON_SIDES: usize = 6;
pub const POLYGON_RADIUS: f64 = 50.0;
pub const POLYGON_FILL: Color = Color::from_rgba8(255, 165, 0, 0.5);

/// A drawable foreground object.
///
/// Each variant only carries the geometry that is meaningful for its kind, so
/// a circle has a radius and no width, a polygon has points and no size.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum Shape {
    /// Editable text box
    Text {
        left: f64,
        top: f64,
        /// Literal text content
        text: String,
        /// Font size in points
        font_size: f64,
        /// Font family/weight/style used for layout
        #[serde(skip)]
        font: FontDescriptor,
        fill: Color,
    },
    /// Filled axis-aligned rectangle
    Rect {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        fill: Color,
    },
    /// Filled circle; `left`/`top` is the corner of its bounding square
    Circle {
        left: f64,
        top: f64,
        radius: f64,
        fill: Color,
    },
    /// Isosceles triangle with the apex at the top center of its box
    Triangle {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
        fill: Color,
    },
    /// Closed polygon; points are offsets relative to the polygon's own origin
    Polygon {
        left: f64,
        top: f64,
        points: Vec<Point>,
        fill: Color,
    },
}

impl Shape {
    /// Text box at the default text position.
    pub fn text(text: impl Into<String>, font_size: f64, font: FontDescriptor, fill: Color) -> Self {
        Shape::Text {
            left: TEXT_ORIGIN.x,
            top: TEXT_ORIGIN.y,
            text: text.into(),
            font_size,
            font,
            fill,
        }
    }

    pub fn default_rectangle() -> Self {
        Shape::Rect {
            left: RECT_ORIGIN.x,
            top: RECT_ORIGIN.y,
            width: RECT_SIZE,
            height: RECT_SIZE,
            fill: RECT_FILL,
        }
    }

    pub fn default_circle() -> Self {
        Shape::Circle {
            left: CIRCLE_ORIGIN.x,
            top: CIRCLE_ORIGIN.y,
            radius: CIRCLE_RADIUS,
            fill: CIRCLE_FILL,
        }
    }

    pub fn default_triangle() -> Self {
        Shape::Triangle {
            left: TRIANGLE_ORIGIN.x,
            top: TRIANGLE_ORIGIN.y,
            width: TRIANGLE_SIZE,
            height: TRIANGLE_SIZE,
            fill: TRIANGLE_FILL,
        }
    }

    /// Regular hexagon centered on its own origin before placement.
    pub fn default_polygon() -> Self {
        Shape::Polygon {
            left: POLYGON_ORIGIN.x,
            top: POLYGON_ORIGIN.y,
            points: util::regular_polygon_points(POLYGON_SIDES, POLYGON_RADIUS),
            fill: POLYGON_FILL,
        }
    }

    /// Short lowercase name of the shape kind, matching its serialized tag.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Text { .. } => "text",
            Shape::Rect { .. } => "rect",
            Shape::Circle { .. } => "circle",
            Shape::Triangle { .. } => "triangle",
            Shape::Polygon { .. } => "polygon",
        }
    }

    pub fn fill(&self) -> Color {
        match self {
            Shape::Text { fill, .. }
            | Shape::Rect { fill, .. }
            | Shape::Circle { fill, .. }
            | Shape::Triangle { fill, .. }
            | Shape::Polygon { fill, .. } => *fill,
        }
    }
}
