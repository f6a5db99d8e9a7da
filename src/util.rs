//! Utility functions for colors and canvas geometry.
//!
//! This module provides:
//! - Color name mapping for configuration files
//! - Fit-to-canvas scale computation for background images
//! - Regular polygon generation and point bounds

use crate::draw::{Color, color::*};
use serde::Serialize;

// ============================================================================
// Color Mapping
// ============================================================================

/// Maps color name strings to Color values.
///
/// Used by the configuration system to parse color names from the config file.
///
/// # Supported Names (case-insensitive)
/// - "red", "green", "blue", "yellow", "orange", "pink", "white", "black"
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "pink" => Some(PINK),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        _ => None,
    }
}

// ============================================================================
// Geometry Utilities
// ============================================================================

/// 2D point or offset in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Creates a new rectangle. Width/height must be positive.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        if width <= 0.0 || height <= 0.0 || !width.is_finite() || !height.is_finite() {
            None
        } else {
            Some(Self {
                x,
                y,
                width,
                height,
            })
        }
    }
}

/// Computes the uniform scale that fits an image entirely inside the canvas.
///
/// Returns `min(canvas_width / image_width, canvas_height / image_height)`, so
/// the aspect ratio is preserved and neither scaled side exceeds the canvas.
/// Returns `None` for degenerate (zero-sized) images.
pub fn fit_scale(
    canvas_width: u32,
    canvas_height: u32,
    image_width: u32,
    image_height: u32,
) -> Option<f64> {
    if image_width == 0 || image_height == 0 {
        return None;
    }
    let sx = canvas_width as f64 / image_width as f64;
    let sy = canvas_height as f64 / image_height as f64;
    Some(sx.min(sy))
}

/// Vertices of a regular polygon centered on the origin.
///
/// The first vertex sits at `(0, radius)` and the rest follow at equal angular
/// steps of decreasing angle, so a hexagon starts `(0, 50), (43.3, 25), ...`.
pub fn regular_polygon_points(sides: usize, radius: f64) -> Vec<Point> {
    let step = std::f64::consts::TAU / sides as f64;
    (0..sides)
        .map(|i| {
            let angle = std::f64::consts::FRAC_PI_2 - step * i as f64;
            Point::new(clean(radius * angle.cos()), clean(radius * angle.sin()))
        })
        .collect()
}

/// Snaps floating-point noise (e.g. `3e-15`) to zero.
fn clean(value: f64) -> f64 {
    if value.abs() < 1e-9 { 0.0 } else { value }
}

/// Bounding box of a point set, or `None` if it has no area.
pub fn points_bounds(points: &[Point]) -> Option<Bounds> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for point in &points[1..] {
        min_x = min_x.min(point.x);
        max_x = max_x.max(point.x);
        min_y = min_y.min(point.y);
        max_y = max_y.max(point.y);
    }
    Bounds::new(min_x, min_y, max_x - min_x, max_y - min_y)
}
