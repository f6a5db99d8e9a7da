//! Append-only record of everything placed on the canvas.
//!
//! The store is independent of the graphics engine: it exists so the composed
//! scene can be inspected, tested, or shown in a debug panel without querying
//! engine internals. Layers are never updated or removed once recorded.

mod store;

pub use store::{LayerError, LayerStore};

use crate::draw::Shape;
use serde::Serialize;

/// Record of the background photo once it has been loaded and scaled.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename = "backgroundImage", rename_all = "camelCase")]
pub struct BackgroundLayer {
    /// URL the image was loaded from
    pub src: String,
    /// Natural width multiplied by the scale factor
    pub scaled_width: f64,
    /// Natural height multiplied by the scale factor
    pub scaled_height: f64,
}

/// One recorded drawable object, in creation order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Layer {
    Background(BackgroundLayer),
    Shape(Shape),
}

/// Discriminant of a [`Layer`], handy for assertions and summaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    BackgroundImage,
    Text,
    Rectangle,
    Circle,
    Triangle,
    Polygon,
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Background(_) => LayerKind::BackgroundImage,
            Layer::Shape(Shape::Text { .. }) => LayerKind::Text,
            Layer::Shape(Shape::Rect { .. }) => LayerKind::Rectangle,
            Layer::Shape(Shape::Circle { .. }) => LayerKind::Circle,
            Layer::Shape(Shape::Triangle { .. }) => LayerKind::Triangle,
            Layer::Shape(Shape::Polygon { .. }) => LayerKind::Polygon,
        }
    }
}

impl From<Shape> for Layer {
    fn from(shape: Shape) -> Self {
        Layer::Shape(shape)
    }
}

/// Shown by [`describe`] when nothing has been recorded.
pub const NO_LAYERS_MESSAGE: &str = "No layers yet. Add shapes or text!";

/// Renders layers as human-readable structured text, one pretty-printed JSON
/// record per layer, separated by blank lines.
pub fn describe(layers: &[Layer]) -> Result<String, serde_json::Error> {
    if layers.is_empty() {
        return Ok(NO_LAYERS_MESSAGE.to_string());
    }
    let records = layers
        .iter()
        .map(serde_json::to_string_pretty)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records.join("\n\n"))
}
