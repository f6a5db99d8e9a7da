//! Rendering primitives and shape definitions (Cairo-based).
//!
//! This module defines the core drawing types used for photo annotation:
//! - [`Color`]: RGBA color representation with predefined color constants
//! - [`Shape`]: The annotation kinds (text, rectangle, circle, triangle, polygon)
//! - [`FontDescriptor`]: Font family/weight/style for text layers
//! - Rendering functions for Cairo-based output

pub mod color;
pub mod font;
pub mod render;
pub mod shape;

// Re-export commonly used types at module level
pub use color::Color;
pub use font::FontDescriptor;
pub use render::{render_background_image, render_canvas_color, render_shape, render_shapes};
pub use shape::{DEFAULT_TEXT, Shape};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
