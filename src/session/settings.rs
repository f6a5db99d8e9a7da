//! Editor settings derived from the configuration file.

use crate::config::Config;
use crate::draw::{BLACK, Color, DEFAULT_TEXT, FontDescriptor, WHITE};
use crate::engine::{CanvasSpec, CorsMode, RasterFormat};

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;
/// Default text size in points.
pub const DEFAULT_FONT_SIZE: f64 = 24.0;

/// Style applied to new text layers.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub default_text: String,
    pub font_size: f64,
    pub font: FontDescriptor,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            default_text: DEFAULT_TEXT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font: FontDescriptor::default(),
            color: BLACK,
        }
    }
}

/// Everything the editor needs to know up front, fixed for each session.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorSettings {
    pub canvas: CanvasSpec,
    pub cors_mode: CorsMode,
    pub text: TextStyle,
    pub export_format: RasterFormat,
    /// 0.0 - 1.0; ignored for PNG
    pub export_quality: f64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            canvas: CanvasSpec {
                width: DEFAULT_CANVAS_WIDTH,
                height: DEFAULT_CANVAS_HEIGHT,
                background_color: WHITE,
            },
            cors_mode: CorsMode::Anonymous,
            text: TextStyle::default(),
            export_format: RasterFormat::Png,
            export_quality: 1.0,
        }
    }
}

impl EditorSettings {
    /// Builds settings from a validated configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            canvas: CanvasSpec {
                width: config.canvas.width,
                height: config.canvas.height,
                background_color: config.canvas.background_color.to_color(),
            },
            cors_mode: config.fetch.cors_mode,
            text: TextStyle {
                default_text: config.text.default_text.clone(),
                font_size: config.text.font_size,
                font: FontDescriptor::new(
                    config.text.font_family.clone(),
                    config.text.font_weight.clone(),
                    config.text.font_style.clone(),
                ),
                color: config.text.color.to_color(),
            },
            export_format: config.export.format,
            export_quality: config.export.quality,
        }
    }
}
