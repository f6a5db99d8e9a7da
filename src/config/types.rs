//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::engine::{CorsMode, RasterFormat};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::{Origin, Url};

/// Canvas settings.
///
/// The canvas size is fixed for the lifetime of a session; backgrounds are
/// scaled down (or up) to fit inside it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CanvasConfig {
    /// Canvas width in pixels (valid range: 1 - 8192)
    #[serde(default = "default_canvas_width")]
    pub width: u32,

    /// Canvas height in pixels (valid range: 1 - 8192)
    #[serde(default = "default_canvas_height")]
    pub height: u32,

    /// Color painted behind the background image, visible where it does not
    /// cover the canvas
    #[serde(default = "default_background_color")]
    pub background_color: ColorSpec,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
            background_color: default_background_color(),
        }
    }
}

/// Text tool settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextConfig {
    /// Content of a new text box when none is given
    #[serde(default = "default_text")]
    pub default_text: String,

    /// Font size in points (valid range: 8.0 - 200.0)
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Font family name (e.g., "Sans", "Serif", "DejaVu Sans")
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Font weight (e.g., "normal", "bold", "light", 400, 700)
    #[serde(default = "default_font_weight")]
    pub font_weight: String,

    /// Font style ("normal", "italic", "oblique")
    #[serde(default = "default_font_style")]
    pub font_style: String,

    /// Text fill color
    #[serde(default = "default_text_color")]
    pub color: ColorSpec,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            default_text: default_text(),
            font_size: default_font_size(),
            font_family: default_font_family(),
            font_weight: default_font_weight(),
            font_style: default_font_style(),
            color: default_text_color(),
        }
    }
}

/// Background image fetching.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FetchConfig {
    /// How cross-origin images are requested ("anonymous" or "no-cors").
    /// Images that are not approved for the page origin block export.
    #[serde(default)]
    pub cors_mode: CorsMode,

    /// Origin the editor runs on, e.g. "https://editor.example.com".
    /// Images from this origin never need CORS approval. Unset means every
    /// remote image is cross-origin.
    #[serde(default)]
    pub page_origin: Option<String>,

    /// User-Agent header for image requests
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl FetchConfig {
    /// Parsed page origin; `None` when unset or not a valid URL.
    pub fn page_origin(&self) -> Option<Origin> {
        let raw = self.page_origin.as_deref()?;
        match Url::parse(raw) {
            Ok(url) => Some(url.origin()),
            Err(err) => {
                log::warn!("Ignoring invalid page_origin '{}': {}", raw, err);
                None
            }
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExportConfig {
    /// Output encoding ("png" or "jpeg")
    #[serde(default)]
    pub format: RasterFormat,

    /// Encoder quality for lossy formats (valid range: 0.0 - 1.0)
    #[serde(default = "default_quality")]
    pub quality: f64,

    /// Directory exported images are written to (supports ~ for home)
    #[serde(default = "default_export_directory")]
    pub directory: String,

    /// File name of the exported image
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: RasterFormat::default(),
            quality: default_quality(),
            directory: default_export_directory(),
            file_name: default_file_name(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_canvas_width() -> u32 {
    crate::session::DEFAULT_CANVAS_WIDTH
}

fn default_canvas_height() -> u32 {
    crate::session::DEFAULT_CANVAS_HEIGHT
}

fn default_background_color() -> ColorSpec {
    ColorSpec::named("white")
}

fn default_text() -> String {
    crate::draw::DEFAULT_TEXT.to_string()
}

fn default_font_size() -> f64 {
    crate::session::DEFAULT_FONT_SIZE
}

fn default_font_family() -> String {
    "Sans".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_font_style() -> String {
    "normal".to_string()
}

fn default_text_color() -> ColorSpec {
    ColorSpec::named("black")
}

fn default_quality() -> f64 {
    1.0
}

fn default_export_directory() -> String {
    ".".to_string()
}

fn default_file_name() -> String {
    "modified-image.png".to_string()
}
