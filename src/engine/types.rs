//! Data types shared by every graphics engine implementation.

use std::fmt;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::draw::Color;

/// Parameters for a new canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
}

/// Credentials mode used when fetching a cross-origin image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CorsMode {
    /// Request CORS approval without credentials; approved images keep the
    /// canvas exportable.
    #[default]
    Anonymous,
    /// Plain fetch; any cross-origin image taints the canvas.
    NoCors,
}

/// Output encoding for raster export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    /// Lossless; quality is ignored
    #[default]
    Png,
    /// Lossy; quality 0.0 - 1.0 maps to encoder quality 1 - 100
    Jpeg,
}

impl RasterFormat {
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
        }
    }
}

/// How the background image is placed on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPlacement {
    /// Uniform scale applied from the top-left origin
    pub scale: f64,
    /// Whether the user may select/move the image; backdrops are never selectable
    pub selectable: bool,
}

/// Engine-assigned identifier of an object placed on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Decoded image ready to be placed on a canvas.
///
/// Pixels are straight (non-premultiplied) RGBA8, row-major, without padding.
/// Cloning is cheap; the pixel buffer is shared.
#[derive(Clone)]
pub struct ImageHandle {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
    origin_clean: bool,
}

impl ImageHandle {
    /// Wraps an RGBA8 buffer, checking that it matches the dimensions.
    pub fn from_rgba(
        width: u32,
        height: u32,
        pixels: Vec<u8>,
        origin_clean: bool,
    ) -> Result<Self, EngineError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(EngineError::Render(format!(
                "image buffer holds {} bytes, expected {} for {}x{}",
                pixels.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
            origin_clean,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// `false` when the image came from another origin without CORS approval.
    /// Drawing such an image taints the canvas and blocks raster export.
    pub fn origin_clean(&self) -> bool {
        self.origin_clean
    }
}

impl fmt::Debug for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageHandle")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("origin_clean", &self.origin_clean)
            .finish()
    }
}

/// Errors surfaced by a graphics engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("graphics engine unavailable: {0}")]
    Unavailable(String),

    #[error("failed to load image {url}: {reason}")]
    ImageLoad { url: String, reason: String },

    #[error("canvas is tainted by cross-origin image data")]
    Tainted,

    #[error("no object {0} on this canvas")]
    UnknownObject(ObjectId),

    #[error("rendering failed: {0}")]
    Render(String),

    #[error("encoding failed: {0}")]
    Encode(String),
}

impl EngineError {
    pub(crate) fn image_load(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        EngineError::ImageLoad {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<cairo::Error> for EngineError {
    fn from(err: cairo::Error) -> Self {
        EngineError::Render(err.to_string())
    }
}
