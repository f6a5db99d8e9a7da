//! Graphics engine contract and its Cairo implementation.
//!
//! The session controller never draws pixels itself. Everything that touches
//! a rendering backend goes through [`GraphicsEngine`], which is injected into
//! the controller at construction:
//! - [`CairoEngine`]: production engine (Cairo surfaces, Pango text)
//! - [`fetch`]: asynchronous image loading with origin/taint tracking

pub mod cairo_engine;
pub mod fetch;
pub mod types;

pub use cairo_engine::{CairoCanvas, CairoEngine};
pub use fetch::{HttpImageSource, ImageLocation, ImageSource};
pub use types::{
    BackgroundPlacement, CanvasSpec, CorsMode, EngineError, ImageHandle, ObjectId, RasterFormat,
};

use crate::draw::Shape;
use futures::future::BoxFuture;

/// Future resolving to a decoded image, independent of the engine borrow.
pub type ImageFuture = BoxFuture<'static, Result<ImageHandle, EngineError>>;

/// External 2D vector-canvas capability.
///
/// Canvas handles are owned by the caller and passed back for every call;
/// [`GraphicsEngine::dispose`] consumes the handle so it cannot be used after
/// its resources are released.
pub trait GraphicsEngine {
    /// Engine-specific canvas handle.
    type Canvas;

    /// Allocates a canvas painted with the background color.
    ///
    /// Fails with [`EngineError::Unavailable`] when the capability is missing.
    fn create_canvas(&self, spec: &CanvasSpec) -> Result<Self::Canvas, EngineError>;

    /// Starts loading and decoding an image.
    ///
    /// Returns immediately; the returned future is `Send + 'static` so callers
    /// may spawn it while they keep using the engine.
    fn load_image(&self, url: &str, cors: CorsMode) -> ImageFuture;

    /// Uses `image` as the canvas background, scaled from the top-left corner.
    fn set_background(
        &self,
        canvas: &mut Self::Canvas,
        image: &ImageHandle,
        placement: BackgroundPlacement,
    ) -> Result<(), EngineError>;

    /// Adds a shape above every existing object.
    fn add_object(&self, canvas: &mut Self::Canvas, shape: &Shape) -> Result<ObjectId, EngineError>;

    /// Marks an object as the current selection.
    fn set_active_object(
        &self,
        canvas: &mut Self::Canvas,
        object: ObjectId,
    ) -> Result<(), EngineError>;

    /// Redraws the canvas from its current state.
    fn render(&self, canvas: &mut Self::Canvas) -> Result<(), EngineError>;

    /// Flattens background and objects into an encoded raster image.
    ///
    /// Fails with [`EngineError::Tainted`] when cross-origin image data was drawn.
    fn to_raster_bytes(
        &self,
        canvas: &mut Self::Canvas,
        format: RasterFormat,
        quality: f64,
    ) -> Result<Vec<u8>, EngineError>;

    /// Releases everything the canvas holds.
    fn dispose(&self, canvas: Self::Canvas);
}
