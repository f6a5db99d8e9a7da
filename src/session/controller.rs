//! The session controller: one live canvas, its layers, and every mutation.

use std::sync::Arc;

use futures::FutureExt;
use futures::future;

use super::background::{BackgroundCompletion, BackgroundLoad, BackgroundOutcome, SessionGuard};
use super::settings::EditorSettings;
use super::types::{ExportError, SessionError, SessionId, SessionPhase};
use crate::draw::Shape;
use crate::engine::{BackgroundPlacement, EngineError, GraphicsEngine};
use crate::layers::{BackgroundLayer, Layer, LayerStore};
use crate::util;

/// A live session. Dropping it releases the canvas.
struct ActiveSession<E: GraphicsEngine> {
    id: SessionId,
    engine: Arc<E>,
    /// `None` when the engine could not create a canvas
    canvas: Option<E::Canvas>,
    layers: LayerStore,
    scale_factor: Option<f64>,
    loading: bool,
}

impl<E: GraphicsEngine> Drop for ActiveSession<E> {
    fn drop(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            self.engine.dispose(canvas);
            log::debug!("Released canvas for {}", self.id);
        }
    }
}

enum SessionState<E: GraphicsEngine> {
    Uninitialized,
    Active(ActiveSession<E>),
    Disposed,
}

/// Owns the single active editing session and mediates between user actions,
/// the injected [`GraphicsEngine`], and the session's [`LayerStore`].
pub struct Editor<E: GraphicsEngine> {
    engine: Arc<E>,
    settings: EditorSettings,
    state: SessionState<E>,
    next_id: u64,
}

impl<E: GraphicsEngine> Editor<E> {
    pub fn new(engine: Arc<E>, settings: EditorSettings) -> Self {
        Self {
            engine,
            settings,
            state: SessionState::Uninitialized,
            next_id: 1,
        }
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Starts a session on the given background image, ending any live one.
    ///
    /// Fails with [`SessionError::MissingSource`] for an absent or blank URL
    /// without calling the engine. If the engine cannot create a canvas the
    /// session still starts, without a canvas, and the returned load resolves
    /// to the engine error.
    pub fn start_session(&mut self, image_url: Option<&str>) -> Result<BackgroundLoad, SessionError> {
        let url = match image_url.map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => {
                log::warn!("No source image supplied; session not started");
                return Err(SessionError::MissingSource);
            }
        };

        if matches!(self.state, SessionState::Active(_)) {
            self.end_session();
        }

        let id = SessionId(self.next_id);
        self.next_id += 1;

        let (canvas, future) = match self.engine.create_canvas(&self.settings.canvas) {
            Ok(canvas) => {
                log::info!(
                    "Started {} ({}x{}) with background {}",
                    id,
                    self.settings.canvas.width,
                    self.settings.canvas.height,
                    url
                );
                let future = self.engine.load_image(&url, self.settings.cors_mode);
                (Some(canvas), future)
            }
            Err(err) => {
                log::error!("Could not create canvas for {}: {}", id, err);
                (None, future::ready(Err(err)).boxed())
            }
        };

        self.state = SessionState::Active(ActiveSession {
            id,
            engine: Arc::clone(&self.engine),
            canvas,
            layers: LayerStore::new(),
            scale_factor: None,
            loading: true,
        });

        Ok(BackgroundLoad::new(SessionGuard::new(id), url, future))
    }

    /// Applies a finished background load to the session that requested it.
    ///
    /// Completions for sessions that have since ended are discarded without
    /// touching anything. A failed load is reported and leaves the session
    /// usable without a background.
    pub fn complete_background(
        &mut self,
        completion: BackgroundCompletion,
    ) -> Result<BackgroundOutcome, SessionError> {
        let BackgroundCompletion { guard, url, result } = completion;
        let live = self.session_id();
        let SessionState::Active(session) = &mut self.state else {
            log::debug!("Discarding background for {}: no live session", guard.session());
            return Ok(BackgroundOutcome::Discarded);
        };
        if !guard.is_current(live) || !session.loading {
            log::debug!(
                "Discarding background for {}: live session is {}",
                guard.session(),
                session.id
            );
            return Ok(BackgroundOutcome::Discarded);
        }
        session.loading = false;

        let image = match result {
            Ok(image) => image,
            Err(err) => {
                let err = SessionError::from_background_load(&url, err);
                log::error!("{}; continuing without a background", err);
                return Err(err);
            }
        };

        let Some(canvas) = session.canvas.as_mut() else {
            return Err(SessionError::EngineUnavailable(
                "session has no canvas".to_string(),
            ));
        };

        let canvas_spec = &self.settings.canvas;
        let scale_factor = util::fit_scale(
            canvas_spec.width,
            canvas_spec.height,
            image.width(),
            image.height(),
        )
        .ok_or_else(|| SessionError::ImageLoad {
            url: url.clone(),
            reason: "image has no pixels".to_string(),
        })?;

        // A decoded image the engine cannot place (e.g. too large for a
        // surface) is still a failed load, not an engine fault.
        if let Err(err) = session.engine.set_background(
            canvas,
            &image,
            BackgroundPlacement {
                scale: scale_factor,
                selectable: false,
            },
        ) {
            let err = SessionError::from_background_load(&url, err);
            log::error!("{}; continuing without a background", err);
            return Err(err);
        }
        session.engine.render(canvas)?;

        let layer = BackgroundLayer {
            src: url,
            scaled_width: image.width() as f64 * scale_factor,
            scaled_height: image.height() as f64 * scale_factor,
        };
        session.layers.set_background(layer.clone())?;
        session.scale_factor = Some(scale_factor);

        log::info!(
            "Background {}x{} applied at scale {:.4}",
            image.width(),
            image.height(),
            scale_factor
        );
        Ok(BackgroundOutcome::Applied {
            scale_factor,
            layer,
        })
    }

    /// Ends the live session, releasing its canvas and discarding its layers.
    ///
    /// Safe to call in any phase; the editor is `Disposed` afterwards.
    pub fn end_session(&mut self) {
        if let SessionState::Active(session) =
            std::mem::replace(&mut self.state, SessionState::Disposed)
        {
            log::info!("Ending {} with {} layers", session.id, session.layers.len());
            drop(session);
        }
    }

    // ------------------------------------------------------------------
    // Tools
    // ------------------------------------------------------------------

    /// Adds an editable text box with the configured style and selects it.
    pub fn add_text(&mut self, text: Option<&str>) -> Result<Layer, SessionError> {
        let style = &self.settings.text;
        let content = text.unwrap_or(&style.default_text);
        let shape = Shape::text(content, style.font_size, style.font.clone(), style.color);
        self.place("add_text", shape)
    }

    pub fn add_rectangle(&mut self) -> Result<Layer, SessionError> {
        self.place("add_rectangle", Shape::default_rectangle())
    }

    pub fn add_circle(&mut self) -> Result<Layer, SessionError> {
        self.place("add_circle", Shape::default_circle())
    }

    pub fn add_triangle(&mut self) -> Result<Layer, SessionError> {
        self.place("add_triangle", Shape::default_triangle())
    }

    pub fn add_polygon(&mut self) -> Result<Layer, SessionError> {
        self.place("add_polygon", Shape::default_polygon())
    }

    fn place(&mut self, operation: &'static str, shape: Shape) -> Result<Layer, SessionError> {
        let SessionState::Active(session) = &mut self.state else {
            log::warn!("{} ignored: no live session", operation);
            return Err(SessionError::NotReady { operation });
        };
        let Some(canvas) = session.canvas.as_mut() else {
            log::warn!("{} ignored: {} has no canvas", operation, session.id);
            return Err(SessionError::NotReady { operation });
        };

        let object = session.engine.add_object(canvas, &shape)?;
        session.engine.set_active_object(canvas, object)?;
        session.engine.render(canvas)?;

        let layer = Layer::Shape(shape);
        session.layers.append(layer.clone());
        log::debug!("New layer added: {:?}", layer);
        Ok(layer)
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Flattens background and layers into an encoded image.
    ///
    /// Uses the configured format (PNG at full quality by default). Never
    /// returns partial output.
    pub fn export_raster(&mut self) -> Result<Vec<u8>, SessionError> {
        let SessionState::Active(session) = &mut self.state else {
            return Err(ExportError::NoCanvas.into());
        };
        let Some(canvas) = session.canvas.as_mut() else {
            return Err(ExportError::NoCanvas.into());
        };

        let bytes = session
            .engine
            .to_raster_bytes(
                canvas,
                self.settings.export_format,
                self.settings.export_quality,
            )
            .map_err(|err| match err {
                EngineError::Tainted => ExportError::Tainted,
                EngineError::Encode(reason) => ExportError::Encode(reason),
                other => ExportError::Engine(other),
            })?;
        if bytes.is_empty() {
            return Err(ExportError::Empty.into());
        }

        log::info!(
            "Exported {} ({} bytes, {:?})",
            session.id,
            bytes.len(),
            self.settings.export_format
        );
        Ok(bytes)
    }

    // ------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        match &self.state {
            SessionState::Uninitialized => SessionPhase::Uninitialized,
            SessionState::Active(session) if session.loading => SessionPhase::Loading,
            SessionState::Active(_) => SessionPhase::Ready,
            SessionState::Disposed => SessionPhase::Disposed,
        }
    }

    pub fn session_id(&self) -> Option<SessionId> {
        match &self.state {
            SessionState::Active(session) => Some(session.id),
            _ => None,
        }
    }

    /// Scale applied to the background; `None` until a background is applied.
    pub fn scale_factor(&self) -> Option<f64> {
        match &self.state {
            SessionState::Active(session) => session.scale_factor,
            _ => None,
        }
    }

    pub fn has_background(&self) -> bool {
        self.scale_factor().is_some()
    }

    /// Whether the live session has a canvas to draw on.
    pub fn has_canvas(&self) -> bool {
        matches!(&self.state, SessionState::Active(session) if session.canvas.is_some())
    }

    /// Shared handle to the live session's layers, for debug views.
    pub fn layers(&self) -> Option<LayerStore> {
        match &self.state {
            SessionState::Active(session) => Some(session.layers.clone()),
            _ => None,
        }
    }

    /// Ordered copy of the live session's layers; empty without a session.
    pub fn snapshot(&self) -> Vec<Layer> {
        match &self.state {
            SessionState::Active(session) => session.layers.snapshot(),
            _ => Vec::new(),
        }
    }

    /// Engine canvas of the live session.
    pub fn canvas(&self) -> Option<&E::Canvas> {
        match &self.state {
            SessionState::Active(session) => session.canvas.as_ref(),
            _ => None,
        }
    }
}
