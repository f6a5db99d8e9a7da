//! Pending background loads and their session guard.

use std::fmt;

use super::types::SessionId;
use crate::engine::{EngineError, ImageHandle, ImageFuture};
use crate::layers::BackgroundLayer;

/// Ties an asynchronous result to the session that requested it.
///
/// Only the editor can mint guards, and only [`super::Editor::complete_background`]
/// consumes them, so a load that finishes after its session ended can never
/// touch the next session or a disposed canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionGuard {
    session: SessionId,
}

impl SessionGuard {
    pub(crate) fn new(session: SessionId) -> Self {
        Self { session }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub(crate) fn is_current(&self, live: Option<SessionId>) -> bool {
        live == Some(self.session)
    }
}

/// In-flight background image request returned by `start_session`.
///
/// The load is `Send + 'static`: await it inline with [`BackgroundLoad::wait`]
/// or spawn that future on a runtime, then hand the completion back to the
/// editor. No timeout is applied.
#[must_use = "the background is applied only when the completion is passed to the editor"]
pub struct BackgroundLoad {
    guard: SessionGuard,
    url: String,
    future: ImageFuture,
}

impl BackgroundLoad {
    pub(crate) fn new(guard: SessionGuard, url: String, future: ImageFuture) -> Self {
        Self { guard, url, future }
    }

    pub fn session(&self) -> SessionId {
        self.guard.session()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Waits for the image to load and decode.
    pub async fn wait(self) -> BackgroundCompletion {
        let result = self.future.await;
        BackgroundCompletion {
            guard: self.guard,
            url: self.url,
            result,
        }
    }
}

impl fmt::Debug for BackgroundLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundLoad")
            .field("session", &self.guard.session())
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// Finished background load, waiting to be applied by the editor.
#[derive(Debug)]
pub struct BackgroundCompletion {
    pub(crate) guard: SessionGuard,
    pub(crate) url: String,
    pub(crate) result: Result<ImageHandle, EngineError>,
}

impl BackgroundCompletion {
    pub fn session(&self) -> SessionId {
        self.guard.session()
    }
}

/// What applying a completion did.
#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundOutcome {
    /// The background is now on the canvas and recorded as the first layer.
    Applied {
        scale_factor: f64,
        layer: BackgroundLayer,
    },
    /// The completion belonged to a session that is no longer live; nothing
    /// was touched.
    Discarded,
}
