//! Session identifiers, lifecycle phases, and errors.

use std::fmt;

use thiserror::Error;

use crate::engine::EngineError;
use crate::layers::LayerError;

/// Unique identifier of one editing session within an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub(crate) u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Lifecycle phase of the editor's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session has been started yet.
    Uninitialized,
    /// Session is live; the background image has not been applied yet.
    Loading,
    /// Session is live and its background load has finished (successfully or not).
    Ready,
    /// Session was ended and its canvas released.
    Disposed,
}

/// Reasons a raster export can fail.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no canvas to export")]
    NoCanvas,

    #[error("canvas contains cross-origin image data and cannot be read back")]
    Tainted,

    #[error("engine returned an empty image")]
    Empty,

    #[error("encoding failed: {0}")]
    Encode(String),

    #[error(transparent)]
    Engine(EngineError),
}

/// Errors surfaced by the session controller.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no image URL supplied")]
    MissingSource,

    #[error("graphics engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("failed to load background image {url}: {reason}")]
    ImageLoad { url: String, reason: String },

    #[error("{operation} ignored: canvas is not ready")]
    NotReady { operation: &'static str },

    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Layer(#[from] LayerError),
}

impl SessionError {
    /// Maps a failed background load onto the session error taxonomy.
    pub(crate) fn from_background_load(url: &str, err: EngineError) -> Self {
        match err {
            EngineError::Unavailable(reason) => SessionError::EngineUnavailable(reason),
            EngineError::ImageLoad { reason, .. } => SessionError::ImageLoad {
                url: url.to_string(),
                reason,
            },
            other => SessionError::ImageLoad {
                url: url.to_string(),
                reason: other.to_string(),
            },
        }
    }
}
