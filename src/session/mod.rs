//! Annotation session control.
//!
//! An [`Editor`] owns at most one live session: a canvas created through the
//! injected graphics engine, the background image once it has loaded, and the
//! ordered layer record. Background loading is asynchronous; its result is
//! handed back through [`Editor::complete_background`], which checks the
//! session guard before touching anything.

mod background;
mod controller;
mod settings;
mod tool;
mod types;

pub use background::{BackgroundCompletion, BackgroundLoad, BackgroundOutcome, SessionGuard};
pub use controller::Editor;
pub use settings::{
    DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, DEFAULT_FONT_SIZE, EditorSettings, TextStyle,
};
pub use tool::{ToolAction, UnknownTool};
pub use types::{ExportError, SessionError, SessionId, SessionPhase};
