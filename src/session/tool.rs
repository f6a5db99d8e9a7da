//! Named editor tools, as selected from the command line.

use std::fmt;
use std::str::FromStr;

use super::controller::Editor;
use super::types::SessionError;
use crate::engine::GraphicsEngine;
use crate::layers::Layer;

/// One shape-adding action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolAction {
    /// Text box; `None` uses the configured default text
    Text(Option<String>),
    Rectangle,
    Circle,
    Triangle,
    Polygon,
}

impl ToolAction {
    /// Runs the action against the editor's live session.
    pub fn apply<E: GraphicsEngine>(&self, editor: &mut Editor<E>) -> Result<Layer, SessionError> {
        match self {
            ToolAction::Text(text) => editor.add_text(text.as_deref()),
            ToolAction::Rectangle => editor.add_rectangle(),
            ToolAction::Circle => editor.add_circle(),
            ToolAction::Triangle => editor.add_triangle(),
            ToolAction::Polygon => editor.add_polygon(),
        }
    }
}

/// Error for an unrecognized tool name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tool '{0}' (expected text, text:<content>, rectangle, circle, triangle or polygon)")]
pub struct UnknownTool(pub String);

impl FromStr for ToolAction {
    type Err = UnknownTool;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        // The prefix is matched like any tool name; the content keeps its case.
        if let Some(content) = name
            .get(..5)
            .filter(|prefix| prefix.eq_ignore_ascii_case("text:"))
            .map(|_| &name[5..])
        {
            return Ok(ToolAction::Text(Some(content.to_string())));
        }
        match name.to_lowercase().as_str() {
            "text" => Ok(ToolAction::Text(None)),
            "rectangle" | "rect" => Ok(ToolAction::Rectangle),
            "circle" => Ok(ToolAction::Circle),
            "triangle" => Ok(ToolAction::Triangle),
            "polygon" | "hexagon" => Ok(ToolAction::Polygon),
            _ => Err(UnknownTool(s.to_string())),
        }
    }
}

impl fmt::Display for ToolAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolAction::Text(Some(text)) => write!(f, "text:{}", text),
            ToolAction::Text(None) => f.write_str("text"),
            ToolAction::Rectangle => f.write_str("rectangle"),
            ToolAction::Circle => f.write_str("circle"),
            ToolAction::Triangle => f.write_str("triangle"),
            ToolAction::Polygon => f.write_str("polygon"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("text".parse(), Ok(ToolAction::Text(None)));
        assert_eq!("Rect".parse(), Ok(ToolAction::Rectangle));
        assert_eq!("hexagon".parse(), Ok(ToolAction::Polygon));
        assert_eq!(
            "text:Big Sale: 50% off".parse(),
            Ok(ToolAction::Text(Some("Big Sale: 50% off".to_string())))
        );
    }

    #[test]
    fn text_prefix_ignores_case_and_padding() {
        assert_eq!(
            "Text:Hi".parse(),
            Ok(ToolAction::Text(Some("Hi".to_string())))
        );
        assert_eq!(
            "  TEXT:Hello World ".parse(),
            Ok(ToolAction::Text(Some("Hello World".to_string())))
        );
        assert_eq!("text:".parse(), Ok(ToolAction::Text(Some(String::new()))));
        assert!("tex".parse::<ToolAction>().is_err());
    }

    #[test]
    fn rejects_unknown_tools() {
        let err = "ellipse".parse::<ToolAction>().unwrap_err();
        assert_eq!(err, UnknownTool("ellipse".to_string()));
        assert!(err.to_string().contains("ellipse"));
    }

    #[test]
    fn display_parses_back() {
        for action in [
            ToolAction::Text(Some("hi".to_string())),
            ToolAction::Text(None),
            ToolAction::Circle,
            ToolAction::Polygon,
        ] {
            assert_eq!(action.to_string().parse(), Ok(action));
        }
    }
}
