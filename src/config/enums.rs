//! Configuration enum types.

use crate::draw::{BLACK, Color};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Color specification - either a named color or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// color = "black"
///
/// # Custom RGB color (0-255 per component)
/// color = [255, 128, 0]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, orange, pink, white, black
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the color specification to an opaque [`Color`].
    ///
    /// Unknown color names fall back to black with a warning.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => crate::util::name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using black", name);
                BLACK
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgba8(*r, *g, *b, 1.0),
        }
    }

    pub(crate) fn named(name: &str) -> Self {
        ColorSpec::Name(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::WHITE;

    #[test]
    fn named_and_rgb_colors_resolve() {
        assert_eq!(ColorSpec::named("White").to_color(), WHITE);
        assert_eq!(
            ColorSpec::Rgb([255, 0, 0]).to_color(),
            Color::new(1.0, 0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn unknown_name_falls_back_to_black() {
        assert_eq!(ColorSpec::named("chartreuse-ish").to_color(), BLACK);
    }

    #[test]
    fn deserializes_both_forms() {
        #[derive(Deserialize)]
        struct Wrapper {
            color: ColorSpec,
        }
        let named: Wrapper = toml::from_str(r#"color = "blue""#).unwrap();
        assert_eq!(named.color, ColorSpec::named("blue"));
        let rgb: Wrapper = toml::from_str("color = [1, 2, 3]").unwrap();
        assert_eq!(rgb.color, ColorSpec::Rgb([1, 2, 3]));
    }
}
