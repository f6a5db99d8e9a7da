//! RGBA color type and predefined color constants.

use serde::{Serialize, Serializer};
use std::fmt;

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use captionboard::draw::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// let semi_transparent_blue = Color::from_rgba8(0, 0, 255, 0.5);
/// assert_eq!(semi_transparent_blue.to_css(), "rgba(0, 0, 255, 0.5)");
/// assert_eq!(red.to_css(), "#ff0000");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red component (0.0 = no red, 1.0 = full red)
    pub r: f64,
    /// Green component (0.0 = no green, 1.0 = full green)
    pub g: f64,
    /// Blue component (0.0 = no blue, 1.0 = full blue)
    pub b: f64,
    /// Alpha/transparency (0.0 = fully transparent, 1.0 = fully opaque)
    pub a: f64,
}

impl Color {
    /// Creates a new color from RGBA components in the 0.0 - 1.0 range.
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from 8-bit channels plus a 0.0 - 1.0 alpha.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a,
        }
    }

    /// Returns the same color with a different alpha.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Channels quantized to 8 bits, as CSS and raster encoders expect them.
    pub fn to_rgb8(&self) -> [u8; 3] {
        [channel8(self.r), channel8(self.g), channel8(self.b)]
    }

    /// CSS notation: `#rrggbb` for opaque colors, `rgba(r, g, b, a)` otherwise.
    pub fn to_css(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {})", r, g, b, self.a.clamp(0.0, 1.0))
        }
    }
}

fn channel8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_css())
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

/// Predefined red color (R=1.0, G=0.0, B=0.0)
pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Predefined green color (R=0.0, G=1.0, B=0.0)
pub const GREEN: Color = Color::new(0.0, 1.0, 0.0, 1.0);

/// Predefined blue color (R=0.0, G=0.0, B=1.0)
pub const BLUE: Color = Color::new(0.0, 0.0, 1.0, 1.0);

/// Predefined yellow color (R=1.0, G=1.0, B=0.0)
pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0, 1.0);

/// Web orange (255, 165, 0)
pub const ORANGE: Color = Color::from_rgba8(255, 165, 0, 1.0);

/// Predefined pink/magenta color (R=1.0, G=0.0, B=1.0)
pub const PINK: Color = Color::new(1.0, 0.0, 1.0, 1.0);

/// Predefined white color (R=1.0, G=1.0, B=1.0)
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// Predefined black color (R=0.0, G=0.0, B=0.0)
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_uses_hex_for_opaque_colors() {
        assert_eq!(BLACK.to_css(), "#000000");
        assert_eq!(WHITE.to_css(), "#ffffff");
        assert_eq!(ORANGE.to_css(), "#ffa500");
    }

    #[test]
    fn css_uses_rgba_for_translucent_colors() {
        assert_eq!(RED.with_alpha(0.5).to_css(), "rgba(255, 0, 0, 0.5)");
        assert_eq!(
            Color::from_rgba8(0, 200, 0, 0.5).to_css(),
            "rgba(0, 200, 0, 0.5)"
        );
    }

    #[test]
    fn serializes_as_css_string() {
        let json = serde_json::to_string(&BLUE.with_alpha(0.5)).unwrap();
        assert_eq!(json, "\"rgba(0, 0, 255, 0.5)\"");
    }

    #[test]
    fn rgb8_clamps_out_of_range_channels() {
        let color = Color::new(1.5, -0.2, 0.5, 1.0);
        assert_eq!(color.to_rgb8(), [255, 0, 128]);
    }
}
