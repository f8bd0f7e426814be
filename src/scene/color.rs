//! RGBA color type, predefined constants, and the TOML authoring form.

use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Represents an RGBA color with floating-point components.
///
/// All components are in the range 0.0 (minimum) to 1.0 (maximum).
///
/// # Examples
///
/// ```
/// use camshot::scene::Color;
/// let red = Color { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
/// let half_clear = red.with_alpha(0.5);
/// assert_eq!(half_clear.a, 0.5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
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
    /// Creates a new color from RGBA components.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with its alpha component replaced.
    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Converts 0-255 components to a color.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: a as f64 / 255.0,
        }
    }
}

// ============================================================================
// Predefined Color Constants
// ============================================================================

pub const RED: Color = Color {
    r: 1.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

pub const GREEN: Color = Color {
    r: 0.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};

pub const BLUE: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 1.0,
    a: 1.0,
};

pub const YELLOW: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 0.0,
    a: 1.0,
};

pub const ORANGE: Color = Color {
    r: 1.0,
    g: 0.5,
    b: 0.0,
    a: 1.0,
};

pub const WHITE: Color = Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

pub const BLACK: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

/// Default camera background, a muted blue.
pub const CAMERA_BLUE: Color = Color {
    r: 0.192,
    g: 0.302,
    b: 0.475,
    a: 1.0,
};

pub const TRANSPARENT: Color = Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

/// Maps color name strings to Color values (case-insensitive).
pub fn name_to_color(name: &str) -> Option<Color> {
    match name.to_lowercase().as_str() {
        "red" => Some(RED),
        "green" => Some(GREEN),
        "blue" => Some(BLUE),
        "yellow" => Some(YELLOW),
        "orange" => Some(ORANGE),
        "white" => Some(WHITE),
        "black" => Some(BLACK),
        "transparent" => Some(TRANSPARENT),
        _ => None,
    }
}

/// Color specification as written in scene files.
///
/// # Examples
/// ```toml
/// # Named color
/// color = "red"
///
/// # RGB (0-255 per component, fully opaque)
/// color = [255, 128, 0]
///
/// # RGBA (0-255 per component)
/// color = [255, 128, 0, 64]
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color: red, green, blue, yellow, orange, white, black, transparent
    Name(String),
    /// RGB color as [red, green, blue]
    Rgb([u8; 3]),
    /// RGBA color as [red, green, blue, alpha]
    Rgba([u8; 4]),
}

impl ColorSpec {
    /// Converts the specification to a [`Color`].
    ///
    /// Unknown color names fall back to white with a warning.
    pub fn to_color(&self) -> Color {
        match self {
            ColorSpec::Name(name) => name_to_color(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using white", name);
                WHITE
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgba8(*r, *g, *b, 255),
            ColorSpec::Rgba([r, g, b, a]) => Color::from_rgba8(*r, *g, *b, *a),
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(color: Color) -> Self {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        ColorSpec::Rgba([
            channel(color.r),
            channel(color.g),
            channel(color.b),
            channel(color.a),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(ColorSpec::Name("ReD".into()).to_color(), RED);
        assert_eq!(ColorSpec::Name("transparent".into()).to_color().a, 0.0);
    }

    #[test]
    fn unknown_name_falls_back_to_white() {
        assert_eq!(ColorSpec::Name("chartreuse-ish".into()).to_color(), WHITE);
    }

    #[test]
    fn rgb_arrays_are_opaque() {
        let color = ColorSpec::Rgb([255, 0, 0]).to_color();
        assert_eq!(color, RED);

        let translucent = ColorSpec::Rgba([0, 0, 255, 0]).to_color();
        assert_eq!(translucent.b, 1.0);
        assert_eq!(translucent.a, 0.0);
    }

    #[test]
    fn rgb_and_rgba_arrays_deserialize_untagged() {
        #[derive(Deserialize)]
        struct Holder {
            a: ColorSpec,
            b: ColorSpec,
            c: ColorSpec,
        }

        let holder: Holder = toml::from_str(
            r#"
            a = "orange"
            b = [1, 2, 3]
            c = [1, 2, 3, 4]
            "#,
        )
        .unwrap();
        assert_eq!(holder.a, ColorSpec::Name("orange".into()));
        assert_eq!(holder.b, ColorSpec::Rgb([1, 2, 3]));
        assert_eq!(holder.c, ColorSpec::Rgba([1, 2, 3, 4]));
    }
}
