//! Color values.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//!
//! Styles are authored with straight (non-premultiplied) alpha, but every
//! vertex the engine emits carries a premultiplied color so that blending and
//! interpolation along arcs behave correctly for translucent borders.

use serde::Serialize;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color represented as straight-alpha RGBA components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorValue {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub a: u8,
}

impl ColorValue {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Build a color from its four channels.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }
        let short = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
            // by replicating digits, not by adding zeros."
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 255)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 255)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    ///
    /// The sixteen basic HTML colors plus `transparent` and the common aliases.
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().as_str() {
            "black" => Self::BLACK,
            "white" => Self::WHITE,
            "transparent" => Self::TRANSPARENT,
            "red" => Self::rgba(255, 0, 0, 255),
            "green" => Self::rgba(0, 128, 0, 255),
            "blue" => Self::rgba(0, 0, 255, 255),
            "yellow" => Self::rgba(255, 255, 0, 255),
            "gray" | "grey" => Self::rgba(128, 128, 128, 255),
            "aqua" | "cyan" => Self::rgba(0, 255, 255, 255),
            "fuchsia" | "magenta" => Self::rgba(255, 0, 255, 255),
            "lime" => Self::rgba(0, 255, 0, 255),
            "maroon" => Self::rgba(128, 0, 0, 255),
            "navy" => Self::rgba(0, 0, 128, 255),
            "olive" => Self::rgba(128, 128, 0, 255),
            "purple" => Self::rgba(128, 0, 128, 255),
            "silver" => Self::rgba(192, 192, 192, 255),
            "teal" => Self::rgba(0, 128, 128, 255),
            _ => return None,
        };
        Some(color)
    }

    /// Parse either a hex color (must start with `#`) or a named color.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.starts_with('#') {
            Self::from_hex(text)
        } else {
            Self::from_named(text)
        }
    }

    /// Convert to premultiplied alpha, truncating each channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn to_premultiplied(self) -> PremultipliedColor {
        let a = self.a as u16;
        PremultipliedColor {
            r: ((self.r as u16 * a) / 255) as u8,
            g: ((self.g as u16 * a) / 255) as u8,
            b: ((self.b as u16 * a) / 255) as u8,
            a: self.a,
        }
    }

    /// Convert to premultiplied alpha after multiplying alpha by `opacity`
    /// (expected in `[0, 1]`).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_premultiplied_with_opacity(self, opacity: f32) -> PremultipliedColor {
        let new_alpha = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).min(255.0);
        let scale = new_alpha / 255.0;
        PremultipliedColor {
            r: (f32::from(self.r) * scale) as u8,
            g: (f32::from(self.g) * scale) as u8,
            b: (f32::from(self.b) * scale) as u8,
            a: new_alpha as u8,
        }
    }
}

/// An RGBA color whose color channels have already been multiplied by
/// `alpha / 255`. This is the color carried by every emitted vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct PremultipliedColor {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha (0 = fully transparent).
    pub a: u8,
}

impl PremultipliedColor {
    /// Opaque white, used for clip masks.
    pub const OPAQUE_WHITE: Self = Self::new(255, 255, 255, 255);

    /// Build a color from already-premultiplied channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Whether the color contributes nothing when drawn.
    #[must_use]
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Undo the premultiplication. Fully transparent colors map to
    /// transparent black.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_non_premultiplied(self) -> ColorValue {
        if self.a == 0 {
            return ColorValue::TRANSPARENT;
        }
        let a = u16::from(self.a);
        let unscale = |c: u8| -> u8 {
            ((u16::from(c) * 255) / a).min(255) as u8
        };
        ColorValue {
            r: unscale(self.r),
            g: unscale(self.g),
            b: unscale(self.b),
            a: self.a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_premultiplied_truncates() {
        let color = ColorValue::rgba(255, 128, 0, 128);
        assert_eq!(color.to_premultiplied(), PremultipliedColor::new(128, 64, 0, 128));
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let color = ColorValue::rgba(200, 100, 50, 255);
        let half = color.to_premultiplied_with_opacity(0.5);
        assert_eq!(half.a, 127);
        assert_eq!(half.r, 100);
        assert_eq!(ColorValue::WHITE.to_premultiplied_with_opacity(0.0).a, 0);
    }

    #[test]
    fn test_round_trip_opaque() {
        let color = ColorValue::rgba(12, 34, 56, 255);
        assert_eq!(color.to_premultiplied().to_non_premultiplied(), color);
        assert_eq!(
            PremultipliedColor::default().to_non_premultiplied(),
            ColorValue::TRANSPARENT
        );
    }

    #[test]
    fn test_parse_dispatches_on_hash() {
        assert_eq!(ColorValue::parse("#000"), Some(ColorValue::BLACK));
        assert_eq!(ColorValue::parse(" Teal "), Some(ColorValue::rgba(0, 128, 128, 255)));
        assert_eq!(ColorValue::parse("#12345"), None);
        assert_eq!(ColorValue::parse("notacolor"), None);
    }
}
