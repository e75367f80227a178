//! Colours, palettes and shape kinds.
//!
//! Field shapes draw their colour from a fixed finite [`Palette`]; the swarm
//! uses one colour for every dot.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 8-bit sRGB colour, serialized as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as `0.0..=1.0` floats, sRGB encoded.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Channels converted to linear light, for sRGB render targets.
    pub fn to_linear(self) -> [f32; 3] {
        fn channel(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.r), channel(self.g), channel(self.b)]
    }
}

/// Error for strings that are not `#RRGGBB`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid colour `{0}`, expected #RRGGBB")]
pub struct ParseColorError(String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        // from_str_radix alone would accept a sign, e.g. "+1"
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

const CANDY: [Color; 5] = [
    Color::rgb(0xFF, 0x6B, 0x6B), // Coral
    Color::rgb(0x4E, 0xCD, 0xC4), // Teal
    Color::rgb(0xFF, 0xE6, 0x6D), // Butter
    Color::rgb(0xFF, 0x76, 0x75), // Salmon
    Color::rgb(0x74, 0xB9, 0xFF), // Sky
];

const SUNSET: [Color; 5] = [
    Color::rgb(0x4A, 0x1C, 0x6B),
    Color::rgb(0x9B, 0x2C, 0x8C),
    Color::rgb(0xFF, 0x4F, 0x6D),
    Color::rgb(0xFF, 0x8F, 0x3F),
    Color::rgb(0xFF, 0xD8, 0x6B),
];

const OCEAN: [Color; 5] = [
    Color::rgb(0x03, 0x2B, 0x43),
    Color::rgb(0x13, 0x63, 0x8F),
    Color::rgb(0x1F, 0x9E, 0xC7),
    Color::rgb(0x5C, 0xC8, 0xE0),
    Color::rgb(0xB8, 0xEC, 0xF5),
];

const NEON: [Color; 4] = [
    Color::rgb(0xFF, 0x2E, 0x97),
    Color::rgb(0x00, 0xF0, 0xFF),
    Color::rgb(0xB0, 0x26, 0xFF),
    Color::rgb(0x39, 0xFF, 0x14),
];

/// Fixed set of colours that field shapes are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Palette {
    /// Coral, teal, butter, salmon and sky (default).
    #[default]
    Candy,
    /// Warm purples through orange.
    Sunset,
    /// Deep to pale blues.
    Ocean,
    /// Saturated pink, cyan, violet and green.
    Neon,
    /// User supplied colours.
    Custom(Vec<Color>),
}

impl Palette {
    pub fn colors(&self) -> &[Color] {
        match self {
            Palette::Candy => &CANDY,
            Palette::Sunset => &SUNSET,
            Palette::Ocean => &OCEAN,
            Palette::Neon => &NEON,
            Palette::Custom(colors) => colors,
        }
    }
}

/// Outline of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShapeKind {
    /// Fully rounded.
    #[default]
    Circle,
    /// Square with corners rounded to 20% of the side.
    RoundedSquare,
}

impl ShapeKind {
    /// Corner radius as a fraction of the element's side.
    pub fn corner_fraction(self) -> f32 {
        match self {
            ShapeKind::Circle => 0.5,
            ShapeKind::RoundedSquare => 0.2,
        }
    }

    /// CSS `border-radius` value.
    pub fn css_radius(self) -> &'static str {
        match self {
            ShapeKind::Circle => "50%",
            ShapeKind::RoundedSquare => "20%",
        }
    }
}

/// Draw layer. Field shapes sit below the swarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Layer {
    Field,
    Swarm,
}

impl Layer {
    /// Class attached to DOM elements of this layer; tear-down selects on it.
    pub fn class_name(self) -> &'static str {
        match self {
            Layer::Field => "bg-shape",
            Layer::Swarm => "cursor-dot",
        }
    }
}
