//! Theme colors: a palette name or an explicit hex value.
//!
//! Colors are parsed once into [`Color`] when the event configuration is
//! loaded or submitted, and [`Theme::resolve`] turns the whole theme into
//! concrete hex values so no caller ever branches on the representation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Named palette entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteColor {
    /// `#9333ea`
    Purple,
    /// `#2563eb`
    Blue,
    /// `#ea580c`
    Orange,
    /// `#16a34a`
    Green,
    /// `#dc2626`
    Red,
    /// `#ca8a04`
    Yellow,
    /// `#4f46e5`
    Indigo,
    /// `#db2777`
    Pink,
    /// `#0d9488`
    Teal,
}

impl PaletteColor {
    const ALL: [Self; 9] = [
        Self::Purple,
        Self::Blue,
        Self::Orange,
        Self::Green,
        Self::Red,
        Self::Yellow,
        Self::Indigo,
        Self::Pink,
        Self::Teal,
    ];

    /// Palette name as stored.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Purple => "purple",
            Self::Blue => "blue",
            Self::Orange => "orange",
            Self::Green => "green",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Indigo => "indigo",
            Self::Pink => "pink",
            Self::Teal => "teal",
        }
    }

    /// Concrete display value.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Purple => "#9333ea",
            Self::Blue => "#2563eb",
            Self::Orange => "#ea580c",
            Self::Green => "#16a34a",
            Self::Red => "#dc2626",
            Self::Yellow => "#ca8a04",
            Self::Indigo => "#4f46e5",
            Self::Pink => "#db2777",
            Self::Teal => "#0d9488",
        }
    }
}

/// Error for strings that are neither a palette name nor a hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color {0:?}: expected a palette name or #rgb/#rrggbb")]
pub struct InvalidColor(pub String);

/// Validated `#rgb` or `#rrggbb` value, stored lower-case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexColor(String);

impl HexColor {
    /// Returns the hex string including the leading `#`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for HexColor {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| InvalidColor(s.to_string()))?;
        let well_formed =
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
        if well_formed {
            Ok(Self(s.to_ascii_lowercase()))
        } else {
            Err(InvalidColor(s.to_string()))
        }
    }
}

/// A theme slot value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    /// Palette entry.
    Named(PaletteColor),
    /// Explicit hex value.
    Hex(HexColor),
}

impl Color {
    /// Concrete display value.
    #[must_use]
    pub fn resolve(&self) -> String {
        match self {
            Self::Named(p) => p.hex().to_string(),
            Self::Hex(h) => h.as_str().to_string(),
        }
    }
}

impl FromStr for Color {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('#') {
            return s.parse().map(Self::Hex);
        }
        PaletteColor::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .map(Self::Named)
            .ok_or_else(|| InvalidColor(s.to_string()))
    }
}

impl TryFrom<String> for Color {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(p) => f.write_str(p.name()),
            Self::Hex(h) => f.write_str(h.as_str()),
        }
    }
}

/// Seven named color slots of the public site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Theme {
    /// Primary brand color.
    #[schema(value_type = String, example = "purple")]
    pub primary: Color,
    /// Secondary brand color.
    #[schema(value_type = String, example = "blue")]
    pub secondary: Color,
    /// Free-tier accent.
    #[schema(value_type = String, example = "purple")]
    pub free_accent: Color,
    /// Paid-tier accent.
    #[schema(value_type = String, example = "#ea580c")]
    pub paid_accent: Color,
    /// Success messages.
    #[schema(value_type = String)]
    pub success: Color,
    /// Error messages.
    #[schema(value_type = String)]
    pub error: Color,
    /// Warnings.
    #[schema(value_type = String)]
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Named(PaletteColor::Purple),
            secondary: Color::Named(PaletteColor::Blue),
            free_accent: Color::Named(PaletteColor::Purple),
            paid_accent: Color::Named(PaletteColor::Orange),
            success: Color::Named(PaletteColor::Green),
            error: Color::Named(PaletteColor::Red),
            warning: Color::Named(PaletteColor::Yellow),
        }
    }
}

impl Theme {
    /// Resolves every slot to a hex value.
    #[must_use]
    pub fn resolve(&self) -> ResolvedTheme {
        ResolvedTheme {
            primary: self.primary.resolve(),
            secondary: self.secondary.resolve(),
            free_accent: self.free_accent.resolve(),
            paid_accent: self.paid_accent.resolve(),
            success: self.success.resolve(),
            error: self.error.resolve(),
            warning: self.warning.resolve(),
        }
    }
}

/// Theme with every slot resolved to a hex value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ResolvedTheme {
    /// Primary brand color.
    pub primary: String,
    /// Secondary brand color.
    pub secondary: String,
    /// Free-tier accent.
    pub free_accent: String,
    /// Paid-tier accent.
    pub paid_accent: String,
    /// Success messages.
    pub success: String,
    /// Error messages.
    pub error: String,
    /// Warnings.
    pub warning: String,
}
