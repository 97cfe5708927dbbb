//! 24-bit RGB color with a canonical `#rrggbb` text form.
//!
//! Input is case-insensitive and must carry the `#` prefix followed by
//! exactly six hex digits. Output is always lowercase and zero-padded.
//! There is no alpha channel and no shorthand (`#f80`) form: the palette
//! arithmetic works on the packed integer, so the text form has to map
//! one-to-one onto `0..=0xFFFFFF`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ColorError;

/// Largest representable value (`#ffffff`).
pub const MAX_VALUE: u32 = 0x00FF_FFFF;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color pattern is valid"));

/// A packed 24-bit RGB color.
///
/// The inner value is always `<= 0xFFFFFF`. Construct via
/// [`from_value`](Self::from_value), [`from_rgb`](Self::from_rgb), or by
/// parsing a `#rrggbb` string.
///
/// ```
/// use n_color::Color;
///
/// let c: Color = "#3498DB".parse().unwrap();
/// assert_eq!(c.to_string(), "#3498db");
/// assert_eq!((c.r(), c.g(), c.b()), (0x34, 0x98, 0xdb));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Self = Self(0);
    pub const WHITE: Self = Self(MAX_VALUE);

    /// Build a color from an integer, keeping only the low 24 bits.
    ///
    /// Truncation is the wrap-around rule the palette derivation relies on.
    #[inline]
    #[must_use]
    pub const fn from_value(value: u32) -> Self {
        Self(value & MAX_VALUE)
    }

    #[inline]
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Parse `#rrggbb` (surrounding whitespace ignored).
    ///
    /// # Errors
    ///
    /// [`ColorError::InvalidColorFormat`] when the input is not `#` plus
    /// exactly six hex digits.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        if !HEX_COLOR.is_match(trimmed) {
            return Err(ColorError::invalid(input));
        }
        u32::from_str_radix(&trimmed[1..], 16)
            .map(Self)
            .map_err(|_| ColorError::invalid(input))
    }

    /// The packed `0xRRGGBB` value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    #[must_use]
    pub const fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    #[must_use]
    pub const fn b(self) -> u8 {
        self.0 as u8
    }

    /// `(r, g, b)` channels.
    #[inline]
    #[must_use]
    pub const fn channels(self) -> (u8, u8, u8) {
        (self.r(), self.g(), self.b())
    }

    /// Bitwise complement within 24 bits.
    #[inline]
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self(self.0 ^ MAX_VALUE)
    }

    /// Whether a label drawn on this color should use dark ink.
    ///
    /// Compares the packed value against the midpoint of the range, which is
    /// dominated by the red channel. Crude, but it is the rule the swatch
    /// labels have always used; this is not a contrast metric.
    #[inline]
    #[must_use]
    pub const fn wants_dark_label(self) -> bool {
        self.0 > MAX_VALUE / 2
    }

    /// Canonical lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:06x}", self.0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:06x})", self.0)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        color.0
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Parsing ──────────────────────────────────────────────────

    #[test]
    fn parses_lowercase() {
        assert_eq!(Color::parse("#3498db").unwrap().value(), 0x3498db);
    }

    #[test]
    fn parses_uppercase_and_mixed_case() {
        assert_eq!(Color::parse("#3498DB").unwrap().value(), 0x3498db);
        assert_eq!(Color::parse("#AbCdEf").unwrap().value(), 0xabcdef);
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(Color::parse("  #000001\n").unwrap().value(), 1);
    }

    #[test]
    fn rejects_missing_hash() {
        assert!(matches!(
            Color::parse("3498db"),
            Err(ColorError::InvalidColorFormat { .. })
        ));
    }

    #[test]
    fn rejects_wrong_length() {
        for input in ["#", "#fff", "#12345", "#1234567", "#3498db00", ""] {
            assert!(Color::parse(input).is_err(), "{input:?} should be rejected");
        }
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert!(Color::parse("#34g8db").is_err());
        assert!(Color::parse("#-12345").is_err());
        assert!(Color::parse("#+12345").is_err());
    }

    #[test]
    fn rejects_non_ascii_without_panicking() {
        assert!(Color::parse("#ééé").is_err());
    }

    #[test]
    fn error_keeps_original_input() {
        let err = Color::parse(" nope ").unwrap_err();
        assert_eq!(
            err,
            ColorError::InvalidColorFormat {
                input: " nope ".into()
            }
        );
    }

    #[test]
    fn from_str_matches_parse() {
        let a: Color = "#ff8000".parse().unwrap();
        assert_eq!(a, Color::parse("#ff8000").unwrap());
    }

    // ── Formatting ───────────────────────────────────────────────

    #[test]
    fn display_is_lowercase_and_padded() {
        assert_eq!(Color::from_value(0x0000ab).to_string(), "#0000ab");
        assert_eq!(Color::from_value(0xABCDEF).to_string(), "#abcdef");
        assert_eq!(Color::BLACK.to_hex(), "#000000");
    }

    #[test]
    fn debug_shows_hex() {
        assert_eq!(format!("{:?}", Color::WHITE), "Color(#ffffff)");
    }

    // ── Channels ─────────────────────────────────────────────────

    #[test]
    fn channel_extraction() {
        let c = Color::from_value(0x123456);
        assert_eq!(c.channels(), (0x12, 0x34, 0x56));
    }

    #[test]
    fn from_rgb_packs_channels() {
        assert_eq!(Color::from_rgb(0x12, 0x34, 0x56).value(), 0x123456);
    }

    #[test]
    fn from_value_truncates_to_24_bits() {
        assert_eq!(Color::from_value(0x0133_3332).value(), 0x333332);
        assert_eq!(Color::from_value(u32::MAX), Color::WHITE);
    }

    #[test]
    fn inverse_is_complement() {
        assert_eq!(Color::from_value(0x3498db).inverse().value(), 0xcb6724);
        assert_eq!(Color::BLACK.inverse(), Color::WHITE);
    }

    // ── Label ink ────────────────────────────────────────────────

    #[test]
    fn dark_label_threshold() {
        assert!(!Color::from_value(0x7fffff).wants_dark_label());
        assert!(Color::from_value(0x800000).wants_dark_label());
        assert!(Color::WHITE.wants_dark_label());
        assert!(!Color::from_value(0x3498db).wants_dark_label());
    }
}
