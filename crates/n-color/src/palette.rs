//! Palette derivation — one base color in, four related colors out.
//!
//! The derivation is plain integer arithmetic on the packed 24-bit value:
//!
//! | slot | rule                          |
//! |------|-------------------------------|
//! | 0    | base                          |
//! | 1    | `(v + 0x333333) mod 0x1000000` |
//! | 2    | `(v - 0x333333) mod 0x1000000` |
//! | 3    | `v XOR 0xFFFFFF`              |
//!
//! Slots 1 and 2 wrap around the 24-bit range rather than clamping, so a
//! near-white base produces a dark slot 1 and a near-black base a light
//! slot 2. The carry also bleeds between channels (`0x3498db + 0x333333`
//! is `0x67cc0e`, not `0x67cb0e`) because the offset is added to the whole
//! packed value, not per channel.

use std::ops::Deref;

use crate::color::Color;
use crate::error::ColorError;

/// Number of swatches in every palette.
pub const PALETTE_LEN: usize = 4;

/// The fixed step applied to the packed value for slots 1 and 2.
pub const STEP: u32 = 0x0033_3333;

/// An ordered set of exactly four colors. Slot 0 is always the base.
///
/// A palette is never edited in place: a new generation produces a new
/// value that replaces the old one wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Palette([Color; PALETTE_LEN]);

impl Palette {
    /// Parse `base` and derive its palette.
    ///
    /// # Errors
    ///
    /// [`ColorError::InvalidColorFormat`] if `base` is not `#rrggbb`.
    pub fn from_hex(base: &str) -> Result<Self, ColorError> {
        Color::parse(base).map(generate)
    }

    /// The seed color (slot 0).
    #[inline]
    #[must_use]
    pub const fn base(&self) -> Color {
        self.0[0]
    }

    #[inline]
    #[must_use]
    pub const fn colors(&self) -> &[Color; PALETTE_LEN] {
        &self.0
    }
}

impl Deref for Palette {
    type Target = [Color];

    fn deref(&self) -> &[Color] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Derive the four-color palette for `base`.
///
/// ```
/// use n_color::{Color, generate};
///
/// let p = generate(Color::parse("#ffffff").unwrap());
/// assert_eq!(p[1].to_string(), "#333332"); // wrapped, not clamped
/// ```
#[must_use]
pub const fn generate(base: Color) -> Palette {
    let v = base.value();
    Palette([
        base,
        Color::from_value(v.wrapping_add(STEP)),
        Color::from_value(v.wrapping_sub(STEP)),
        base.inverse(),
    ])
}

// ─── Tests ───────────────────────────────────────────────────────────────────
