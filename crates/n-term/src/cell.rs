// SPDX-License-Identifier: MIT
//
// Cell — one character position on screen.
//
// A cell is a codepoint plus resolved foreground/background colors and a
// small attribute set. Colors are either the terminal default or 24-bit
// RGB; swatches are painted with the exact RGB of the simulated color, so
// there is no palette quantization step anywhere in the pipeline.
//
// Wide characters occupy two cells. The first holds the codepoint; the
// second is a continuation cell (`ch == '\0'`) that only carries colors.

use std::fmt;

// ─── CellColor ───────────────────────────────────────────────────────────────

/// A fully resolved terminal color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    /// The terminal's own default (SGR 39 / 49).
    #[default]
    Default,
    /// 24-bit truecolor.
    Rgb(u8, u8, u8),
}

impl CellColor {
    /// Unpack a `0xRRGGBB` value.
    #[inline]
    #[must_use]
    pub const fn from_u24(value: u32) -> Self {
        Self::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

impl fmt::Debug for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Rgb(r, g, b) => write!(f, "#{r:02x}{g:02x}{b:02x}"),
        }
    }
}

// ─── Attr ────────────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes, mapped 1:1 to SGR parameters.
    ///
    /// ```
    /// use n_term::cell::Attr;
    ///
    /// let label = Attr::BOLD | Attr::INVERSE;
    /// assert!(label.contains(Attr::BOLD));
    /// assert!(!label.contains(Attr::DIM));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1.
        const BOLD      = 1 << 0;
        /// SGR 2.
        const DIM       = 1 << 1;
        /// SGR 3.
        const ITALIC    = 1 << 2;
        /// SGR 4.
        const UNDERLINE = 1 << 3;
        /// SGR 7 — swap fg and bg.
        const INVERSE   = 1 << 4;
    }
}

// ─── Cell ────────────────────────────────────────────────────────────────────

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    /// Codepoint, or `'\0'` for the continuation half of a wide char.
    pub ch: char,
    pub fg: CellColor,
    pub bg: CellColor,
    pub attrs: Attr,
}

impl Cell {
    /// A blank cell with default colors.
    pub const EMPTY: Self = Self {
        ch: ' ',
        fg: CellColor::Default,
        bg: CellColor::Default,
        attrs: Attr::empty(),
    };

    /// A cell showing `ch` with default colors.
    #[inline]
    #[must_use]
    pub const fn new(ch: char) -> Self {
        Self { ch, ..Self::EMPTY }
    }

    #[inline]
    #[must_use]
    pub const fn with_fg(mut self, fg: CellColor) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_bg(mut self, bg: CellColor) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    /// Whether this is the trailing half of a wide character.
    #[inline]
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.ch == '\0'
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cell_is_space_on_default() {
        let c = Cell::EMPTY;
        assert_eq!(c.ch, ' ');
        assert_eq!(c.fg, CellColor::Default);
        assert_eq!(c.bg, CellColor::Default);
        assert!(c.attrs.is_empty());
        assert_eq!(Cell::default(), c);
    }

    #[test]
    fn builders_set_fields() {
        let c = Cell::new('x')
            .with_fg(CellColor::Rgb(1, 2, 3))
            .with_bg(CellColor::Rgb(4, 5, 6))
            .with_attrs(Attr::BOLD);
        assert_eq!(c.ch, 'x');
        assert_eq!(c.fg, CellColor::Rgb(1, 2, 3));
        assert_eq!(c.bg, CellColor::Rgb(4, 5, 6));
        assert_eq!(c.attrs, Attr::BOLD);
    }

    #[test]
    fn continuation_is_nul() {
        assert!(Cell::new('\0').is_continuation());
        assert!(!Cell::new('a').is_continuation());
    }

    #[test]
    fn from_u24_unpacks_channels() {
        assert_eq!(CellColor::from_u24(0x3498db), CellColor::Rgb(0x34, 0x98, 0xdb));
    }

    #[test]
    fn debug_prints_hex() {
        assert_eq!(format!("{:?}", CellColor::Rgb(255, 0, 16)), "#ff0010");
        assert_eq!(format!("{:?}", CellColor::Default), "Default");
    }
}
