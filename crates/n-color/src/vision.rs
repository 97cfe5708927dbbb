//! Color-vision-deficiency preview.
//!
//! Each deficiency is a fixed 3×3 weighting of the input channels. These
//! are coarse screen-space approximations, not calibrated per-illuminant
//! transforms; they only need to be stable and in range.
//!
//! Rows are `[r, g, b]` weights for one output channel:
//!
//! ```text
//!                 simR                simG                simB
//! protanopia      .567r + .433g       .558r + .442g       .242r + .758b
//! deuteranopia    .625r + .375g       .700r + .300g       .300r + .700b
//! tritanopia      .950r + .050g       .433r + .567g       .475r + .525g
//! ```
//!
//! Note the tritanopia blue row mixes red and *green*, not blue.

use std::fmt;
use std::str::FromStr;

use crate::color::Color;

/// Row-major channel weights: `out[i] = m[i][0]*r + m[i][1]*g + m[i][2]*b`.
type Matrix = [[f64; 3]; 3];

const PROTANOPIA: Matrix = [
    [0.567, 0.433, 0.0],
    [0.558, 0.442, 0.0],
    [0.242, 0.0, 0.758],
];

const DEUTERANOPIA: Matrix = [
    [0.625, 0.375, 0.0],
    [0.700, 0.300, 0.0],
    [0.300, 0.0, 0.700],
];

const TRITANOPIA: Matrix = [
    [0.950, 0.050, 0.0],
    [0.433, 0.567, 0.0],
    [0.475, 0.525, 0.0],
];

/// Which vision the swatches are previewed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SimulationMode {
    #[default]
    Normal,
    /// Missing L cones (red-blind).
    Protanopia,
    /// Missing M cones (green-blind).
    Deuteranopia,
    /// Missing S cones (blue-blind).
    Tritanopia,
}

impl SimulationMode {
    /// All modes in cycle order.
    pub const ALL: [Self; 4] = [
        Self::Normal,
        Self::Protanopia,
        Self::Deuteranopia,
        Self::Tritanopia,
    ];

    /// The next mode in the cycle, wrapping back to [`Normal`](Self::Normal).
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Normal => Self::Protanopia,
            Self::Protanopia => Self::Deuteranopia,
            Self::Deuteranopia => Self::Tritanopia,
            Self::Tritanopia => Self::Normal,
        }
    }

    /// Lowercase identifier, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Protanopia => "protanopia",
            Self::Deuteranopia => "deuteranopia",
            Self::Tritanopia => "tritanopia",
        }
    }

    const fn matrix(self) -> Option<&'static Matrix> {
        match self {
            Self::Normal => None,
            Self::Protanopia => Some(&PROTANOPIA),
            Self::Deuteranopia => Some(&DEUTERANOPIA),
            Self::Tritanopia => Some(&TRITANOPIA),
        }
    }
}

impl fmt::Display for SimulationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized mode name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown simulation mode {:?} (expected normal, protanopia, deuteranopia or tritanopia)",
            self.0
        )
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for SimulationMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownMode(s.to_owned()))
    }
}

/// Preview `color` as seen with the given deficiency.
///
/// `Normal` is the identity. Other modes weight the channels, round each
/// to the nearest integer and clamp it to `0..=255` before repacking.
///
/// ```
/// use n_color::{Color, SimulationMode, simulate};
///
/// let c = Color::parse("#3498db").unwrap();
/// assert_eq!(simulate(c, SimulationMode::Normal), c);
/// assert_eq!(simulate(c, SimulationMode::Protanopia).to_string(), "#5f60b3");
/// ```
#[must_use]
pub fn simulate(color: Color, mode: SimulationMode) -> Color {
    let Some(m) = mode.matrix() else {
        return color;
    };
    let (r, g, b) = color.channels();
    let rgb = [f64::from(r), f64::from(g), f64::from(b)];
    let [sr, sg, sb] = m.map(|row| to_channel(weigh(row, rgb)));
    Color::from_rgb(sr, sg, sb)
}

/// Weighted channel sum, evaluated left to right with unfused products.
///
/// Exact halves must stay exact: tritanopia blue for `#3498db` is 104.5
/// and rounds to 105.
#[allow(clippy::suboptimal_flops)]
fn weigh(row: [f64; 3], rgb: [f64; 3]) -> f64 {
    row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2]
}

/// Round to nearest and clamp into a byte.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

// ─── Tests ───────────────────────────────────────────────────────────────────
