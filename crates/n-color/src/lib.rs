//! # n-color — Palette core for n-palette
//!
//! The deterministic half of the tool. Everything here is a pure function
//! of its inputs: no I/O, no clocks, no shared state.
//!
//! # Architecture
//!
//! ```text
//! "#3498db"  (user input)
//!     │
//!     ▼
//! color.rs:   parse + validate into a 24-bit Color
//!     │
//!     ▼
//! palette.rs: derive 4 slots (base, +0x333333, -0x333333, inverse)
//!     │
//!     ├──────────────► vision.rs: simulate each swatch per SimulationMode
//!     │
//!     ▼
//! export.rs:  `:root { --color-N: ... }` CSS block
//! ```

// Single-char channel names (r, g, b) are the convention in color code.
#![allow(clippy::many_single_char_names)]

pub mod color;
pub mod error;
pub mod export;
pub mod palette;
pub mod vision;

pub use color::Color;
pub use error::ColorError;
pub use export::to_css_block;
pub use palette::{Palette, generate};
pub use vision::{SimulationMode, simulate};
