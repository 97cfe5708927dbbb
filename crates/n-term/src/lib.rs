// SPDX-License-Identifier: MIT
//
// n-term — Terminal engine for n-palette.
//
// Raw-mode terminal control, key input parsing, and a differential
// truecolor renderer. Palette swatches are painted as background-colored
// cell blocks, so the renderer speaks 24-bit SGR and nothing else: no
// 256-color fallback, no mouse, no Kitty keyboard. Bracketed paste stays
// on because pasting a hex code is the common way to enter a base color.
//
// The clipboard is reached through OSC 52 (see `ansi::set_clipboard`),
// which works over SSH and needs no platform clipboard library.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod diff;
pub mod event_loop;
pub mod input;
pub mod reader;
pub mod terminal;
