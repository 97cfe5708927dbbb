// SPDX-License-Identifier: MIT
//
// One-shot subcommands: compute, print, exit.
//
// Results go to the given writer (stdout in practice). Errors bubble up as
// `anyhow::Error`; `exit_code` maps a malformed color to 2 and everything
// else to 1.

use std::io::Write;

use anyhow::{Context, Result};
use n_color::{Color, ColorError, Palette, simulate, to_css_block};
use n_export::{DirectoryDownload, GridRasterizer, PaletteRegion, RasterOptions, export_png};

use crate::cli::{CssArgs, GenerateArgs, PngArgs, SimulateArgs};
use crate::config::Settings;

pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID_COLOR: i32 = 2;

pub fn generate(args: &GenerateArgs, out: &mut impl Write) -> Result<()> {
    let palette = Palette::from_hex(&args.color)?;
    for &color in palette.iter() {
        writeln!(out, "{}", simulate(color, args.mode))?;
    }
    Ok(())
}

pub fn simulate_one(args: &SimulateArgs, out: &mut impl Write) -> Result<()> {
    let color = Color::parse(&args.color)?;
    writeln!(out, "{}", simulate(color, args.mode))?;
    Ok(())
}

pub fn css(args: &CssArgs, out: &mut impl Write) -> Result<()> {
    let palette = Palette::from_hex(&args.color)?;
    writeln!(out, "{}", to_css_block(&palette)?)?;
    Ok(())
}

pub fn png(args: &PngArgs, settings: &Settings, out: &mut impl Write) -> Result<()> {
    let palette = Palette::from_hex(&args.color)?;
    let shown = palette.iter().map(|&c| simulate(c, args.mode)).collect();
    let dir = args.out.clone().unwrap_or_else(|| settings.export_dir.clone());

    let path = export_png(
        &GridRasterizer,
        &PaletteRegion::new(shown),
        &RasterOptions::default(),
        &mut DirectoryDownload::new(&dir),
    )
    .with_context(|| format!("failed to save palette image in {}", dir.display()))?;
    writeln!(out, "{}", path.display())?;
    Ok(())
}

/// Process exit code for a failed run.
pub fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<ColorError>() {
        Some(ColorError::InvalidColorFormat { .. }) => EXIT_INVALID_COLOR,
        _ => EXIT_FAILURE,
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
