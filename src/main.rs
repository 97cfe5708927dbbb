// SPDX-License-Identifier: MIT
//
// n-palette — accessible color palette generator.
//
// This binary wires the workspace crates together:
//
//   n-color  → palette derivation, vision simulation, CSS export
//   n-export → rasterizer, PNG data URI, download to disk
//   n-term   → terminal control, input parsing, rendering, event loop
//
// With no subcommand it opens the interactive screen (`app.rs`), where
// `Shell` holds the state and `view.rs` draws it. Subcommands
// (`commands.rs`) run the same core once and print the result.
//
// Exit codes: 0 success, 1 failure, 2 malformed color.

mod app;
mod cli;
mod commands;
mod config;
mod field;
mod logging;
mod shell;
mod toast;
mod view;

use std::io::{self, IsTerminal};
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::config::Settings;
use crate::logging::{LogConfig, LogFormat, init_logging};

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging(&log_config_from_cli(&cli)) {
        eprintln!("n-palette: failed to initialize logging: {error}");
        process::exit(commands::EXIT_FAILURE);
    }

    if let Err(error) = run(cli) {
        tracing::debug!(error = ?error, "run failed");
        eprintln!("n-palette: {error:#}");
        process::exit(commands::exit_code(&error));
    }
}

fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let mut stdout = io::stdout();

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => app::run(&settings).context("terminal session failed"),
        Command::Generate(args) => commands::generate(&args, &mut stdout),
        Command::Simulate(args) => commands::simulate_one(&args, &mut stdout),
        Command::Css(args) => commands::css(&args, &mut stdout),
        Command::Png(args) => commands::png(&args, &settings, &mut stdout),
    }
}

/// Logging configuration from CLI flags.
///
/// `--log-level` beats `-v/-q`, which beat `RUST_LOG`. The interactive
/// screen logs nothing unless `--log-file` is given.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        use_env_filter: !(cli.verbosity.is_present() || cli.log_level.is_some()),
        ..LogConfig::default()
    };
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file.clone_from(&cli.log_file);
    config.with_ansi = cli.log_file.is_none() && io::stderr().is_terminal();

    if cli.is_interactive() && cli.log_file.is_none() {
        config.level_filter = LevelFilter::OFF;
        config.use_env_filter = false;
    }
    config
}

// ─── Tests ──────────────────────────────────────────────────────────────────
