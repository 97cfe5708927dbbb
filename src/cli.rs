// SPDX-License-Identifier: MIT
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use n_color::SimulationMode;

#[derive(Parser)]
#[command(
    name = "n-palette",
    version,
    about = "Generate a four-color palette and preview it under color-vision deficiencies",
    long_about = "Generate a four-color palette from a base color, preview it as seen \
                  with protanopia, deuteranopia or tritanopia, and export it as CSS \
                  custom properties or a PNG image.\n\n\
                  Without a command, opens the interactive screen."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr (the only way to log from the interactive screen).
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: settings.toml in the platform config dir).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Whether this run opens the interactive screen.
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Command::Tui))
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Open the interactive screen (default).
    Tui,

    /// Print the four palette colors, one per line.
    Generate(GenerateArgs),

    /// Print one color as seen with a vision deficiency.
    Simulate(SimulateArgs),

    /// Print the palette as a CSS `:root` block.
    Css(CssArgs),

    /// Save the palette as color-palette.png.
    Png(PngArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Base color, `#rrggbb`.
    #[arg(value_name = "COLOR")]
    pub color: String,

    /// Print the colors as seen in this mode.
    #[arg(long, value_name = "MODE", default_value = "normal")]
    pub mode: SimulationMode,
}

#[derive(Args)]
pub struct SimulateArgs {
    #[arg(value_name = "COLOR")]
    pub color: String,

    /// normal, protanopia, deuteranopia or tritanopia.
    #[arg(long, value_name = "MODE")]
    pub mode: SimulationMode,
}

#[derive(Args)]
pub struct CssArgs {
    #[arg(value_name = "COLOR")]
    pub color: String,
}

#[derive(Args)]
pub struct PngArgs {
    #[arg(value_name = "COLOR")]
    pub color: String,

    /// Paint the swatches as seen in this mode.
    #[arg(long, value_name = "MODE", default_value = "normal")]
    pub mode: SimulationMode,

    /// Output directory (default: `export_dir` from settings).
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("n-palette").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_command_is_interactive() {
        let cli = parse(&[]);
        assert!(cli.command.is_none());
        assert!(cli.is_interactive());
        assert!(parse(&["tui"]).is_interactive());
    }

    #[test]
    fn generate_mode_defaults_to_normal() {
        let cli = parse(&["generate", "#3498db"]);
        let Some(Command::Generate(args)) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.color, "#3498db");
        assert_eq!(args.mode, SimulationMode::Normal);
        assert!(!parse(&["generate", "#3498db"]).is_interactive());
    }

    #[test]
    fn simulate_requires_mode() {
        assert!(Cli::try_parse_from(["n-palette", "simulate", "#3498db"]).is_err());
        let cli = parse(&["simulate", "#3498db", "--mode", "Tritanopia"]);
        let Some(Command::Simulate(args)) = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(args.mode, SimulationMode::Tritanopia);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["n-palette", "generate", "#3498db", "--mode", "sepia"]).is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["png", "#3498db", "--out", "/tmp/x", "--log-format", "json", "--config", "a.toml"]);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert_eq!(cli.config, Some(PathBuf::from("a.toml")));
        let Some(Command::Png(args)) = cli.command else {
            panic!("expected png");
        };
        assert_eq!(args.out, Some(PathBuf::from("/tmp/x")));
    }
}
