//! Flags accepted by every appstage subcommand.

use clap::Args;
use std::path::PathBuf;

/// Flattened into [`super::Cli`]; each flag is `global` so it may follow the
/// subcommand (`appstage build -vv`).
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Log staging steps to stderr (-v), skipped files and resolved paths
    /// (-vv), or everything (-vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print nothing but errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never colour output. Also set by `NO_COLOR`.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from FILE instead of the user config file.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Format of the build summary and `config list`.
    #[arg(long, global = true, value_enum, default_value_t)]
    pub output_format: OutputFormat,
}

/// Rendering of command results on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// `human` on a terminal, `plain` otherwise.
    #[default]
    Auto,
    /// Coloured, with status symbols.
    Human,
    /// No colour, for logs and pipes.
    Plain,
    /// One JSON document.
    Json,
}
