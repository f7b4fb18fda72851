//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use appstage_core::domain::ToolstackKind;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "appstage",
    bin_name = "appstage",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Stage local builds of cloud applications",
    long_about = "appstage copies or symlinks an application's source tree into \
                  a local build directory, ready to be served or deployed.",
    after_help = "EXAMPLES:\n\
        \x20 appstage build\n\
        \x20 appstage build ./api --copy --doc-root web\n\
        \x20 appstage config set local.web_root _www\n\
        \x20 appstage completions bash > /usr/share/bash-completion/completions/appstage",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stage a build of an application.
    #[command(
        visible_alias = "b",
        about = "Build an application locally",
        after_help = "EXAMPLES:\n\
            \x20 appstage build                         # app in the current directory\n\
            \x20 appstage build ./app --copy            # independent copy\n\
            \x20 appstage build ./app --move-to-root    # tree lands in the web root\n\
            \x20 appstage build ./app --toolstack composer"
    )]
    Build(BuildArgs),

    /// Initialise an appstage configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 appstage init           # default location\n\
            \x20 appstage init --force   # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 appstage completions bash > ~/.local/share/bash-completion/completions/appstage\n\
            \x20 appstage completions zsh  > ~/.zfunc/_appstage\n\
            \x20 appstage completions fish > ~/.config/fish/completions/appstage.fish"
    )]
    Completions(CompletionsArgs),

    /// Manage the appstage configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 appstage config get local.web_root\n\
            \x20 appstage config set local.copy_on_windows true\n\
            \x20 appstage config list"
    )]
    Config(ConfigCommands),
}

impl Commands {
    /// `false` for commands that may create the `--config` file.
    pub fn reads_config_file(&self) -> bool {
        !matches!(
            self,
            Self::Init(_) | Self::Config(ConfigCommands::Set { .. } | ConfigCommands::Path)
        )
    }
}

// ── build ─────────────────────────────────────────────────────────────────────

/// Arguments for `appstage build`.
#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Application root (default: current directory).
    #[arg(value_name = "APP_ROOT", help = "Application root directory")]
    pub app_root: Option<PathBuf>,

    /// Project checkout holding shared data and the web-root link.
    #[arg(
        short = 's',
        long = "source-dir",
        value_name = "DIR",
        help = "Project source directory (default: the application root)"
    )]
    pub source_dir: Option<PathBuf>,

    /// Application name; defaults to the app root's directory name.
    #[arg(short = 'n', long = "name", value_name = "NAME", help = "Application name")]
    pub name: Option<String>,

    /// Web-served subdirectory, relative to the app root.
    #[arg(
        long = "doc-root",
        value_name = "PATH",
        default_value = "public",
        help = "Document root relative to the application"
    )]
    pub document_root: String,

    /// Explicit build directory.
    #[arg(
        short = 'o',
        long = "build-dir",
        value_name = "DIR",
        help = "Build directory (default: timestamped under the local dir)"
    )]
    pub build_dir: Option<PathBuf>,

    /// Copy files instead of symlinking.
    #[arg(long = "copy", help = "Copy files instead of symlinking them")]
    pub copy: bool,

    /// Absolute link targets.
    #[arg(long = "absolute-links", help = "Use absolute symlink targets")]
    pub absolute_links: bool,

    /// Namespace shared data per application.
    #[arg(long = "multi-app", help = "Keep shared data in a per-app directory")]
    pub multi_app: bool,

    /// Stage the whole tree inside the document root.
    #[arg(long = "move-to-root", help = "Move the application into the document root")]
    pub move_to_root: bool,

    /// Toolstack that drives the build.
    #[arg(
        short = 't',
        long = "toolstack",
        value_enum,
        default_value = "vanilla",
        help = "Toolstack to build with"
    )]
    pub toolstack: ToolstackArg,

    /// Leave `<source>/<web_root>` alone.
    #[arg(long = "no-web-root-link", help = "Do not link the web root into the source")]
    pub no_web_root_link: bool,

    /// Replace an existing build directory (destructive).
    #[arg(long = "force", help = "Overwrite an existing build directory")]
    pub force: bool,
}

/// Toolstacks selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum ToolstackArg {
    /// Plain files, no dependency manager.
    #[value(alias = "none")]
    Vanilla,
    /// PHP with Composer.
    #[value(alias = "php")]
    Composer,
}

impl From<ToolstackArg> for ToolstackKind {
    fn from(arg: ToolstackArg) -> Self {
        match arg {
            ToolstackArg::Vanilla => Self::Vanilla,
            ToolstackArg::Composer => Self::Composer,
        }
    }
}

impl std::fmt::Display for ToolstackArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        ToolstackKind::from(*self).fmt(f)
    }
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `appstage init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `appstage completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `appstage config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `local.web_root`.
        key: String,
    },
    /// Set a configuration key to a value.
    Set {
        /// Dotted key path.
        key: String,
        /// New value.
        value: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn only_writers_may_create_the_config_file() {
        let reads = |args: &[&str]| Cli::parse_from(args).command.reads_config_file();
        assert!(reads(&["appstage", "build"]));
        assert!(reads(&["appstage", "config", "get", "local.web_root"]));
        assert!(!reads(&["appstage", "init"]));
        assert!(!reads(&["appstage", "config", "set", "output.no_color", "true"]));
        assert!(!reads(&["appstage", "config", "path"]));
    }

    #[test]
    fn toolstack_display() {
        assert_eq!(ToolstackArg::Vanilla.to_string(), "vanilla");
        assert_eq!(ToolstackArg::Composer.to_string(), "composer");
    }

    #[test]
    fn parse_build_defaults() {
        let cli = Cli::parse_from(["appstage", "build"]);
        let Commands::Build(args) = cli.command else {
            panic!("expected Build command");
        };
        assert_eq!(args.app_root, None);
        assert_eq!(args.document_root, "public");
        assert_eq!(args.toolstack, ToolstackArg::Vanilla);
        assert!(!args.copy);
        assert!(!args.force);
    }

    #[test]
    fn parse_build_flags() {
        let cli = Cli::parse_from([
            "appstage",
            "build",
            "./app",
            "--copy",
            "--absolute-links",
            "--multi-app",
            "--move-to-root",
            "--doc-root",
            "web",
            "--name",
            "api",
            "--toolstack",
            "php",
        ]);
        let Commands::Build(args) = cli.command else {
            panic!("expected Build command");
        };
        assert_eq!(args.app_root, Some(PathBuf::from("./app")));
        assert_eq!(args.document_root, "web");
        assert_eq!(args.name.as_deref(), Some("api"));
        assert_eq!(args.toolstack, ToolstackArg::Composer);
        assert!(args.copy && args.absolute_links && args.multi_app && args.move_to_root);
    }

    #[test]
    fn unknown_toolstack_rejected() {
        let result = Cli::try_parse_from(["appstage", "build", "--toolstack", "drupal"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::parse_from([
            "appstage",
            "build",
            "-vv",
            "--no-color",
            "-c",
            "stage.toml",
            "--output-format",
            "json",
        ]);
        assert_eq!(cli.global.verbose, 2);
        assert!(cli.global.no_color);
        assert_eq!(cli.global.config, Some(PathBuf::from("stage.toml")));
        assert_eq!(cli.global.output_format, OutputFormat::Json);
    }

    #[test]
    fn output_format_defaults_to_auto() {
        let cli = Cli::parse_from(["appstage", "build"]);
        assert_eq!(cli.global.output_format, OutputFormat::Auto);
        assert!(!cli.global.quiet);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["appstage", "--quiet", "--verbose", "build"]);
        assert!(result.is_err());
    }
}
