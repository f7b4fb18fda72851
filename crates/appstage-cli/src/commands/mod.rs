//! Subcommand handlers. Each module exposes one `execute` function.

pub mod build;
pub mod completions;
pub mod config;
pub mod init;
