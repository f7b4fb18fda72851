//! External command adapters.

use std::path::Path;
use std::process::Command;

use appstage_core::{
    application::{ApplicationError, ports::CommandRunner},
    error::StageResult,
};
use tracing::{debug, instrument};

/// Runs programs on the local machine, inheriting stdout and stderr so the
/// user sees their output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalShell;

impl LocalShell {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for LocalShell {
    #[instrument(skip_all, fields(program = %program, dir = %working_dir.display()))]
    fn run(&self, program: &str, args: &[String], working_dir: &Path) -> StageResult<()> {
        let command_line = std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");
        debug!(command = %command_line, "Running");

        let status = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .status()
            .map_err(|e| ApplicationError::CommandFailed {
                command: command_line.clone(),
                reason: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(ApplicationError::CommandFailed {
                command: command_line,
                reason: format!("exited with {status}"),
            }
            .into())
        }
    }
}
