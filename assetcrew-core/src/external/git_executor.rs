//! Git command runner.
//!
//! Wraps the git CLI with captured stdout/stderr. Every git operation the
//! sync tool performs goes through a `GitExecutor` so the state machine can be
//! tested without a real repository.

use crate::error::{CoreResult, command_failed_error, command_start_error};
use crate::logging;
use std::path::Path;
use std::process::{Command, Output};

/// Result of a successful git command execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitOutput {
    /// Standard output from the command (trimmed).
    pub stdout: String,
    /// Standard error from the command (trimmed).
    pub stderr: String,
}

impl GitOutput {
    fn from_output(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }
}

/// Trait for running git commands in a working directory.
pub trait GitExecutor {
    /// Runs `git <args>` in `cwd`. A non-zero exit is an error.
    fn run(&self, cwd: &Path, args: &[&str]) -> CoreResult<GitOutput>;
}

/// Runs the `git` binary found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct CliGitExecutor;

impl GitExecutor for CliGitExecutor {
    fn run(&self, cwd: &Path, args: &[&str]) -> CoreResult<GitOutput> {
        let mut cmd = Command::new("git");
        cmd.current_dir(cwd).args(args);
        logging::log_command(&cmd);

        let subcommand = format!("git {}", args.first().unwrap_or(&""));
        let output = cmd
            .output()
            .map_err(|e| command_start_error(subcommand.clone(), e))?;

        let git_output = GitOutput::from_output(&output);
        if output.status.success() {
            return Ok(git_output);
        }

        // git writes some failures (e.g. "nothing to commit") to stdout
        let message = if git_output.stderr.is_empty() {
            git_output.stdout
        } else {
            git_output.stderr
        };
        Err(command_failed_error(subcommand, output.status, message))
    }
}
