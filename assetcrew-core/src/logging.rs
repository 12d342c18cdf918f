//! Logging helpers shared by the asset tools.
//!
//! The library only emits records through the `log` facade; installing a
//! logger is left to the binary (see `assetcrew-cli`).

use log::{debug, info};
use std::process::Command;

/// Log a command being executed
pub fn log_command(cmd: &Command) {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|arg| arg.to_string_lossy()).collect();

    debug!("Executing command: {} {}", program, args.join(" "));
}

/// Create a section heading in the logs to separate pipeline stages
pub fn log_section(title: &str) {
    info!("{}", "=".repeat(50));
    info!("{}", title);
    info!("{}", "=".repeat(50));
}
