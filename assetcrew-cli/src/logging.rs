// ============================================================================
// assetcrew-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern Dispatch for Console and Run Log File
//
// Console records go to stderr with a colored level label. When a log
// directory is given, the same records are also written without color to
// `assetcrew_<command>_<YYYYMMDD_HHMMSS>.log`.
//
// Level selection: `--verbose` means Debug; otherwise RUST_LOG if it names a
// level; otherwise Info. Dependencies are held at Warn.

use crate::error::{CliErrorContext, CliResult};
use log::LevelFilter;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Check if color should be used (respects NO_COLOR environment variable)
pub fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Picks the level from the verbose flag and a RUST_LOG value.
pub fn resolve_level(verbose: bool, rust_log: Option<&str>) -> LevelFilter {
    if verbose {
        return LevelFilter::Debug;
    }
    rust_log
        .and_then(|value| value.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Name of the run log file for `command`.
pub fn log_file_name(command: &str) -> String {
    format!("assetcrew_{}_{}.log", command, get_timestamp())
}

fn colored_level(level: log::Level) -> String {
    let label = level.to_string();
    if !should_use_color() {
        return label;
    }
    match level {
        log::Level::Error => label.red().bold().to_string(),
        log::Level::Warn => label.yellow().to_string(),
        log::Level::Info => label.cyan().to_string(),
        log::Level::Debug => label.magenta().to_string(),
        log::Level::Trace => label.blue().to_string(),
    }
}

/// Installs the global logger. Returns the run log path when one was created.
pub fn init_logging(
    level: LevelFilter,
    log_dir: Option<&Path>,
    command: &str,
) -> CliResult<Option<PathBuf>> {
    let console = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", colored_level(record.level()), message))
        })
        .chain(std::io::stderr());

    let mut dispatch = fern::Dispatch::new()
        .level(LevelFilter::Warn)
        .level_for("assetcrew_core", level)
        .level_for("assetcrew_cli", level)
        .level_for("assetcrew", level)
        .chain(console);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)
            .cli_with_context(|| format!("Creating log directory {}", dir.display()))?;
        let path = dir.join(log_file_name(command));
        let file = fern::log_file(&path)
            .cli_with_context(|| format!("Opening log file {}", path.display()))?;

        dispatch = dispatch.chain(
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} [{}] {}: {}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .chain(file),
        );
        log_path = Some(path);
    }

    dispatch
        .apply()
        .map_err(|e| assetcrew_core::CoreError::OperationFailed(format!("Logger already set: {e}")))?;
    Ok(log_path)
}
