// ============================================================================
// assetcrew-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools
//
// This module encapsulates interactions with the command-line programs the
// asset tools delegate to: ffmpeg (audio filtering, concatenation, WebP
// encoding), ffprobe (duration probing) and git (staging, committing,
// pushing). Each program sits behind a trait so the tools can be exercised
// with mocks.
//
// KEY COMPONENTS:
// - FfmpegSpawner / FfmpegProcess: ffmpeg execution via ffmpeg-sidecar
// - FfprobeExecutor: media probing via the ffprobe crate
// - GitExecutor: git CLI invocation
// - check_dependency: presence check used by the CLI `doctor` command

use crate::error::{CoreError, CoreResult};

use std::io;
use std::process::{Command, Stdio};

/// Traits and implementations for spawning and interacting with ffmpeg processes
pub mod ffmpeg_executor;

/// Traits and implementations for executing ffprobe queries
pub mod ffprobe_executor;

/// Traits and implementations for running git commands
pub mod git_executor;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;

pub use ffmpeg_executor::{
    FfmpegProcess, FfmpegReport, FfmpegSpawner, SidecarProcess, SidecarSpawner, run_ffmpeg,
    run_ffmpeg_report,
};
pub use ffprobe_executor::{CrateFfprobeExecutor, FfprobeExecutor};
pub use git_executor::{CliGitExecutor, GitExecutor, GitOutput};

/// Checks if a required external command is available and executable.
///
/// Runs the command with its version flag and discards the output; only a
/// failure to launch counts as missing.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    // git spells it --version, the ffmpeg family -version
    let version_arg = if cmd_name == "git" { "--version" } else { "-version" };

    let result = Command::new(cmd_name)
        .arg(version_arg)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_dependency_is_reported() {
        let result = check_dependency("assetcrew-surely-not-installed-42");
        assert!(matches!(result, Err(CoreError::DependencyNotFound(name)) if name.starts_with("assetcrew")));
    }
}
