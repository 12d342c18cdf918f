// ============================================================================
// assetcrew-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: FFmpeg Process Management and Abstraction
//
// This module provides abstractions for spawning and interacting with FFmpeg
// processes. The asset tools build an `FfmpegCommand`, hand it to a spawner
// and read back the log lines ffmpeg printed (volumedetect reports its
// measurements there).
//
// KEY COMPONENTS:
// - FfmpegProcess: Trait representing an active FFmpeg process
// - FfmpegSpawner: Trait for creating new FFmpeg processes
// - SidecarSpawner: Concrete implementation using ffmpeg-sidecar
// - run_ffmpeg / run_ffmpeg_report: Spawn, drain events, wait and check the
//   exit status

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild as SidecarChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

/// Trait representing an active ffmpeg process instance.
pub trait FfmpegProcess {
    /// Processes events from the running command using a provided handler closure.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for the command to complete and returns its exit status.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Trait representing something that can spawn an FfmpegProcess.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;
    /// Spawns the ffmpeg command, consuming the command object.
    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// Wrapper around `ffmpeg_sidecar::child::FfmpegChild` implementing `FfmpegProcess`.
pub struct SidecarProcess(SidecarChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to get ffmpeg event iterator: {}", e);
            command_failed_error("ffmpeg (sidecar - get iter)", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (sidecar)", e))
    }
}

/// Concrete implementation of `FfmpegSpawner` using `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg (sidecar)", e))
    }
}

/// What a finished ffmpeg run printed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FfmpegReport {
    pub log_lines: Vec<String>,
    /// Duration of the first input as announced in ffmpeg's banner
    pub input_duration: Option<f64>,
}

/// Runs an ffmpeg command to completion and returns the log lines it emitted.
///
/// `label` names the step in error messages (e.g. "ffmpeg (sprite concat)").
/// A non-zero exit becomes `CoreError::CommandFailed` carrying the error
/// lines ffmpeg reported.
pub fn run_ffmpeg<S: FfmpegSpawner>(
    spawner: &S,
    cmd: FfmpegCommand,
    label: &str,
) -> CoreResult<Vec<String>> {
    run_ffmpeg_report(spawner, cmd, label).map(|report| report.log_lines)
}

/// Like [`run_ffmpeg`], but also keeps the input duration ffmpeg parsed.
pub fn run_ffmpeg_report<S: FfmpegSpawner>(
    spawner: &S,
    cmd: FfmpegCommand,
    label: &str,
) -> CoreResult<FfmpegReport> {
    log::debug!("Running {}: {:?}", label, cmd);

    let mut process = spawner.spawn(cmd)?;
    let mut report = FfmpegReport::default();
    let mut error_lines = Vec::new();

    process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(_level, line) => report.log_lines.push(line),
            FfmpegEvent::ParsedDuration(parsed) if parsed.input_index == 0 => {
                report.input_duration = Some(parsed.duration);
            }
            FfmpegEvent::Error(line) => {
                log::debug!("{} error output: {}", label, line);
                error_lines.push(line);
            }
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        log::error!("{} failed: {}", label, status);
        let stderr = if error_lines.is_empty() {
            report.log_lines.last().cloned().unwrap_or_default()
        } else {
            error_lines.join("\n")
        };
        return Err(command_failed_error(label, status, stderr));
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, command_start_error};
    use crate::external::mocks::MockFfmpegSpawner;
    use ffmpeg_sidecar::event::{FfmpegDuration, LogLevel};

    fn null_output(filter: &str) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new();
        cmd.input("clip.wav");
        cmd.args(["-af", filter]);
        cmd.args(["-f", "null"]);
        cmd.output("-");
        cmd
    }

    #[test]
    fn test_spawn_failure_surfaces_as_command_start() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_spawn_error_expectation(
            "volumedetect",
            command_start_error(
                "ffmpeg (sidecar)",
                std::io::Error::new(std::io::ErrorKind::NotFound, "ffmpeg: not found"),
            ),
        );

        match run_ffmpeg(&spawner, null_output("volumedetect"), "ffmpeg (volumedetect)") {
            Err(CoreError::CommandStart(cmd, err)) => {
                assert_eq!(cmd, "ffmpeg (sidecar)");
                assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(spawner.get_received_calls().len(), 1);
    }

    #[test]
    fn test_report_keeps_logs_and_first_input_duration() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation(
            "silencedetect",
            vec![
                FfmpegEvent::ParsedDuration(FfmpegDuration {
                    input_index: 0,
                    duration: 1.5,
                    raw_log_message: "  Duration: 00:00:01.50, start: 0.000000".to_string(),
                }),
                FfmpegEvent::Log(LogLevel::Info, "silence_start: 1.2".to_string()),
            ],
            false,
        );

        let report =
            run_ffmpeg_report(&spawner, null_output("silencedetect"), "ffmpeg (silencedetect)")
                .unwrap();
        assert_eq!(report.input_duration, Some(1.5));
        assert_eq!(report.log_lines, vec!["silence_start: 1.2".to_string()]);
    }

    #[test]
    fn test_exit_failure_prefers_error_lines() {
        let spawner = MockFfmpegSpawner::new();
        spawner.add_exit_error_expectation(
            "volumedetect",
            vec![
                FfmpegEvent::Log(LogLevel::Info, "Input #0, wav".to_string()),
                FfmpegEvent::Error("clip.wav: Invalid data found".to_string()),
            ],
            256,
        );

        match run_ffmpeg(&spawner, null_output("volumedetect"), "ffmpeg (volumedetect)") {
            Err(CoreError::CommandFailed { cmd, stderr, .. }) => {
                assert_eq!(cmd, "ffmpeg (volumedetect)");
                assert_eq!(stderr, "clip.wav: Invalid data found");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }
}
