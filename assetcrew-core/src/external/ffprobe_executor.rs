//! FFprobe integration for media analysis.
//!
//! The sprite builder needs one fact per clip: its container duration. The
//! `ffprobe` crate runs the binary and deserializes its JSON report; this
//! module maps that report and its failure modes onto `CoreError`.

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use ffprobe::{FfProbeError, ffprobe};
use std::path::Path;

/// Trait for querying media properties.
pub trait FfprobeExecutor {
    /// Returns the container duration of `input_path` in seconds.
    fn get_duration(&self, input_path: &Path) -> CoreResult<f64>;
}

/// Concrete implementation of `FfprobeExecutor` using the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn get_duration(&self, input_path: &Path) -> CoreResult<f64> {
        log::debug!(
            "Running ffprobe (via crate) for duration on: {}",
            input_path.display()
        );
        let metadata = ffprobe(input_path).map_err(|err| {
            log::error!("ffprobe failed for {}: {:?}", input_path.display(), err);
            map_ffprobe_error(err, input_path)
        })?;

        let raw = metadata.format.duration.as_deref().ok_or_else(|| {
            CoreError::FfprobeParse(format!(
                "No duration reported for {}",
                input_path.display()
            ))
        })?;

        parse_duration(raw).ok_or_else(|| {
            CoreError::FfprobeParse(format!(
                "Failed to parse duration '{}' for {}",
                raw,
                input_path.display()
            ))
        })
    }
}

/// Parses an ffprobe duration field. Negative, NaN and infinite values are rejected.
pub(crate) fn parse_duration(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
}

fn map_ffprobe_error(err: FfProbeError, input_path: &Path) -> CoreError {
    let context = format!("ffprobe ({})", input_path.display());
    match err {
        FfProbeError::Io(io_err) => command_start_error(context, io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            command_failed_error(context, output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::FfprobeParse(format!("{context} output deserialization: {err}"))
        }
        _ => CoreError::FfprobeParse(format!("Unknown error from {context}: {err:?}")),
    }
}
