// assetcrew-cli/src/error.rs
//
// Commands report failures as `CoreError`. When a core call fails the command
// prefixes the message with the step it was running, so the user sees
// "Normalizing tap.wav: ffmpeg (volumedetect) failed ..." rather than the
// bare ffmpeg error.

use assetcrew_core::{CoreError, CoreResult};
use std::fmt::Display;

pub type CliResult<T> = CoreResult<T>;

/// Prefixes a failed result with the step that produced it.
pub trait CliErrorContext<T> {
    fn cli_context(self, step: impl Display) -> CliResult<T>;

    /// Builds the step description only on failure.
    fn cli_with_context<D: Display>(self, step: impl FnOnce() -> D) -> CliResult<T>;
}

impl<T, E: Into<CoreError>> CliErrorContext<T> for Result<T, E> {
    fn cli_context(self, step: impl Display) -> CliResult<T> {
        self.cli_with_context(|| step)
    }

    fn cli_with_context<D: Display>(self, step: impl FnOnce() -> D) -> CliResult<T> {
        self.map_err(|e| CoreError::OperationFailed(format!("{}: {}", step(), e.into())))
    }
}
