// ============================================================================
// assetcrew-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for assetcrew-core
//
// This module defines the error types used throughout the assetcrew-core
// library. Errors fall into three groups: invalid arguments supplied by the
// caller, failures of external tools (ffmpeg, ffprobe, git), and decode or
// encode failures reported by the codec libraries.
//
// KEY COMPONENTS:
// - CoreError: Main error enum for all library operations
// - CoreResult: Type alias for Result<T, CoreError>
// - Helper constructors for command execution errors

use std::io;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by assetcrew-core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported image format '{0}' (expected AVIF or WEBP)")]
    UnsupportedFormat(String),

    #[error("Required dependency '{0}' not found. Please install it and ensure it's in your PATH.")]
    DependencyNotFound(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Failed while waiting for {0}: {1}")]
    CommandWait(String, #[source] io::Error),

    #[error("{cmd} exited with {status}: {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("ffprobe output error: {0}")]
    FfprobeParse(String),

    #[error("Audio analysis failed: {0}")]
    AudioAnalysis(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown tool '{0}'")]
    ToolNotFound(String),

    #[error("Task dispatch failed: {0}")]
    Dispatch(String),

    #[error("{0}")]
    OperationFailed(String),
}

/// Result type for assetcrew-core operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a process that could not be spawned.
pub fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Builds a `CommandWait` error for a process whose exit could not be collected.
pub fn command_wait_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Builds a `CommandFailed` error for a process that exited unsuccessfully.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}
