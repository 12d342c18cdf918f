//! Temporary file management and identifier helpers.
//!
//! Temporary files lean on the tempfile crate so they are removed when the
//! guard drops, including on error paths.

use crate::error::CoreResult;
use std::path::Path;
use tempfile::{Builder as TempFileBuilder, NamedTempFile};

/// Creates a temporary file with prefix and extension. Auto-deleted when dropped.
pub fn create_temp_file(dir: &Path, prefix: &str, extension: &str) -> CoreResult<NamedTempFile> {
    std::fs::create_dir_all(dir)?;
    let temp_file = TempFileBuilder::new()
        .prefix(&format!("{prefix}_"))
        .suffix(&format!(".{extension}"))
        .tempfile_in(dir)?;

    Ok(temp_file)
}

/// Returns a random 128-bit identifier as 32 lowercase hex characters.
pub fn random_hex_id() -> String {
    format!("{:032x}", rand::random::<u128>())
}
