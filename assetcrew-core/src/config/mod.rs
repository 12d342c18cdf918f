//! Configuration structures and constants for the assetcrew-core library.
//!
//! Output directories are explicit configuration handed to every tool rather
//! than process-wide state. The defaults mirror the layout the web game
//! expects: `assets/images/` and `assets/audio/` under the repository root.

mod builder;

use std::path::{Path, PathBuf};

use crate::error::CoreResult;

pub use builder::AssetConfigBuilder;

// Default constants

/// Root directory for generated media, relative to the working directory.
pub const DEFAULT_ASSET_DIR: &str = "assets";

/// Subdirectory of the asset root receiving images.
pub const IMAGES_SUBDIR: &str = "images";

/// Subdirectory of the asset root receiving audio.
pub const AUDIO_SUBDIR: &str = "audio";

/// Default maximum width (pixels) for responsive image variants.
pub const DEFAULT_MAX_WIDTH: u32 = 1024;

/// Default compressed image budget in KiB.
pub const DEFAULT_TARGET_SIZE_KB: u64 = 200;

/// Default loudness target. Measured against mean level, not true LUFS.
pub const DEFAULT_TARGET_LUFS: f64 = -14.0;

/// Default commit message used by the repository sync tool.
pub const DEFAULT_COMMIT_MESSAGE: &str = "asset-update";

/// Image generation backend used when `IMAGE_MODEL` is unset.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-2";

/// Default dispatch rate limit for the crew pipeline (tasks per minute).
pub const DEFAULT_MAX_RPM: u32 = 3;

/// Environment variable selecting the image generation model.
pub const IMAGE_MODEL_ENV: &str = "IMAGE_MODEL";

/// Environment variable overriding the asset root directory.
pub const ASSET_DIR_ENV: &str = "ASSETCREW_ASSET_DIR";

/// Environment variable overriding the repository root used for git sync.
pub const REPO_ROOT_ENV: &str = "ASSETCREW_REPO_ROOT";

/// Main configuration structure for the assetcrew-core library.
///
/// # Examples
///
/// ```rust
/// use assetcrew_core::config::AssetConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = AssetConfigBuilder::new()
///     .asset_dir(PathBuf::from("/tmp/game/assets"))
///     .repo_root(PathBuf::from("/tmp/game"))
///     .image_model("dall-e-3")
///     .build();
///
/// assert_eq!(config.images_dir, PathBuf::from("/tmp/game/assets/images"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AssetConfig {
    /// Root directory for all generated media
    pub asset_dir: PathBuf,

    /// Directory receiving responsive image variants
    pub images_dir: PathBuf,

    /// Directory receiving normalized clips and audio sprites
    pub audio_dir: PathBuf,

    /// Working tree staged and committed by the sync tool
    pub repo_root: PathBuf,

    /// Model identifier passed to the image generation backend
    pub image_model: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::with_asset_dir(PathBuf::from(DEFAULT_ASSET_DIR), PathBuf::from("."))
    }
}

impl AssetConfig {
    /// Creates a configuration rooted at `asset_dir` with the standard
    /// `images/` and `audio/` subdirectories.
    pub fn with_asset_dir(asset_dir: PathBuf, repo_root: PathBuf) -> Self {
        Self {
            images_dir: asset_dir.join(IMAGES_SUBDIR),
            audio_dir: asset_dir.join(AUDIO_SUBDIR),
            asset_dir,
            repo_root,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Self {
        AssetConfigBuilder::from_env().build()
    }

    /// Reads overrides through `lookup`, falling back to defaults for unset or
    /// empty values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        AssetConfigBuilder::from_lookup(lookup).build()
    }

    /// Creates the image and audio directories if they do not exist yet.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        ensure_dir(&self.images_dir)?;
        ensure_dir(&self.audio_dir)?;
        Ok(())
    }
}

fn ensure_dir(dir: &Path) -> CoreResult<()> {
    if !dir.exists() {
        log::debug!("Creating directory {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}
