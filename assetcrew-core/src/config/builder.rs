// ============================================================================
// assetcrew-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for AssetConfig
//
// Provides a fluent API for creating AssetConfig instances. Only the values
// that differ from the defaults need to be set; the image and audio
// directories are derived from the asset root unless overridden.
//
// Environment overrides are read here and nowhere else. Callers with their
// own overrides (command-line flags) start from `from_env` and set on top.

use std::path::PathBuf;

use super::{
    ASSET_DIR_ENV, AUDIO_SUBDIR, AssetConfig, DEFAULT_ASSET_DIR, DEFAULT_IMAGE_MODEL,
    IMAGE_MODEL_ENV, IMAGES_SUBDIR, REPO_ROOT_ENV,
};

/// Builder for creating AssetConfig instances.
#[derive(Debug, Clone, Default)]
pub struct AssetConfigBuilder {
    asset_dir: Option<PathBuf>,
    images_dir: Option<PathBuf>,
    audio_dir: Option<PathBuf>,
    repo_root: Option<PathBuf>,
    image_model: Option<String>,
}

impl AssetConfigBuilder {
    /// Creates a new builder with every value unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from the `ASSETCREW_ASSET_DIR`, `ASSETCREW_REPO_ROOT` and
    /// `IMAGE_MODEL` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable lookup.
    /// Unset and blank values are ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            asset_dir: non_empty(ASSET_DIR_ENV).map(PathBuf::from),
            repo_root: non_empty(REPO_ROOT_ENV).map(PathBuf::from),
            image_model: non_empty(IMAGE_MODEL_ENV),
            ..Self::default()
        }
    }

    /// Sets the asset root directory.
    pub fn asset_dir(mut self, asset_dir: PathBuf) -> Self {
        self.asset_dir = Some(asset_dir);
        self
    }

    /// Overrides the image output directory.
    pub fn images_dir(mut self, images_dir: PathBuf) -> Self {
        self.images_dir = Some(images_dir);
        self
    }

    /// Overrides the audio output directory.
    pub fn audio_dir(mut self, audio_dir: PathBuf) -> Self {
        self.audio_dir = Some(audio_dir);
        self
    }

    /// Sets the repository root used by the sync tool.
    pub fn repo_root(mut self, repo_root: PathBuf) -> Self {
        self.repo_root = Some(repo_root);
        self
    }

    /// Sets the image generation model identifier.
    pub fn image_model(mut self, image_model: impl Into<String>) -> Self {
        self.image_model = Some(image_model.into());
        self
    }

    /// Builds the configuration, deriving unset directories from the asset root.
    pub fn build(self) -> AssetConfig {
        let asset_dir = self
            .asset_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR));

        AssetConfig {
            images_dir: self
                .images_dir
                .unwrap_or_else(|| asset_dir.join(IMAGES_SUBDIR)),
            audio_dir: self.audio_dir.unwrap_or_else(|| asset_dir.join(AUDIO_SUBDIR)),
            asset_dir,
            repo_root: self.repo_root.unwrap_or_else(|| PathBuf::from(".")),
            image_model: self
                .image_model
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
        }
    }
}
