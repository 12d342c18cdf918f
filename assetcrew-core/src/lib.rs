//! Core library for the assetcrew game asset pipeline.
//!
//! This crate provides the asset tools the agents call (responsive image
//! variants, budgeted image compression, audio normalization, audio sprites,
//! repository sync) along with the agent roster, task catalogue and the crew
//! that dispatches tasks to an external agent runtime.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use assetcrew_core::AssetConfig;
//! use assetcrew_core::audio::build_sprite;
//! use assetcrew_core::external::{CrateFfprobeExecutor, SidecarSpawner};
//! use std::path::PathBuf;
//!
//! let config = AssetConfig::from_env();
//! config.ensure_dirs().unwrap();
//!
//! let clips = vec![PathBuf::from("sfx/tap.wav"), PathBuf::from("sfx/game_over.wav")];
//! let sprite = build_sprite(&SidecarSpawner, &CrateFfprobeExecutor::new(), &config, &clips).unwrap();
//!
//! for (id, cue) in sprite.cue_map.iter() {
//!     println!("{id}: {:.2}s +{:.2}s", cue.offset(), cue.duration());
//! }
//! ```

pub mod audio;
pub mod config;
pub mod error;
pub mod external;
pub mod imaging;
pub mod logging;
pub mod orchestration;
pub mod sync;
pub mod temp_files;
pub mod utils;

// Re-exports for public API
pub use audio::{AudioSprite, Cue, CueMap, NormalizedAudio, build_sprite, normalize_clip};
pub use config::{AssetConfig, AssetConfigBuilder};
pub use error::{CoreError, CoreResult};
pub use external::check_dependency;
pub use imaging::{CompressedImage, ImageCodec, compress_image, generate_responsive_variants};
pub use orchestration::{
    AgentKind, AgentProfile, Crew, CrewSummary, DryRunDispatcher, TaskDescriptor,
    TaskDispatcher, Toolbox,
};
pub use sync::{SyncStatus, sync_repository};
pub use utils::format_bytes;
