// assetcrew-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use assetcrew_core::config::{
    DEFAULT_COMMIT_MESSAGE, DEFAULT_MAX_RPM, DEFAULT_MAX_WIDTH, DEFAULT_TARGET_LUFS,
    DEFAULT_TARGET_SIZE_KB,
};
use assetcrew_core::{AssetConfig, AssetConfigBuilder};
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "assetcrew: game asset pipeline",
    long_about = "Generates, processes and commits image and audio assets for a web game."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write a plain-text run log into this directory
    #[arg(long, global = true, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Root directory for generated media [env: ASSETCREW_ASSET_DIR]
    #[arg(long, global = true, value_name = "DIR")]
    pub asset_dir: Option<PathBuf>,

    /// Repository committed by `sync` and the integration agent [env: ASSETCREW_REPO_ROOT]
    #[arg(long, global = true, value_name = "DIR")]
    pub repo_root: Option<PathBuf>,

    /// Model used by the image generation tool [env: IMAGE_MODEL]
    #[arg(long, global = true, value_name = "MODEL", value_parser = NonEmptyStringValueParser::new())]
    pub image_model: Option<String>,
}

impl GlobalArgs {
    /// Environment configuration with the flags given on the command line on top.
    pub fn asset_config(&self) -> AssetConfig {
        self.apply(AssetConfigBuilder::from_env())
    }

    fn apply(&self, mut builder: AssetConfigBuilder) -> AssetConfig {
        if let Some(dir) = &self.asset_dir {
            builder = builder.asset_dir(dir.clone());
        }
        if let Some(root) = &self.repo_root {
            builder = builder.repo_root(root.clone());
        }
        if let Some(model) = &self.image_model {
            builder = builder.image_model(model.as_str());
        }
        builder.build()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create 16:9, 3:2 and 1:1 variants of an image
    Responsive(ResponsiveArgs),
    /// Re-encode an image as AVIF or WebP under a size budget
    Compress(CompressArgs),
    /// Normalize a clip's level, trim silence, export OGG + MP3
    Normalize(NormalizeArgs),
    /// Concatenate clips into one OGG sprite with a JSON cue map
    Sprite(SpriteArgs),
    /// Stage, commit and push the repository
    Sync(SyncArgs),
    /// List the agents and tasks of the crew
    Plan(PlanArgs),
    /// Dry-run the crew: dispatch every task without calling a model
    Run(RunArgs),
    /// Run a registered tool with JSON arguments
    Tool(ToolArgs),
    /// Check that ffmpeg, ffprobe and git are installed
    Doctor,
}

impl Commands {
    /// Short name used in run log file names.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Responsive(_) => "responsive",
            Commands::Compress(_) => "compress",
            Commands::Normalize(_) => "normalize",
            Commands::Sprite(_) => "sprite",
            Commands::Sync(_) => "sync",
            Commands::Plan(_) => "plan",
            Commands::Run(_) => "run",
            Commands::Tool(_) => "tool",
            Commands::Doctor => "doctor",
        }
    }
}

#[derive(Args, Debug)]
pub struct ResponsiveArgs {
    /// Source image
    #[arg(value_name = "IMAGE")]
    pub source: PathBuf,

    /// Width of every variant in pixels
    #[arg(long, default_value_t = DEFAULT_MAX_WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_width: u32,
}

#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Source image
    #[arg(value_name = "IMAGE")]
    pub source: PathBuf,

    /// Target codec: AVIF or WEBP
    #[arg(short, long, default_value = "AVIF")]
    pub format: String,

    /// Size budget in KiB
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE_KB)]
    pub target_size_kb: u64,
}

#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Source clip (any format ffmpeg reads)
    #[arg(value_name = "CLIP")]
    pub source: PathBuf,

    /// Target mean level
    #[arg(long, default_value_t = DEFAULT_TARGET_LUFS, allow_negative_numbers = true)]
    pub target_lufs: f64,
}

#[derive(Args, Debug)]
pub struct SpriteArgs {
    /// Clips in playback order (at least two)
    #[arg(value_name = "CLIP", required = true)]
    pub clips: Vec<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Commit message
    #[arg(short, long, default_value_t = DEFAULT_COMMIT_MESSAGE.to_string())]
    pub message: String,
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Dispatches allowed per minute (0 disables throttling)
    #[arg(long, default_value_t = DEFAULT_MAX_RPM)]
    pub max_rpm: u32,
}

#[derive(Args, Debug)]
pub struct ToolArgs {
    /// Registered tool name, e.g. image_compress_tool; omit to list tools
    #[arg(value_name = "NAME")]
    pub name: Option<String>,

    /// JSON object of tool arguments
    #[arg(long, value_name = "JSON", default_value = "{}")]
    pub args: String,
}
