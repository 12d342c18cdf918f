// ============================================================================
// assetcrew-core/src/orchestration/tools.rs
// ============================================================================
//
// TOOL REGISTRY: The Asset Tools as Named, JSON-Driven Calls
//
// The runtime calls tools by name with a JSON object of primitive arguments
// and gets a string back. Each tool here deserializes its arguments, calls
// the matching library function and reports the primary path or status.
//
// KEY COMPONENTS:
// - AssetTool: name, description, run(args)
// - ToolOutput: summary string plus every file produced
// - Toolbox: name -> tool registry with the standard backends wired in

use crate::audio::{build_sprite, normalize_clip};
use crate::config::{
    AssetConfig, DEFAULT_COMMIT_MESSAGE, DEFAULT_MAX_WIDTH, DEFAULT_TARGET_LUFS,
    DEFAULT_TARGET_SIZE_KB,
};
use crate::error::{CoreError, CoreResult};
use crate::external::{
    CliGitExecutor, CrateFfprobeExecutor, FfmpegSpawner, FfprobeExecutor, GitExecutor,
    SidecarSpawner,
};
use crate::imaging::{ImageCodec, compress_image, generate_responsive_variants};
use crate::orchestration::agents::ToolRef;
use crate::sync::sync_repository;

use indexmap::IndexMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    /// What the runtime receives: the primary path or a status line
    pub summary: String,
    /// Every file the call wrote
    pub paths: Vec<PathBuf>,
}

impl ToolOutput {
    fn from_paths(paths: Vec<PathBuf>) -> Self {
        let summary = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self { summary, paths }
    }

    fn primary(primary: PathBuf, mut extra: Vec<PathBuf>) -> Self {
        let summary = primary.display().to_string();
        extra.insert(0, primary);
        Self {
            summary,
            paths: extra,
        }
    }
}

impl fmt::Display for ToolOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)
    }
}

/// A tool callable by name with JSON arguments.
pub trait AssetTool {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn run(&self, args: &Value) -> CoreResult<ToolOutput>;
}

fn parse_args<T: DeserializeOwned>(tool: &str, args: &Value) -> CoreResult<T> {
    // Tools without required arguments accept a missing object
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args.clone()
    };
    serde_json::from_value(args)
        .map_err(|e| CoreError::InvalidInput(format!("Bad arguments for {tool}: {e}")))
}

fn default_max_width() -> u32 {
    DEFAULT_MAX_WIDTH
}

fn default_format() -> String {
    "AVIF".to_string()
}

fn default_target_size_kb() -> u64 {
    DEFAULT_TARGET_SIZE_KB
}

fn default_target_lufs() -> f64 {
    DEFAULT_TARGET_LUFS
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResponsiveArgs {
    #[serde(alias = "png_path")]
    source: PathBuf,
    #[serde(default = "default_max_width")]
    max_width: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompressArgs {
    #[serde(alias = "png_path")]
    source: PathBuf,
    #[serde(default = "default_format", alias = "fmt")]
    format: String,
    #[serde(default = "default_target_size_kb")]
    target_size_kb: u64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NormalizeArgs {
    #[serde(alias = "wav_or_mp3_path")]
    source: PathBuf,
    #[serde(default = "default_target_lufs")]
    target_lufs: f64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SpriteArgs {
    paths: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GitOpsArgs {
    #[serde(default = "default_commit_message")]
    commit_message: String,
}

/// `image_responsive_tool`
pub struct ImageResponsiveTool {
    config: AssetConfig,
}

impl ImageResponsiveTool {
    pub fn new(config: AssetConfig) -> Self {
        Self { config }
    }
}

impl AssetTool for ImageResponsiveTool {
    fn name(&self) -> &'static str {
        "image_responsive_tool"
    }

    fn description(&self) -> &'static str {
        "Create three aspect-ratio variants (16:9, 3:2, 1:1) from a source image \
         and return their file paths in that order."
    }

    fn run(&self, args: &Value) -> CoreResult<ToolOutput> {
        let args: ResponsiveArgs = parse_args(self.name(), args)?;
        let paths = generate_responsive_variants(&self.config, &args.source, args.max_width)?;
        Ok(ToolOutput::from_paths(paths))
    }
}

/// `image_compress_tool`
pub struct ImageCompressTool<S> {
    spawner: S,
}

impl<S: FfmpegSpawner> ImageCompressTool<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }
}

impl<S: FfmpegSpawner> AssetTool for ImageCompressTool<S> {
    fn name(&self) -> &'static str {
        "image_compress_tool"
    }

    fn description(&self) -> &'static str {
        "Convert an image to AVIF/WebP under a size budget (default 200 KB) and return the path."
    }

    fn run(&self, args: &Value) -> CoreResult<ToolOutput> {
        let args: CompressArgs = parse_args(self.name(), args)?;
        let codec: ImageCodec = args.format.parse()?;
        let result = compress_image(&self.spawner, &args.source, codec, args.target_size_kb)?;
        Ok(ToolOutput::primary(result.path, Vec::new()))
    }
}

/// `audio_normalize_tool`
pub struct AudioNormalizeTool<S> {
    config: AssetConfig,
    spawner: S,
}

impl<S: FfmpegSpawner> AudioNormalizeTool<S> {
    pub fn new(config: AssetConfig, spawner: S) -> Self {
        Self { config, spawner }
    }
}

impl<S: FfmpegSpawner> AssetTool for AudioNormalizeTool<S> {
    fn name(&self) -> &'static str {
        "audio_normalize_tool"
    }

    fn description(&self) -> &'static str {
        "Loudness-normalize a clip to approx. -14 LUFS, trim silence, export \
         OGG + MP3, and return the path to the OGG file."
    }

    fn run(&self, args: &Value) -> CoreResult<ToolOutput> {
        let args: NormalizeArgs = parse_args(self.name(), args)?;
        let result = normalize_clip(&self.spawner, &self.config, &args.source, args.target_lufs)?;
        Ok(ToolOutput::primary(result.ogg_path, vec![result.mp3_path]))
    }
}

/// `audio_sprite_tool`
pub struct AudioSpriteTool<S, P> {
    config: AssetConfig,
    spawner: S,
    probe: P,
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> AudioSpriteTool<S, P> {
    pub fn new(config: AssetConfig, spawner: S, probe: P) -> Self {
        Self {
            config,
            spawner,
            probe,
        }
    }
}

impl<S: FfmpegSpawner, P: FfprobeExecutor> AssetTool for AudioSpriteTool<S, P> {
    fn name(&self) -> &'static str {
        "audio_sprite_tool"
    }

    fn description(&self) -> &'static str {
        "Combine clips into one OGG and generate a JSON cue map. Expects at \
         least two input paths. Returns the path to the sprite file."
    }

    fn run(&self, args: &Value) -> CoreResult<ToolOutput> {
        let args: SpriteArgs = parse_args(self.name(), args)?;
        let sprite = build_sprite(&self.spawner, &self.probe, &self.config, &args.paths)?;
        Ok(ToolOutput::primary(sprite.sprite_path, vec![sprite.cue_map_path]))
    }
}

/// `git_ops_tool`
pub struct GitOpsTool<G> {
    config: AssetConfig,
    git: G,
}

impl<G: GitExecutor> GitOpsTool<G> {
    pub fn new(config: AssetConfig, git: G) -> Self {
        Self { config, git }
    }
}

impl<G: GitExecutor> AssetTool for GitOpsTool<G> {
    fn name(&self) -> &'static str {
        "git_ops_tool"
    }

    fn description(&self) -> &'static str {
        "Stage modified files, commit with given message, and push (if remote)."
    }

    /// Never fails once arguments parse; git problems are in the summary.
    fn run(&self, args: &Value) -> CoreResult<ToolOutput> {
        let args: GitOpsArgs = parse_args(self.name(), args)?;
        let status = sync_repository(&self.git, &self.config.repo_root, &args.commit_message);
        Ok(ToolOutput {
            summary: status.to_string(),
            paths: Vec::new(),
        })
    }
}

/// Registry of asset tools keyed by name, in registration order.
#[derive(Default)]
pub struct Toolbox {
    tools: IndexMap<&'static str, Box<dyn AssetTool>>,
}

impl Toolbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// All five asset tools backed by ffmpeg-sidecar, the ffprobe crate and
    /// the git CLI.
    pub fn standard(config: &AssetConfig) -> Self {
        Self::with_backends(config, SidecarSpawner, CrateFfprobeExecutor::new(), CliGitExecutor)
    }

    /// All five asset tools over the given backends.
    pub fn with_backends<S, P, G>(config: &AssetConfig, spawner: S, probe: P, git: G) -> Self
    where
        S: FfmpegSpawner + Clone + 'static,
        P: FfprobeExecutor + 'static,
        G: GitExecutor + 'static,
    {
        let mut toolbox = Self::new();
        toolbox.register(ImageResponsiveTool::new(config.clone()));
        toolbox.register(ImageCompressTool::new(spawner.clone()));
        toolbox.register(AudioNormalizeTool::new(config.clone(), spawner.clone()));
        toolbox.register(AudioSpriteTool::new(config.clone(), spawner, probe));
        toolbox.register(GitOpsTool::new(config.clone(), git));
        toolbox
    }

    /// Adds `tool`, replacing any tool registered under the same name.
    pub fn register<T: AssetTool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn AssetTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.keys().copied().collect()
    }

    pub fn tools(&self) -> impl Iterator<Item = &dyn AssetTool> {
        self.tools.values().map(|tool| tool.as_ref())
    }

    /// True when `tool` is one this registry can run.
    pub fn provides(&self, tool: &ToolRef) -> bool {
        self.tools.contains_key(tool.name())
    }

    /// Runs the tool registered as `name`.
    pub fn run(&self, name: &str, args: &Value) -> CoreResult<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| CoreError::ToolNotFound(name.to_string()))?;
        log::debug!("Running tool {} with {}", name, args);
        tool.run(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor, MockGitExecutor};
    use crate::orchestration::agents::roster;
    use serde_json::json;

    fn toolbox_in(
        dir: &std::path::Path,
    ) -> (Toolbox, MockFfmpegSpawner, MockFfprobeExecutor, MockGitExecutor) {
        let config = AssetConfig::with_asset_dir(dir.join("assets"), dir.to_path_buf());
        let spawner = MockFfmpegSpawner::new();
        let probe = MockFfprobeExecutor::new();
        let git = MockGitExecutor::new();
        let toolbox = Toolbox::with_backends(&config, spawner.clone(), probe.clone(), git.clone());
        (toolbox, spawner, probe, git)
    }

    #[test]
    fn test_standard_names_cover_local_agent_tools() {
        let tmp = tempfile::tempdir().unwrap();
        let (toolbox, ..) = toolbox_in(tmp.path());
        assert_eq!(
            toolbox.names(),
            [
                "image_responsive_tool",
                "image_compress_tool",
                "audio_normalize_tool",
                "audio_sprite_tool",
                "git_ops_tool"
            ]
        );

        for agent in roster(&AssetConfig::default()) {
            for tool in &agent.tools {
                assert_eq!(toolbox.provides(tool), tool.is_local(), "{}", tool);
            }
        }
    }

    #[test]
    fn test_unknown_tool() {
        let toolbox = Toolbox::new();
        assert!(matches!(
            toolbox.run("dall_e_tool", &json!({})),
            Err(CoreError::ToolNotFound(name)) if name == "dall_e_tool"
        ));
    }

    #[test]
    fn test_git_ops_defaults_message() {
        let tmp = tempfile::tempdir().unwrap();
        let (toolbox, _, _, git) = toolbox_in(tmp.path());
        git.fail_on("push", "fatal: no remote");

        let out = toolbox.run("git_ops_tool", &Value::Null).unwrap();
        assert_eq!(out.summary, "Committed locally (no remote/push failed).");
        assert_eq!(git.get_received_calls()[1], ["commit", "-m", DEFAULT_COMMIT_MESSAGE]);
    }

    #[test]
    fn test_compress_rejects_unknown_format() {
        let tmp = tempfile::tempdir().unwrap();
        let (toolbox, spawner, ..) = toolbox_in(tmp.path());

        let result = toolbox.run(
            "image_compress_tool",
            &json!({"png_path": "hero.png", "fmt": "gif"}),
        );
        assert!(matches!(result, Err(CoreError::UnsupportedFormat(_))));
        assert!(spawner.get_received_calls().is_empty());
    }

    #[test]
    fn test_sprite_tool_returns_sprite_path_first() {
        let tmp = tempfile::tempdir().unwrap();
        let (toolbox, spawner, probe, _) = toolbox_in(tmp.path());
        let a = tmp.path().join("tap.wav");
        let b = tmp.path().join("game_over.wav");
        probe.expect_duration(&a, 0.25);
        probe.expect_duration(&b, 1.5);
        spawner.add_success_expectation("libvorbis", vec![], true);

        let out = toolbox
            .run("audio_sprite_tool", &json!({"paths": [a, b]}))
            .unwrap();

        assert_eq!(out.paths.len(), 2);
        assert!(out.summary.ends_with(".ogg"));
        assert_eq!(out.summary, out.paths[0].display().to_string());
        assert!(out.paths[1].extension().is_some_and(|e| e == "json"));
    }

    #[test]
    fn test_bad_arguments_are_invalid_input() {
        let tmp = tempfile::tempdir().unwrap();
        let (toolbox, ..) = toolbox_in(tmp.path());
        let result = toolbox.run("audio_normalize_tool", &json!({"target_lufs": -14.0}));
        assert!(matches!(result, Err(CoreError::InvalidInput(msg)) if msg.contains("audio_normalize_tool")));
    }
}
