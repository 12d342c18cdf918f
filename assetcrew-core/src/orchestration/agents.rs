//! Agent roster handed to the orchestration runtime.

use crate::config::AssetConfig;
use serde::Serialize;
use std::fmt;

/// The three agents of the asset crew.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Image,
    Audio,
    Integration,
}

impl AgentKind {
    pub const ALL: [AgentKind; 3] = [AgentKind::Image, AgentKind::Audio, AgentKind::Integration];
}

impl fmt::Display for AgentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgentKind::Image => "image",
            AgentKind::Audio => "audio",
            AgentKind::Integration => "integration",
        };
        write!(f, "{label}")
    }
}

/// A tool an agent may call.
///
/// The asset tools are implemented in this crate (see
/// [`Toolbox`](super::Toolbox)); the rest are supplied by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolRef {
    ImageGeneration { model: String },
    ImageResponsive,
    ImageCompress,
    AudioNormalize,
    AudioSprite,
    GitOps,
    FileRead,
    FileWriter,
    CodeInterpreter,
}

impl ToolRef {
    /// Name the tool is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            ToolRef::ImageGeneration { .. } => "image_generation_tool",
            ToolRef::ImageResponsive => "image_responsive_tool",
            ToolRef::ImageCompress => "image_compress_tool",
            ToolRef::AudioNormalize => "audio_normalize_tool",
            ToolRef::AudioSprite => "audio_sprite_tool",
            ToolRef::GitOps => "git_ops_tool",
            ToolRef::FileRead => "file_read_tool",
            ToolRef::FileWriter => "file_writer_tool",
            ToolRef::CodeInterpreter => "code_interpreter_tool",
        }
    }

    /// True for tools this crate implements.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ToolRef::ImageResponsive
                | ToolRef::ImageCompress
                | ToolRef::AudioNormalize
                | ToolRef::AudioSprite
                | ToolRef::GitOps
        )
    }
}

impl fmt::Display for ToolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolRef::ImageGeneration { model } => write!(f, "{} ({})", self.name(), model),
            _ => write!(f, "{}", self.name()),
        }
    }
}

/// Everything the runtime needs to instantiate one agent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentProfile {
    pub kind: AgentKind,
    pub name: String,
    pub role: String,
    pub goal: String,
    pub backstory: String,
    pub tools: Vec<ToolRef>,
    pub allow_code_execution: bool,
}

impl AgentProfile {
    /// Builds the profile for `kind`. The image agent's generation tool uses
    /// `config.image_model`.
    pub fn for_kind(kind: AgentKind, config: &AssetConfig) -> Self {
        match kind {
            AgentKind::Image => Self {
                kind,
                name: "ImageAssetAgent".to_string(),
                role: "16-bit Pixel-Artist & UI Designer".to_string(),
                goal: "Generate cohesive retro-pixel art (sprite-sheets, UI, backgrounds) \
                       in multiple resolutions (<200 KB each) and store under assets/images/."
                    .to_string(),
                backstory: "Veteran game artist experienced in SNES-era aesthetics, fluent in \
                            Stable-Diffusion via ComfyUI and DALL-E 3."
                    .to_string(),
                tools: vec![
                    ToolRef::ImageGeneration {
                        model: config.image_model.clone(),
                    },
                    ToolRef::ImageResponsive,
                    ToolRef::ImageCompress,
                    ToolRef::FileWriter,
                ],
                allow_code_execution: false,
            },
            AgentKind::Audio => Self {
                kind,
                name: "AudioAssetAgent".to_string(),
                role: "Indie Sound Designer & Mastering Engineer".to_string(),
                goal: "Source CC0/CC-BY background loops & SFX, normalise to -14 LUFS, \
                       export OGG+MP3, and deposit in assets/audio/."
                    .to_string(),
                backstory: "Curates lo-fi chiptune tracks and synthesises retro SFX.".to_string(),
                tools: vec![ToolRef::AudioNormalize, ToolRef::AudioSprite, ToolRef::FileWriter],
                allow_code_execution: false,
            },
            AgentKind::Integration => Self {
                kind,
                name: "AssetIntegrationAgent".to_string(),
                role: "Front-End Build Engineer & Release Bot".to_string(),
                goal: "Integrate visual & audio assets into HTML/CSS/JS with responsive \
                       images, lazy loading, touch-friendly UI, and update docs/manifests."
                    .to_string(),
                backstory: "Automates asset pipelines and pushes commits to Git.".to_string(),
                tools: vec![
                    ToolRef::FileRead,
                    ToolRef::FileWriter,
                    ToolRef::CodeInterpreter,
                    ToolRef::GitOps,
                ],
                allow_code_execution: true,
            },
        }
    }

    /// Tool names, in the order the agent lists them.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(ToolRef::name).collect()
    }
}

/// The image, audio and integration agents, in that order.
pub fn roster(config: &AssetConfig) -> Vec<AgentProfile> {
    AgentKind::ALL
        .iter()
        .map(|kind| AgentProfile::for_kind(*kind, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_order_and_tools() {
        let config = AssetConfig::default();
        let agents = roster(&config);

        let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["ImageAssetAgent", "AudioAssetAgent", "AssetIntegrationAgent"]);
        assert_eq!(
            agents[1].tool_names(),
            ["audio_normalize_tool", "audio_sprite_tool", "file_writer_tool"]
        );
        assert!(agents[2].allow_code_execution);
        assert!(!agents[0].allow_code_execution);
    }

    #[test]
    fn test_image_agent_uses_configured_model() {
        let config = AssetConfig {
            image_model: "dall-e-3".to_string(),
            ..AssetConfig::default()
        };
        let agent = AgentProfile::for_kind(AgentKind::Image, &config);
        assert_eq!(
            agent.tools[0],
            ToolRef::ImageGeneration {
                model: "dall-e-3".to_string()
            }
        );
        assert_eq!(agent.tools[0].to_string(), "image_generation_tool (dall-e-3)");
        assert!(!agent.tools[0].is_local());
        assert!(agent.tools[1].is_local());
    }
}
