//! Static task catalogue: three image tasks, two audio tasks and three
//! integration tasks, run in that order.

use crate::orchestration::agents::AgentKind;
use serde::Serialize;

/// Expected output for tasks that do not name one.
pub const DEFAULT_EXPECTED_OUTPUT: &str = "Path(s) to generated asset(s) or confirmation log.";

/// One unit of work for an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDescriptor {
    pub description: String,
    pub agent: AgentKind,
    pub expected_output: String,
}

impl TaskDescriptor {
    pub fn new(description: &str, agent: AgentKind, expected_output: Option<&str>) -> Self {
        Self {
            description: description.to_string(),
            agent,
            expected_output: expected_output
                .unwrap_or(DEFAULT_EXPECTED_OUTPUT)
                .to_string(),
        }
    }
}

pub fn image_tasks() -> Vec<TaskDescriptor> {
    vec![
        TaskDescriptor::new(
            "Generate startup screen art (logo + title); deliver 1024x1024 plus \
             512x512 & 256x256 versions.",
            AgentKind::Image,
            Some("assets/images/startup_{1024,512,256}.png"),
        ),
        TaskDescriptor::new(
            "Produce sprite-sheet for main character (4x4 frames, 128 px cells).",
            AgentKind::Image,
            Some("assets/images/sprites/main_character.png"),
        ),
        TaskDescriptor::new(
            "Generate button/icon pack (play, settings, help) on transparent PNG.",
            AgentKind::Image,
            Some("assets/images/icons/*.png"),
        ),
    ]
}

pub fn audio_tasks() -> Vec<TaskDescriptor> {
    vec![
        TaskDescriptor::new(
            "Find a chiptune loop (CC0/CC-BY) and prep 30-second OGG, -14 LUFS.",
            AgentKind::Audio,
            Some("assets/audio/bgm/chiptune_loop.ogg"),
        ),
        TaskDescriptor::new(
            "Create or fetch 'tap' and 'game-over' SFX (<15 KB each).",
            AgentKind::Audio,
            Some("assets/audio/sfx/{tap,game_over}.ogg"),
        ),
    ]
}

pub fn integration_tasks() -> Vec<TaskDescriptor> {
    vec![
        TaskDescriptor::new(
            "Compress images to WebP/AVIF, generate <picture> srcset snippets, \
             and update CSS media queries (16:9, 3:2, 1:1).",
            AgentKind::Integration,
            Some("index.html updated with responsive <picture> tags"),
        ),
        TaskDescriptor::new(
            "Add JS to preload audio, expose playSound(id), and wire events in game.js.",
            AgentKind::Integration,
            Some("game.js updated with preloadAudio() helper"),
        ),
        TaskDescriptor::new(
            "Generate docs/asset_catalog.md with thumbnails and licence info plus \
             assets_manifest.json.",
            AgentKind::Integration,
            Some("docs/asset_catalog.md + assets_manifest.json"),
        ),
    ]
}

/// Image, then audio, then integration tasks.
pub fn all_tasks() -> Vec<TaskDescriptor> {
    let mut tasks = image_tasks();
    tasks.extend(audio_tasks());
    tasks.extend(integration_tasks());
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_shape() {
        let tasks = all_tasks();
        assert_eq!(tasks.len(), 8);
        let kinds: Vec<AgentKind> = tasks.iter().map(|t| t.agent).collect();
        assert_eq!(&kinds[..3], &[AgentKind::Image; 3]);
        assert_eq!(&kinds[3..5], &[AgentKind::Audio; 2]);
        assert_eq!(&kinds[5..], &[AgentKind::Integration; 3]);
        assert!(tasks.iter().all(|t| !t.expected_output.is_empty()));
    }

    #[test]
    fn test_default_expected_output() {
        let task = TaskDescriptor::new("Tidy up", AgentKind::Audio, None);
        assert_eq!(task.expected_output, DEFAULT_EXPECTED_OUTPUT);
    }
}
