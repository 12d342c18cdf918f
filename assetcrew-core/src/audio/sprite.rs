// ============================================================================
// assetcrew-core/src/audio/sprite.rs
// ============================================================================
//
// AUDIO SPRITE: Concatenate Clips Into One Vorbis File Plus a Cue Map
//
// Clips are probed for their duration in argument order, laid end to end in a
// cue map, then joined with ffmpeg's concat demuxer. The sprite and its JSON
// sidecar share a random 32-character hex id as their file stem.
//
// KEY COMPONENTS:
// - AudioSprite: paths and cue map of a built sprite
// - build_sprite: probe, concat, write sidecar
// - concat_entry: one line of an ffmpeg concat list

use crate::audio::cue_map::CueMap;
use crate::config::AssetConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor, run_ffmpeg};
use crate::temp_files::{create_temp_file, random_hex_id};
use crate::utils::file_stem;

use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, info};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A sprite written to the audio directory.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSprite {
    /// 32 lowercase hex characters
    pub id: String,
    pub sprite_path: PathBuf,
    pub cue_map_path: PathBuf,
    pub cue_map: CueMap,
}

/// Builds `<audio_dir>/<id>.ogg` and `<audio_dir>/<id>.json` from `clips`.
///
/// Needs at least two clips. Clip ids in the cue map are file stems and must
/// be unique.
pub fn build_sprite<S, P>(
    spawner: &S,
    probe: &P,
    config: &AssetConfig,
    clips: &[PathBuf],
) -> CoreResult<AudioSprite>
where
    S: FfmpegSpawner,
    P: FfprobeExecutor,
{
    if clips.len() < 2 {
        return Err(CoreError::InvalidInput(format!(
            "An audio sprite needs at least two clips, got {}",
            clips.len()
        )));
    }

    let mut cue_map = CueMap::new();
    for clip in clips {
        let duration = probe.get_duration(clip).map_err(|e| {
            CoreError::FfprobeParse(format!("{}: {}", clip.display(), e))
        })?;
        let cue = cue_map.push(file_stem(clip)?, duration)?;
        debug!(
            "Cue {} at {:.3}s for {:.3}s",
            clip.display(),
            cue.offset(),
            cue.duration()
        );
    }

    std::fs::create_dir_all(&config.audio_dir)?;
    let id = random_hex_id();
    let sprite_path = config.audio_dir.join(format!("{id}.ogg"));
    let cue_map_path = config.audio_dir.join(format!("{id}.json"));

    // Removed when dropped at the end of this function
    let mut list_file = create_temp_file(&config.audio_dir, "concat", "txt")?;
    for clip in clips {
        writeln!(list_file, "{}", concat_entry(clip)?)?;
    }
    list_file.flush()?;

    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.args(["-f", "concat", "-safe", "0"]);
    cmd.input(list_file.path().to_string_lossy().as_ref());
    cmd.arg("-vn");
    cmd.args(["-c:a", "libvorbis"]);
    cmd.output(sprite_path.to_string_lossy().as_ref());
    run_ffmpeg(spawner, cmd, "ffmpeg (sprite concat)")?;

    cue_map.write_to(&cue_map_path)?;

    info!(
        "Built audio sprite {} from {} clips ({:.2}s)",
        sprite_path.display(),
        cue_map.len(),
        cue_map.total_duration()
    );

    Ok(AudioSprite {
        id,
        sprite_path,
        cue_map_path,
        cue_map,
    })
}

/// Formats a concat demuxer line: `file '<absolute path>'`.
///
/// Single quotes are closed, escaped, and reopened as the demuxer expects.
pub fn concat_entry(clip: &Path) -> CoreResult<String> {
    let absolute = std::path::absolute(clip)?;
    let escaped = absolute.to_string_lossy().replace('\'', r"'\''");
    Ok(format!("file '{escaped}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::cue_map::Cue;
    use crate::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor};

    fn config_in(dir: &Path) -> AssetConfig {
        AssetConfig::with_asset_dir(dir.join("assets"), dir.to_path_buf())
    }

    #[test]
    fn test_rejects_fewer_than_two_clips() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let spawner = MockFfmpegSpawner::new();
        let probe = MockFfprobeExecutor::new();

        for clips in [vec![], vec![PathBuf::from("a.wav")]] {
            let result = build_sprite(&spawner, &probe, &config, &clips);
            assert!(matches!(result, Err(CoreError::InvalidInput(_))));
        }
        assert!(spawner.get_received_calls().is_empty());
        assert!(!config.audio_dir.exists());
    }

    #[test]
    fn test_builds_contiguous_cue_map() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let clips: Vec<PathBuf> = ["A.wav", "B.wav", "C.wav"]
            .iter()
            .map(|n| tmp.path().join(n))
            .collect();

        let probe = MockFfprobeExecutor::new();
        probe.expect_duration(&clips[0], 2.0);
        probe.expect_duration(&clips[1], 3.5);
        probe.expect_duration(&clips[2], 1.0);
        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("libvorbis", vec![], true);

        let sprite = build_sprite(&spawner, &probe, &config, &clips).unwrap();

        assert_eq!(sprite.id.len(), 32);
        assert_eq!(sprite.sprite_path, config.audio_dir.join(format!("{}.ogg", sprite.id)));
        assert!(sprite.sprite_path.exists());
        assert_eq!(sprite.cue_map.get("A"), Some(&Cue(0.0, 2.0)));
        assert_eq!(sprite.cue_map.get("B"), Some(&Cue(2.0, 3.5)));
        assert_eq!(sprite.cue_map.get("C"), Some(&Cue(5.5, 1.0)));
        assert_eq!(sprite.cue_map.total_duration(), 6.5);

        let on_disk = CueMap::read_from(&sprite.cue_map_path).unwrap();
        assert_eq!(on_disk, sprite.cue_map);

        let calls = spawner.get_received_calls();
        assert_eq!(calls.len(), 1);
        let args = &calls[0];
        assert!(args.windows(2).any(|w| w[0] == "-f" && w[1] == "concat"));
        assert!(args.windows(2).any(|w| w[0] == "-safe" && w[1] == "0"));

        // Only the sprite and its sidecar remain; the concat list is gone
        let mut names: Vec<String> = std::fs::read_dir(&config.audio_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![format!("{}.json", sprite.id), format!("{}.ogg", sprite.id)]);
    }

    #[test]
    fn test_probe_failure_names_clip() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let clips = vec![tmp.path().join("ok.wav"), tmp.path().join("broken.wav")];

        let probe = MockFfprobeExecutor::new();
        probe.expect_duration(&clips[0], 1.0);
        probe.expect_failure(&clips[1], "Invalid data found when processing input");
        let spawner = MockFfmpegSpawner::new();

        match build_sprite(&spawner, &probe, &config, &clips) {
            Err(CoreError::FfprobeParse(msg)) => assert!(msg.contains("broken.wav")),
            other => panic!("Unexpected result: {:?}", other),
        }
        assert!(spawner.get_received_calls().is_empty());
    }

    #[test]
    fn test_duplicate_stems_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_in(tmp.path());
        let clips = vec![tmp.path().join("sfx/tap.wav"), tmp.path().join("ui/tap.ogg")];

        let probe = MockFfprobeExecutor::new();
        probe.expect_duration(&clips[0], 0.2);
        probe.expect_duration(&clips[1], 0.3);

        let result = build_sprite(&MockFfmpegSpawner::new(), &probe, &config, &clips);
        assert!(matches!(result, Err(CoreError::InvalidInput(msg)) if msg.contains("tap")));
    }

    #[test]
    fn test_concat_entry_escapes_quotes() {
        let entry = concat_entry(Path::new("/sfx/it's.wav")).unwrap();
        assert_eq!(entry, r"file '/sfx/it'\''s.wav'");
    }
}
