// ============================================================================
// assetcrew-core/src/audio/normalize.rs
// ============================================================================
//
// AUDIO NORMALIZATION: Level Matching, Silence Trimming, Dual Export
//
// The clip's mean level is measured with ffmpeg's volumedetect filter and a
// flat gain brings it to the target. Mean level stands in for integrated
// loudness here; the target is named in LUFS but compared against dBFS.
//
// Silence is found in a second pass over the gained signal with
// silencedetect, which only reports quiet stretches of at least
// SILENCE_MIN_DURATION_SECS. A run touching the start of the clip and a run
// reaching its end are cut with atrim; quiet stretches in the middle and
// anything shorter than the minimum stay. The result is exported twice:
// Vorbis for browsers that take it, MP3 for the rest.
//
// KEY COMPONENTS:
// - measure_mean_volume / parse_mean_volume: volumedetect analysis
// - detect_silence / parse_silence_runs / trim_window: edge silence
// - build_filter_chain: gain + atrim filter graph
// - normalize_clip: both analyses followed by the two exports

use crate::config::AssetConfig;
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, run_ffmpeg, run_ffmpeg_report};
use crate::utils::file_stem;

use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Minimum length of silence removed at either end, in seconds.
pub const SILENCE_MIN_DURATION_SECS: f64 = 0.2;

/// Level below which audio counts as silence, in dBFS.
pub const SILENCE_THRESHOLD_DB: f64 = -40.0;

/// Slack when deciding whether a run touches the start or end of the clip.
const EDGE_TOLERANCE_SECS: f64 = 0.01;

/// Vorbis export bitrate.
pub const OGG_BITRATE: &str = "96k";

/// MP3 export bitrate.
pub const MP3_BITRATE: &str = "128k";

/// A stretch of silence reported by silencedetect, in seconds.
///
/// `end` is `None` when ffmpeg hit end of input before the silence ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SilenceRun {
    pub start: f64,
    pub end: Option<f64>,
}

/// Part of a clip kept after edge trimming, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimWindow {
    pub start: f64,
    /// `None` keeps everything up to the end of the clip
    pub end: Option<f64>,
}

impl TrimWindow {
    /// The whole clip.
    pub const FULL: TrimWindow = TrimWindow {
        start: 0.0,
        end: None,
    };

    pub fn is_full(&self) -> bool {
        self.start <= 0.0 && self.end.is_none()
    }
}

/// Files written by [`normalize_clip`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAudio {
    /// Primary output
    pub ogg_path: PathBuf,
    pub mp3_path: PathBuf,
    /// Mean level of the source in dBFS
    pub measured_db: f64,
    /// Gain applied in dB
    pub gain_db: f64,
    pub kept: TrimWindow,
}

/// Extracts `mean_volume` from volumedetect log lines.
///
/// ffmpeg prints e.g. `[Parsed_volumedetect_0 @ 0x...] mean_volume: -23.4 dB`.
/// Digital silence reports `-inf`, which is rejected.
pub fn parse_mean_volume<S: AsRef<str>>(lines: &[S]) -> CoreResult<f64> {
    let raw = lines
        .iter()
        .find_map(|line| {
            let line = line.as_ref();
            let (_, rest) = line.split_once("mean_volume:")?;
            Some(rest.trim().trim_end_matches("dB").trim().to_string())
        })
        .ok_or_else(|| {
            CoreError::AudioAnalysis("volumedetect reported no mean_volume".to_string())
        })?;

    let value: f64 = raw.parse().map_err(|_| {
        CoreError::AudioAnalysis(format!("Unparseable mean_volume '{raw}'"))
    })?;
    if !value.is_finite() {
        return Err(CoreError::AudioAnalysis(format!(
            "mean_volume is {raw}; the clip is silent"
        )));
    }
    Ok(value)
}

/// Measures the mean level of `source` in dBFS.
pub fn measure_mean_volume<S: FfmpegSpawner>(spawner: &S, source: &Path) -> CoreResult<f64> {
    let mut cmd = FfmpegCommand::new();
    cmd.input(source.to_string_lossy().as_ref());
    cmd.args(["-af", "volumedetect"]);
    cmd.args(["-vn", "-sn", "-dn"]);
    cmd.args(["-f", "null"]);
    cmd.output("-");

    let lines = run_ffmpeg(spawner, cmd, "ffmpeg (volumedetect)")?;
    let mean = parse_mean_volume(lines.as_slice())?;
    debug!("Mean volume of {}: {:.2} dB", source.display(), mean);
    Ok(mean)
}

/// Collects silence runs from silencedetect log lines.
///
/// ffmpeg prints `[silencedetect @ 0x...] silence_start: 1.2` and later
/// `[silencedetect @ 0x...] silence_end: 1.5 | silence_duration: 0.3`.
pub fn parse_silence_runs<S: AsRef<str>>(lines: &[S]) -> CoreResult<Vec<SilenceRun>> {
    let mut runs: Vec<SilenceRun> = Vec::new();
    for line in lines {
        let line = line.as_ref();
        if let Some((_, rest)) = line.split_once("silence_start:") {
            let start = parse_seconds(rest, "silence_start")?;
            runs.push(SilenceRun {
                start: start.max(0.0),
                end: None,
            });
        } else if let Some((_, rest)) = line.split_once("silence_end:") {
            let value = rest.split('|').next().unwrap_or_default();
            let end = parse_seconds(value, "silence_end")?;
            match runs.last_mut() {
                Some(run) if run.end.is_none() => run.end = Some(end),
                _ => debug!("Ignoring silence_end without a matching start: {}", line),
            }
        }
    }
    Ok(runs)
}

fn parse_seconds(raw: &str, field: &str) -> CoreResult<f64> {
    let raw = raw.trim();
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(CoreError::AudioAnalysis(format!("Unparseable {field} '{raw}'"))),
    }
}

/// Decides what survives edge trimming.
///
/// Only a run starting at the beginning and a run reaching the end of the
/// clip are cut. A run reaches the end when it never closed or when it
/// closed at `duration`. A clip that is one silent run is an error.
pub fn trim_window(runs: &[SilenceRun], duration: Option<f64>) -> CoreResult<TrimWindow> {
    let reaches_end = |run: &SilenceRun| match run.end {
        None => true,
        Some(end) => duration.is_some_and(|d| end >= d - EDGE_TOLERANCE_SECS),
    };

    let mut window = TrimWindow::FULL;
    if let Some(first) = runs.first().filter(|run| run.start <= EDGE_TOLERANCE_SECS) {
        match first.end {
            Some(end) if !reaches_end(first) => window.start = end,
            _ => {
                return Err(CoreError::AudioAnalysis(
                    "clip is silent from start to end".to_string(),
                ));
            }
        }
    }
    if let Some(last) = runs.last().filter(|run| reaches_end(*run)) {
        window.end = Some(last.start);
    }

    if let Some(end) = window.end {
        if end - window.start <= EDGE_TOLERANCE_SECS {
            return Err(CoreError::AudioAnalysis(
                "nothing is left after trimming silence".to_string(),
            ));
        }
    }
    Ok(window)
}

/// Finds the edge silence of `source` once `gain_db` is applied.
pub fn detect_silence<S: FfmpegSpawner>(
    spawner: &S,
    source: &Path,
    gain_db: f64,
) -> CoreResult<TrimWindow> {
    let filter = format!(
        "volume={gain_db:.2}dB,silencedetect=noise={}dB:d={}",
        SILENCE_THRESHOLD_DB, SILENCE_MIN_DURATION_SECS
    );
    let mut cmd = FfmpegCommand::new();
    cmd.input(source.to_string_lossy().as_ref());
    cmd.args(["-af", filter.as_str()]);
    cmd.args(["-vn", "-sn", "-dn"]);
    cmd.args(["-f", "null"]);
    cmd.output("-");

    let report = run_ffmpeg_report(spawner, cmd, "ffmpeg (silencedetect)")?;
    let runs = parse_silence_runs(report.log_lines.as_slice())?;
    let window = trim_window(&runs, report.input_duration)?;
    debug!(
        "Silence in {}: {} run(s), keeping {:.3}s..{}",
        source.display(),
        runs.len(),
        window.start,
        window
            .end
            .map_or_else(|| "end".to_string(), |end| format!("{end:.3}s"))
    );
    Ok(window)
}

/// Filter graph applying `gain_db` and cutting the clip to `window`.
pub fn build_filter_chain(gain_db: f64, window: &TrimWindow) -> String {
    let mut filter = format!("volume={gain_db:.2}dB");
    if window.is_full() {
        return filter;
    }
    filter.push_str(&format!(",atrim=start={:.3}", window.start));
    if let Some(end) = window.end {
        filter.push_str(&format!(":end={end:.3}"));
    }
    filter.push_str(",asetpts=PTS-STARTPTS");
    filter
}

/// Normalizes `source` to `target_lufs` and writes `<audio_dir>/<stem>.ogg`
/// and `<audio_dir>/<stem>.mp3`, overwriting existing files.
pub fn normalize_clip<S: FfmpegSpawner>(
    spawner: &S,
    config: &AssetConfig,
    source: &Path,
    target_lufs: f64,
) -> CoreResult<NormalizedAudio> {
    let stem = file_stem(source)?;
    let ogg_path = config.audio_dir.join(format!("{stem}.ogg"));
    let mp3_path = config.audio_dir.join(format!("{stem}.mp3"));

    let source_abs = std::path::absolute(source)?;
    for out in [&ogg_path, &mp3_path] {
        if std::path::absolute(out)? == source_abs {
            return Err(CoreError::InvalidInput(format!(
                "{} would overwrite its own source",
                out.display()
            )));
        }
    }

    let measured_db = measure_mean_volume(spawner, source)?;
    let gain_db = target_lufs - measured_db;
    let kept = detect_silence(spawner, source, gain_db)?;
    let filter = build_filter_chain(gain_db, &kept);
    debug!("Applying {} to {}", filter, source.display());

    std::fs::create_dir_all(&config.audio_dir)?;
    export(spawner, source, &filter, "libvorbis", OGG_BITRATE, &ogg_path)?;
    export(spawner, source, &filter, "libmp3lame", MP3_BITRATE, &mp3_path)?;

    info!(
        "Normalized {} ({:.2} dB -> {:.2}) to {} and {}",
        source.display(),
        measured_db,
        target_lufs,
        ogg_path.display(),
        mp3_path.display()
    );

    Ok(NormalizedAudio {
        ogg_path,
        mp3_path,
        measured_db,
        gain_db,
        kept,
    })
}

fn export<S: FfmpegSpawner>(
    spawner: &S,
    source: &Path,
    filter: &str,
    codec: &str,
    bitrate: &str,
    output: &Path,
) -> CoreResult<()> {
    let mut cmd = FfmpegCommand::new();
    cmd.overwrite();
    cmd.input(source.to_string_lossy().as_ref());
    cmd.arg("-vn");
    cmd.args(["-af", filter]);
    cmd.args(["-c:a", codec]);
    cmd.args(["-b:a", bitrate]);
    cmd.output(output.to_string_lossy().as_ref());

    run_ffmpeg(spawner, cmd, &format!("ffmpeg ({codec} export)"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::mocks::MockFfmpegSpawner;
    use ffmpeg_sidecar::event::{FfmpegDuration, FfmpegEvent, LogLevel};

    fn volumedetect_events(mean: &str) -> Vec<FfmpegEvent> {
        vec![
            FfmpegEvent::Log(
                LogLevel::Info,
                "[Parsed_volumedetect_0 @ 0x5581] n_samples: 88200".to_string(),
            ),
            FfmpegEvent::Log(
                LogLevel::Info,
                format!("[Parsed_volumedetect_0 @ 0x5581] mean_volume: {mean} dB"),
            ),
            FfmpegEvent::Log(
                LogLevel::Info,
                "[Parsed_volumedetect_0 @ 0x5581] max_volume: -3.1 dB".to_string(),
            ),
        ]
    }

    #[test]
    fn test_parse_mean_volume() {
        let lines = ["noise", "[Parsed_volumedetect_0 @ 0x1] mean_volume: -23.4 dB"];
        assert_eq!(parse_mean_volume(&lines).unwrap(), -23.4);
    }

    #[test]
    fn test_parse_mean_volume_missing_or_silent() {
        let none: [&str; 1] = ["Stream #0:0: Audio: pcm_s16le"];
        assert!(matches!(parse_mean_volume(&none), Err(CoreError::AudioAnalysis(_))));

        let silent = ["[Parsed_volumedetect_0 @ 0x1] mean_volume: -inf dB"];
        assert!(matches!(parse_mean_volume(&silent), Err(CoreError::AudioAnalysis(_))));
    }

    fn silencedetect_events(duration: f64, lines: &[&str]) -> Vec<FfmpegEvent> {
        let mut events = vec![FfmpegEvent::ParsedDuration(FfmpegDuration {
            input_index: 0,
            duration,
            raw_log_message: format!("  Duration: {duration}, start: 0.000000"),
        })];
        events.extend(lines.iter().map(|line| {
            FfmpegEvent::Log(LogLevel::Info, format!("[silencedetect @ 0x55d0] {line}"))
        }));
        events
    }

    fn run(start: f64, end: Option<f64>) -> SilenceRun {
        SilenceRun { start, end }
    }

    #[test]
    fn test_parse_silence_runs() {
        let lines = [
            "[silencedetect @ 0x55d0] silence_start: -0.00136",
            "[silencedetect @ 0x55d0] silence_end: 0.3 | silence_duration: 0.30136",
            "size=N/A time=00:00:01.50 bitrate=N/A speed= 410x",
            "[silencedetect @ 0x55d0] silence_start: 1.2",
        ];
        assert_eq!(
            parse_silence_runs(&lines).unwrap(),
            vec![run(0.0, Some(0.3)), run(1.2, None)]
        );

        let garbled = ["[silencedetect @ 0x55d0] silence_start: nan"];
        assert!(matches!(
            parse_silence_runs(&garbled),
            Err(CoreError::AudioAnalysis(_))
        ));
    }

    #[test]
    fn test_short_clip_without_silence_is_kept_whole() {
        // A 150 ms tap: silencedetect never reports anything shorter than 200 ms
        assert_eq!(trim_window(&[], Some(0.15)).unwrap(), TrimWindow::FULL);
        assert_eq!(trim_window(&[], None).unwrap(), TrimWindow::FULL);
    }

    #[test]
    fn test_leading_silence_over_minimum_is_cut() {
        let window = trim_window(&[run(0.0, Some(0.3))], Some(1.5)).unwrap();
        assert_eq!(window, TrimWindow { start: 0.3, end: None });
    }

    #[test]
    fn test_trailing_silence_is_cut_whether_or_not_it_closed() {
        // Older ffmpeg leaves the last run open, newer ones close it at EOF
        let open = trim_window(&[run(1.2, None)], Some(1.5)).unwrap();
        let closed = trim_window(&[run(1.2, Some(1.5))], Some(1.5)).unwrap();
        assert_eq!(open, TrimWindow { start: 0.0, end: Some(1.2) });
        assert_eq!(closed, open);
    }

    #[test]
    fn test_interior_silence_is_kept() {
        let runs = [run(0.0, Some(0.25)), run(0.6, Some(0.9)), run(1.3, None)];
        let window = trim_window(&runs, Some(1.5)).unwrap();
        assert_eq!(window, TrimWindow { start: 0.25, end: Some(1.3) });

        let middle_only = trim_window(&[run(0.6, Some(0.9))], Some(1.5)).unwrap();
        assert!(middle_only.is_full());
    }

    #[test]
    fn test_all_silent_clip_is_rejected() {
        for runs in [vec![run(0.0, None)], vec![run(0.0, Some(1.5))]] {
            assert!(matches!(
                trim_window(&runs, Some(1.5)),
                Err(CoreError::AudioAnalysis(_))
            ));
        }
    }

    #[test]
    fn test_filter_chain() {
        assert_eq!(build_filter_chain(6.0, &TrimWindow::FULL), "volume=6.00dB");
        assert_eq!(
            build_filter_chain(-2.345, &TrimWindow { start: 0.3, end: Some(1.2) }),
            "volume=-2.35dB,atrim=start=0.300:end=1.200,asetpts=PTS-STARTPTS"
        );
        assert_eq!(
            build_filter_chain(0.0, &TrimWindow { start: 0.3, end: None }),
            "volume=0.00dB,atrim=start=0.300,asetpts=PTS-STARTPTS"
        );
    }

    #[test]
    fn test_normalize_clip_applies_gain_and_exports_both() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AssetConfig::with_asset_dir(tmp.path().join("assets"), tmp.path().into());
        let source = tmp.path().join("chiptune_loop.wav");

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("volumedetect", volumedetect_events("-20.0"), false);
        spawner.add_success_expectation(
            "silencedetect",
            silencedetect_events(
                1.5,
                &[
                    "silence_start: 0",
                    "silence_end: 0.3 | silence_duration: 0.3",
                    "silence_start: 1.2",
                ],
            ),
            false,
        );
        spawner.add_success_expectation("libvorbis", vec![], true);
        spawner.add_success_expectation("libmp3lame", vec![], true);

        let result = normalize_clip(&spawner, &config, &source, -14.0).unwrap();

        assert_eq!(result.measured_db, -20.0);
        assert_eq!(result.gain_db, 6.0);
        assert_eq!(result.kept, TrimWindow { start: 0.3, end: Some(1.2) });
        assert_eq!(result.ogg_path, config.audio_dir.join("chiptune_loop.ogg"));
        assert_eq!(result.mp3_path, config.audio_dir.join("chiptune_loop.mp3"));
        assert!(result.ogg_path.exists());
        assert!(result.mp3_path.exists());

        let calls = spawner.get_received_calls();
        assert_eq!(calls.len(), 4);
        let has_pair = |args: &[String], a: &str, b: &str| {
            args.windows(2).any(|w| w[0] == a && w[1] == b)
        };
        // Silence is measured on the gained signal
        assert!(has_pair(
            &calls[1],
            "-af",
            "volume=6.00dB,silencedetect=noise=-40dB:d=0.2"
        ));
        let filter = "volume=6.00dB,atrim=start=0.300:end=1.200,asetpts=PTS-STARTPTS";
        assert!(has_pair(&calls[2], "-af", filter));
        assert!(has_pair(&calls[2], "-b:a", OGG_BITRATE));
        assert!(has_pair(&calls[3], "-af", filter));
        assert!(has_pair(&calls[3], "-b:a", MP3_BITRATE));
    }

    #[test]
    fn test_normalize_clip_keeps_clip_without_edge_silence() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AssetConfig::with_asset_dir(tmp.path().join("assets"), tmp.path().into());
        let source = tmp.path().join("tap.wav");

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("volumedetect", volumedetect_events("-14.0"), false);
        spawner.add_success_expectation("silencedetect", silencedetect_events(0.15, &[]), false);
        spawner.add_success_expectation("libvorbis", vec![], true);
        spawner.add_success_expectation("libmp3lame", vec![], true);

        let result = normalize_clip(&spawner, &config, &source, -14.0).unwrap();

        assert!(result.kept.is_full());
        let calls = spawner.get_received_calls();
        assert!(calls[2].iter().any(|a| a == "volume=0.00dB"));
        assert!(!calls[2].iter().any(|a| a.contains("atrim")));
    }

    #[test]
    fn test_normalize_clip_rejects_all_silent_clip() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AssetConfig::with_asset_dir(tmp.path().join("assets"), tmp.path().into());
        let source = tmp.path().join("room_tone.wav");

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("volumedetect", volumedetect_events("-60.0"), false);
        spawner.add_success_expectation(
            "silencedetect",
            silencedetect_events(2.0, &["silence_start: 0"]),
            false,
        );

        let result = normalize_clip(&spawner, &config, &source, -14.0);
        assert!(matches!(result, Err(CoreError::AudioAnalysis(_))));
        assert_eq!(spawner.get_received_calls().len(), 2);
        assert!(!config.audio_dir.join("room_tone.ogg").exists());
    }

    #[test]
    fn test_normalize_clip_stops_when_analysis_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AssetConfig::with_asset_dir(tmp.path().join("assets"), tmp.path().into());
        let source = tmp.path().join("missing.wav");

        let spawner = MockFfmpegSpawner::new();
        spawner.add_exit_error_expectation(
            "volumedetect",
            vec![FfmpegEvent::Error("missing.wav: No such file or directory".to_string())],
            256,
        );

        match normalize_clip(&spawner, &config, &source, -14.0) {
            Err(CoreError::CommandFailed { cmd, stderr, .. }) => {
                assert!(cmd.contains("volumedetect"));
                assert!(stderr.contains("No such file"));
            }
            other => panic!("Unexpected result: {:?}", other),
        }
        assert_eq!(spawner.get_received_calls().len(), 1);
    }

    #[test]
    fn test_normalize_clip_refuses_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AssetConfig::with_asset_dir(tmp.path().join("assets"), tmp.path().into());
        let source = config.audio_dir.join("tap.ogg");

        let result = normalize_clip(&MockFfmpegSpawner::new(), &config, &source, -14.0);
        assert!(matches!(result, Err(CoreError::InvalidInput(_))));
    }
}
