// assetcrew-cli/src/commands/audio.rs
//
// `normalize` and `sprite`.

use crate::cli::{NormalizeArgs, SpriteArgs};
use crate::error::{CliErrorContext, CliResult};
use crate::output::{print_info, print_section, print_success, spinner};
use assetcrew_core::external::{CrateFfprobeExecutor, SidecarSpawner};
use assetcrew_core::{AssetConfig, build_sprite, normalize_clip};

pub fn run_normalize(config: &AssetConfig, args: NormalizeArgs) -> CliResult<()> {
    print_section("Normalize");
    print_info("Source", args.source.display());
    print_info("Target", format!("{:.1}", args.target_lufs));

    let pb = spinner("Measuring and exporting");
    let result = normalize_clip(&SidecarSpawner, config, &args.source, args.target_lufs);
    pb.finish_and_clear();
    let normalized = result.cli_with_context(|| format!("Normalizing {}", args.source.display()))?;

    print_info("Measured", format!("{:.2} dB", normalized.measured_db));
    print_info("Gain", format!("{:+.2} dB", normalized.gain_db));
    if !normalized.kept.is_full() {
        let end = normalized
            .kept
            .end
            .map_or_else(|| "end".to_string(), |end| format!("{end:.3}s"));
        print_info("Kept", format!("{:.3}s..{}", normalized.kept.start, end));
    }
    print_info("MP3", normalized.mp3_path.display());
    println!("{}", normalized.ogg_path.display());
    print_success("Normalized");
    Ok(())
}

pub fn run_sprite(config: &AssetConfig, args: SpriteArgs) -> CliResult<()> {
    print_section("Audio sprite");
    print_info("Clips", args.clips.len());

    let pb = spinner("Concatenating");
    let result = build_sprite(&SidecarSpawner, &CrateFfprobeExecutor::new(), config, &args.clips);
    pb.finish_and_clear();
    let sprite = result.cli_context("Building audio sprite")?;

    for (id, cue) in sprite.cue_map.iter() {
        print_info(id, format!("{:.3}s +{:.3}s", cue.offset(), cue.duration()));
    }
    print_info("Cue map", sprite.cue_map_path.display());
    println!("{}", sprite.sprite_path.display());
    print_success(&format!("{:.2}s sprite", sprite.cue_map.total_duration()));
    Ok(())
}
