//! Audio tools: loudness normalization and sprite building.
//!
//! Both delegate the signal processing to ffmpeg through the
//! [`FfmpegSpawner`](crate::external::FfmpegSpawner) seam; the sprite builder
//! also probes clip durations with ffprobe.

pub mod cue_map;
pub mod normalize;
pub mod sprite;

pub use cue_map::{Cue, CueMap};
pub use normalize::{
    NormalizedAudio, TrimWindow, build_filter_chain, detect_silence, measure_mean_volume,
    normalize_clip,
};
pub use sprite::{AudioSprite, build_sprite};
