// ============================================================================
// assetcrew-core/src/imaging/compress.rs
// ============================================================================
//
// IMAGE COMPRESSION: Re-encode an Image Until It Fits a Byte Budget
//
// The compressor encodes at quality 80 and steps down by 10 until the file
// fits the budget or quality would fall below 10. When the floor is reached
// without meeting the budget, the quality-10 encoding is the one left on disk
// and returned; `CompressedImage::within_budget` tells the two outcomes apart.
//
// KEY COMPONENTS:
// - ImageEncoder: one encode attempt at a given quality
// - AvifEncoder: in-process AVIF via ravif
// - WebpEncoder: WebP via ffmpeg's libwebp
// - compress_with / compress_image: the quality loop

use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, run_ffmpeg};
use crate::imaging::ImageCodec;
use crate::utils::{format_bytes, get_file_size};

use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, info, warn};
use ravif::{Img, RGBA8};
use std::path::{Path, PathBuf};

/// First quality tried.
pub const START_QUALITY: u8 = 80;

/// Lowest quality tried.
pub const MIN_QUALITY: u8 = 10;

/// Quality decrement between attempts.
pub const QUALITY_STEP: u8 = 10;

/// Default ravif speed (1 slowest .. 10 fastest).
pub const DEFAULT_AVIF_SPEED: u8 = 6;

/// Outcome of a compression run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    pub path: PathBuf,
    pub codec: ImageCodec,
    /// Quality of the encoding left on disk
    pub quality: u8,
    pub size_bytes: u64,
    /// False when the loop gave up at the quality floor
    pub within_budget: bool,
}

/// Encodes an image file at a given quality.
pub trait ImageEncoder {
    /// Codec produced by this encoder.
    fn codec(&self) -> ImageCodec;

    /// Encodes `source` into `output` at `quality` (1-100), replacing `output`.
    fn encode(&self, source: &Path, output: &Path, quality: u8) -> CoreResult<()>;
}

/// AVIF encoder backed by ravif.
#[derive(Debug, Clone)]
pub struct AvifEncoder {
    pub speed: u8,
}

impl Default for AvifEncoder {
    fn default() -> Self {
        Self {
            speed: DEFAULT_AVIF_SPEED,
        }
    }
}

impl ImageEncoder for AvifEncoder {
    fn codec(&self) -> ImageCodec {
        ImageCodec::Avif
    }

    fn encode(&self, source: &Path, output: &Path, quality: u8) -> CoreResult<()> {
        let rgba = image::open(source)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels: Vec<RGBA8> = rgba
            .pixels()
            .map(|p| RGBA8::new(p[0], p[1], p[2], p[3]))
            .collect();

        let encoded = ravif::Encoder::new()
            .with_quality(f32::from(quality))
            .with_alpha_quality(f32::from(quality))
            .with_speed(self.speed)
            .encode_rgba(Img::new(pixels.as_slice(), width as usize, height as usize))
            .map_err(|e| {
                CoreError::Encode(format!("AVIF encoding of {} failed: {}", source.display(), e))
            })?;

        std::fs::write(output, &encoded.avif_file)?;
        Ok(())
    }
}

/// WebP encoder running ffmpeg's libwebp.
pub struct WebpEncoder<'a, S: FfmpegSpawner> {
    spawner: &'a S,
}

impl<'a, S: FfmpegSpawner> WebpEncoder<'a, S> {
    pub fn new(spawner: &'a S) -> Self {
        Self { spawner }
    }
}

impl<S: FfmpegSpawner> ImageEncoder for WebpEncoder<'_, S> {
    fn codec(&self) -> ImageCodec {
        ImageCodec::Webp
    }

    fn encode(&self, source: &Path, output: &Path, quality: u8) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new();
        cmd.overwrite();
        cmd.input(source.to_string_lossy().as_ref());
        cmd.args(["-frames:v", "1"]);
        cmd.args(["-c:v", "libwebp"]);
        cmd.arg("-quality");
        cmd.arg(quality.to_string());
        cmd.args(["-pix_fmt", "yuva420p"]);
        cmd.output(output.to_string_lossy().as_ref());

        run_ffmpeg(self.spawner, cmd, "ffmpeg (webp encode)")?;
        Ok(())
    }
}

/// Compresses `source` into the requested codec under `target_size_kb` KiB.
///
/// The output replaces the source extension with the codec's extension.
pub fn compress_image<S: FfmpegSpawner>(
    spawner: &S,
    source: &Path,
    codec: ImageCodec,
    target_size_kb: u64,
) -> CoreResult<CompressedImage> {
    match codec {
        ImageCodec::Avif => compress_with(&AvifEncoder::default(), source, target_size_kb),
        ImageCodec::Webp => compress_with(&WebpEncoder::new(spawner), source, target_size_kb),
    }
}

/// Runs the quality loop with an arbitrary encoder.
///
/// Budget is checked in whole KiB (`size / 1024 <= target_size_kb`).
pub fn compress_with<E: ImageEncoder>(
    encoder: &E,
    source: &Path,
    target_size_kb: u64,
) -> CoreResult<CompressedImage> {
    let codec = encoder.codec();
    let output = source.with_extension(codec.extension());
    if output == source {
        return Err(CoreError::InvalidInput(format!(
            "{} is already {}; refusing to overwrite the source",
            source.display(),
            codec
        )));
    }

    let mut quality = START_QUALITY;
    loop {
        encoder.encode(source, &output, quality)?;
        let size_bytes = get_file_size(&output)?;
        let within_budget = size_bytes / 1024 <= target_size_kb;
        debug!(
            "{} at quality {}: {} (budget {} KiB)",
            codec,
            quality,
            format_bytes(size_bytes),
            target_size_kb
        );

        if within_budget || quality < MIN_QUALITY + QUALITY_STEP {
            if within_budget {
                info!(
                    "Compressed {} to {} at quality {} ({})",
                    source.display(),
                    output.display(),
                    quality,
                    format_bytes(size_bytes)
                );
            } else {
                warn!(
                    "{} still {} at minimum quality {}; keeping the smallest encoding",
                    output.display(),
                    format_bytes(size_bytes),
                    quality
                );
            }
            return Ok(CompressedImage {
                path: output,
                codec,
                quality,
                size_bytes,
                within_budget,
            });
        }

        quality -= QUALITY_STEP;
    }
}
