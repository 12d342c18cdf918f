//! Image tools: responsive aspect-ratio variants and budgeted compression.
//!
//! | Operation | Implementation |
//! |---|---|
//! | **Responsive variants** | `resize_to_fill` (center crop) with Lanczos3, PNG output |
//! | **Compress → AVIF** | in-process `ravif` encoder |
//! | **Compress → WebP** | ffmpeg `libwebp` through the `FfmpegSpawner` seam |

pub mod compress;
pub mod responsive;

use crate::error::CoreError;
use std::fmt;
use std::str::FromStr;

pub use compress::{
    AvifEncoder, CompressedImage, ImageEncoder, WebpEncoder, compress_image, compress_with,
};
pub use responsive::generate_responsive_variants;

/// A fixed aspect ratio for responsive variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AspectRatio {
    /// Suffix used in output file names (`169`, `32`, `11`)
    pub key: &'static str,
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Target dimensions for a variant `width` pixels wide. Height truncates.
    pub fn dimensions_for(&self, width: u32) -> (u32, u32) {
        let height = u64::from(width) * u64::from(self.height) / u64::from(self.width);
        (width, height as u32)
    }
}

/// Variants produced by the responsive generator, in output order.
pub const RESPONSIVE_RATIOS: [AspectRatio; 3] = [
    AspectRatio { key: "169", width: 16, height: 9 },
    AspectRatio { key: "32", width: 3, height: 2 },
    AspectRatio { key: "11", width: 1, height: 1 },
];

/// Next-generation codecs the compressor can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageCodec {
    Avif,
    Webp,
}

impl ImageCodec {
    /// File extension written for this codec.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageCodec::Avif => "avif",
            ImageCodec::Webp => "webp",
        }
    }
}

impl FromStr for ImageCodec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVIF" => Ok(ImageCodec::Avif),
            "WEBP" => Ok(ImageCodec::Webp),
            _ => Err(CoreError::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ImageCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageCodec::Avif => write!(f, "AVIF"),
            ImageCodec::Webp => write!(f, "WEBP"),
        }
    }
}
