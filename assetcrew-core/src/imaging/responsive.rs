//! Responsive image variants.
//!
//! One source image becomes three crops (16:9, 3:2, 1:1), each `max_width`
//! pixels wide. Variants are fit-and-crop: the source is scaled to cover the
//! target box and the overflow is trimmed around the center, so there is no
//! letterboxing.

use crate::config::AssetConfig;
use crate::error::{CoreError, CoreResult};
use crate::imaging::RESPONSIVE_RATIOS;
use crate::utils::file_stem;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Writes `<images_dir>/<stem>_<key>.png` for each responsive ratio and
/// returns the paths in the order 16:9, 3:2, 1:1. Existing files are
/// overwritten.
pub fn generate_responsive_variants(
    config: &AssetConfig,
    source: &Path,
    max_width: u32,
) -> CoreResult<Vec<PathBuf>> {
    if max_width == 0 {
        return Err(CoreError::InvalidInput(
            "max_width must be greater than zero".to_string(),
        ));
    }

    let stem = file_stem(source)?;
    let src = DynamicImage::ImageRgba8(image::open(source)?.to_rgba8());
    debug!(
        "Decoded {} ({}x{})",
        source.display(),
        src.width(),
        src.height()
    );

    std::fs::create_dir_all(&config.images_dir)?;

    let mut out_paths = Vec::with_capacity(RESPONSIVE_RATIOS.len());
    for ratio in RESPONSIVE_RATIOS {
        let (target_w, target_h) = ratio.dimensions_for(max_width);
        if target_h == 0 {
            return Err(CoreError::InvalidInput(format!(
                "max_width {} is too small for a {}:{} variant",
                max_width, ratio.width, ratio.height
            )));
        }

        let variant = src.resize_to_fill(target_w, target_h, FilterType::Lanczos3);
        let out_path = config.images_dir.join(format!("{stem}_{}.png", ratio.key));
        variant.save_with_format(&out_path, ImageFormat::Png)?;

        debug!(
            "Wrote {}:{} variant {}x{} to {}",
            ratio.width,
            ratio.height,
            target_w,
            target_h,
            out_path.display()
        );
        out_paths.push(out_path);
    }

    info!(
        "Generated {} responsive variants for {}",
        out_paths.len(),
        source.display()
    );
    Ok(out_paths)
}
