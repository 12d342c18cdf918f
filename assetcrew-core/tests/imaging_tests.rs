// assetcrew-core/tests/imaging_tests.rs

use assetcrew_core::error::CoreError;
use assetcrew_core::external::mocks::MockFfmpegSpawner;
use assetcrew_core::imaging::{ImageCodec, RESPONSIVE_RATIOS, compress_image};
use assetcrew_core::{AssetConfig, generate_responsive_variants};
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Writes a gradient PNG so resampling has something to chew on.
fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    img.save(path).unwrap();
}

fn config_in(dir: &Path) -> AssetConfig {
    AssetConfig::with_asset_dir(dir.join("assets"), dir.to_path_buf())
}

#[test]
fn test_responsive_variants_have_ratio_dimensions() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    let source = tmp.path().join("startup.png");
    write_png(&source, 300, 200);

    let paths = generate_responsive_variants(&config, &source, 128).unwrap();

    let expected: Vec<PathBuf> = ["startup_169.png", "startup_32.png", "startup_11.png"]
        .iter()
        .map(|n| config.images_dir.join(n))
        .collect();
    assert_eq!(paths, expected);

    for (path, ratio) in paths.iter().zip(RESPONSIVE_RATIOS) {
        let (w, h) = image::image_dimensions(path).unwrap();
        assert_eq!(w, 128);
        assert_eq!(h, 128 * ratio.height / ratio.width);
    }
    assert_eq!(image::image_dimensions(&paths[1]).unwrap(), (128, 85));
}

#[test]
fn test_responsive_upscales_small_sources() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());
    let source = tmp.path().join("icon.png");
    write_png(&source, 16, 16);

    let paths = generate_responsive_variants(&config, &source, 64).unwrap();
    assert_eq!(image::image_dimensions(&paths[0]).unwrap(), (64, 36));
}

#[test]
fn test_responsive_rejects_bad_input() {
    let tmp = tempdir().unwrap();
    let config = config_in(tmp.path());

    let not_an_image = tmp.path().join("notes.png");
    std::fs::write(&not_an_image, b"definitely not a png").unwrap();
    assert!(matches!(
        generate_responsive_variants(&config, &not_an_image, 64),
        Err(CoreError::Image(_))
    ));

    let source = tmp.path().join("ok.png");
    write_png(&source, 8, 8);
    assert!(matches!(
        generate_responsive_variants(&config, &source, 0),
        Err(CoreError::InvalidInput(_))
    ));
    // 1px wide leaves no room for a 16:9 height
    assert!(matches!(
        generate_responsive_variants(&config, &source, 1),
        Err(CoreError::InvalidInput(_))
    ));
}

#[test]
fn test_avif_compression_fits_budget() {
    let tmp = tempdir().unwrap();
    let source = tmp.path().join("title.png");
    write_png(&source, 32, 32);

    // The AVIF path never touches ffmpeg
    let spawner = MockFfmpegSpawner::new();
    let result = compress_image(&spawner, &source, ImageCodec::Avif, 200).unwrap();

    assert_eq!(result.path, tmp.path().join("title.avif"));
    assert_eq!(result.quality, 80);
    assert!(result.within_budget);
    assert!(result.size_bytes > 0);
    assert_eq!(std::fs::metadata(&result.path).unwrap().len(), result.size_bytes);
    assert!(spawner.get_received_calls().is_empty());
}
