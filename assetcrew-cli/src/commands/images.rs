// assetcrew-cli/src/commands/images.rs
//
// `responsive` and `compress`.

use crate::cli::{CompressArgs, ResponsiveArgs};
use crate::error::{CliErrorContext, CliResult};
use crate::output::{print_info, print_section, print_success, print_warning, spinner};
use assetcrew_core::external::SidecarSpawner;
use assetcrew_core::{AssetConfig, ImageCodec, compress_image, format_bytes, generate_responsive_variants};

pub fn run_responsive(config: &AssetConfig, args: ResponsiveArgs) -> CliResult<()> {
    print_section("Responsive variants");
    print_info("Source", args.source.display());

    let pb = spinner("Resampling");
    let result = generate_responsive_variants(config, &args.source, args.max_width);
    pb.finish_and_clear();
    let paths = result.cli_with_context(|| format!("Generating variants of {}", args.source.display()))?;

    for path in &paths {
        println!("{}", path.display());
    }
    print_success(&format!("{} variants written to {}", paths.len(), config.images_dir.display()));
    Ok(())
}

pub fn run_compress(args: CompressArgs) -> CliResult<()> {
    let codec: ImageCodec = args.format.parse()?;

    print_section(&format!("Compress to {codec}"));
    print_info("Source", args.source.display());
    print_info("Budget", format!("{} KiB", args.target_size_kb));

    let pb = spinner("Encoding");
    let result = compress_image(&SidecarSpawner, &args.source, codec, args.target_size_kb);
    pb.finish_and_clear();
    let compressed = result.cli_with_context(|| format!("Compressing {}", args.source.display()))?;

    print_info("Quality", compressed.quality);
    print_info("Size", format_bytes(compressed.size_bytes));
    println!("{}", compressed.path.display());
    if compressed.within_budget {
        print_success("Within budget");
    } else {
        print_warning("Over budget at minimum quality; kept the smallest encoding");
    }
    Ok(())
}
