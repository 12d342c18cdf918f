// assetcrew-cli/src/main.rs
//
// Entry point for the `assetcrew` binary: parse arguments, install logging,
// run the selected command and map failures to exit code 1.

use assetcrew_cli::logging::{init_logging, resolve_level};
use assetcrew_cli::output::print_error;
use assetcrew_cli::{Cli, dispatch};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    let rust_log = std::env::var("RUST_LOG").ok();
    let level = resolve_level(cli.global.verbose, rust_log.as_deref());
    match init_logging(level, cli.global.log_dir.as_deref(), cli.command.name()) {
        Ok(Some(path)) => log::debug!("Run log: {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            print_error(&e.to_string());
            process::exit(1);
        }
    }

    if let Err(e) = dispatch(cli) {
        log::debug!("Command failed: {:?}", e);
        print_error(&e.to_string());
        process::exit(1);
    }
}
