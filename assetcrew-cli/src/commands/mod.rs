//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a group of commands.

/// `responsive` and `compress`
pub mod images;

/// `normalize` and `sprite`
pub mod audio;

/// `sync`
pub mod sync;

/// `plan` and `run`
pub mod pipeline;

/// `tool`
pub mod tool;

/// `doctor`
pub mod doctor;

use crate::cli::{Cli, Commands};
use crate::error::CliResult;

/// Runs the command selected on the command line.
pub fn dispatch(cli: Cli) -> CliResult<()> {
    let config = cli.global.asset_config();
    log::debug!("Asset configuration: {:?}", config);

    match cli.command {
        Commands::Responsive(args) => images::run_responsive(&config, args),
        Commands::Compress(args) => images::run_compress(args),
        Commands::Normalize(args) => audio::run_normalize(&config, args),
        Commands::Sprite(args) => audio::run_sprite(&config, args),
        Commands::Sync(args) => sync::run_sync(&config, args),
        Commands::Plan(args) => pipeline::run_plan(&config, args),
        Commands::Run(args) => pipeline::run_crew(&config, args),
        Commands::Tool(args) => tool::run_tool(&config, args),
        Commands::Doctor => doctor::run_doctor(),
    }
}
