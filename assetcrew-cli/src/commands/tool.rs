// assetcrew-cli/src/commands/tool.rs
//
// `tool`: call a registered asset tool the way the agent runtime would.

use crate::cli::ToolArgs;
use crate::error::{CliErrorContext, CliResult};
use crate::output::{print_info, print_section};
use assetcrew_core::orchestration::Toolbox;
use assetcrew_core::{AssetConfig, CoreError};
use serde_json::Value;

pub fn run_tool(config: &AssetConfig, args: ToolArgs) -> CliResult<()> {
    let toolbox = Toolbox::standard(config);

    let Some(name) = args.name else {
        print_section("Registered tools");
        for tool in toolbox.tools() {
            print_info(tool.name(), tool.description());
        }
        return Ok(());
    };

    let tool_args: Value = serde_json::from_str(&args.args)
        .map_err(|e| CoreError::InvalidInput(format!("--args is not valid JSON: {e}")))?;
    let output = toolbox
        .run(&name, &tool_args)
        .cli_with_context(|| format!("Running {name}"))?;

    println!("{output}");
    Ok(())
}
