// assetcrew-cli/src/commands/pipeline.rs
//
// `plan` lists the crew; `run` dispatches it through the dry-run dispatcher.

use crate::cli::{PlanArgs, RunArgs};
use crate::error::{CliErrorContext, CliResult};
use crate::output::{print_heading, print_info, print_section, print_success};
use assetcrew_core::orchestration::{Crew, DryRunDispatcher, Toolbox, all_tasks, roster};
use assetcrew_core::AssetConfig;
use serde_json::json;

pub fn run_plan(config: &AssetConfig, args: PlanArgs) -> CliResult<()> {
    let agents = roster(config);
    let tasks = all_tasks();

    if args.json {
        let plan = json!({ "agents": agents, "tasks": tasks });
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    let toolbox = Toolbox::standard(config);
    print_heading("Asset crew");
    for agent in &agents {
        print_section(&format!("{} ({})", agent.name, agent.role));
        print_info("Goal", &agent.goal);
        let tools: Vec<String> = agent
            .tools
            .iter()
            .map(|t| {
                if toolbox.provides(t) {
                    t.to_string()
                } else {
                    format!("{t} [runtime]")
                }
            })
            .collect();
        print_info("Tools", tools.join(", "));
        if agent.allow_code_execution {
            print_info("Code execution", "allowed");
        }
    }

    print_section("Tasks");
    for (i, task) in tasks.iter().enumerate() {
        println!("  {}. [{}] {}", i + 1, task.agent, task.description);
        println!("     -> {}", task.expected_output);
    }
    Ok(())
}

pub fn run_crew(config: &AssetConfig, args: RunArgs) -> CliResult<()> {
    print_heading("Asset pipeline (dry run)");
    print_info("Image model", &config.image_model);
    print_info("Max RPM", args.max_rpm);

    let mut crew = Crew::standard(config).with_max_rpm(args.max_rpm);
    let mut dispatcher = DryRunDispatcher::new();
    let summary = crew
        .kickoff(&mut dispatcher)
        .cli_context("Running asset crew")?;

    println!("{summary}");
    print_success("Asset pipeline finished");
    Ok(())
}
