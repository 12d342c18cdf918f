// assetcrew-cli/src/commands/sync.rs
//
// `sync`: stage, commit, push. A push failure still exits 0; add or commit
// failures exit 1.

use crate::cli::SyncArgs;
use crate::error::CliResult;
use crate::output::{print_info, print_section, print_success, print_warning};
use assetcrew_core::external::CliGitExecutor;
use assetcrew_core::{AssetConfig, CoreError, SyncStatus, sync_repository};

pub fn run_sync(config: &AssetConfig, args: SyncArgs) -> CliResult<()> {
    print_section("Sync repository");
    print_info("Repository", config.repo_root.display());
    print_info("Message", &args.message);

    let status = sync_repository(&CliGitExecutor, &config.repo_root, &args.message);
    match &status {
        SyncStatus::Pushed => print_success(&status.to_string()),
        SyncStatus::CommittedLocally => print_warning(&status.to_string()),
        SyncStatus::Failed(_) => return Err(CoreError::OperationFailed(status.to_string())),
    }
    Ok(())
}
