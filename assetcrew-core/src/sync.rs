//! Repository sync: stage everything, commit, push.
//!
//! A failed push leaves the commit in place and is reported as
//! [`SyncStatus::CommittedLocally`]. Nothing is rolled back.

use crate::error::CoreError;
use crate::external::GitExecutor;
use log::{info, warn};
use std::fmt;
use std::path::Path;

/// Outcome of [`sync_repository`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Pushed,
    CommittedLocally,
    /// Staging or committing failed; carries git's message
    Failed(String),
}

impl SyncStatus {
    /// True when a commit was created.
    pub fn committed(&self) -> bool {
        !matches!(self, SyncStatus::Failed(_))
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Pushed => write!(f, "Committed & pushed."),
            SyncStatus::CommittedLocally => write!(f, "Committed locally (no remote/push failed)."),
            SyncStatus::Failed(msg) => write!(f, "Git error: {msg}"),
        }
    }
}

/// Runs `git add .`, `git commit -m <message>` and `git push` in `repo_root`.
pub fn sync_repository<G: GitExecutor>(git: &G, repo_root: &Path, message: &str) -> SyncStatus {
    if let Err(e) = git.run(repo_root, &["add", "."]) {
        return failed(e);
    }
    if let Err(e) = git.run(repo_root, &["commit", "-m", message]) {
        return failed(e);
    }

    match git.run(repo_root, &["push"]) {
        Ok(_) => {
            info!("Committed and pushed '{}' in {}", message, repo_root.display());
            SyncStatus::Pushed
        }
        Err(e) => {
            warn!("Push failed, commit kept locally: {}", e);
            SyncStatus::CommittedLocally
        }
    }
}

fn failed(err: CoreError) -> SyncStatus {
    let message = match err {
        CoreError::CommandFailed { stderr, .. } => stderr,
        other => other.to_string(),
    };
    warn!("Git sync failed: {}", message);
    SyncStatus::Failed(message)
}
