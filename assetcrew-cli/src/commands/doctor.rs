// assetcrew-cli/src/commands/doctor.rs
//
// `doctor`: report which external programs are missing.

use crate::error::CliResult;
use crate::output::{print_section, print_success, print_warning};
use assetcrew_core::{CoreError, check_dependency};

/// Programs the asset tools shell out to.
pub const REQUIRED_TOOLS: [&str; 3] = ["ffmpeg", "ffprobe", "git"];

pub fn run_doctor() -> CliResult<()> {
    print_section("External dependencies");

    let mut missing = Vec::new();
    for tool in REQUIRED_TOOLS {
        match check_dependency(tool) {
            Ok(()) => print_success(tool),
            Err(e) => {
                print_warning(&format!("{tool}: {e}"));
                missing.push(tool);
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::DependencyNotFound(missing.join(", ")))
    }
}
