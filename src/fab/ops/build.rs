//! The `build` subcommand: a thin fork+exec of the executor over the
//! already-configured build directory.

use std::path::Path;
use std::process::Command;

use crate::util::errors::FabError;

pub fn build(executor_path: &Path, build_dir: &Path) -> Result<(), FabError> {
    let status = Command::new(executor_path)
        .arg("-C")
        .arg(build_dir)
        .status()
        .map_err(|e| FabError::InvokeFailed {
            program: executor_path.display().to_string(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(FabError::InvokeFailed {
            program: executor_path.display().to_string(),
            reason: status
                .code()
                .map(|c| format!("exited with status {c}"))
                .unwrap_or_else(|| "terminated by signal".to_string()),
        });
    }

    Ok(())
}
