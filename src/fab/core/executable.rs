use std::path::{Path, PathBuf};
use std::process::Command;

use crate::util::errors::FabError;

/// A located, invocable program: the result of `fab.find_executable`,
/// `fab.get_executable`, or a rule command token referencing one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Executable {
    path: PathBuf,
}

impl Executable {
    pub fn new(path: PathBuf) -> Self {
        Executable { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Runs the program synchronously, returning its captured stdout. Stderr
    /// is inherited by the caller's process. A non-zero exit is `InvokeFailed`.
    pub fn invoke(&self, args: &[String]) -> Result<String, FabError> {
        let output = Command::new(&self.path)
            .args(args)
            .stderr(std::process::Stdio::inherit())
            .output()
            .map_err(|e| FabError::InvokeFailed {
                program: self.path.display().to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(FabError::InvokeFailed {
                program: self.path.display().to_string(),
                reason: output
                    .status
                    .code()
                    .map(|c| format!("exited with status {c}"))
                    .unwrap_or_else(|| "terminated by signal".to_string()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl std::fmt::Display for Executable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Executable(\"{}\")", self.path.display())
    }
}
