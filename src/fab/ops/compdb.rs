//! The CompileDB Trigger: invokes the executor's `compdb` tool over rules
//! flagged `compdb=true` and writes the result verbatim.

use std::path::Path;

use crate::core::{Accumulator, Executable};
use crate::util::errors::FabError;

/// Returns `true` and writes `compile_commands.json` if any rule requested
/// it; returns `false` without touching the filesystem otherwise.
pub fn write_compile_commands(executor_path: &Path, build_dir: &Path, accumulator: &Accumulator) -> Result<bool, FabError> {
    let rule_names: Vec<&str> = accumulator.rules.iter().filter(|r| r.compdb).map(|r| r.name.as_str()).collect();
    if rule_names.is_empty() {
        return Ok(false);
    }

    let mut args = vec![
        "-C".to_string(),
        build_dir.display().to_string(),
        "-t".to_string(),
        "compdb".to_string(),
    ];
    args.extend(rule_names.into_iter().map(str::to_string));

    let executor = Executable::new(executor_path.to_path_buf());
    let commands = executor.invoke(&args)?;
    std::fs::write(build_dir.join("compile_commands.json"), commands)?;
    Ok(true)
}
