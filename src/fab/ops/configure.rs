//! Top-level orchestration for the `configure` subcommand: wires the
//! accumulator, script engine, emitter, compdb trigger, and cache writer
//! together.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::core::{Accumulator, Cache, DEPENDENCY_DIRNAME, DEPFILES_DIRNAME, OUTPUT_DIRNAME};
use crate::ops::{compdb, emit};
use crate::script;

/// Runs one configure pass: evaluates the configuration script, emits
/// `build.ninja`, `.gitignore`, an optional `compile_commands.json`, and the
/// updated `fabricate_cache.json`.
pub fn configure(
    executor_path: &Path,
    config_path: &Path,
    build_dir: &Path,
    options: &BTreeMap<String, String>,
    prefix: &str,
    depdirs: &BTreeMap<String, PathBuf>,
    cache: Cache,
) -> anyhow::Result<()> {
    for dirname in [OUTPUT_DIRNAME, DEPFILES_DIRNAME, DEPENDENCY_DIRNAME] {
        std::fs::create_dir_all(build_dir.join(dirname))
            .with_context(|| format!("creating {}/{dirname}", build_dir.display()))?;
    }

    let project_root = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let accumulator = Accumulator::new(project_root, build_dir.to_path_buf());

    let accumulator = script::run(config_path, accumulator, cache, depdirs.clone(), options.clone())
        .with_context(|| format!("evaluating {}", config_path.display()))?;

    tracing::info!(
        rules = accumulator.rules.len(),
        builds = accumulator.builds.len(),
        dependencies = accumulator.dependencies.len(),
        "configuration script evaluated"
    );

    emit::write_build_ninja(&accumulator).context("writing build.ninja")?;

    std::fs::write(build_dir.join(".gitignore"), "# Generated by Fab.\n*").context("writing .gitignore")?;

    if compdb::write_compile_commands(executor_path, build_dir, &accumulator).context("writing compile_commands.json")? {
        tracing::info!("wrote compile_commands.json");
    }

    let new_cache = Cache {
        prefix: prefix.to_string(),
        dependencies: accumulator.dependencies.clone(),
        options: options.clone(),
        install: accumulator.installs.clone(),
    };
    new_cache.write(build_dir).context("writing fabricate_cache.json")?;

    Ok(())
}
