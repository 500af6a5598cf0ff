//! The Graph Emitter: serialises an `Accumulator` to the executor's
//! deterministic `build.ninja` grammar.

use std::fmt::Write as _;
use std::path::Path;

use crate::core::Accumulator;
use crate::util::errors::FabError;
use crate::util::escape::ninja_escape;

/// Writes `<build_dir>/build.ninja`, replacing any previous contents in one
/// call. Rules and builds are emitted in declaration order; variable
/// bindings within a build follow `BTreeMap`'s lexicographic key order.
pub fn write_build_ninja(accumulator: &Accumulator) -> Result<(), FabError> {
    let mut out = String::new();
    out.push_str("ninja_required_version = 1.9.0\n\n");

    out.push_str("# Rules\n");
    for rule in &accumulator.rules {
        writeln!(out, "rule {}", rule.name).expect("String write is infallible");
        writeln!(out, "    command = {}", rule.command).expect("String write is infallible");
        if let Some(description) = &rule.description {
            writeln!(out, "    description = {description}").expect("String write is infallible");
        }
        if let Some(deps) = rule.dep_style.ninja_value() {
            writeln!(out, "    deps = {deps}").expect("String write is infallible");
        }
        out.push('\n');
    }

    out.push_str("# Build Statements\n");
    for build in &accumulator.builds {
        let escaped_output = escape_output_path(&build.output.relative_path().to_string_lossy());
        let inputs = build
            .inputs
            .iter()
            .map(|p| ninja_escape(&relative_string(&accumulator.build_dir, p)))
            .collect::<Vec<_>>()
            .join(" ");

        write!(out, "build {escaped_output}: {} {inputs}", build.rule).expect("String write is infallible");

        if !build.implicits.is_empty() {
            let implicits = build
                .implicits
                .iter()
                .map(|p| ninja_escape(&relative_string(&accumulator.build_dir, p)))
                .collect::<Vec<_>>()
                .join(" ");
            write!(out, " | {implicits}").expect("String write is infallible");
        }
        out.push('\n');

        for (key, value) in &build.variables {
            writeln!(out, "    {key} = {}", ninja_escape(value)).expect("String write is infallible");
        }
        out.push('\n');
    }

    std::fs::write(accumulator.build_dir.join("build.ninja"), out)?;
    Ok(())
}

fn relative_string(build_dir: &Path, absolute: &Path) -> String {
    pathdiff::diff_paths(absolute, build_dir)
        .unwrap_or_else(|| absolute.to_path_buf())
        .to_string_lossy()
        .into_owned()
}

fn escape_output_path(path: &str) -> String {
    ninja_escape(path).replace(':', "$:")
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use super::*;
    use crate::core::{Build, DepStyle, Output, Rule};

    #[test]
    fn minimal_script_emits_expected_lines() {
        let build_dir = tempfile::tempdir().unwrap();
        let mut accumulator = Accumulator::new(PathBuf::from("/proj"), build_dir.path().to_path_buf());
        accumulator
            .add_rule(Rule {
                name: "noop".to_string(),
                description: None,
                command: "true".to_string(),
                variables: Vec::new(),
                dep_style: DepStyle::Normal,
                compdb: false,
            })
            .unwrap();
        accumulator
            .add_build(Build {
                rule: "noop".to_string(),
                inputs: Vec::new(),
                implicits: Vec::new(),
                output: Output::new(PathBuf::from("output/a")),
                variables: BTreeMap::new(),
            })
            .unwrap();

        write_build_ninja(&accumulator).unwrap();
        let text = std::fs::read_to_string(build_dir.path().join("build.ninja")).unwrap();
        assert!(text.contains("rule noop"));
        assert!(text.contains("command = true"));
        assert!(text.contains("build output/a: noop "));
    }

    #[test]
    fn implicits_are_appended_not_substituted_for_inputs() {
        let build_dir = tempfile::tempdir().unwrap();
        let mut accumulator = Accumulator::new(PathBuf::from("/proj"), build_dir.path().to_path_buf());
        accumulator
            .add_rule(Rule {
                name: "cc".to_string(),
                description: None,
                command: "cc".to_string(),
                variables: Vec::new(),
                dep_style: DepStyle::Normal,
                compdb: false,
            })
            .unwrap();
        accumulator
            .add_build(Build {
                rule: "cc".to_string(),
                inputs: vec![build_dir.path().join("a.c")],
                implicits: vec![build_dir.path().join("a.h")],
                output: Output::new(PathBuf::from("output/a.o")),
                variables: BTreeMap::new(),
            })
            .unwrap();

        write_build_ninja(&accumulator).unwrap();
        let text = std::fs::read_to_string(build_dir.path().join("build.ninja")).unwrap();
        assert!(text.contains("build output/a.o: cc a.c | a.h"));
    }
}
