use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::{Build, Dependency, Rule};
use crate::util::errors::FabError;

/// The process-wide mutable state collected during script evaluation.
/// Owned exclusively for the lifetime of one configure run; the script
/// engine closures hold it behind an `Rc<RefCell<_>>` (see `script::engine`),
/// never as a global.
pub struct Accumulator {
    pub project_root: PathBuf,
    pub build_dir: PathBuf,
    pub rules: Vec<Rule>,
    pub builds: Vec<Build>,
    pub dependencies: Vec<Dependency>,
    pub installs: BTreeMap<String, String>,
    queried_options: Vec<String>,
}

impl Accumulator {
    pub fn new(project_root: PathBuf, build_dir: PathBuf) -> Self {
        Accumulator {
            project_root,
            build_dir,
            rules: Vec::new(),
            builds: Vec::new(),
            dependencies: Vec::new(),
            installs: BTreeMap::new(),
            queried_options: Vec::new(),
        }
    }

    pub fn find_rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn add_rule(&mut self, rule: Rule) -> Result<(), FabError> {
        if self.find_rule(&rule.name).is_some() {
            return Err(FabError::DuplicateRule(rule.name));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn add_build(&mut self, build: Build) -> Result<(), FabError> {
        let output = build.output.relative_path().to_path_buf();
        if self.builds.iter().any(|b| b.output.relative_path() == output) {
            return Err(FabError::DuplicateOutput(output.display().to_string()));
        }
        self.builds.push(build);
        Ok(())
    }

    pub fn find_dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.name == name)
    }

    pub fn add_dependency(&mut self, dependency: Dependency) -> Result<(), FabError> {
        if self.find_dependency(&dependency.name).is_some() {
            return Err(FabError::DuplicateDependency(dependency.name));
        }
        self.dependencies.push(dependency);
        Ok(())
    }

    pub fn add_install(&mut self, destination: String, source_relative: PathBuf) -> Result<(), FabError> {
        if self.installs.contains_key(&destination) {
            return Err(FabError::DuplicateInstall(destination));
        }
        self.installs.insert(destination, source_relative.display().to_string());
        Ok(())
    }

    /// Marks `name` as queried; `fab.option` may only be called once per
    /// name.
    pub fn mark_option_queried(&mut self, name: &str) -> Result<(), FabError> {
        if self.queried_options.iter().any(|n| n == name) {
            return Err(FabError::DuplicateOption(name.to_string()));
        }
        self.queried_options.push(name.to_string());
        Ok(())
    }
}
