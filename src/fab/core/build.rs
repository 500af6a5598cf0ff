use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::core::Output;

/// An instantiation of a Rule with concrete inputs, variable bindings, and
/// one output. `inputs`/`implicits` are absolute filesystem
/// paths (of a `Source` or another `Build`'s `Output`); the Emitter resolves
/// them relative to the build directory.
#[derive(Clone, Debug)]
pub struct Build {
    pub rule: String,
    pub inputs: Vec<PathBuf>,
    pub implicits: Vec<PathBuf>,
    pub output: Output,
    /// Already-namespaced: built-ins keep their bare name (`depfile`), user
    /// variables are prefixed `fabvar_`.
    pub variables: BTreeMap<String, String>,
}

impl std::fmt::Display for Build {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Build({})", self.rule)
    }
}
