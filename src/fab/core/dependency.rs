use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// An external source tree cloned from a remote VCS, keyed by
/// `(name, url, revision)`. `path` is `<build>/dependency/<name>` unless a
/// front-end override replaces it with a pre-existing directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub url: String,
    pub revision: String,
    pub path: PathBuf,
}

impl std::fmt::Display for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dependency({})", self.name)
    }
}
