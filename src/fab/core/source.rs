use std::path::{Path, PathBuf};

/// An absolute filesystem path known to lie inside the project root, the
/// managed dependency root, or a declared pre-existing dependency directory
/// (the containment check happens at construction time, in `fab.source`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Source {
    path: PathBuf,
}

impl Source {
    pub fn new(path: PathBuf) -> Self {
        Source { path }
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
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Source(\"{}\")", self.path.display())
    }
}
