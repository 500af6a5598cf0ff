use std::path::{Path, PathBuf};

/// A path relative to the build directory, always of the form
/// `output/<flattened>`. Created exclusively by `Rule.build`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Output {
    relative_path: PathBuf,
}

impl Output {
    pub fn new(relative_path: PathBuf) -> Self {
        Output { relative_path }
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn name(&self) -> String {
        self.relative_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Output(\"{}\")", self.relative_path.display())
    }
}
