//! Double-star globbing rooted at a directory, with ignore-pattern removal.
//! Grounds on the `glob` crate, the same one the pack's `apl-builder` uses
//! for its own port-discovery globbing.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::util::errors::FabError;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Returns the sorted sequence of paths under `root` matching `pattern`,
/// with any path that also matches one of `ignores` (each rooted at `root`
/// the same way) removed. Sorting gives downstream consumers a deterministic
/// input without needing the traversal itself to promise ordering.
pub fn glob(root: &Path, pattern: &str, ignores: &[String]) -> Result<Vec<PathBuf>, FabError> {
    let rooted = root.join(pattern);
    let rooted = rooted.to_string_lossy().into_owned();

    let paths = glob::glob_with(&rooted, MATCH_OPTIONS)
        .map_err(|e| FabError::BadArgument(format!("invalid glob pattern `{pattern}`: {e}")))?;

    let ignore_patterns = ignores
        .iter()
        .map(|ignore| {
            let rooted_ignore = root.join(ignore);
            Pattern::new(&rooted_ignore.to_string_lossy())
                .map_err(|e| FabError::BadArgument(format!("invalid ignore pattern `{ignore}`: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut matches = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| FabError::BadArgument(format!("glob failed: {e}")))?;
        if ignore_patterns.iter().any(|ignore| ignore.matches_path_with(&path, MATCH_OPTIONS)) {
            continue;
        }
        matches.push(path);
    }

    matches.sort();
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn globs_rooted_directory_and_honours_ignores() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/vendor")).unwrap();
        fs::write(dir.path().join("src/a.c"), "").unwrap();
        fs::write(dir.path().join("src/vendor/b.c"), "").unwrap();

        let matches = glob(dir.path(), "src/**/*.c", &[]).unwrap();
        assert_eq!(matches.len(), 2);

        let filtered = glob(dir.path(), "src/**/*.c", &["src/vendor/**".to_string()]).unwrap();
        assert_eq!(filtered, vec![dir.path().join("src/a.c")]);
    }
}
