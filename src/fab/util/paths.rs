//! Path hygiene: containment checks and the output/depfile flattening
//! function.

use std::env;
use std::path::{Component, Path, PathBuf};

/// True iff `path`, once made relative to `root`, has no leading `..` — i.e.
/// `path` lies inside `root`. Both paths are expected to already be
/// absolute and lexically clean; this does not touch the filesystem.
pub fn is_inside(path: &Path, root: &Path) -> bool {
    match pathdiff::diff_paths(path, root) {
        Some(relative) => !matches!(relative.components().next(), Some(Component::ParentDir)),
        None => false,
    }
}

/// Replaces every `_` with `__` and every path separator with `_`. This is
/// injective on paths with no `_` directly adjacent to a separator: doubling
/// underscores first means a later separator-to-`_` substitution can never
/// be confused with a doubled underscore.
pub fn flatten(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy().replace('_', "__"))
        .collect::<Vec<_>>()
        .join("_")
}

/// Lexically cleans `path`, resolving `.`/`..` components without touching
/// the filesystem. Returns `None` if the cleaned path would escape its
/// containing directory (a leading `..` remains after resolution) or is
/// itself absolute.
pub fn clean_relative(path: &str) -> Option<PathBuf> {
    let path = Path::new(path);
    if path.is_absolute() {
        return None;
    }

    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                if !out.pop() {
                    return None;
                }
            }
            Component::CurDir => {}
            Component::Normal(part) => out.push(part),
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    Some(out)
}

/// Scans `PATH` for an executable file named `name`, the way
/// `fab.find_executable` and the front end's ninja lookup both need to.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    for dir in env::split_paths(&path_var) {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inside_rejects_parent_escape() {
        assert!(is_inside(Path::new("/proj/src/a.c"), Path::new("/proj")));
        assert!(!is_inside(Path::new("/etc/passwd"), Path::new("/proj")));
    }

    #[test]
    fn flatten_doubles_underscores_before_collapsing_separators() {
        assert_eq!(flatten(Path::new("src/foo_bar/x.o")), "src_foo__bar_x.o");
    }

    #[test]
    fn clean_relative_rejects_escape_and_absolute() {
        assert_eq!(clean_relative("a/b"), Some(PathBuf::from("a/b")));
        assert!(clean_relative("../a").is_none());
        assert!(clean_relative("/a").is_none());
    }
}
