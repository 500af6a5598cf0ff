//! The Dependency Manager: the only component allowed to mutate the
//! filesystem outside of `<build>/`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::{Cache, Dependency};
use crate::util::errors::FabError;

fn git_err(operation: &str, err: git2::Error) -> FabError {
    FabError::InvokeFailed {
        program: "git".to_string(),
        reason: format!("{operation}: {err}"),
    }
}

/// Resolves `revision` against `repo` by trying, in order: a remote branch,
/// a tag, then a raw commit hash.
fn resolve_revision(repo: &git2::Repository, revision: &str) -> Option<git2::Oid> {
    if let Ok(branch) = repo.find_branch(&format!("origin/{revision}"), git2::BranchType::Remote) {
        if let Some(target) = branch.get().target() {
            return Some(target);
        }
    }

    if let Ok(reference) = repo.find_reference(&format!("refs/tags/{revision}")) {
        if let Ok(obj) = reference.peel(git2::ObjectType::Commit) {
            return Some(obj.id());
        }
    }

    if let Ok(oid) = git2::Oid::from_str(revision) {
        if repo.find_commit(oid).is_ok() {
            return Some(oid);
        }
    }

    None
}

/// Clones the full history of `url` into `dest` and checks out `revision`.
/// Any pre-existing directory at `dest` is removed first so a retry never
/// checks out on top of a half-populated tree.
fn clone_and_checkout(name: &str, url: &str, revision: &str, dest: &Path) -> Result<(), FabError> {
    if dest.exists() {
        std::fs::remove_dir_all(dest)?;
    }

    let clone_result = git2::Repository::clone(url, dest);
    let repo = match clone_result {
        Ok(repo) => repo,
        Err(err) => {
            let _ = std::fs::remove_dir_all(dest);
            return Err(git_err("clone", err));
        }
    };

    let checkout = (|| -> Result<(), FabError> {
        let oid = resolve_revision(&repo, revision).ok_or_else(|| FabError::UnresolvedRevision {
            name: name.to_string(),
            revision: revision.to_string(),
        })?;

        let object = repo.find_object(oid, None).map_err(|e| git_err("find object", e))?;
        let mut opts = git2::build::CheckoutBuilder::new();
        opts.force();
        repo.checkout_tree(&object, Some(&mut opts))
            .map_err(|e| git_err("checkout", e))?;
        repo.set_head_detached(oid).map_err(|e| git_err("detach head", e))?;
        Ok(())
    })();

    if checkout.is_err() {
        let _ = std::fs::remove_dir_all(dest);
    }
    checkout
}

/// Fetches or reuses the local source tree for a `fab.dependency(name, url,
/// revision)` call, honouring the cache-reuse and override rules.
pub fn resolve_dependency(
    name: &str,
    url: &str,
    revision: &str,
    dependency_dir: &Path,
    cache: &Cache,
    overrides: &BTreeMap<String, PathBuf>,
) -> Result<Dependency, FabError> {
    let local_path = overrides
        .get(name)
        .cloned()
        .unwrap_or_else(|| dependency_dir.join(name));

    let has_override = overrides.contains_key(name);

    // Step 1: identical cached identity and no override => reuse untouched.
    if !has_override && cache.matches_dependency(name, url, revision, &local_path) {
        return Ok(Dependency {
            name: name.to_string(),
            url: url.to_string(),
            revision: revision.to_string(),
            path: local_path,
        });
    }

    // Step 2: override => adopt as-is, no cloning.
    if has_override {
        return Ok(Dependency {
            name: name.to_string(),
            url: url.to_string(),
            revision: revision.to_string(),
            path: local_path,
        });
    }

    // Step 3: (re)clone and checkout.
    clone_and_checkout(name, url, revision, &local_path)?;

    Ok(Dependency {
        name: name.to_string(),
        url: url.to_string(),
        revision: revision.to_string(),
        path: local_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    /// Builds a throwaway local repository with one commit on `main`, a tag
    /// `v1`, and returns its file:// URL plus the commit hash, so revision
    /// resolution can be tested without touching the network.
    fn make_repo(dir: &Path) -> String {
        let run = |args: &[&str]| {
            let status = Command::new("git").args(args).current_dir(dir).status().unwrap();
            assert!(status.success(), "git {args:?} failed");
        };

        std::fs::create_dir_all(dir).unwrap();
        run(&["init", "-q", "-b", "main"]);
        run(&["config", "user.email", "test@example.com"]);
        run(&["config", "user.name", "test"]);
        std::fs::write(dir.join("file.txt"), "hello").unwrap();
        run(&["add", "file.txt"]);
        run(&["commit", "-q", "-m", "initial"]);
        run(&["tag", "v1"]);
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn clones_and_resolves_branch() {
        let origin = tempfile::tempdir().unwrap();
        let url = make_repo(origin.path());

        let workdir = tempfile::tempdir().unwrap();
        let dest = workdir.path().join("checkout");
        clone_and_checkout("dep", &url, "main", &dest).unwrap();
        assert!(dest.join("file.txt").exists());
    }

    #[test]
    fn resolves_tag_and_commit_hash() {
        let origin = tempfile::tempdir().unwrap();
        let url = make_repo(origin.path());

        let workdir = tempfile::tempdir().unwrap();
        clone_and_checkout("dep", &url, "v1", &workdir.path().join("by-tag")).unwrap();

        let repo = git2::Repository::open(origin.path()).unwrap();
        let hash = repo.head().unwrap().target().unwrap().to_string();
        clone_and_checkout("dep", &url, &hash, &workdir.path().join("by-hash")).unwrap();
    }

    #[test]
    fn unresolved_revision_errors() {
        let origin = tempfile::tempdir().unwrap();
        let url = make_repo(origin.path());

        let workdir = tempfile::tempdir().unwrap();
        let err = clone_and_checkout("dep", &url, "does-not-exist", &workdir.path().join("c")).unwrap_err();
        assert!(matches!(err, FabError::UnresolvedRevision { .. }));
    }

    #[test]
    fn reuses_dependency_with_identical_cached_identity() {
        let origin = tempfile::tempdir().unwrap();
        let url = make_repo(origin.path());

        let workdir = tempfile::tempdir().unwrap();
        let dep_dir = workdir.path().join("dependency");

        let mut cache = Cache::default();
        let first = resolve_dependency("dep", &url, "main", &dep_dir, &cache, &BTreeMap::new()).unwrap();
        cache.dependencies.push(first.clone());

        // Mutate the checkout so we can tell whether a reclone happened.
        std::fs::write(first.path.join("marker"), "kept").unwrap();

        let second = resolve_dependency("dep", &url, "main", &dep_dir, &cache, &BTreeMap::new()).unwrap();
        assert_eq!(second.path, first.path);
        assert!(second.path.join("marker").exists(), "identical identity must not reclone");
    }

    #[test]
    fn changed_revision_triggers_reclone() {
        let origin = tempfile::tempdir().unwrap();
        let url = make_repo(origin.path());

        let workdir = tempfile::tempdir().unwrap();
        let dep_dir = workdir.path().join("dependency");

        let mut cache = Cache::default();
        let first = resolve_dependency("dep", &url, "main", &dep_dir, &cache, &BTreeMap::new()).unwrap();
        cache.dependencies.push(first.clone());
        std::fs::write(first.path.join("marker"), "kept").unwrap();

        let second = resolve_dependency("dep", &url, "v1", &dep_dir, &cache, &BTreeMap::new()).unwrap();
        assert!(!second.path.join("marker").exists(), "changed revision must reclone");
    }
}
