//! The `install` subcommand: a file-copy loop over the cached install map.

use std::path::{Path, PathBuf};

use crate::core::Cache;
use crate::util::errors::FabError;

/// Copies every `cache.install` entry from `<build_dir>/<source>` to
/// `<destdir?><cache.prefix>/<destination>`, creating parent directories as
/// needed. `destdir` mirrors the `DESTDIR` staged-install convention.
pub fn install(cache: &Cache, build_dir: &Path, destdir: Option<&Path>) -> Result<(), FabError> {
    for (destination, source) in &cache.install {
        let src_path = build_dir.join(source);

        let metadata = std::fs::metadata(&src_path)
            .map_err(|_| FabError::InvalidPath(format!("no such output `{}`", src_path.display())))?;
        if metadata.is_dir() {
            return Err(FabError::InvalidPath(format!("output `{}` is a directory", src_path.display())));
        }

        let prefixed = PathBuf::from(&cache.prefix).join(destination);
        let dest_path = match destdir {
            Some(destdir) => destdir.join(prefixed.strip_prefix("/").unwrap_or(&prefixed)),
            None => prefixed,
        };

        if let Some(parent) = dest_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::copy(&src_path, &dest_path)?;
    }

    Ok(())
}
