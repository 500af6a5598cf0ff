use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Dependency;
use crate::util::errors::FabError;

pub const CACHE_FILENAME: &str = "fabricate_cache.json";

/// The persisted JSON record enabling incremental reconfigure. Written
/// atomically; read back byte-for-byte equal on round-trip.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Cache {
    pub prefix: String,
    pub dependencies: Vec<Dependency>,
    pub options: BTreeMap<String, String>,
    pub install: BTreeMap<String, String>,
}

impl Cache {
    /// Loads `<build>/fabricate_cache.json`, or an empty cache if the build
    /// directory has never been configured before.
    pub fn load(build_dir: &Path) -> Result<Cache, FabError> {
        let path = build_dir.join(CACHE_FILENAME);
        match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data)
                .map_err(|e| FabError::InvalidPath(format!("malformed cache at {}: {e}", path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Cache::default()),
            Err(e) => Err(FabError::from(e)),
        }
    }

    /// Serialises `self` as pretty-printed JSON and replaces the existing
    /// cache file atomically (write-to-temp-then-rename, same directory so
    /// the rename is same-filesystem).
    pub fn write(&self, build_dir: &Path) -> Result<(), FabError> {
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| FabError::InvalidPath(format!("failed to serialise cache: {e}")))?;

        let mut tmp = tempfile::NamedTempFile::new_in(build_dir)?;
        use std::io::Write;
        tmp.write_all(data.as_bytes())?;
        tmp.persist(build_dir.join(CACHE_FILENAME))
            .map_err(|e| FabError::from(e.error))?;
        Ok(())
    }

    /// True iff `dependencies` already contains an entry for `name` whose
    /// `(url, revision, path)` triple is identical to the one requested —
    /// the Dependency Manager's "reuse untouched" condition.
    pub fn matches_dependency(&self, name: &str, url: &str, revision: &str, path: &Path) -> bool {
        self.dependencies
            .iter()
            .any(|d| d.name == name && d.url == url && d.revision == revision && d.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut cache = Cache::default();
        cache.prefix = "/usr".to_string();
        cache.options.insert("mode".to_string(), "release".to_string());
        cache.install.insert("bin/app".to_string(), "output/app".to_string());
        cache.dependencies.push(Dependency {
            name: "zlib".to_string(),
            url: "https://example.com/zlib.git".to_string(),
            revision: "main".to_string(),
            path: "/build/dependency/zlib".into(),
        });

        let json = serde_json::to_string(&cache).unwrap();
        let reloaded: Cache = serde_json::from_str(&json).unwrap();
        assert_eq!(cache, reloaded);
    }

    #[test]
    fn missing_cache_file_loads_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let cache = Cache::load(dir.path()).unwrap();
        assert_eq!(cache, Cache::default());
    }

    #[test]
    fn write_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = Cache::default();
        cache.prefix = "/usr/local".to_string();
        cache.write(dir.path()).unwrap();

        let reloaded = Cache::load(dir.path()).unwrap();
        assert_eq!(cache, reloaded);
    }
}
