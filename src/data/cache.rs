use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::error::LoadError;
use super::loader;
use super::model::Relation;

struct CacheEntry {
    /// Path as the caller gave it, for invalidating once the file is gone.
    requested: PathBuf,
    modified: Option<SystemTime>,
    relation: Arc<Relation>,
}

/// Loaded relations keyed by canonical path. An entry is reused while the
/// file's modification time is unchanged.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached relation for `path`, loading it on a miss.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Relation>, LoadError> {
        let key = cache_key(path)?;
        let modified = std::fs::metadata(&key)
            .and_then(|m| m.modified())
            .ok();

        if let Some(entry) = self.entries.get(&key) {
            if entry.modified == modified {
                log::debug!("dataset cache hit for {}", key.display());
                return Ok(Arc::clone(&entry.relation));
            }
            log::debug!("dataset cache stale for {}", key.display());
        } else {
            log::debug!("dataset cache miss for {}", key.display());
        }

        let relation = Arc::new(loader::load(&key)?);
        self.entries.insert(
            key,
            CacheEntry {
                requested: path.to_path_buf(),
                modified,
                relation: Arc::clone(&relation),
            },
        );
        Ok(relation)
    }

    /// Forget the entry for `path`. Returns whether one existed.
    ///
    /// A path that no longer resolves (the file was deleted or moved) is
    /// matched against the paths the entries were loaded from.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        if let Ok(key) = cache_key(path) {
            if self.entries.remove(&key).is_some() {
                return true;
            }
        }
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.requested != path);
        self.entries.len() < before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn cache_key(path: &Path) -> Result<PathBuf, LoadError> {
    path.canonicalize().map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Seek, Write};
    use std::time::Duration;

    use super::*;

    fn panel_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn second_load_is_served_from_cache() {
        let file = panel_file("country,year\nIreland,2012\n");
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(file.path()).unwrap();
        let second = cache.get_or_load(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_forces_reload() {
        let file = panel_file("country,year\nIreland,2012\n");
        let mut cache = DatasetCache::new();

        let first = cache.get_or_load(file.path()).unwrap();
        assert!(cache.invalidate(file.path()));
        assert!(!cache.invalidate(file.path()));

        let second = cache.get_or_load(file.path()).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn changed_file_is_reloaded() {
        let mut file = panel_file("country,year\nIreland,2012\n");
        let mut cache = DatasetCache::new();
        let first = cache.get_or_load(file.path()).unwrap();

        file.as_file_mut().set_len(0).unwrap();
        file.rewind().unwrap();
        file.write_all(b"country,year\nIreland,2012\nFrance,2012\n").unwrap();
        file.flush().unwrap();
        file.as_file()
            .set_modified(SystemTime::now() + Duration::from_secs(10))
            .unwrap();

        let second = cache.get_or_load(file.path()).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_after_file_is_deleted() {
        let file = panel_file("country,year\nIreland,2012\n");
        let path = file.path().to_path_buf();
        let mut cache = DatasetCache::new();
        cache.get_or_load(&path).unwrap();

        file.close().unwrap();
        assert!(!path.exists());
        assert!(cache.invalidate(&path));
        assert!(cache.is_empty());
        assert!(!cache.invalidate(&path));
    }

    #[test]
    fn missing_file_is_not_cached() {
        let mut cache = DatasetCache::new();
        let err = cache
            .get_or_load(Path::new("/nonexistent/panel.csv"))
            .unwrap_err();
        assert!(matches!(err, LoadError::FileAccess { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_the_cache() {
        let file = panel_file("country,year\nIreland,2012\n");
        let mut cache = DatasetCache::new();
        cache.get_or_load(file.path()).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}
