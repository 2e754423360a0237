//! Result cache
//!
//! Memoizes the match-all enumeration per document path. Only the
//! match-all case is cached: it is the single large, frequently repeated
//! traversal; filtered queries are cheap to recompute and depend on too
//! many toggled flags to key profitably.
//!
//! Cleared unconditionally on every successful reparse.

use super::MatchRecord;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Number of distinct document paths retained
const CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(n) => n,
    None => unreachable!(),
};

/// LRU cache of match-all result lists keyed by document path
pub struct ResultCache {
    inner: LruCache<PathBuf, Arc<Vec<MatchRecord>>>,
}

impl ResultCache {
    /// Create an empty cache
    pub fn new() -> Self {
        ResultCache {
            inner: LruCache::new(CACHE_CAPACITY),
        }
    }

    /// Look up the match-all results for a document path
    pub fn get(&mut self, path: &Path) -> Option<Arc<Vec<MatchRecord>>> {
        self.inner.get(path).cloned()
    }

    /// Store the match-all results for a document path
    pub fn put(&mut self, path: PathBuf, results: Arc<Vec<MatchRecord>>) {
        self.inner.put(path, results);
    }

    /// Drop all cached results
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ElementRef;

    fn record(name: &str) -> MatchRecord {
        MatchRecord {
            name: name.to_string(),
            value: String::new(),
            path: format!("/{}", name),
            xpath: format!("/{}", name),
            attributes: Vec::new(),
            element: ElementRef {
                node: 1,
                generation: 1,
            },
        }
    }

    #[test]
    fn test_put_and_get() {
        let mut cache = ResultCache::new();
        let path = PathBuf::from("/tmp/a.xml");
        cache.put(path.clone(), Arc::new(vec![record("a")]));
        let hit = cache.get(&path).unwrap();
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].name, "a");
    }

    #[test]
    fn test_miss_for_unknown_path() {
        let mut cache = ResultCache::new();
        assert!(cache.get(Path::new("/tmp/other.xml")).is_none());
    }

    #[test]
    fn test_clear() {
        let mut cache = ResultCache::new();
        cache.put(PathBuf::from("/tmp/a.xml"), Arc::new(vec![record("a")]));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(Path::new("/tmp/a.xml")).is_none());
    }

    #[test]
    fn test_distinct_paths_keyed_separately() {
        let mut cache = ResultCache::new();
        cache.put(PathBuf::from("/tmp/a.xml"), Arc::new(vec![record("a")]));
        cache.put(PathBuf::from("/tmp/b.xml"), Arc::new(vec![record("b")]));
        assert_eq!(cache.get(Path::new("/tmp/a.xml")).unwrap()[0].name, "a");
        assert_eq!(cache.get(Path::new("/tmp/b.xml")).unwrap()[0].name, "b");
    }
}
