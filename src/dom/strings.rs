//! String interning pool
//!
//! Deduplicating storage for element names, attribute names/values, and text
//! content. Interned data lives in one contiguous buffer; lookups go through
//! a hash index that tolerates the rare collision.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// String interning pool
///
/// Entry 0 is reserved for the empty string.
#[derive(Debug, Default)]
pub struct StringPool {
    /// (offset, len) into `data`, indexed by string ID
    entries: Vec<(u32, u32)>,
    /// Buffer holding all interned bytes
    data: Vec<u8>,
    /// Content hash -> IDs with that hash
    hash_index: HashMap<u64, Vec<u32>>,
}

impl StringPool {
    /// Create a new empty string pool
    pub fn new() -> Self {
        let mut pool = StringPool {
            entries: Vec::with_capacity(256),
            data: Vec::with_capacity(4096),
            hash_index: HashMap::new(),
        };
        pool.entries.push((0, 0));
        pool
    }

    #[inline]
    fn compute_hash(s: &[u8]) -> u64 {
        use std::collections::hash_map::DefaultHasher;
        let mut hasher = DefaultHasher::new();
        s.hash(&mut hasher);
        hasher.finish()
    }

    /// Intern a byte string, returning its ID (deduplicated)
    pub fn intern(&mut self, s: &[u8]) -> u32 {
        if s.is_empty() {
            return 0;
        }

        let hash = Self::compute_hash(s);
        if let Some(ids) = self.hash_index.get(&hash) {
            for &id in ids {
                if self.get(id) == Some(s) {
                    return id;
                }
            }
        }

        let offset = self.data.len() as u32;
        self.data.extend_from_slice(s);
        let id = self.entries.len() as u32;
        self.entries.push((offset, s.len() as u32));
        self.hash_index.entry(hash).or_default().push(id);
        id
    }

    /// Get a string by ID
    pub fn get(&self, id: u32) -> Option<&[u8]> {
        if id == 0 {
            return Some(b"");
        }
        let &(offset, len) = self.entries.get(id as usize)?;
        let start = offset as usize;
        let end = start + len as usize;
        self.data.get(start..end)
    }

    /// Get a string by ID as UTF-8
    pub fn get_str(&self, id: u32) -> Option<&str> {
        self.get(id).and_then(|b| std::str::from_utf8(b).ok())
    }

    /// Number of unique strings stored (including the reserved empty entry)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the pool holds nothing beyond the reserved empty entry
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_and_get() {
        let mut pool = StringPool::new();
        let id = pool.intern(b"hello");
        assert!(id > 0);
        assert_eq!(pool.get(id), Some(b"hello" as &[u8]));
        assert_eq!(pool.get_str(id), Some("hello"));
    }

    #[test]
    fn test_intern_deduplicates() {
        let mut pool = StringPool::new();
        let id1 = pool.intern(b"tag");
        let id2 = pool.intern(b"tag");
        assert_eq!(id1, id2);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_distinct_strings() {
        let mut pool = StringPool::new();
        let id1 = pool.intern(b"hello");
        let id2 = pool.intern(b"world");
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_empty_string_reserved() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern(b""), 0);
        assert_eq!(pool.get(0), Some(b"" as &[u8]));
        assert!(pool.is_empty());
    }
}
