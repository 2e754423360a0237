//! Parsed document store
//!
//! Owns the in-memory parse tree for the currently loaded file, the
//! match-all result cache, and the generation counter that invalidates
//! stale element handles. At most one document is live per store; loading
//! a new path replaces the tree, loading the same path while a tree is
//! resident is a cheap no-op success.
//!
//! All operations are synchronous and single-threaded; a multi-threaded
//! embedder wraps the whole store in one mutex so loads and searches stay
//! mutually exclusive.

use crate::dom::{Document, NodeId};
use crate::error::{Error, Result};
use crate::search::{
    self, ElementRef, MatchRecord, ResultCache, SearchPolicy, SearchQuery, MATCH_ALL,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Number of bytes sniffed when the extension does not identify XML
const SNIFF_LEN: usize = 1000;

/// Store for the single live document and its search state
pub struct DocumentStore {
    path: Option<PathBuf>,
    document: Option<Document>,
    generation: u64,
    cache: ResultCache,
    policy: SearchPolicy,
}

impl DocumentStore {
    /// Create an empty store with the default search policy
    pub fn new() -> Self {
        Self::with_policy(SearchPolicy::default())
    }

    /// Create an empty store with an explicit search policy
    pub fn with_policy(policy: SearchPolicy) -> Self {
        DocumentStore {
            path: None,
            document: None,
            generation: 0,
            cache: ResultCache::new(),
            policy,
        }
    }

    /// Check if a document is currently loaded
    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    /// Path of the currently loaded file
    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The live parse tree, when one is resident
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Generation of the live parse tree; bumped on every reparse
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolve a weak element handle against the live tree.
    ///
    /// Returns None for handles minted from a superseded load.
    pub fn resolve(&self, element: &ElementRef) -> Option<NodeId> {
        if element.generation != self.generation {
            return None;
        }
        let doc = self.document.as_ref()?;
        doc.node(element.node).filter(|n| n.is_element())?;
        Some(element.node)
    }

    /// Load an XML file, replacing any current document.
    ///
    /// Re-loading the already-loaded path while a tree is resident succeeds
    /// without a reparse and leaves the cache and generation untouched. On
    /// any failure the previously loaded document is left as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        if self.document.is_some() && self.path.as_deref() == Some(canonical.as_path()) {
            debug!(path = %canonical.display(), "document already loaded, skipping reparse");
            return Ok(());
        }

        if !has_xml_extension(path) && !sniff_xml_content(path) {
            warn!(path = %path.display(), "content sniff rejected file as non-XML");
            return Err(Error::NotXml {
                path: path.to_path_buf(),
            });
        }

        let document = parse_file(&canonical)?;
        self.install(canonical, document);
        Ok(())
    }

    /// Force a reparse of the currently loaded path, picking up external
    /// edits. Fails with `NoDocumentLoaded` when nothing is resident; on
    /// parse failure the previous document stays live.
    pub fn reload(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(Error::NoDocumentLoaded)?;
        if !path.exists() {
            return Err(Error::FileNotFound { path });
        }
        let document = parse_file(&path)?;
        self.install(path, document);
        Ok(())
    }

    /// Swap in a freshly parsed document, bumping the generation and
    /// clearing the match-all cache
    fn install(&mut self, path: PathBuf, document: Document) {
        debug!(
            path = %path.display(),
            nodes = document.node_count(),
            "document loaded"
        );
        self.path = Some(path);
        self.document = Some(document);
        self.generation += 1;
        self.cache.clear();
    }

    /// Execute a search over the loaded document.
    ///
    /// Returns the matched records in document order, or an error; never
    /// both. The match-all variant is served from the result cache when the
    /// same document was enumerated before.
    pub fn search(&mut self, query: &SearchQuery) -> Result<Arc<Vec<MatchRecord>>> {
        if self.document.is_none() {
            return Err(Error::NoDocumentLoaded);
        }

        let tag = if query.tag.is_empty() {
            if !self.policy.empty_query_matches_all {
                return Err(Error::MissingQuery);
            }
            MATCH_ALL
        } else {
            query.tag.as_str()
        };

        if tag == MATCH_ALL {
            return self.search_all();
        }

        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| Error::Search("document vanished during search".to_string()))?;
        let records = if query.partial {
            search::find_partial(doc, query, self.generation)
        } else {
            search::find_exact(doc, tag, self.generation)
        };
        Ok(Arc::new(records))
    }

    /// Match-all enumeration through the result cache
    fn search_all(&mut self) -> Result<Arc<Vec<MatchRecord>>> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| Error::Search("loaded document has no path".to_string()))?;

        if let Some(hit) = self.cache.get(&path) {
            debug!(path = %path.display(), results = hit.len(), "match-all served from cache");
            return Ok(hit);
        }

        let doc = self
            .document
            .as_ref()
            .ok_or_else(|| Error::Search("document vanished during search".to_string()))?;
        let records = Arc::new(search::collect_all(doc, self.generation));
        self.cache.put(path, Arc::clone(&records));
        Ok(records)
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and parse a file into a document
fn parse_file(path: &Path) -> Result<Document> {
    let bytes = fs::read(path)?;
    Document::parse(&bytes)
}

/// Check the file extension for `.xml`, case-insensitive
fn has_xml_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("xml"))
        .unwrap_or(false)
}

/// Sniff the first bytes of the file for an XML prolog or any markup
fn sniff_xml_content(path: &Path) -> bool {
    let Ok(bytes) = fs::read(path) else {
        return false;
    };
    let head = &bytes[..bytes.len().min(SNIFF_LEN)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start();
    trimmed.starts_with("<?xml") || text.contains('<')
}
