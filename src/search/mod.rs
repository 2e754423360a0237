//! Element search engine
//!
//! Enumerates matching elements for a query over a parsed document and
//! assembles one match record per hit. Two modes:
//! - Exact: structural lookup of descendants whose qualified tag equals the
//!   query, case-sensitive; target flags are ignored.
//! - Partial: pre-order traversal testing the query as a case-insensitive
//!   substring against the selected fields (tag name, text value, attribute
//!   keys/values).
//!
//! Result order is always document order, never relevance.

pub mod cache;

pub use cache::ResultCache;

use crate::dom::{Document, NodeId};
use crate::resolve::PathResolver;

/// Literal query value meaning "match every element"
pub const MATCH_ALL: &str = "*";

/// One search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Tag text to search for; empty means "match all" under the default
    /// policy, `*` always does
    pub tag: String,
    /// Partial mode: test the query against element tag names
    pub match_name: bool,
    /// Partial mode: test the query against attribute keys and values
    pub match_attributes: bool,
    /// Partial mode: test the query against element text
    pub match_value: bool,
    /// Substring matching when true, exact structural lookup when false
    pub partial: bool,
}

impl SearchQuery {
    /// Exact-match query for a tag
    pub fn exact(tag: impl Into<String>) -> Self {
        SearchQuery {
            tag: tag.into(),
            match_name: false,
            match_attributes: false,
            match_value: false,
            partial: false,
        }
    }

    /// Partial-match query; callers enable the target fields to test
    pub fn partial(tag: impl Into<String>) -> Self {
        SearchQuery {
            tag: tag.into(),
            match_name: false,
            match_attributes: false,
            match_value: false,
            partial: true,
        }
    }

    /// Query matching every element in the document
    pub fn match_all() -> Self {
        Self::exact(MATCH_ALL)
    }
}

/// Search behavior configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    /// Treat an empty query as "match all" instead of failing
    pub empty_query_matches_all: bool,
}

impl Default for SearchPolicy {
    fn default() -> Self {
        SearchPolicy {
            empty_query_matches_all: true,
        }
    }
}

/// Weak handle from a match record back to its source element.
///
/// Valid only against the document generation it was created from; the
/// store rejects handles from a superseded load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRef {
    /// Arena index of the element
    pub node: NodeId,
    /// Document generation the index belongs to
    pub generation: u64,
}

/// One matched element, ready for rendering or history storage.
///
/// Produced fresh per search call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Display tag name (namespace prefix stripped)
    pub name: String,
    /// Trimmed text content, or empty string
    pub value: String,
    /// Human-readable root-to-node path
    pub path: String,
    /// Position-indexed XPath-style string
    pub xpath: String,
    /// Attribute pairs in document order
    pub attributes: Vec<(String, String)>,
    /// Weak handle back to the source element
    pub element: ElementRef,
}

/// Enumerate every element in document order (root included)
pub fn collect_all(doc: &Document, generation: u64) -> Vec<MatchRecord> {
    let resolver = PathResolver::new(doc);
    let root = doc.root_element_id();
    std::iter::once(root)
        .chain(doc.descendant_elements(root))
        .map(|id| build_record(doc, &resolver, id, generation))
        .collect()
}

/// Exact structural lookup: descendants of the root whose qualified tag
/// equals the query, case-sensitive
pub fn find_exact(doc: &Document, tag: &str, generation: u64) -> Vec<MatchRecord> {
    let resolver = PathResolver::new(doc);
    let root = doc.root_element_id();
    doc.descendant_elements(root)
        .filter(|&id| doc.name(id) == Some(tag))
        .map(|id| build_record(doc, &resolver, id, generation))
        .collect()
}

/// Partial multi-field lookup over root and all descendants
pub fn find_partial(doc: &Document, query: &SearchQuery, generation: u64) -> Vec<MatchRecord> {
    let resolver = PathResolver::new(doc);
    let root = doc.root_element_id();
    let needle = query.tag.to_lowercase();

    std::iter::once(root)
        .chain(doc.descendant_elements(root))
        .filter(|&id| element_matches(doc, id, &needle, query))
        .map(|id| build_record(doc, &resolver, id, generation))
        .collect()
}

/// Test one element against the enabled target fields.
///
/// The name/value checks run first; attributes are consulted only when
/// neither hits. Within one attribute the key is tested before the value.
fn element_matches(doc: &Document, id: NodeId, needle: &str, query: &SearchQuery) -> bool {
    if query.match_name {
        if let Some(name) = doc.name(id) {
            if name.to_lowercase().contains(needle) {
                return true;
            }
        }
    }
    if query.match_value {
        if let Some(text) = doc.element_text(id) {
            if text.to_lowercase().contains(needle) {
                return true;
            }
        }
    }
    if query.match_attributes {
        for (key, value) in doc.attribute_pairs(id) {
            if key.to_lowercase().contains(needle) {
                return true;
            }
            if value.to_lowercase().contains(needle) {
                return true;
            }
        }
    }
    false
}

/// Assemble the match record for one element
fn build_record(
    doc: &Document,
    resolver: &PathResolver<'_>,
    id: NodeId,
    generation: u64,
) -> MatchRecord {
    let value = doc
        .element_text(id)
        .map(|text| text.trim().to_string())
        .unwrap_or_default();
    let attributes = doc
        .attribute_pairs(id)
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    MatchRecord {
        name: doc.display_name(id).unwrap_or_default().to_string(),
        value,
        path: resolver.path(id),
        xpath: resolver.xpath(id),
        attributes,
        element: ElementRef {
            node: id,
            generation,
        },
    }
}
