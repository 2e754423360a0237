//! xmlscope - XML element search with path/XPath derivation
//!
//! Core of a desktop XML browser: load a document, search elements by
//! tag/attribute/value with exact or partial matching, and derive a
//! human-readable path plus a position-indexed XPath string for every match.
//!
//! Layers:
//! - `core` / `reader`: strict pull parser over a byte slice
//! - `dom`: arena document with a precomputed parent map
//! - `store`: the single live document, generation counter, result cache
//! - `search`: match enumeration and record assembly
//! - `resolve`: path/XPath synthesis
//! - `locate`: element source-span lookup for the editor
//! - `history`: flat-file record of past searches
//!
//! ```
//! use xmlscope::{DocumentStore, SearchQuery};
//!
//! # fn main() -> xmlscope::Result<()> {
//! # let dir = std::env::temp_dir();
//! # let path = dir.join("xmlscope_doc_example.xml");
//! # std::fs::write(&path, "<root><a id=\"1\">x</a><a id=\"2\">y</a></root>")?;
//! let mut store = DocumentStore::new();
//! store.load(&path)?;
//! let results = store.search(&SearchQuery::exact("a"))?;
//! assert_eq!(results[0].xpath, "/root/a[1]");
//! # std::fs::remove_file(&path)?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod history;
pub mod locate;
pub mod reader;
pub mod resolve;
pub mod search;
pub mod store;

pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use history::{HistoryRecord, HistoryStore};
pub use locate::locate_element;
pub use resolve::{PathResolver, PATH_ROOT};
pub use search::{ElementRef, MatchRecord, SearchPolicy, SearchQuery, MATCH_ALL};
pub use store::DocumentStore;
