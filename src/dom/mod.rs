//! DOM module - arena-based XML document
//!
//! Efficient owned DOM representation using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - String interning for names, attribute data, and text
//! - A precomputed parent map (nodes carry no parent link)

pub mod document;
pub mod node;
pub mod strings;

pub use document::Document;
pub use node::{Attr, Node, NodeId, NodeKind};
pub use strings::StringPool;
