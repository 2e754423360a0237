//! Path derivation
//!
//! Converts a node reference into two independent display strings:
//! - A human-readable ancestor path with attribute annotations
//! - A position-indexed XPath-style string
//!
//! Both walk from the target node to the root through the document's parent
//! map. Output strings are opaque display values for tables and clipboard
//! copy, not inputs to a query engine.

use crate::dom::{Document, NodeId};
use std::fmt::Write as _;

/// Root marker prefixing both path forms
pub const PATH_ROOT: &str = "/";

/// Derives display paths for nodes of one document
pub struct PathResolver<'a> {
    doc: &'a Document,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver over the given document
    pub fn new(doc: &'a Document) -> Self {
        PathResolver { doc }
    }

    /// Human-readable root-to-node path.
    ///
    /// Each level shows the namespace-stripped tag, annotated with
    /// `[key="value" ...]` for attributes whose key is not a namespace
    /// declaration. The root level shows the bare qualified tag.
    pub fn path(&self, id: NodeId) -> String {
        let root = self.doc.root_element_id();
        let mut parts: Vec<String> = Vec::new();
        let mut current = id;

        loop {
            parts.push(self.annotated_name(current));
            match self.doc.parent(current) {
                None => break,
                Some(parent) if parent == root => {
                    parts.push(self.doc.name(root).unwrap_or_default().to_string());
                    break;
                }
                Some(parent) => current = parent,
            }
        }

        parts.reverse();
        format!("{}{}", PATH_ROOT, parts.join("/"))
    }

    /// Position-indexed XPath-style string.
    ///
    /// Non-root levels use the raw qualified tag with a 1-based sibling
    /// position, counted among element siblings sharing the same qualified
    /// tag. The index is always emitted, `[1]` included, so `[1]` does not
    /// imply a second sibling exists. The root level is the bare tag.
    pub fn xpath(&self, id: NodeId) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut current = id;

        loop {
            match self.doc.parent(current) {
                None => {
                    parts.push(self.doc.name(current).unwrap_or_default().to_string());
                    break;
                }
                Some(parent) => {
                    let position = self.sibling_position(parent, current);
                    parts.push(format!(
                        "{}[{}]",
                        self.doc.name(current).unwrap_or_default(),
                        position
                    ));
                    current = parent;
                }
            }
        }

        parts.reverse();
        format!("{}{}", PATH_ROOT, parts.join("/"))
    }

    /// Namespace-stripped tag with attribute annotations
    fn annotated_name(&self, id: NodeId) -> String {
        let mut out = self.doc.display_name(id).unwrap_or_default().to_string();

        let mut annotations = String::new();
        for (key, value) in self.doc.attribute_pairs(id) {
            if key.starts_with("xmlns") {
                continue;
            }
            if !annotations.is_empty() {
                annotations.push(' ');
            }
            let _ = write!(annotations, "{}=\"{}\"", key, value);
        }
        if !annotations.is_empty() {
            let _ = write!(out, " [{}]", annotations);
        }
        out
    }

    /// 1-based position among element siblings with the same qualified tag,
    /// counted in document order up to and including the node
    fn sibling_position(&self, parent: NodeId, id: NodeId) -> usize {
        let tag = self.doc.name(id);
        let mut position = 1;
        for sibling in self.doc.element_children(parent) {
            if sibling == id {
                break;
            }
            if self.doc.name(sibling) == tag {
                position += 1;
            }
        }
        position
    }
}
