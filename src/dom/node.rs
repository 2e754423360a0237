//! XML node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.
//! Nodes carry no parent link; parent lookup goes through the document's
//! precomputed parent map.

/// Compact node identifier (index into the arena)
pub type NodeId = u32;

/// Type of XML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Synthetic document root (arena index 0)
    Document,
    /// Element node
    Element,
    /// Text content (CDATA sections are stored as text)
    Text,
}

/// An XML node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    /// Type of this node
    pub kind: NodeKind,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// String pool index: qualified tag for elements, content for text nodes
    pub name_id: u32,
    /// Start of this element's attributes in the attribute arena
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
}

impl Node {
    /// Create the synthetic document root node
    pub fn document() -> Self {
        Node {
            kind: NodeKind::Document,
            first_child: None,
            last_child: None,
            next_sibling: None,
            name_id: 0,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Create a new element node
    pub fn element(name_id: u32) -> Self {
        Node {
            kind: NodeKind::Element,
            first_child: None,
            last_child: None,
            next_sibling: None,
            name_id,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Create a new text node
    pub fn text(content_id: u32) -> Self {
        Node {
            kind: NodeKind::Text,
            first_child: None,
            last_child: None,
            next_sibling: None,
            name_id: content_id,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Check if this node has attributes
    #[inline]
    pub fn has_attributes(&self) -> bool {
        self.attr_count > 0
    }
}

/// Stored attribute, referencing the string pool
#[derive(Debug, Clone)]
pub struct Attr {
    /// String pool index for the attribute name
    pub name_id: u32,
    /// String pool index for the attribute value
    pub value_id: u32,
}
