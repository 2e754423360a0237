//! XML document - arena-based DOM representation
//!
//! Owned DOM storage with:
//! - Arena allocation for nodes, addressed by NodeId
//! - String interning for names, attribute data, and text
//! - A parent map precomputed in one traversal at parse time (nodes
//!   themselves carry no parent link)
//!
//! Comments and processing instructions are validated but not materialized;
//! CDATA sections are stored as text, matching the element/text tree the
//! search engine operates on.

use super::node::{Attr, Node, NodeId, NodeKind};
use super::strings::StringPool;
use crate::error::Error;
use crate::reader::{SliceReader, XmlEvent};
use std::borrow::Cow;

/// A parsed XML document in arena form
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    attrs: Vec<Attr>,
    strings: StringPool,
    /// Parent of each node, by arena index; None for the document node
    parents: Vec<Option<NodeId>>,
    root_element: NodeId,
}

impl Document {
    /// Parse an XML document from a byte slice.
    ///
    /// The parse is strict: mismatched tags, multiple roots, text outside the
    /// root element, and undecodable entities all fail with `Error::Parse`.
    pub fn parse(input: &[u8]) -> Result<Self, Error> {
        let mut nodes = vec![Node::document()];
        let mut attrs: Vec<Attr> = Vec::with_capacity(64);
        let mut strings = StringPool::new();
        let mut root_element: Option<NodeId> = None;

        let mut reader = SliceReader::new(input);
        // Open elements; index 0 is the synthetic document node
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(event) = reader.next_event()? {
            match event {
                XmlEvent::StartElement(_) | XmlEvent::EmptyElement(_)
                    if stack.len() == 1 && root_element.is_some() =>
                {
                    return Err(Error::Parse {
                        message: "content not allowed after root element".to_string(),
                        position: reader.position(),
                    });
                }

                XmlEvent::StartElement(elem) => {
                    let id = append_element(&mut nodes, &mut attrs, &mut strings, &stack, &elem);
                    if stack.len() == 1 {
                        root_element = Some(id);
                    }
                    stack.push(id);
                }

                XmlEvent::EmptyElement(elem) => {
                    let id = append_element(&mut nodes, &mut attrs, &mut strings, &stack, &elem);
                    if stack.len() == 1 {
                        root_element = Some(id);
                    }
                }

                XmlEvent::EndElement(end) => {
                    let open_id = match stack.last() {
                        Some(&id) if id != 0 => id,
                        _ => {
                            return Err(Error::Parse {
                                message: format!(
                                    "unexpected end tag: </{}>",
                                    String::from_utf8_lossy(end.name)
                                ),
                                position: reader.position(),
                            })
                        }
                    };
                    let end_name_id = strings.intern(end.name);
                    if nodes[open_id as usize].name_id != end_name_id {
                        let open_name = strings
                            .get_str(nodes[open_id as usize].name_id)
                            .unwrap_or_default()
                            .to_string();
                        return Err(Error::Parse {
                            message: format!(
                                "tag mismatch: <{}> closed with </{}>",
                                open_name,
                                String::from_utf8_lossy(end.name)
                            ),
                            position: reader.position(),
                        });
                    }
                    stack.pop();
                }

                XmlEvent::Text(content) | XmlEvent::CData(content) => {
                    if stack.len() == 1 {
                        let is_whitespace = content
                            .iter()
                            .all(|&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
                        if is_whitespace {
                            continue;
                        }
                        return Err(Error::Parse {
                            message: "text content not allowed outside root element".to_string(),
                            position: reader.position(),
                        });
                    }
                    let content_id = strings.intern(content.as_ref());
                    let id = nodes.len() as NodeId;
                    nodes.push(Node::text(content_id));
                    link_child(&mut nodes, stack[stack.len() - 1], id);
                }

                // Validated by the tokenizer, not materialized in the tree
                XmlEvent::Comment(_)
                | XmlEvent::ProcessingInstruction { .. }
                | XmlEvent::XmlDeclaration
                | XmlEvent::DocType => {}
            }
        }

        if stack.len() > 1 {
            let open_name = strings
                .get_str(nodes[stack[stack.len() - 1] as usize].name_id)
                .unwrap_or_default();
            return Err(Error::Parse {
                message: format!("unclosed tag: <{}>", open_name),
                position: reader.position(),
            });
        }

        let root_element = root_element.ok_or_else(|| Error::Parse {
            message: "no element found".to_string(),
            position: reader.position(),
        })?;

        let parents = build_parent_map(&nodes);

        Ok(Document {
            nodes,
            attrs,
            strings,
            parents,
            root_element,
        })
    }

    /// ID of the root element
    pub fn root_element_id(&self) -> NodeId {
        self.root_element
    }

    /// Get a node by ID
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Parent of a node; None for the root element and the document node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        match self.parents.get(id as usize).copied().flatten() {
            Some(0) | None => None,
            other => other,
        }
    }

    /// Qualified tag name of an element (prefix included when present)
    pub fn name(&self, id: NodeId) -> Option<&str> {
        let node = self.node(id)?;
        if !node.is_element() {
            return None;
        }
        self.strings.get_str(node.name_id)
    }

    /// Display tag name: the qualified name with its namespace prefix stripped
    pub fn display_name(&self, id: NodeId) -> Option<&str> {
        let name = self.name(id)?;
        match name.find(':') {
            Some(pos) => Some(&name[pos + 1..]),
            None => Some(name),
        }
    }

    /// Attributes of an element, in document order
    pub fn attributes(&self, id: NodeId) -> &[Attr] {
        match self.node(id) {
            Some(node) if node.has_attributes() => {
                let start = node.attr_start as usize;
                let end = start + node.attr_count as usize;
                &self.attrs[start..end]
            }
            _ => &[],
        }
    }

    /// Attribute (name, value) pairs of an element, in document order
    pub fn attribute_pairs(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.attributes(id)
            .iter()
            .filter_map(|attr| {
                let name = self.strings.get_str(attr.name_id)?;
                let value = self.strings.get_str(attr.value_id)?;
                Some((name, value))
            })
            .collect()
    }

    /// Text content of an element: the concatenated text nodes preceding the
    /// first child element. None when no such text exists.
    pub fn element_text(&self, id: NodeId) -> Option<Cow<'_, str>> {
        let mut pieces: Vec<&str> = Vec::new();
        for child_id in self.children(id) {
            let child = self.node(child_id)?;
            match child.kind {
                NodeKind::Text => {
                    pieces.push(self.strings.get_str(child.name_id).unwrap_or_default());
                }
                _ => break,
            }
        }
        match pieces.len() {
            0 => None,
            1 => Some(Cow::Borrowed(pieces[0])),
            _ => Some(Cow::Owned(pieces.concat())),
        }
    }

    /// Iterate over direct children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.node(id).and_then(|n| n.first_child);
        ChildIter {
            doc: self,
            next: first,
        }
    }

    /// Iterate over direct element children of a node
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .filter(|&child| self.node(child).is_some_and(Node::is_element))
    }

    /// Iterate over all descendants of a node in document (pre-order) order
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        DescendantIter { doc: self, stack }
    }

    /// Iterate over descendant elements of a node in document order
    pub fn descendant_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id)
            .filter(|&child| self.node(child).is_some_and(Node::is_element))
    }

    /// Total number of nodes, including the synthetic document node
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Append an element node built from a start/empty element event
fn append_element(
    nodes: &mut Vec<Node>,
    attrs: &mut Vec<Attr>,
    strings: &mut StringPool,
    stack: &[NodeId],
    elem: &crate::reader::events::StartElement<'_>,
) -> NodeId {
    let name_id = strings.intern(elem.name);
    let mut node = Node::element(name_id);

    node.attr_start = attrs.len() as u32;
    node.attr_count = elem.attributes.len().min(u16::MAX as usize) as u16;
    for attr in &elem.attributes {
        attrs.push(Attr {
            name_id: strings.intern(attr.name.as_ref()),
            value_id: strings.intern(attr.value.as_ref()),
        });
    }

    let id = nodes.len() as NodeId;
    nodes.push(node);
    link_child(nodes, stack[stack.len() - 1], id);
    id
}

/// Link a child node to its parent via first/last child and sibling links
fn link_child(nodes: &mut [Node], parent_id: NodeId, child_id: NodeId) {
    let last_child = nodes[parent_id as usize].last_child;
    if let Some(last_id) = last_child {
        nodes[last_id as usize].next_sibling = Some(child_id);
    } else {
        nodes[parent_id as usize].first_child = Some(child_id);
    }
    nodes[parent_id as usize].last_child = Some(child_id);
}

/// Precompute the parent of every node in one pass over the arena.
///
/// The nodes expose no parent link; walking child lists once gives the full
/// map, which path derivation then consults per ancestor level.
fn build_parent_map(nodes: &[Node]) -> Vec<Option<NodeId>> {
    let mut parents: Vec<Option<NodeId>> = vec![None; nodes.len()];
    for (index, node) in nodes.iter().enumerate() {
        let mut child = node.first_child;
        while let Some(child_id) = child {
            parents[child_id as usize] = Some(index as NodeId);
            child = nodes[child_id as usize].next_sibling;
        }
    }
    parents
}

/// Iterator over direct children
pub struct ChildIter<'d> {
    doc: &'d Document,
    next: Option<NodeId>,
}

impl<'d> Iterator for ChildIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over descendants, depth-first pre-order
pub struct DescendantIter<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for DescendantIter<'d> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        let children: Vec<NodeId> = self.doc.children(current).collect();
        for &child in children.iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let doc = Document::parse(b"<root>hello</root>").unwrap();
        let root = doc.root_element_id();
        assert_eq!(doc.name(root), Some("root"));
        assert_eq!(doc.element_text(root).as_deref(), Some("hello"));
    }

    #[test]
    fn test_parse_nested() {
        let doc = Document::parse(b"<a><b><c/></b></a>").unwrap();
        let root = doc.root_element_id();
        let children: Vec<_> = doc.element_children(root).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.name(children[0]), Some("b"));
    }

    #[test]
    fn test_descendant_order_is_document_order() {
        let doc = Document::parse(b"<root><a/><b><c/></b><d/></root>").unwrap();
        let root = doc.root_element_id();
        let names: Vec<_> = doc
            .descendant_elements(root)
            .filter_map(|id| doc.name(id))
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_parent_map() {
        let doc = Document::parse(b"<root><a><b/></a></root>").unwrap();
        let root = doc.root_element_id();
        let a = doc.element_children(root).next().unwrap();
        let b = doc.element_children(a).next().unwrap();
        assert_eq!(doc.parent(b), Some(a));
        assert_eq!(doc.parent(a), Some(root));
        assert_eq!(doc.parent(root), None);
    }

    #[test]
    fn test_attributes_in_document_order() {
        let doc = Document::parse(b"<r beta=\"2\" alpha=\"1\"/>").unwrap();
        let pairs = doc.attribute_pairs(doc.root_element_id());
        assert_eq!(pairs, vec![("beta", "2"), ("alpha", "1")]);
    }

    #[test]
    fn test_display_name_strips_prefix() {
        let doc = Document::parse(b"<svg:rect xmlns:svg=\"http://www.w3.org/2000/svg\"/>")
            .unwrap();
        let root = doc.root_element_id();
        assert_eq!(doc.name(root), Some("svg:rect"));
        assert_eq!(doc.display_name(root), Some("rect"));
    }

    #[test]
    fn test_element_text_stops_at_first_child_element() {
        let doc = Document::parse(b"<a>x<b/>y</a>").unwrap();
        let root = doc.root_element_id();
        assert_eq!(doc.element_text(root).as_deref(), Some("x"));
    }

    #[test]
    fn test_element_text_merges_around_comment() {
        let doc = Document::parse(b"<a>x<!--c-->y</a>").unwrap();
        let root = doc.root_element_id();
        assert_eq!(doc.element_text(root).as_deref(), Some("xy"));
    }

    #[test]
    fn test_element_text_none_without_text() {
        let doc = Document::parse(b"<a><b/></a>").unwrap();
        assert!(doc.element_text(doc.root_element_id()).is_none());
    }

    #[test]
    fn test_cdata_is_text() {
        let doc = Document::parse(b"<a><![CDATA[1 < 2]]></a>").unwrap();
        assert_eq!(
            doc.element_text(doc.root_element_id()).as_deref(),
            Some("1 < 2")
        );
    }

    #[test]
    fn test_tag_mismatch_rejected() {
        let err = Document::parse(b"<a><b></a></b>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("tag mismatch"));
    }

    #[test]
    fn test_multiple_roots_rejected() {
        assert!(Document::parse(b"<a/><b/>").is_err());
    }

    #[test]
    fn test_unclosed_tag_rejected() {
        let err = Document::parse(b"<a><b>").unwrap_err();
        assert!(err.to_string().contains("unclosed"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(Document::parse(b"").is_err());
        assert!(Document::parse(b"   \n").is_err());
    }

    #[test]
    fn test_text_outside_root_rejected() {
        assert!(Document::parse(b"<a/>trailing").is_err());
    }

    #[test]
    fn test_prolog_accepted() {
        let doc = Document::parse(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<r/>").unwrap();
        assert_eq!(doc.name(doc.root_element_id()), Some("r"));
    }
}
