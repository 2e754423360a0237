//! XML event types
//!
//! Event types for pull-parser style XML processing.

use crate::core::attributes::Attribute;
use std::borrow::Cow;

/// XML parsing event
#[derive(Debug, Clone)]
pub enum XmlEvent<'a> {
    /// Start of an element: <name attrs...>
    StartElement(StartElement<'a>),
    /// End of an element: </name>
    EndElement(EndElement<'a>),
    /// Empty element: <name attrs.../>
    EmptyElement(StartElement<'a>),
    /// Text content between tags
    Text(Cow<'a, [u8]>),
    /// CDATA section content
    CData(Cow<'a, [u8]>),
    /// Comment content
    Comment(Cow<'a, [u8]>),
    /// Processing instruction: <?target data?>
    ProcessingInstruction {
        /// PI target name
        target: &'a [u8],
    },
    /// XML declaration: <?xml version="1.0"?>
    XmlDeclaration,
    /// DOCTYPE declaration (not processed further)
    DocType,
}

/// Start element event data
#[derive(Debug, Clone)]
pub struct StartElement<'a> {
    /// Qualified element name (prefix included when present)
    pub name: &'a [u8],
    /// Element attributes in document order
    pub attributes: Vec<Attribute<'a>>,
}

impl<'a> StartElement<'a> {
    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }
}

/// End element event data
#[derive(Debug, Clone)]
pub struct EndElement<'a> {
    /// Qualified element name
    pub name: &'a [u8],
}

impl<'a> EndElement<'a> {
    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name).ok()
    }
}

impl<'a> XmlEvent<'a> {
    /// Check if this is a start or empty element event
    pub fn is_start_element(&self) -> bool {
        matches!(self, XmlEvent::StartElement(_) | XmlEvent::EmptyElement(_))
    }

    /// Get text content if applicable
    pub fn as_text(&self) -> Option<&[u8]> {
        match self {
            XmlEvent::Text(t) | XmlEvent::CData(t) => Some(t.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_element_name() {
        let elem = StartElement {
            name: b"svg:rect",
            attributes: vec![],
        };
        assert_eq!(elem.name_str(), Some("svg:rect"));
    }

    #[test]
    fn test_as_text() {
        let event = XmlEvent::Text(Cow::Borrowed(b"hello" as &[u8]));
        assert_eq!(event.as_text(), Some(b"hello" as &[u8]));
        let event = XmlEvent::DocType;
        assert_eq!(event.as_text(), None);
    }
}
