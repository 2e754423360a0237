//! Slice reader
//!
//! Turns tokenizer output into XML events over a byte slice, parsing the
//! attribute region of each tag. Zero-copy where no entity decoding is
//! required.

use super::events::{EndElement, StartElement, XmlEvent};
use crate::core::attributes::parse_attributes;
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};
use crate::error::Error;

/// XML event reader over a byte slice
pub struct SliceReader<'a> {
    input: &'a [u8],
    tokenizer: Tokenizer<'a>,
}

impl<'a> SliceReader<'a> {
    /// Create a new reader for the given input
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Current byte position in the input
    pub fn position(&self) -> usize {
        self.tokenizer.position()
    }

    /// Get the next XML event, or None at end of input
    pub fn next_event(&mut self) -> Result<Option<XmlEvent<'a>>, Error> {
        let token = match self.tokenizer.next_token()? {
            Some(token) => token,
            None => return Ok(None),
        };

        let event = match token.kind {
            TokenKind::StartTag => {
                let attributes = self.parse_tag_attributes(&token)?;
                XmlEvent::StartElement(StartElement {
                    name: tag_name(&token)?,
                    attributes,
                })
            }
            TokenKind::EmptyTag => {
                let attributes = self.parse_tag_attributes(&token)?;
                XmlEvent::EmptyElement(StartElement {
                    name: tag_name(&token)?,
                    attributes,
                })
            }
            TokenKind::EndTag => XmlEvent::EndElement(EndElement {
                name: tag_name(&token)?,
            }),
            TokenKind::Text => XmlEvent::Text(tag_content(token)?),
            TokenKind::CData => XmlEvent::CData(tag_content(token)?),
            TokenKind::Comment => XmlEvent::Comment(tag_content(token)?),
            TokenKind::ProcessingInstruction => XmlEvent::ProcessingInstruction {
                target: tag_name(&token)?,
            },
            TokenKind::XmlDeclaration => XmlEvent::XmlDeclaration,
            TokenKind::DocType => XmlEvent::DocType,
        };

        Ok(Some(event))
    }

    /// Parse the attribute region of a tag token
    fn parse_tag_attributes(
        &self,
        token: &Token<'a>,
    ) -> Result<Vec<crate::core::attributes::Attribute<'a>>, Error> {
        let (start, end) = token.span;
        let name_len = token.name.map_or(0, <[u8]>::len);

        // Region between the element name and the closing '>' or '/>'
        let region_start = start + 1 + name_len;
        let region_end = if self.input[..end].ends_with(b"/>") {
            end - 2
        } else {
            end - 1
        };
        if region_start >= region_end {
            return Ok(Vec::new());
        }

        parse_attributes(&self.input[region_start..region_end]).map_err(|message| Error::Parse {
            message,
            position: region_start,
        })
    }
}

/// Extract the name a tag/PI token must carry
fn tag_name<'a>(token: &Token<'a>) -> Result<&'a [u8], Error> {
    token.name.ok_or_else(|| Error::Parse {
        message: "tag token missing name".to_string(),
        position: token.span.0,
    })
}

/// Extract the content a text-like token must carry
fn tag_content(token: Token<'_>) -> Result<std::borrow::Cow<'_, [u8]>, Error> {
    let position = token.span.0;
    token.content.ok_or_else(|| Error::Parse {
        message: "content token missing payload".to_string(),
        position,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &[u8]) -> Vec<XmlEvent<'_>> {
        let mut reader = SliceReader::new(input);
        let mut out = Vec::new();
        while let Some(event) = reader.next_event().unwrap() {
            out.push(event);
        }
        out
    }

    #[test]
    fn test_simple_element() {
        let evs = events(b"<a>x</a>");
        assert_eq!(evs.len(), 3);
        assert!(evs[0].is_start_element());
        assert_eq!(evs[1].as_text(), Some(b"x" as &[u8]));
    }

    #[test]
    fn test_attributes_parsed() {
        let evs = events(b"<a id=\"1\" class=\"two\"/>");
        match &evs[0] {
            XmlEvent::EmptyElement(elem) => {
                assert_eq!(elem.attributes.len(), 2);
                assert_eq!(elem.attributes[0].name_str(), Some("id"));
                assert_eq!(elem.attributes[1].value_str(), Some("two"));
            }
            other => panic!("expected empty element, got {:?}", other),
        }
    }

    #[test]
    fn test_entity_decoded_in_text() {
        let evs = events(b"<a>1 &lt; 2</a>");
        assert_eq!(evs[1].as_text(), Some(b"1 < 2" as &[u8]));
    }

    #[test]
    fn test_bad_attribute_is_parse_error() {
        let mut reader = SliceReader::new(b"<a id=1></a>");
        assert!(matches!(reader.next_event(), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_prolog_and_comment() {
        let evs = events(b"<?xml version=\"1.0\"?><!-- c --><r/>");
        assert!(matches!(evs[0], XmlEvent::XmlDeclaration));
        assert!(matches!(evs[1], XmlEvent::Comment(_)));
        assert!(matches!(evs[2], XmlEvent::EmptyElement(_)));
    }
}
