//! XML attribute parsing
//!
//! Parses the attribute region of a tag (between the element name and the
//! closing '>' or '/>'). Names must be well-formed, values must be quoted,
//! and duplicate names within one tag are rejected, matching a strict
//! XML 1.0 parse without DTD defaults.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char};
use std::borrow::Cow;

/// A parsed XML attribute
#[derive(Debug, Clone)]
pub struct Attribute<'a> {
    /// Attribute name (may include a namespace prefix)
    pub name: Cow<'a, [u8]>,
    /// Attribute value, entities decoded
    pub value: Cow<'a, [u8]>,
}

impl<'a> Attribute<'a> {
    /// Get the name as a string
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(self.name.as_ref()).ok()
    }

    /// Get the value as a string
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(self.value.as_ref()).ok()
    }
}

/// Parse attributes from raw tag content (after the element name).
///
/// Input is the region between the element name and '>' or '/>'.
pub fn parse_attributes(input: &[u8]) -> Result<Vec<Attribute<'_>>, String> {
    let mut attrs: Vec<Attribute<'_>> = Vec::new();
    let mut pos = 0;

    loop {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() || input[pos] == b'/' {
            break;
        }

        // Attribute name
        if !is_name_start_char(input[pos]) {
            return Err("attribute name must start with letter, underscore, or colon".to_string());
        }
        let name_start = pos;
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        // '=' with optional surrounding whitespace
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() || input[pos] != b'=' {
            return Err(format!(
                "attribute {} has no value",
                String::from_utf8_lossy(name)
            ));
        }
        pos += 1;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        // Quoted value
        let quote = match input.get(pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err("attribute value must be quoted".to_string()),
        };
        pos += 1;
        let value_start = pos;
        while pos < input.len() && input[pos] != quote {
            if input[pos] == b'<' {
                return Err("attribute value cannot contain '<'".to_string());
            }
            pos += 1;
        }
        if pos >= input.len() {
            return Err("attribute value has mismatched quotes".to_string());
        }
        let value = decode_text(&input[value_start..pos])?;
        pos += 1;

        if attrs.iter().any(|a| a.name.as_ref() == name) {
            return Err(format!(
                "duplicate attribute: {}",
                String::from_utf8_lossy(name)
            ));
        }

        attrs.push(Attribute {
            name: Cow::Borrowed(name),
            value,
        });
    }

    Ok(attrs)
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_attribute() {
        let attrs = parse_attributes(b" id=\"1\"").unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs[0].name_str(), Some("id"));
        assert_eq!(attrs[0].value_str(), Some("1"));
    }

    #[test]
    fn test_multiple_attributes_preserve_order() {
        let attrs = parse_attributes(b" b=\"2\" a=\"1\" c=\"3\"").unwrap();
        let names: Vec<_> = attrs.iter().filter_map(|a| a.name_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_single_quotes() {
        let attrs = parse_attributes(b" key='value'").unwrap();
        assert_eq!(attrs[0].value_str(), Some("value"));
    }

    #[test]
    fn test_entity_in_value() {
        let attrs = parse_attributes(b" msg=\"a &amp; b\"").unwrap();
        assert_eq!(attrs[0].value_str(), Some("a & b"));
    }

    #[test]
    fn test_namespaced_name() {
        let attrs = parse_attributes(b" xlink:href=\"#top\"").unwrap();
        assert_eq!(attrs[0].name_str(), Some("xlink:href"));
    }

    #[test]
    fn test_duplicate_rejected() {
        assert!(parse_attributes(b" a=\"1\" a=\"2\"").is_err());
    }

    #[test]
    fn test_unquoted_rejected() {
        assert!(parse_attributes(b" a=1").is_err());
    }

    #[test]
    fn test_missing_value_rejected() {
        assert!(parse_attributes(b" disabled").is_err());
    }

    #[test]
    fn test_mismatched_quote_rejected() {
        assert!(parse_attributes(b" a=\"1").is_err());
    }
}
