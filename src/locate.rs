//! Element span location in raw text
//!
//! Given a match record and the raw document text, finds the byte span of
//! the element's source, from its opening `<` through the end of its close
//! tag (or self-closing terminator). This is a heuristic string search over
//! the buffer, not a tree lookup: the opening tag is reconstructed from the
//! record's tag name and attributes, and the end is found by scanning
//! forward with a tag-depth counter. Best-effort by design; markup-looking
//! text inside comments or CDATA can fool it.

use crate::search::MatchRecord;
use memchr::memmem;
use std::fmt::Write as _;
use std::ops::Range;
use tracing::warn;

/// Locate the source span of a matched element in raw document text.
///
/// Returns None when the reconstructed opening tag does not occur in the
/// buffer or no balanced end is found.
pub fn locate_element(text: &str, record: &MatchRecord) -> Option<Range<usize>> {
    let needle = opening_tag_needle(record);
    let start = match memmem::find(text.as_bytes(), needle.as_bytes()) {
        Some(pos) => pos,
        None => {
            warn!(tag = %record.name, "opening tag not found in buffer");
            return None;
        }
    };

    let end = scan_span_end(text.as_bytes(), start + needle.len())?;
    Some(start..end)
}

/// Reconstruct the opening-tag prefix `<name k="v" ...` from a record
fn opening_tag_needle(record: &MatchRecord) -> String {
    let mut needle = format!("<{}", record.name);
    for (key, value) in &record.attributes {
        let _ = write!(needle, " {}=\"{}\"", key, value);
    }
    needle
}

/// Scan forward from inside the opening tag, tracking tag depth until the
/// element closes. `</` and `/>` each close one level, `<` opens one.
fn scan_span_end(bytes: &[u8], mut pos: usize) -> Option<usize> {
    let mut depth = 1usize;

    while pos < bytes.len() {
        if bytes[pos..].starts_with(b"/>") {
            depth -= 1;
            pos += 2;
            if depth == 0 {
                return Some(pos);
            }
        } else if bytes[pos..].starts_with(b"</") {
            depth -= 1;
            if depth == 0 {
                // Include the close tag through its '>'
                let gt = memmem::find(&bytes[pos..], b">")?;
                return Some(pos + gt + 1);
            }
            pos += 2;
        } else if bytes[pos] == b'<' {
            depth += 1;
            pos += 1;
        } else {
            pos += 1;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::ElementRef;

    fn record(name: &str, attributes: Vec<(&str, &str)>) -> MatchRecord {
        MatchRecord {
            name: name.to_string(),
            value: String::new(),
            path: String::new(),
            xpath: String::new(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            element: ElementRef {
                node: 0,
                generation: 0,
            },
        }
    }

    #[test]
    fn test_locate_simple_element() {
        let text = "<root><a>x</a></root>";
        let span = locate_element(text, &record("a", vec![])).unwrap();
        assert_eq!(&text[span], "<a>x</a>");
    }

    #[test]
    fn test_locate_with_attributes() {
        let text = "<root><a id=\"2\">y</a></root>";
        let span = locate_element(text, &record("a", vec![("id", "2")])).unwrap();
        assert_eq!(&text[span], "<a id=\"2\">y</a>");
    }

    #[test]
    fn test_locate_nested_element_spans_children() {
        let text = "<root><outer><inner>x</inner></outer></root>";
        let span = locate_element(text, &record("outer", vec![])).unwrap();
        assert_eq!(&text[span], "<outer><inner>x</inner></outer>");
    }

    #[test]
    fn test_locate_self_closing() {
        let text = "<root><a/><b/></root>";
        let span = locate_element(text, &record("b", vec![])).unwrap();
        assert_eq!(&text[span], "<b/>");
    }

    #[test]
    fn test_locate_with_self_closing_child() {
        let text = "<root><a><b/><c/></a></root>";
        let span = locate_element(text, &record("a", vec![])).unwrap();
        assert_eq!(&text[span], "<a><b/><c/></a>");
    }

    #[test]
    fn test_locate_missing_element() {
        assert!(locate_element("<root/>", &record("ghost", vec![])).is_none());
    }

    #[test]
    fn test_attributes_disambiguate_siblings() {
        let text = "<r><a id=\"1\">x</a><a id=\"2\">y</a></r>";
        let span = locate_element(text, &record("a", vec![("id", "2")])).unwrap();
        assert_eq!(&text[span], "<a id=\"2\">y</a>");
    }
}
