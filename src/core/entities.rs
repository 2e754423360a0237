//! XML entity decoding
//!
//! Decodes the five predefined entities (&lt; &gt; &amp; &quot; &apos;)
//! and numeric character references (&#123; &#x7B;).
//!
//! Uses Cow for zero-copy when no entities are present. There is no DTD
//! processing, so an undeclared named entity is a parse fault.

use memchr::memchr;
use std::borrow::Cow;

/// Decode text content, handling entity references.
///
/// Returns Borrowed if no entities are present (zero-copy),
/// Owned if entities were decoded, Err for malformed or unknown references.
#[inline]
pub fn decode_text(input: &[u8]) -> Result<Cow<'_, [u8]>, String> {
    // Fast path: no ampersand, nothing to decode
    if memchr(b'&', input).is_none() {
        return Ok(Cow::Borrowed(input));
    }
    decode_entities(input).map(Cow::Owned)
}

/// Decode all entity references in the input
fn decode_entities(input: &[u8]) -> Result<Vec<u8>, String> {
    let mut result = Vec::with_capacity(input.len());
    let mut pos = 0;

    while pos < input.len() {
        match memchr(b'&', &input[pos..]) {
            Some(amp_offset) => {
                result.extend_from_slice(&input[pos..pos + amp_offset]);
                pos += amp_offset;

                let semi_offset = memchr(b';', &input[pos..])
                    .ok_or_else(|| "unterminated entity reference".to_string())?;
                let entity = &input[pos + 1..pos + semi_offset];
                let decoded = decode_entity(entity)?;
                result.extend_from_slice(decoded.as_bytes());
                pos += semi_offset + 1;
            }
            None => {
                result.extend_from_slice(&input[pos..]);
                break;
            }
        }
    }

    Ok(result)
}

/// Decode a single entity (the text between '&' and ';')
fn decode_entity(entity: &[u8]) -> Result<String, String> {
    if entity.is_empty() {
        return Err("empty entity reference".to_string());
    }

    if entity[0] == b'#' {
        return decode_numeric_entity(&entity[1..]);
    }

    match entity {
        b"lt" => Ok("<".to_string()),
        b"gt" => Ok(">".to_string()),
        b"amp" => Ok("&".to_string()),
        b"quot" => Ok("\"".to_string()),
        b"apos" => Ok("'".to_string()),
        other => Err(format!(
            "undefined entity: &{};",
            String::from_utf8_lossy(other)
        )),
    }
}

/// Decode a numeric character reference (the text after '&#')
fn decode_numeric_entity(digits: &[u8]) -> Result<String, String> {
    let code = if digits.first() == Some(&b'x') || digits.first() == Some(&b'X') {
        let hex = std::str::from_utf8(&digits[1..])
            .map_err(|_| "invalid character reference".to_string())?;
        u32::from_str_radix(hex, 16).map_err(|_| "invalid character reference".to_string())?
    } else {
        let dec = std::str::from_utf8(digits)
            .map_err(|_| "invalid character reference".to_string())?;
        dec.parse::<u32>()
            .map_err(|_| "invalid character reference".to_string())?
    };

    match char::from_u32(code) {
        Some(c) if is_valid_xml_char(c) => Ok(c.to_string()),
        _ => Err(format!("character reference out of range: &#{};", code)),
    }
}

/// Check a decoded character against the XML 1.0 Char production
#[inline]
fn is_valid_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
