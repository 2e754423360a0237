//! XML tokenizer
//!
//! Pull-parser state machine extracting raw XML tokens from a byte slice:
//! start/end/empty tags, text, CDATA sections, comments, processing
//! instructions, the XML declaration, and DOCTYPE (skipped downstream).
//!
//! Parsing is strict: malformed markup produces `Error::Parse` with a
//! diagnostic and the byte position of the fault.

use super::entities::decode_text;
use super::scanner::Scanner;
use crate::error::Error;
use std::borrow::Cow;

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Element start tag: <element>
    StartTag,
    /// Element end tag: </element>
    EndTag,
    /// Empty element: <element/>
    EmptyTag,
    /// Text content
    Text,
    /// CDATA section: <![CDATA[...]]>
    CData,
    /// Comment: <!--...-->
    Comment,
    /// Processing instruction: <?target ...?>
    ProcessingInstruction,
    /// XML declaration: <?xml version="1.0"?>
    XmlDeclaration,
    /// DOCTYPE declaration
    DocType,
}

/// A parsed XML token
#[derive(Debug, Clone)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end)
    pub span: (usize, usize),
    /// For tags and PIs: the element or target name
    pub name: Option<&'a [u8]>,
    /// For text/cdata: the content (owned when entities were decoded)
    pub content: Option<Cow<'a, [u8]>>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            content: None,
        }
    }

    fn with_name(mut self, name: &'a [u8]) -> Self {
        self.name = Some(name);
        self
    }

    fn with_content(mut self, content: Cow<'a, [u8]>) -> Self {
        self.content = Some(content);
        self
    }
}

/// XML tokenizer implementing a pull-parser pattern
pub struct Tokenizer<'a> {
    scanner: Scanner<'a>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer for the given input
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            scanner: Scanner::new(input),
        }
    }

    /// Current byte position in the input
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    fn fault(&self, message: impl Into<String>, position: usize) -> Error {
        Error::Parse {
            message: message.into(),
            position,
        }
    }

    /// Get the next token, or None at end of input
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, Error> {
        if self.scanner.is_eof() {
            return Ok(None);
        }

        match self.scanner.peek() {
            Some(b'<') => self.parse_markup().map(Some),
            Some(_) => self.parse_text().map(Some),
            None => Ok(None),
        }
    }

    /// Parse markup starting with '<'
    fn parse_markup(&mut self) -> Result<Token<'a>, Error> {
        let start = self.scanner.position();
        self.scanner.advance(1); // '<'

        match self.scanner.peek() {
            Some(b'/') => self.parse_end_tag(start),
            Some(b'!') => self.parse_bang_markup(start),
            Some(b'?') => self.parse_pi(start),
            Some(_) => self.parse_start_tag(start),
            None => Err(self.fault("unexpected end of input after '<'", start)),
        }
    }

    /// Parse a start tag or empty element tag
    fn parse_start_tag(&mut self, start: usize) -> Result<Token<'a>, Error> {
        let name = self.scanner.read_name().ok_or_else(|| {
            self.fault(
                "invalid element name: must start with letter, underscore, or colon",
                start,
            )
        })?;

        let end = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| self.fault("unclosed start tag", start))?;

        let is_empty = end > start + 1 && self.scanner.slice(end - 1, end) == b"/";
        self.scanner.set_position(end + 1);

        let kind = if is_empty {
            TokenKind::EmptyTag
        } else {
            TokenKind::StartTag
        };
        Ok(Token::new(kind, (start, end + 1)).with_name(name))
    }

    /// Parse an end tag </name>
    fn parse_end_tag(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(1); // '/'

        let name = self.scanner.read_name().ok_or_else(|| {
            self.fault("invalid element name in end tag", start)
        })?;

        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some(b'>') => {}
            Some(_) => {
                return Err(self.fault(
                    "end tag cannot have attributes or other content",
                    self.scanner.position(),
                ))
            }
            None => return Err(self.fault("unclosed end tag", start)),
        }
        self.scanner.advance(1); // '>'

        Ok(Token::new(TokenKind::EndTag, (start, self.scanner.position())).with_name(name))
    }

    /// Parse markup starting with '<!' (comment, CDATA, DOCTYPE)
    fn parse_bang_markup(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(1); // '!'

        if self.scanner.starts_with(b"--") {
            self.parse_comment(start)
        } else if self.scanner.starts_with(b"[CDATA[") {
            self.parse_cdata(start)
        } else if self.scanner.starts_with(b"DOCTYPE") {
            self.parse_doctype(start)
        } else {
            Err(self.fault(
                "invalid declaration: expected comment, CDATA, or DOCTYPE",
                start,
            ))
        }
    }

    /// Parse a comment <!--...-->
    fn parse_comment(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(2); // '--'
        let content_start = self.scanner.position();

        loop {
            let pos = self
                .scanner
                .find_byte(b'-')
                .ok_or_else(|| self.fault("unterminated comment", start))?;
            self.scanner.set_position(pos);

            if self.scanner.starts_with(b"-->") {
                let content = self.scanner.slice(content_start, pos);
                self.scanner.advance(3);
                return Ok(
                    Token::new(TokenKind::Comment, (start, self.scanner.position()))
                        .with_content(Cow::Borrowed(content)),
                );
            }
            self.scanner.advance(1);
        }
    }

    /// Parse a CDATA section <![CDATA[...]]>
    fn parse_cdata(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(7); // '[CDATA['
        let content_start = self.scanner.position();

        loop {
            let pos = self
                .scanner
                .find_byte(b']')
                .ok_or_else(|| self.fault("unterminated CDATA section", start))?;
            self.scanner.set_position(pos);

            if self.scanner.starts_with(b"]]>") {
                let content = self.scanner.slice(content_start, pos);
                self.scanner.advance(3);
                return Ok(
                    Token::new(TokenKind::CData, (start, self.scanner.position()))
                        .with_content(Cow::Borrowed(content)),
                );
            }
            self.scanner.advance(1);
        }
    }

    /// Parse a DOCTYPE declaration, including an internal subset in [...]
    fn parse_doctype(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(7); // 'DOCTYPE'
        let mut bracket_depth = 0usize;

        while let Some(b) = self.scanner.peek() {
            match b {
                b'[' => bracket_depth += 1,
                b']' => bracket_depth = bracket_depth.saturating_sub(1),
                b'>' if bracket_depth == 0 => {
                    self.scanner.advance(1);
                    return Ok(Token::new(
                        TokenKind::DocType,
                        (start, self.scanner.position()),
                    ));
                }
                _ => {}
            }
            self.scanner.advance(1);
        }

        Err(self.fault("unterminated DOCTYPE declaration", start))
    }

    /// Parse a processing instruction <?target ...?> or the XML declaration
    fn parse_pi(&mut self, start: usize) -> Result<Token<'a>, Error> {
        self.scanner.advance(1); // '?'

        let name = self
            .scanner
            .read_name()
            .ok_or_else(|| self.fault("invalid processing instruction target", start))?;

        // Scan for '?>'
        loop {
            let pos = self
                .scanner
                .find_byte(b'?')
                .ok_or_else(|| self.fault("unterminated processing instruction", start))?;
            self.scanner.set_position(pos);
            if self.scanner.starts_with(b"?>") {
                self.scanner.advance(2);
                break;
            }
            self.scanner.advance(1);
        }

        let kind = if name == b"xml" {
            TokenKind::XmlDeclaration
        } else {
            TokenKind::ProcessingInstruction
        };
        Ok(Token::new(kind, (start, self.scanner.position())).with_name(name))
    }

    /// Parse text content up to the next '<'
    fn parse_text(&mut self) -> Result<Token<'a>, Error> {
        let start = self.scanner.position();
        let end = self.scanner.find_byte(b'<').unwrap_or(self.scanner.input_len());

        let raw = self.scanner.slice(start, end);
        self.scanner.set_position(end);

        let content = decode_text(raw).map_err(|message| self.fault(message, start))?;
        Ok(Token::new(TokenKind::Text, (start, end)).with_content(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_kinds(input: &[u8]) -> Vec<TokenKind> {
        let mut tokenizer = Tokenizer::new(input);
        let mut kinds = Vec::new();
        while let Some(token) = tokenizer.next_token().unwrap() {
            kinds.push(token.kind);
        }
        kinds
    }

    #[test]
    fn test_start_and_end_tag() {
        let kinds = collect_kinds(b"<a>x</a>");
        assert_eq!(
            kinds,
            vec![TokenKind::StartTag, TokenKind::Text, TokenKind::EndTag]
        );
    }

    #[test]
    fn test_empty_tag() {
        let kinds = collect_kinds(b"<a/>");
        assert_eq!(kinds, vec![TokenKind::EmptyTag]);
    }

    #[test]
    fn test_empty_tag_with_attributes() {
        let mut tokenizer = Tokenizer::new(b"<a id=\"1\"/>");
        let token = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(token.kind, TokenKind::EmptyTag);
        assert_eq!(token.name, Some(b"a" as &[u8]));
    }

    #[test]
    fn test_comment_and_cdata() {
        let kinds = collect_kinds(b"<a><!-- note --><![CDATA[<raw>]]></a>");
        assert_eq!(
            kinds,
            vec![
                TokenKind::StartTag,
                TokenKind::Comment,
                TokenKind::CData,
                TokenKind::EndTag
            ]
        );
    }

    #[test]
    fn test_xml_declaration() {
        let kinds = collect_kinds(b"<?xml version=\"1.0\"?><r/>");
        assert_eq!(kinds, vec![TokenKind::XmlDeclaration, TokenKind::EmptyTag]);
    }

    #[test]
    fn test_doctype_with_internal_subset() {
        let kinds = collect_kinds(b"<!DOCTYPE r [<!ENTITY x \"y\">]><r/>");
        assert_eq!(kinds, vec![TokenKind::DocType, TokenKind::EmptyTag]);
    }

    #[test]
    fn test_end_tag_with_attributes_rejected() {
        let mut tokenizer = Tokenizer::new(b"<a></a b=\"1\">");
        tokenizer.next_token().unwrap();
        let result = loop {
            match tokenizer.next_token() {
                Ok(Some(_)) => continue,
                other => break other,
            }
        };
        assert!(result.is_err());
    }

    #[test]
    fn test_unterminated_comment() {
        let mut tokenizer = Tokenizer::new(b"<!-- never closed");
        assert!(tokenizer.next_token().is_err());
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let mut tokenizer = Tokenizer::new(b"<a attr=\">\">text</a>");
        let token = tokenizer.next_token().unwrap().unwrap();
        assert_eq!(token.kind, TokenKind::StartTag);
        assert_eq!(token.span.0, 0);
    }

    #[test]
    fn test_parse_error_position() {
        let mut tokenizer = Tokenizer::new(b"abc &bogus; def");
        match tokenizer.next_token() {
            Err(Error::Parse { position, .. }) => assert_eq!(position, 0),
            other => panic!("expected parse error, got {:?}", other.map(|t| t.map(|t| t.kind))),
        }
    }
}
