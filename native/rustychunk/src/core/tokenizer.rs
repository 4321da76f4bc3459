//! Lenient HTML Tokenizer
//!
//! A small state machine that splits markup into tokens without ever
//! failing. Every token carries the byte span of its source so later
//! stages can reuse the original markup verbatim.
//!
//! Recovery rules:
//! - A '<' that cannot open markup is literal text
//! - A tag with no closing '>' runs to end of input
//! - An unterminated comment runs to end of input
//! - `script`/`style`/`textarea`/`title` content is not tokenized

use super::scanner::{is_whitespace, starts_markup, Scanner};

/// Elements whose content is raw text (no tags, no entity decoding)
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements whose content is text with entities but no tags
const ESCAPABLE_RAW_TEXT_ELEMENTS: &[&str] = &["textarea", "title"];

/// Kind of token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name ...>` or `<name .../>`
    StartTag,
    /// `</name ...>`
    EndTag,
    /// Character data between tags
    Text,
    /// Content of a raw-text element, never entity-decoded
    RawText,
    /// Content of an escapable raw-text element
    EscapableRawText,
    /// `<!-- ... -->`
    Comment,
    /// `<!DOCTYPE ...>`, `<![CDATA[...]]>` and other `<!...>` forms
    Declaration,
    /// `<?...>`
    ProcessingInstruction,
}

/// A token with its source span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Byte span of the whole token in the input
    pub span: (usize, usize),
    /// Tag name as written (tags only)
    pub name: Option<&'a str>,
    /// Text between the tag name and the closing '>' or '/>' (start tags only)
    pub attr_source: &'a str,
    /// Start tag closed with '/>'
    pub self_closing: bool,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            attr_source: "",
            self_closing: false,
        }
    }
}

/// Lenient HTML tokenizer over a string slice
pub struct Tokenizer<'a> {
    input: &'a str,
    scanner: Scanner<'a>,
    /// Name of the raw-text element whose content comes next
    raw_text: Option<(&'static str, TokenKind)>,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer
    pub fn new(input: &'a str) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input.as_bytes()),
            raw_text: None,
        }
    }

    /// Get the next token, or None at end of input
    pub fn next_token(&mut self) -> Option<Token<'a>> {
        if let Some((name, kind)) = self.raw_text.take() {
            let start = self.scanner.position();
            let end = self
                .scanner
                .find_closing_tag(start, name)
                .unwrap_or(self.scanner.len());
            if end > start {
                self.scanner.set_position(end);
                return Some(Token::new(kind, (start, end)));
            }
        }

        if self.scanner.is_eof() {
            return None;
        }

        let start = self.scanner.position();
        let bytes = self.input.as_bytes();
        if bytes[start] == b'<' && starts_markup(bytes, start) {
            return Some(self.read_markup(start));
        }
        Some(self.read_text(start))
    }

    /// Read character data up to the next '<' that opens markup
    fn read_text(&mut self, start: usize) -> Token<'a> {
        let bytes = self.input.as_bytes();
        let mut from = start + 1;
        let end = loop {
            match self.scanner.find_tag_start_from(from) {
                Some(lt) if starts_markup(bytes, lt) => break lt,
                Some(lt) => from = lt + 1,
                None => break self.scanner.len(),
            }
        };
        self.scanner.set_position(end);
        Token::new(TokenKind::Text, (start, end))
    }

    /// Read a tag, comment, declaration or processing instruction at '<'
    fn read_markup(&mut self, start: usize) -> Token<'a> {
        if self.scanner.starts_with(b"<!--") {
            let end = self
                .scanner
                .find_sequence(start + 4, b"-->")
                .map(|i| i + 3)
                .unwrap_or(self.scanner.len());
            self.scanner.set_position(end);
            return Token::new(TokenKind::Comment, (start, end));
        }

        match self.scanner.peek_at(1) {
            Some(b'!') => self.read_bracketed(start, TokenKind::Declaration),
            Some(b'?') => self.read_bracketed(start, TokenKind::ProcessingInstruction),
            Some(b'/') => self.read_end_tag(start),
            _ => self.read_start_tag(start),
        }
    }

    fn read_bracketed(&mut self, start: usize, kind: TokenKind) -> Token<'a> {
        let end = self
            .scanner
            .find_tag_end_from(start + 2)
            .map(|i| i + 1)
            .unwrap_or(self.scanner.len());
        self.scanner.set_position(end);
        Token::new(kind, (start, end))
    }

    fn read_end_tag(&mut self, start: usize) -> Token<'a> {
        self.scanner.set_position(start + 2);
        let name = self.read_name();
        let end = self
            .scanner
            .find_tag_end_from(self.scanner.position())
            .map(|i| i + 1)
            .unwrap_or(self.scanner.len());
        self.scanner.set_position(end);

        let mut token = Token::new(TokenKind::EndTag, (start, end));
        token.name = name;
        token
    }

    fn read_start_tag(&mut self, start: usize) -> Token<'a> {
        self.scanner.set_position(start + 1);
        let name = self.read_name();
        let name_end = self.scanner.position();

        let (end, close) = match self.scanner.find_tag_end_quoted(name_end) {
            Some(gt) => (gt + 1, gt),
            None => (self.scanner.len(), self.scanner.len()),
        };
        let self_closing = close > name_end && self.input.as_bytes()[close - 1] == b'/';
        let attr_end = if self_closing { close - 1 } else { close };
        self.scanner.set_position(end);

        let mut token = Token::new(TokenKind::StartTag, (start, end));
        token.name = name;
        token.attr_source = &self.input[name_end..attr_end];
        token.self_closing = self_closing;

        if !self_closing {
            if let Some(tag) = name {
                self.raw_text = raw_text_mode(tag);
            }
        }
        token
    }

    fn read_name(&mut self) -> Option<&'a str> {
        let start = self.scanner.position();
        self.scanner.read_name()?;
        Some(&self.input[start..self.scanner.position()])
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Which raw-text mode, if any, an opening tag switches into
fn raw_text_mode(tag: &str) -> Option<(&'static str, TokenKind)> {
    RAW_TEXT_ELEMENTS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(tag))
        .map(|name| (*name, TokenKind::RawText))
        .or_else(|| {
            ESCAPABLE_RAW_TEXT_ELEMENTS
                .iter()
                .find(|name| name.eq_ignore_ascii_case(tag))
                .map(|name| (*name, TokenKind::EscapableRawText))
        })
}

/// Check whether a string is entirely HTML whitespace
#[inline]
pub fn is_blank(s: &str) -> bool {
    s.bytes().all(is_whitespace)
}
