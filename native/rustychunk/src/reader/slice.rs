//! Zero-Copy Slice Reader
//!
//! Pulls markup events from a string slice. Event payloads borrow the
//! input directly; only lowercased names and decoded attribute values
//! allocate.

use super::events::{EndElement, MarkupEvent, RawMarkup, StartElement, TextMode, TextRun};
use crate::core::attributes::{lowercase, parse_attributes};
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};

/// Zero-copy markup reader from a string slice
pub struct SliceReader<'a> {
    input: &'a str,
    tokenizer: Tokenizer<'a>,
}

impl<'a> SliceReader<'a> {
    /// Create a new slice reader
    pub fn new(input: &'a str) -> Self {
        SliceReader {
            input,
            tokenizer: Tokenizer::new(input),
        }
    }

    /// Get the next markup event
    pub fn next_event(&mut self) -> Option<MarkupEvent<'a>> {
        let token = self.tokenizer.next_token()?;
        let (start, end) = token.span;
        let raw = &self.input[start..end];

        let event = match token.kind {
            TokenKind::StartTag => MarkupEvent::StartElement(self.start_element(&token, raw)),
            TokenKind::EndTag => MarkupEvent::EndElement(EndElement {
                name: lowercase(token.name.unwrap_or_default()),
                raw,
                span: token.span,
            }),
            TokenKind::Text | TokenKind::EscapableRawText => MarkupEvent::Text(TextRun {
                raw,
                span: token.span,
                mode: TextMode::Data,
            }),
            TokenKind::RawText => MarkupEvent::Text(TextRun {
                raw,
                span: token.span,
                mode: TextMode::Raw,
            }),
            TokenKind::Comment => MarkupEvent::Comment(RawMarkup { raw, span: token.span }),
            TokenKind::Declaration => MarkupEvent::Declaration(RawMarkup { raw, span: token.span }),
            TokenKind::ProcessingInstruction => {
                MarkupEvent::ProcessingInstruction(RawMarkup { raw, span: token.span })
            }
        };
        Some(event)
    }

    fn start_element(&self, token: &Token<'a>, raw: &'a str) -> StartElement<'a> {
        StartElement {
            name: lowercase(token.name.unwrap_or_default()),
            attributes: parse_attributes(token.attr_source),
            raw,
            span: token.span,
            self_closing: token.self_closing,
        }
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = MarkupEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(input: &str) -> Vec<MarkupEvent<'_>> {
        SliceReader::new(input).collect()
    }

    #[test]
    fn test_simple_element() {
        let events = events("<DIV>hello</Div>");
        assert_eq!(events.len(), 3);

        assert!(matches!(&events[0], MarkupEvent::StartElement(e) if e.name == "div" && e.raw == "<DIV>"));
        assert!(matches!(&events[1], MarkupEvent::Text(t) if t.raw == "hello"));
        assert!(matches!(&events[2], MarkupEvent::EndElement(e) if e.name == "div" && e.raw == "</Div>"));
    }

    #[test]
    fn test_empty_element() {
        let events = events("<br/>");
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], MarkupEvent::StartElement(e) if e.name == "br" && e.self_closing));
    }

    #[test]
    fn test_attributes() {
        let events = events("<div id=\"main\" class=\"container\"/>");
        assert_eq!(events.len(), 1);

        let MarkupEvent::StartElement(elem) = &events[0] else {
            panic!("expected a start element, got {:?}", events[0]);
        };
        let attrs: Vec<(&str, &str)> = elem
            .attributes
            .iter()
            .map(|a| (a.name.as_ref(), a.value.as_ref()))
            .collect();
        assert_eq!(attrs, vec![("id", "main"), ("class", "container")]);
    }

    #[test]
    fn test_script_is_raw() {
        let events = events("<script>a &amp;&amp; b</script>");
        assert!(matches!(
            &events[1],
            MarkupEvent::Text(t) if t.mode == TextMode::Raw && t.raw == "a &amp;&amp; b"
        ));
    }

    #[test]
    fn test_comment() {
        let events = events("<root><!-- comment --></root>");
        assert!(events
            .iter()
            .any(|e| matches!(e, MarkupEvent::Comment(c) if c.raw == "<!-- comment -->")));
    }

    #[test]
    fn test_nested() {
        let events = events("<a><b>text</b></a>");
        assert_eq!(events.len(), 5);
        let starts = events
            .iter()
            .filter(|e| matches!(e, MarkupEvent::StartElement(_)))
            .count();
        let ends = events
            .iter()
            .filter(|e| matches!(e, MarkupEvent::EndElement(_)))
            .count();
        assert_eq!((starts, ends), (2, 2));
    }
}
