//! Markup Event Types
//!
//! Event types for pull-parser style HTML processing. Every event keeps the
//! verbatim source slice it came from.

use crate::core::attributes::Attribute;
use crate::core::entities::decode_text;
use std::borrow::Cow;

/// Markup parsing event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    /// Start of an element: `<name attrs...>` or `<name attrs.../>`
    StartElement(StartElement<'a>),
    /// End of an element: `</name>`
    EndElement(EndElement<'a>),
    /// Character data
    Text(TextRun<'a>),
    /// Comment, including delimiters
    Comment(RawMarkup<'a>),
    /// Doctype, CDATA or other `<!...>` declaration
    Declaration(RawMarkup<'a>),
    /// Processing instruction: `<?target data?>`
    ProcessingInstruction(RawMarkup<'a>),
}

/// Markup that is carried through untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMarkup<'a> {
    pub raw: &'a str,
    pub span: (usize, usize),
}

/// Start element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartElement<'a> {
    /// Element name, lowercased
    pub name: Cow<'a, str>,
    /// Element attributes
    pub attributes: Vec<Attribute<'a>>,
    /// The start tag exactly as written
    pub raw: &'a str,
    /// Byte span of the start tag
    pub span: (usize, usize),
    /// Closed with '/>'
    pub self_closing: bool,
}

/// End element event data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndElement<'a> {
    /// Element name, lowercased
    pub name: Cow<'a, str>,
    /// The end tag exactly as written
    pub raw: &'a str,
    /// Byte span of the end tag
    pub span: (usize, usize),
}

/// How a text run's source relates to its rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Ordinary character data: entities are decoded
    Data,
    /// `script`/`style` content: rendered exactly as written
    Raw,
}

/// A run of character data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun<'a> {
    /// Source text exactly as written
    pub raw: &'a str,
    /// Byte span in the input
    pub span: (usize, usize),
    pub mode: TextMode,
}

impl TextMode {
    /// Rendered text for a run written as `raw` (borrowed when nothing to decode)
    pub fn decode(self, raw: &str) -> Cow<'_, str> {
        match self {
            TextMode::Data => decode_text(raw),
            TextMode::Raw => Cow::Borrowed(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decoded_data_text() {
        assert_eq!(TextMode::Data.decode("1 &lt; 2"), "1 < 2");
        assert!(matches!(TextMode::Data.decode("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn test_raw_text_not_decoded() {
        assert_eq!(TextMode::Raw.decode("a &amp;&amp; b"), "a &amp;&amp; b");
    }
}
