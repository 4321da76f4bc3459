//! HTML Node representation
//!
//! Uses NodeId (u32) for compact, cache-friendly node references.

use crate::reader::TextMode;

/// Compact node identifier (index into arena)
pub type NodeId = u32;

/// Type of HTML node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// Comment
    Comment,
    /// Doctype or other `<!...>` declaration
    Declaration,
    /// Processing instruction
    ProcessingInstruction,
}

/// How an element was closed in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closing {
    /// Explicit end tag at this byte span
    EndTag(usize, usize),
    /// Closed by recovery (another tag, a mismatched end tag, or end of input)
    Implied,
    /// Void or self-closing element: there is no end tag
    Empty,
}

/// An HTML node in the arena
#[derive(Debug, Clone)]
pub struct HtmlNode {
    /// Type of this node
    pub kind: NodeKind,
    /// Parent node (None for document root)
    pub parent: Option<NodeId>,
    /// First child node
    pub first_child: Option<NodeId>,
    /// Last child node
    pub last_child: Option<NodeId>,
    /// Previous sibling
    pub prev_sibling: Option<NodeId>,
    /// Next sibling
    pub next_sibling: Option<NodeId>,
    /// Lowercased tag name (elements only)
    pub name: Box<str>,
    /// Byte span of the start tag (elements) or of the whole node (others)
    pub span: (usize, usize),
    /// How the element was closed
    pub closing: Closing,
    /// Decoding mode for text nodes
    pub text_mode: TextMode,
    /// Start of attributes in attribute arena (for elements)
    pub attr_start: u32,
    /// Number of attributes
    pub attr_count: u16,
}

impl HtmlNode {
    fn with_kind(kind: NodeKind, span: (usize, usize), parent: Option<NodeId>) -> Self {
        HtmlNode {
            kind,
            parent,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            name: Box::from(""),
            span,
            closing: Closing::Empty,
            text_mode: TextMode::Data,
            attr_start: 0,
            attr_count: 0,
        }
    }

    /// Create a new document root node
    pub fn document() -> Self {
        Self::with_kind(NodeKind::Document, (0, 0), None)
    }

    /// Create a new element node; it stays open until closed by the builder
    pub fn element(name: &str, span: (usize, usize), parent: Option<NodeId>) -> Self {
        let mut node = Self::with_kind(NodeKind::Element, span, parent);
        node.name = Box::from(name);
        node.closing = Closing::Implied;
        node
    }

    /// Create a new text node
    pub fn text(span: (usize, usize), mode: TextMode, parent: Option<NodeId>) -> Self {
        let mut node = Self::with_kind(NodeKind::Text, span, parent);
        node.text_mode = mode;
        node
    }

    /// Create a comment, declaration or processing instruction node
    pub fn other(kind: NodeKind, span: (usize, usize), parent: Option<NodeId>) -> Self {
        Self::with_kind(kind, span, parent)
    }

    /// Check if this is an element node
    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    /// Check if this is a text node
    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

}

/// Stored attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlAttribute {
    pub name: String,
    pub value: String,
}

impl HtmlAttribute {
    pub fn new(name: &str, value: &str) -> Self {
        HtmlAttribute {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}
