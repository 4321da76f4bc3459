//! DOM Module - Arena-based HTML Document
//!
//! Implements an efficient DOM representation using:
//! - Arena allocation for nodes
//! - NodeId (u32) indices for cache-friendly traversal
//! - Byte spans into the original input instead of copied markup

pub mod document;
pub mod node;

use std::borrow::Cow;

pub use document::HtmlDocument;
pub use node::{Closing, HtmlAttribute, HtmlNode, NodeId, NodeKind};

/// Trait for document access - the boundary the element tree builder consumes.
///
/// Any parser that can expose element names, attributes, ordered children
/// and text satisfies it. Node 0 is the document node.
pub trait DocumentAccess {
    /// Get a node by ID
    fn get_node(&self, id: NodeId) -> Option<&HtmlNode>;

    /// Get element tag name (elements only)
    fn node_name(&self, id: NodeId) -> Option<&str>;

    /// Get all attribute names and values of an element
    fn attribute_values(&self, id: NodeId) -> Vec<(&str, &str)>;

    /// Children in document order - returns collected Vec for trait object compatibility
    fn children_vec(&self, id: NodeId) -> Vec<NodeId>;

    /// Start tag exactly as written (elements only)
    fn start_tag(&self, id: NodeId) -> Option<&str>;

    /// End tag as written, synthesized when it was implied, None for empty elements
    fn end_tag(&self, id: NodeId) -> Option<Cow<'_, str>>;

    /// Source text of a text node exactly as written
    fn raw_text(&self, id: NodeId) -> Option<&str>;

    /// Rendered text of a text node (entities decoded)
    fn text_content(&self, id: NodeId) -> Option<Cow<'_, str>>;
}
