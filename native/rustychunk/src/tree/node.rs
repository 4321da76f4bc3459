//! Tree node types

use super::metadata::NodeMetadata;
use super::path::PosPath;

/// What an addressable node holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
    Element {
        /// Lowercased tag name
        tag: String,
        /// Attribute names (lowercased) and decoded values, in source order
        attributes: Vec<(String, String)>,
        /// Start tag exactly as written
        start_tag: String,
        /// End tag as written or synthesized; None for void elements
        end_tag: Option<String>,
    },
    Text {
        /// Source slice exactly as written
        raw: String,
        /// Rendered text: entities decoded, whitespace collapsed
        text: String,
    },
}

/// A node in the element tree
///
/// `parent` and `children` are indices into the owning tree's arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: PosPath,
    pub content: NodeContent,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Whitespace separated this node from its previous sibling
    pub space_before: bool,
    /// Sizes over the whole subtree rooted here
    pub metadata: NodeMetadata,
}

impl TreeNode {
    /// Tag name (elements only)
    pub fn tag(&self) -> Option<&str> {
        match &self.content {
            NodeContent::Element { tag, .. } => Some(tag),
            NodeContent::Text { .. } => None,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.content, NodeContent::Element { .. })
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.content, NodeContent::Text { .. })
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Attribute value by (lowercase) name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match &self.content {
            NodeContent::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str()),
            NodeContent::Text { .. } => None,
        }
    }
}
