//! Node metadata
//!
//! Both sizes are counted in characters over the whole subtree. They are
//! independent: entity-heavy text can decode to more characters than the
//! markup that holds it, so neither bounds the other.

use super::node::{NodeContent, TreeNode};

/// Sizes of a node's subtree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeMetadata {
    /// Length of the rendered text
    pub text_length: usize,
    /// Length of the serialized markup
    pub html_length: usize,
}

impl NodeMetadata {
    /// Sizes contributed by the node itself, excluding its children
    pub fn own(content: &NodeContent) -> Self {
        match content {
            NodeContent::Element {
                start_tag, end_tag, ..
            } => NodeMetadata {
                text_length: 0,
                html_length: char_len(start_tag) + end_tag.as_deref().map_or(0, char_len),
            },
            NodeContent::Text { raw, text } => NodeMetadata {
                text_length: char_len(text),
                html_length: char_len(raw),
            },
        }
    }
}

impl std::ops::Add for NodeMetadata {
    type Output = NodeMetadata;

    fn add(self, rhs: NodeMetadata) -> NodeMetadata {
        NodeMetadata {
            text_length: self.text_length + rhs.text_length,
            html_length: self.html_length + rhs.html_length,
        }
    }
}

#[inline]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Sizes a child contributes to its parent, including the separating space
#[inline]
pub(crate) fn contribution(node: &TreeNode) -> NodeMetadata {
    NodeMetadata {
        text_length: node.metadata.text_length + usize::from(node.space_before),
        html_length: node.metadata.html_length,
    }
}

/// Fill in metadata for every node of an arena, children before parents.
///
/// Arenas are laid out in document order, so every child has a higher index
/// than its parent and a reverse sweep sees complete children.
pub(crate) fn compute(nodes: &mut [TreeNode]) {
    for i in (0..nodes.len()).rev() {
        let children_total = nodes[i]
            .children
            .iter()
            .map(|&c| contribution(&nodes[c]))
            .fold(NodeMetadata::default(), |acc, m| acc + m);
        nodes[i].metadata = NodeMetadata::own(&nodes[i].content) + children_total;
    }
}
