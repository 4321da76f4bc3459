//! Subtree serialization
//!
//! Markup is rebuilt from the stored source slices, so a subtree renders
//! exactly as written (plus synthesized end tags for implicitly closed
//! elements). Both writers use an explicit stack to handle deep trees.

use super::node::{NodeContent, TreeNode};

enum StackEntry {
    Enter(usize),
    Close(usize),
}

/// Append the markup of the subtree rooted at `index`
pub(crate) fn write_html(nodes: &[TreeNode], index: usize, buf: &mut String) {
    let mut stack: Vec<StackEntry> = Vec::with_capacity(64);
    stack.push(StackEntry::Enter(index));

    while let Some(entry) = stack.pop() {
        match entry {
            StackEntry::Close(id) => {
                if let NodeContent::Element {
                    end_tag: Some(end_tag),
                    ..
                } = &nodes[id].content
                {
                    buf.push_str(end_tag);
                }
            }
            StackEntry::Enter(id) => {
                let node = &nodes[id];
                match &node.content {
                    NodeContent::Element { start_tag, .. } => {
                        buf.push_str(start_tag);
                        // Closing tag is processed after the children
                        stack.push(StackEntry::Close(id));
                        for &child in node.children.iter().rev() {
                            stack.push(StackEntry::Enter(child));
                        }
                    }
                    NodeContent::Text { raw, .. } => buf.push_str(raw),
                }
            }
        }
    }
}

/// Append the rendered text of the subtree rooted at `index`
///
/// Whitespace between siblings becomes a single space; the root's own
/// leading separator is not written.
pub(crate) fn write_text(nodes: &[TreeNode], index: usize, buf: &mut String) {
    let mut stack: Vec<usize> = Vec::with_capacity(64);
    stack.push(index);

    while let Some(id) = stack.pop() {
        let node = &nodes[id];
        if id != index && node.space_before {
            buf.push(' ');
        }
        match &node.content {
            NodeContent::Element { .. } => stack.extend(node.children.iter().rev()),
            NodeContent::Text { text, .. } => buf.push_str(text),
        }
    }
}
