//! Element tree builder
//!
//! Walks any [`DocumentAccess`] implementation and produces the addressable
//! arena used by the partitioner. Nodes are emitted in document order with an
//! explicit stack, so deeply nested input cannot overflow the call stack.

use super::metadata;
use super::node::{NodeContent, TreeNode};
use super::path::PosPath;
use super::DomTree;
use crate::core::scanner::is_whitespace;
use crate::core::tokenizer::is_blank;
use crate::dom::{DocumentAccess, NodeId, NodeKind};
use std::borrow::Cow;
use std::collections::HashMap;

/// Elements whose text keeps its whitespace as written
const PRESERVE_WHITESPACE: &[&str] = &["pre", "textarea"];

/// A child scheduled for emission
struct Pending {
    id: NodeId,
    parent: Option<usize>,
    path: PosPath,
    space_before: bool,
    preserve: bool,
}

/// Build the element tree of a parsed document
pub fn build<D: DocumentAccess>(doc: &D) -> DomTree {
    let mut nodes: Vec<TreeNode> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();

    let mut stack: Vec<Pending> = Vec::with_capacity(64);
    schedule_children(doc, 0, None, &PosPath::root(), false, &mut stack);

    while let Some(pending) = stack.pop() {
        let Some(content) = node_content(doc, pending.id, pending.preserve) else {
            continue;
        };

        let index = nodes.len();
        match pending.parent {
            Some(parent) => nodes[parent].children.push(index),
            None => roots.push(index),
        }

        let preserve = pending.preserve
            || matches!(&content, NodeContent::Element { tag, .. } if PRESERVE_WHITESPACE.contains(&tag.as_str()));
        if matches!(content, NodeContent::Element { .. }) {
            schedule_children(doc, pending.id, Some(index), &pending.path, preserve, &mut stack);
        }

        nodes.push(TreeNode {
            path: pending.path,
            content,
            parent: pending.parent,
            children: Vec::new(),
            space_before: pending.space_before,
            metadata: Default::default(),
        });
    }

    metadata::compute(&mut nodes);
    let index: HashMap<PosPath, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.path.clone(), i))
        .collect();

    tracing::debug!(nodes = nodes.len(), roots = roots.len(), "built element tree");
    DomTree {
        nodes,
        roots,
        index,
    }
}

/// Assign ordinals to the addressable children of `id` and push them so they
/// pop in document order.
fn schedule_children<D: DocumentAccess>(
    doc: &D,
    id: NodeId,
    parent: Option<usize>,
    parent_path: &PosPath,
    preserve: bool,
    stack: &mut Vec<Pending>,
) {
    let mut scheduled: Vec<Pending> = Vec::new();
    let mut ordinal: u32 = 0;
    let mut pending_space = false;

    for child in doc.children_vec(id) {
        let Some(node) = doc.get_node(child) else {
            continue;
        };
        match node.kind {
            NodeKind::Element => {}
            NodeKind::Text => {
                if doc.raw_text(child).is_some_and(is_blank) {
                    pending_space = true;
                    continue;
                }
            }
            _ => continue,
        }

        scheduled.push(Pending {
            id: child,
            parent,
            path: parent_path.child(ordinal),
            space_before: pending_space && ordinal > 0,
            preserve,
        });
        ordinal += 1;
        pending_space = false;
    }

    stack.extend(scheduled.into_iter().rev());
}

fn node_content<D: DocumentAccess>(doc: &D, id: NodeId, preserve: bool) -> Option<NodeContent> {
    let node = doc.get_node(id)?;
    match node.kind {
        NodeKind::Element => Some(NodeContent::Element {
            tag: doc.node_name(id)?.to_string(),
            attributes: doc
                .attribute_values(id)
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            start_tag: doc.start_tag(id)?.to_string(),
            end_tag: doc.end_tag(id).map(Cow::into_owned),
        }),
        NodeKind::Text => {
            let raw = doc.raw_text(id)?;
            let decoded = doc.text_content(id)?;
            let text = if preserve {
                decoded.into_owned()
            } else {
                collapse_whitespace(&decoded).into_owned()
            };
            Some(NodeContent::Text {
                raw: raw.to_string(),
                text,
            })
        }
        _ => None,
    }
}

/// Collapse each run of ASCII whitespace to a single space
pub fn collapse_whitespace(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let needs_work = bytes.iter().enumerate().any(|(i, &b)| {
        is_whitespace(b) && (b != b' ' || bytes.get(i + 1).is_some_and(|&n| is_whitespace(n)))
    });
    if !needs_work {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for c in s.chars() {
        if c.is_ascii() && is_whitespace(c as u8) {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::HtmlDocument;

    fn paths(tree: &DomTree) -> Vec<String> {
        tree.pos_xpaths_list().iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a b"), Cow::Borrowed("a b"));
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("\n x\n"), " x ");
        assert_eq!(collapse_whitespace("é\u{a0} é"), "é\u{a0} é");
    }

    #[test]
    fn test_paths_in_document_order() {
        let doc = HtmlDocument::parse("<div><p>a</p><p>b<b>c</b></p></div><span>d</span>");
        let tree = build(&doc);
        assert_eq!(
            paths(&tree),
            vec!["/0", "/0/0", "/0/0/0", "/0/1", "/0/1/0", "/0/1/1", "/0/1/1/0", "/1", "/1/0"]
        );
    }

    #[test]
    fn test_whitespace_runs_are_not_nodes() {
        let doc = HtmlDocument::parse("<ul>\n  <li>one</li>\n  <li>two</li>\n</ul>");
        let tree = build(&doc);
        assert_eq!(paths(&tree), vec!["/0", "/0/0", "/0/0/0", "/0/1", "/0/1/0"]);

        let first = tree.node(&"/0/0".parse().expect("path")).expect("node");
        let second = tree.node(&"/0/1".parse().expect("path")).expect("node");
        assert!(!first.space_before);
        assert!(second.space_before);
    }

    #[test]
    fn test_comments_and_doctype_skipped() {
        let doc = HtmlDocument::parse("<!DOCTYPE html><!-- c --><p>x<!-- y -->z</p>");
        let tree = build(&doc);
        assert_eq!(paths(&tree), vec!["/0", "/0/0", "/0/1"]);
    }

    #[test]
    fn test_text_decoded_and_collapsed() {
        let doc = HtmlDocument::parse("<p>fish   &amp;\n chips</p>");
        let tree = build(&doc);
        let text = tree.node(&"/0/0".parse().expect("path")).expect("node");
        assert_eq!(
            text.content,
            NodeContent::Text {
                raw: "fish   &amp;\n chips".into(),
                text: "fish & chips".into()
            }
        );
    }

    #[test]
    fn test_pre_keeps_whitespace() {
        let doc = HtmlDocument::parse("<pre>a\n  <b>b  c</b></pre>");
        let tree = build(&doc);
        assert_eq!(tree.text(&"/0".parse().expect("path")).as_deref(), Some("a\n  b  c"));
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(build(&HtmlDocument::parse("")).is_empty());
        assert!(build(&HtmlDocument::parse(" \n\t ")).is_empty());
    }

    #[test]
    fn test_deep_nesting() {
        let depth = 5000;
        let markup = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let tree = build(&HtmlDocument::parse(&markup));
        assert_eq!(tree.len(), depth + 1);
        let top = tree.node(&"/0".parse().expect("path")).expect("node");
        assert_eq!(top.metadata.text_length, 1);
        assert_eq!(top.metadata.html_length, markup.len());
    }
}
