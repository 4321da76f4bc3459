//! Tag filter
//!
//! Excises whole subtrees by tag name. The result is a new tree: surviving
//! nodes keep their original positional paths and ancestor sizes are
//! recomputed over what remains.

use super::metadata;
use super::node::TreeNode;
use super::DomTree;
use std::collections::{HashMap, HashSet};

/// Copy `tree` without the subtrees rooted at any of `tags`
pub fn filter_tags<S: AsRef<str>>(tree: &DomTree, tags: &[S]) -> DomTree {
    let excluded: HashSet<String> = tags
        .iter()
        .map(|t| t.as_ref().trim().to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    if excluded.is_empty() {
        return tree.clone();
    }

    // Old arena index -> new arena index (None when removed)
    let mut remap: Vec<Option<usize>> = Vec::with_capacity(tree.nodes.len());
    let mut nodes: Vec<TreeNode> = Vec::with_capacity(tree.nodes.len());
    let mut roots: Vec<usize> = Vec::new();

    for node in &tree.nodes {
        let parent = match node.parent {
            Some(p) => match remap[p] {
                Some(new_parent) => Some(new_parent),
                None => {
                    remap.push(None);
                    continue;
                }
            },
            None => None,
        };
        if node.tag().is_some_and(|tag| excluded.contains(tag)) {
            remap.push(None);
            continue;
        }

        let index = nodes.len();
        match parent {
            Some(p) => nodes[p].children.push(index),
            None => roots.push(index),
        }
        remap.push(Some(index));
        nodes.push(TreeNode {
            parent,
            children: Vec::new(),
            ..node.clone()
        });
    }

    metadata::compute(&mut nodes);
    let index: HashMap<_, _> = nodes
        .iter()
        .enumerate()
        .map(|(i, node)| (node.path.clone(), i))
        .collect();

    tracing::debug!(
        removed = tree.nodes.len() - nodes.len(),
        kept = nodes.len(),
        "filtered element tree"
    );
    DomTree {
        nodes,
        roots,
        index,
    }
}
