//! Element Tree Module
//!
//! The addressable representation the partitioner works on:
//! - Every element and non-blank text node gets a [`PosPath`]
//! - Nodes live in an arena laid out in document order
//! - Each node carries [`NodeMetadata`] over its whole subtree
//!
//! The tree is immutable once built. Filtering produces a new tree.

pub mod builder;
pub mod filter;
pub mod metadata;
pub mod node;
pub mod path;
mod serialize;

use crate::dom::{DocumentAccess, HtmlDocument};
use std::collections::{BTreeMap, HashMap};

pub use metadata::NodeMetadata;
pub use node::{NodeContent, TreeNode};
pub use path::PosPath;

/// Addressable element tree with per-node size metadata
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomTree {
    /// Arena in document order; children always follow their parent
    nodes: Vec<TreeNode>,
    /// Top-level nodes (children of the virtual document root)
    roots: Vec<usize>,
    index: HashMap<PosPath, usize>,
}

impl DomTree {
    /// Parse markup and build its element tree
    ///
    /// Empty or whitespace-only input yields an empty tree.
    pub fn parse(markup: &str) -> Self {
        Self::from_document(&HtmlDocument::parse(markup))
    }

    /// Build from any parsed document
    pub fn from_document<D: DocumentAccess>(doc: &D) -> Self {
        builder::build(doc)
    }

    /// Copy of this tree without the subtrees rooted at `tags`
    pub fn filter_tags<S: AsRef<str>>(&self, tags: &[S]) -> Self {
        filter::filter_tags(self, tags)
    }

    /// Number of addressable nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena indices of the top-level nodes
    #[inline]
    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    /// Node by arena index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&TreeNode> {
        self.nodes.get(index)
    }

    /// All nodes in document order
    #[inline]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Arena index of a path
    #[inline]
    pub fn position(&self, path: &PosPath) -> Option<usize> {
        self.index.get(path).copied()
    }

    pub fn node(&self, path: &PosPath) -> Option<&TreeNode> {
        self.position(path).map(|i| &self.nodes[i])
    }

    /// Every path in document order
    pub fn pos_xpaths_list(&self) -> Vec<&PosPath> {
        self.nodes.iter().map(|n| &n.path).collect()
    }

    pub fn metadata(&self, path: &PosPath) -> Option<NodeMetadata> {
        self.node(path).map(|n| n.metadata)
    }

    /// Metadata of every node keyed by path
    pub fn xpaths_metadata(&self) -> BTreeMap<PosPath, NodeMetadata> {
        self.nodes
            .iter()
            .map(|n| (n.path.clone(), n.metadata))
            .collect()
    }

    /// Size of the whole document (all top-level nodes)
    pub fn total_metadata(&self) -> NodeMetadata {
        self.roots
            .iter()
            .map(|&i| metadata::contribution(&self.nodes[i]))
            .fold(NodeMetadata::default(), |acc, m| acc + m)
    }

    /// Markup of the subtree at `path`
    pub fn html(&self, path: &PosPath) -> Option<String> {
        let index = self.position(path)?;
        let mut buf = String::with_capacity(self.nodes[index].metadata.html_length);
        self.write_html(index, &mut buf);
        Some(buf)
    }

    /// Rendered text of the subtree at `path`
    pub fn text(&self, path: &PosPath) -> Option<String> {
        let index = self.position(path)?;
        let mut buf = String::with_capacity(self.nodes[index].metadata.text_length);
        self.write_text(index, &mut buf);
        Some(buf)
    }

    /// Append the markup of the subtree at arena `index`
    pub fn write_html(&self, index: usize, buf: &mut String) {
        if index < self.nodes.len() {
            serialize::write_html(&self.nodes, index, buf);
        }
    }

    /// Append the rendered text of the subtree at arena `index`
    pub fn write_text(&self, index: usize, buf: &mut String) {
        if index < self.nodes.len() {
            serialize::write_text(&self.nodes, index, buf);
        }
    }

    /// Tag-based XPath of a node, e.g. `/html/body/div[2]/text()`
    ///
    /// A step carries a 1-based index only when its parent has several
    /// children of the same kind.
    pub fn xpath(&self, path: &PosPath) -> Option<String> {
        let mut chain = Vec::with_capacity(path.depth());
        let mut current = Some(self.position(path)?);
        while let Some(index) = current {
            chain.push(index);
            current = self.nodes[index].parent;
        }

        let mut out = String::new();
        for &index in chain.iter().rev() {
            let node = &self.nodes[index];
            let name = step_name(node);
            let mut count = 0;
            let mut position = 0;
            for &sibling in self.siblings(index) {
                if step_name(&self.nodes[sibling]) == name {
                    count += 1;
                    if sibling <= index {
                        position += 1;
                    }
                }
            }
            out.push('/');
            push_step(&mut out, name, count, position);
        }
        Some(out)
    }

    /// Tag-based XPaths of every node, indexed like [`nodes`](Self::nodes)
    ///
    /// One pass over each sibling list, so the cost is linear in the tree
    /// plus the length of the output.
    pub fn xpaths(&self) -> Vec<String> {
        let mut steps = vec![String::new(); self.nodes.len()];
        let sibling_lists = std::iter::once(&self.roots).chain(self.nodes.iter().map(|n| &n.children));
        for siblings in sibling_lists {
            let mut totals: HashMap<&str, usize> = HashMap::new();
            for &i in siblings {
                *totals.entry(step_name(&self.nodes[i])).or_default() += 1;
            }
            let mut seen: HashMap<&str, usize> = HashMap::with_capacity(totals.len());
            for &i in siblings {
                let name = step_name(&self.nodes[i]);
                let position = seen.entry(name).or_default();
                *position += 1;
                let count = totals.get(name).copied().unwrap_or(1);
                push_step(&mut steps[i], name, count, *position);
            }
        }

        let mut out: Vec<String> = Vec::with_capacity(self.nodes.len());
        for (node, step) in self.nodes.iter().zip(steps) {
            // Parents precede children in the arena
            let prefix = node.parent.map_or("", |p| out[p].as_str());
            let mut xpath = String::with_capacity(prefix.len() + step.len() + 1);
            xpath.push_str(prefix);
            xpath.push('/');
            xpath.push_str(&step);
            out.push(xpath);
        }
        out
    }

    fn siblings(&self, index: usize) -> &[usize] {
        match self.nodes[index].parent {
            Some(p) => &self.nodes[p].children,
            None => &self.roots,
        }
    }
}

fn step_name(node: &TreeNode) -> &str {
    node.tag().unwrap_or("text()")
}

fn push_step(buf: &mut String, name: &str, count: usize, position: usize) {
    buf.push_str(name);
    if count > 1 {
        buf.push('[');
        buf.push_str(&position.to_string());
        buf.push(']');
    }
}
