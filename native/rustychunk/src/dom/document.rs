//! HTML Document - Arena-based DOM representation
//!
//! Efficient DOM storage with:
//! - Arena allocation for nodes
//! - NodeId indices for traversal
//! - Zero-copy markup via spans into the original input
//!
//! Tree construction never fails. Malformed markup is repaired the way a
//! browser would for the common cases: void elements take no children,
//! some start tags implicitly close an open sibling (`p`, `li`, table
//! cells...), an end tag closes the nearest matching open element, and
//! anything still open at end of input is closed implicitly.

use super::node::{Closing, HtmlAttribute, HtmlNode, NodeId, NodeKind};
use super::DocumentAccess;
use crate::reader::{MarkupEvent, SliceReader, StartElement};
use std::borrow::Cow;

/// Elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Start tags that close an open `p`
const CLOSES_PARAGRAPH: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hgroup", "hr", "li", "main", "menu", "nav", "ol", "p", "pre", "section", "table", "ul",
];

/// Check whether `name` is a void element
#[inline]
fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Does opening `incoming` implicitly close an open `open` element?
fn implicitly_closes(open: &str, incoming: &str) -> bool {
    match open {
        "p" => CLOSES_PARAGRAPH.contains(&incoming),
        "li" => incoming == "li",
        "dt" | "dd" => matches!(incoming, "dt" | "dd"),
        "option" => matches!(incoming, "option" | "optgroup"),
        "tr" => incoming == "tr",
        "td" | "th" => matches!(incoming, "td" | "th" | "tr"),
        "thead" | "tbody" | "tfoot" => matches!(incoming, "thead" | "tbody" | "tfoot"),
        _ => false,
    }
}

/// An HTML document stored in arena format
pub struct HtmlDocument<'a> {
    /// Original input (for zero-copy markup extraction)
    input: &'a str,
    /// Arena of nodes; index 0 is the document node
    nodes: Vec<HtmlNode>,
    /// Arena of attributes
    attributes: Vec<HtmlAttribute>,
}

impl<'a> HtmlDocument<'a> {
    /// Parse an HTML document from a string slice
    pub fn parse(input: &'a str) -> Self {
        let mut doc = HtmlDocument {
            input,
            nodes: Vec::with_capacity(256),
            attributes: Vec::with_capacity(128),
        };

        // Create document root node
        doc.nodes.push(HtmlNode::document());
        doc.build_from_events();
        doc
    }

    /// Build DOM from markup events
    fn build_from_events(&mut self) {
        let reader = SliceReader::new(self.input);
        let mut stack: Vec<NodeId> = vec![0]; // Start with document node

        for event in reader {
            match event {
                MarkupEvent::StartElement(elem) => {
                    self.close_implied_by(&elem.name, &mut stack);
                    self.handle_element(elem, &mut stack);
                }

                MarkupEvent::EndElement(end_elem) => {
                    // Nearest open element with this name; the document node never matches
                    let matched = stack
                        .iter()
                        .rposition(|&id| id != 0 && *self.nodes[id as usize].name == *end_elem.name);

                    if let Some(index) = matched {
                        let node_id = stack[index];
                        self.nodes[node_id as usize].closing =
                            Closing::EndTag(end_elem.span.0, end_elem.span.1);
                        // Everything opened after the match is closed implicitly
                        stack.truncate(index);
                    }
                }

                MarkupEvent::Text(run) => {
                    let parent_id = *stack.last().unwrap_or(&0);
                    let node = HtmlNode::text(run.span, run.mode, Some(parent_id));
                    self.push_child(parent_id, node);
                }

                MarkupEvent::Comment(m) => self.push_other(NodeKind::Comment, m.span, &stack),
                MarkupEvent::Declaration(m) => self.push_other(NodeKind::Declaration, m.span, &stack),
                MarkupEvent::ProcessingInstruction(m) => {
                    self.push_other(NodeKind::ProcessingInstruction, m.span, &stack)
                }
            }
        }
    }

    /// Pop open elements that `incoming` closes implicitly
    fn close_implied_by(&mut self, incoming: &str, stack: &mut Vec<NodeId>) {
        while let Some(&top) = stack.last() {
            if top == 0 || !implicitly_closes(&self.nodes[top as usize].name, incoming) {
                break;
            }
            stack.pop();
        }
    }

    /// Handle a start element
    fn handle_element(&mut self, elem: StartElement<'_>, stack: &mut Vec<NodeId>) {
        let parent_id = *stack.last().unwrap_or(&0);
        let mut node = HtmlNode::element(&elem.name, elem.span, Some(parent_id));

        let attr_start = self.attributes.len() as u32;
        for attr in elem.attributes.iter().take(u16::MAX as usize) {
            self.attributes.push(HtmlAttribute::new(&attr.name, &attr.value));
        }
        node.attr_start = attr_start;
        node.attr_count = elem.attributes.len().min(u16::MAX as usize) as u16;

        let is_empty = elem.self_closing || is_void_element(&elem.name);
        if is_empty {
            node.closing = Closing::Empty;
        }

        let node_id = self.push_child(parent_id, node);
        if !is_empty {
            stack.push(node_id);
        }
    }

    fn push_other(&mut self, kind: NodeKind, span: (usize, usize), stack: &[NodeId]) {
        let parent_id = *stack.last().unwrap_or(&0);
        let node = HtmlNode::other(kind, span, Some(parent_id));
        self.push_child(parent_id, node);
    }

    /// Add a node to the arena and link it as the last child of its parent
    fn push_child(&mut self, parent_id: NodeId, node: HtmlNode) -> NodeId {
        let child_id = self.nodes.len() as NodeId;
        self.nodes.push(node);

        // Get parent's last_child first to avoid borrow issues
        let last_child_opt = self.nodes[parent_id as usize].last_child;

        if let Some(last_child_id) = last_child_opt {
            // Link to previous sibling
            self.nodes[child_id as usize].prev_sibling = Some(last_child_id);
            self.nodes[last_child_id as usize].next_sibling = Some(child_id);
        } else {
            // First child
            self.nodes[parent_id as usize].first_child = Some(child_id);
        }
        self.nodes[parent_id as usize].last_child = Some(child_id);
        child_id
    }

    /// Iterate over children of a node
    pub fn children(&self, id: NodeId) -> ChildIter<'_, 'a> {
        let first = self.get_node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    #[inline]
    fn slice(&self, span: (usize, usize)) -> &'a str {
        &self.input[span.0..span.1]
    }
}

impl DocumentAccess for HtmlDocument<'_> {
    fn get_node(&self, id: NodeId) -> Option<&HtmlNode> {
        self.nodes.get(id as usize)
    }

    fn node_name(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        node.is_element().then_some(&*node.name)
    }

    fn attribute_values(&self, id: NodeId) -> Vec<(&str, &str)> {
        let Some(node) = self.get_node(id) else {
            return Vec::new();
        };
        let start = node.attr_start as usize;
        let end = (start + node.attr_count as usize).min(self.attributes.len());
        self.attributes[start..end]
            .iter()
            .map(|attr| (attr.name.as_str(), attr.value.as_str()))
            .collect()
    }

    fn children_vec(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).collect()
    }

    fn start_tag(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        node.is_element().then(|| self.slice(node.span))
    }

    fn end_tag(&self, id: NodeId) -> Option<Cow<'_, str>> {
        let node = self.get_node(id)?;
        if !node.is_element() {
            return None;
        }
        match node.closing {
            Closing::EndTag(start, end) => Some(Cow::Borrowed(self.slice((start, end)))),
            Closing::Implied => Some(Cow::Owned(format!("</{}>", node.name))),
            Closing::Empty => None,
        }
    }

    fn raw_text(&self, id: NodeId) -> Option<&str> {
        let node = self.get_node(id)?;
        node.is_text().then(|| self.slice(node.span))
    }

    fn text_content(&self, id: NodeId) -> Option<Cow<'_, str>> {
        let node = self.get_node(id)?;
        if !node.is_text() {
            return None;
        }
        Some(node.text_mode.decode(self.slice(node.span)))
    }
}

/// Iterator over child nodes
pub struct ChildIter<'d, 'a> {
    doc: &'d HtmlDocument<'a>,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_, '_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.get_node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}
