//! Chunking pipeline
//!
//! Builder -> metadata -> tag filter -> partitioner -> render. Every stage
//! produces a fresh immutable value, so independent runs can execute in
//! parallel without coordination.

use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::regions::{RegionMap, RegionOfInterest, RegionPartitioner};
use crate::render::{RenderSystem, RenderedRegions};
use crate::tree::DomTree;
use std::collections::BTreeMap;

/// Regions of one tree with their renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub regions: RegionMap,
    pub rendered: RenderedRegions,
}

impl Partition {
    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn html_render_roi(&self) -> &BTreeMap<usize, String> {
        &self.rendered.html_render_roi
    }

    pub fn text_render_roi(&self) -> &BTreeMap<usize, String> {
        &self.rendered.text_render_roi
    }

    /// Regions in order with their markup and text
    pub fn chunks(&self) -> impl Iterator<Item = Chunk<'_>> {
        self.regions.iter().map(move |(&index, roi)| Chunk {
            index,
            roi,
            html: self
                .rendered
                .html_render_roi
                .get(&index)
                .map_or("", String::as_str),
            text: self
                .rendered
                .text_render_roi
                .get(&index)
                .map_or("", String::as_str),
        })
    }
}

/// One region with its renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub index: usize,
    pub roi: &'a RegionOfInterest,
    pub html: &'a str,
    pub text: &'a str,
}

/// Partition an already built (and filtered) tree and render the result
pub fn partition_tree(tree: &DomTree, partitioner: &RegionPartitioner) -> Partition {
    let regions = partitioner.partition(tree);
    let rendered = RenderSystem::render(tree, &regions);
    Partition { regions, rendered }
}

/// Complete result of chunking one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedDocument {
    /// The tree the regions refer to (after tag filtering)
    pub tree: DomTree,
    pub partition: Partition,
}

impl ChunkedDocument {
    pub fn regions(&self) -> &RegionMap {
        &self.partition.regions
    }

    pub fn html_render_roi(&self) -> &BTreeMap<usize, String> {
        self.partition.html_render_roi()
    }

    pub fn text_render_roi(&self) -> &BTreeMap<usize, String> {
        self.partition.text_render_roi()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.partition.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.partition.is_empty()
    }
}

/// Validated configuration ready to chunk documents
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkerConfig,
    partitioner: RegionPartitioner,
}

impl Chunker {
    /// Validate `config`; nothing runs when it is rejected
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        config.validate()?;
        let partitioner = RegionPartitioner::new(
            config.repr_length_compared_by,
            config.max_node_repr_length,
        )?;
        Ok(Chunker {
            config,
            partitioner,
        })
    }

    #[inline]
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk raw markup
    pub fn chunk(&self, markup: &str) -> ChunkedDocument {
        tracing::debug!(bytes = markup.len(), "chunking document");
        self.chunk_tree(&DomTree::parse(markup))
    }

    /// Chunk an already built tree; the tree itself is not modified
    pub fn chunk_tree(&self, tree: &DomTree) -> ChunkedDocument {
        let tree = tree.filter_tags(&self.config.tag_list_to_filter_out);
        let partition = partition_tree(&tree, &self.partitioner);
        ChunkedDocument { tree, partition }
    }
}

/// Chunk one document with `config`
pub fn chunk(markup: &str, config: ChunkerConfig) -> Result<ChunkedDocument> {
    Ok(Chunker::new(config)?.chunk(markup))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChunkError;
    use crate::regions::ComparisonMetric;

    const ARTICLE: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Sample</title><style>p { color: red }</style></head>
  <body>
    <h1>Chunking</h1>
    <p>The first paragraph is short.</p>
    <p>The second paragraph is a little longer than the first one.</p>
    <footer>Copyright</footer>
  </body>
</html>"#;

    #[test]
    fn test_invalid_budget_rejected_up_front() {
        let result = chunk(ARTICLE, ChunkerConfig::new(0));
        assert_eq!(result.err(), Some(ChunkError::InvalidBudget { budget: 0 }));
    }

    #[test]
    fn test_empty_input() {
        let doc = chunk("", ChunkerConfig::default()).expect("valid config");
        assert!(doc.tree.is_empty());
        assert!(doc.is_empty());
        assert!(doc.html_render_roi().is_empty());
        assert!(doc.text_render_roi().is_empty());
    }

    #[test]
    fn test_filter_then_partition() {
        let config = ChunkerConfig::new(40).with_excluded_tags(["head", "footer"]);
        let doc = chunk(ARTICLE, config).expect("valid config");

        let texts: Vec<&str> = doc.text_render_roi().values().map(String::as_str).collect();
        assert_eq!(
            texts,
            vec![
                "Chunking The first paragraph is short.",
                "The second paragraph is a little longer than the first one."
            ]
        );
        assert!(doc
            .html_render_roi()
            .values()
            .all(|h| !h.contains("footer") && !h.contains("style")));
    }

    fn summary(doc: &ChunkedDocument) -> Vec<(Vec<String>, usize, &str, &str)> {
        doc.partition
            .chunks()
            .map(|c| {
                let paths = c.roi.pos_xpath_list.iter().map(|p| p.to_string()).collect();
                (paths, c.roi.repr_length, c.html, c.text)
            })
            .collect()
    }

    #[test]
    fn test_void_element_joins_oversized_region() {
        let doc = chunk("<br><p>xxxxxx</p>", ChunkerConfig::new(3)).expect("valid config");
        assert_eq!(
            summary(&doc),
            vec![(
                vec!["/0".to_string(), "/1/0".to_string()],
                6,
                "<br>xxxxxx",
                "xxxxxx"
            )]
        );
    }

    #[test]
    fn test_trailing_void_element_joins_last_region() {
        let doc = chunk("<p>xxxxxx</p><hr>", ChunkerConfig::new(3)).expect("valid config");
        assert_eq!(
            summary(&doc),
            vec![(
                vec!["/0/0".to_string(), "/1".to_string()],
                6,
                "xxxxxx<hr>",
                "xxxxxx"
            )]
        );
    }

    #[test]
    fn test_regions_have_positive_length() {
        let markup = "<div></div><p>one two</p><br><section><span></span><p>three</p></section><hr>";
        for budget in 1..20 {
            let doc = chunk(markup, ChunkerConfig::new(budget)).expect("valid config");
            assert!(!doc.is_empty());
            for c in doc.partition.chunks() {
                assert!(c.roi.repr_length > 0, "budget {budget}: {:?}", c.roi);
                assert!(!c.text.is_empty());
                assert!(!c.html.is_empty());
            }
        }
    }

    #[test]
    fn test_document_without_text_is_one_region() {
        let doc = chunk("<div></div>", ChunkerConfig::new(10)).expect("valid config");
        assert_eq!(
            summary(&doc),
            vec![(vec!["/0".to_string()], 0, "<div></div>", "")]
        );
    }

    #[test]
    fn test_whole_document_single_region() {
        let doc = chunk(ARTICLE, ChunkerConfig::new(10_000)).expect("valid config");
        assert_eq!(doc.len(), 1);
        let html = &doc.html_render_roi()[&0];
        assert!(html.starts_with("<html>"));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_html_metric() {
        let config = ChunkerConfig::new(80).with_metric(ComparisonMetric::HtmlLength);
        let doc = chunk(ARTICLE, config).expect("valid config");
        for chunk in doc.partition.chunks() {
            assert_eq!(chunk.html.chars().count(), chunk.roi.repr_length);
        }
    }

    #[test]
    fn test_chunk_tree_leaves_input_alone() {
        let tree = DomTree::parse(ARTICLE);
        let chunker = Chunker::new(ChunkerConfig::new(50).with_excluded_tags(["body"]))
            .expect("valid config");
        assert_eq!(chunker.config().tag_list_to_filter_out, vec!["body"]);
        let doc = chunker.chunk_tree(&tree);
        assert!(doc.tree.len() < tree.len());
        assert!(tree.nodes().iter().any(|n| n.tag() == Some("body")));
    }
}
