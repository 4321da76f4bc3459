//! Render System
//!
//! Turns a region map back into markup and text. Nothing is re-parsed:
//! each unit is serialized from the tree's stored source slices and the
//! units of a region are concatenated in order. In the text rendering a
//! unit that had whitespace before it in the source is set off from the
//! preceding text by one space.

use crate::regions::{RegionMap, RegionOfInterest};
use crate::tree::DomTree;
use std::collections::BTreeMap;

/// Markup and text of every region, keyed like the region map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedRegions {
    pub html_render_roi: BTreeMap<usize, String>,
    pub text_render_roi: BTreeMap<usize, String>,
}

impl RenderedRegions {
    #[inline]
    pub fn len(&self) -> usize {
        self.html_render_roi.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.html_render_roi.is_empty()
    }
}

/// Renders regions of a tree
pub struct RenderSystem;

impl RenderSystem {
    /// Render every region of `regions`; both maps share its keys
    pub fn render(tree: &DomTree, regions: &RegionMap) -> RenderedRegions {
        let mut rendered = RenderedRegions::default();
        for (&index, roi) in regions {
            rendered
                .html_render_roi
                .insert(index, Self::html_render(tree, roi));
            rendered
                .text_render_roi
                .insert(index, Self::text_render(tree, roi));
        }
        tracing::debug!(regions = rendered.len(), "rendered regions");
        rendered
    }

    /// Concatenated markup of a region's units
    ///
    /// Paths not present in `tree` contribute nothing.
    pub fn html_render(tree: &DomTree, roi: &RegionOfInterest) -> String {
        let mut buf = String::new();
        for index in roi.pos_xpath_list.iter().filter_map(|p| tree.position(p)) {
            tree.write_html(index, &mut buf);
        }
        buf
    }

    /// Concatenated text of a region's units
    ///
    /// `repr_length` still counts the units alone, so a region's text can
    /// be longer by the separating spaces.
    pub fn text_render(tree: &DomTree, roi: &RegionOfInterest) -> String {
        let mut buf = String::new();
        for index in roi.pos_xpath_list.iter().filter_map(|p| tree.position(p)) {
            let separated = tree.get(index).is_some_and(|n| n.space_before);
            if separated && !buf.is_empty() && !buf.ends_with(' ') {
                buf.push(' ');
            }
            tree.write_text(index, &mut buf);
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::{ComparisonMetric, RegionPartitioner};
    use proptest::prelude::*;

    fn render(markup: &str, budget: usize) -> (RegionMap, RenderedRegions) {
        let tree = DomTree::parse(markup);
        let regions = RegionPartitioner::new(ComparisonMetric::TextLength, budget)
            .expect("budget")
            .partition(&tree);
        let rendered = RenderSystem::render(&tree, &regions);
        (regions, rendered)
    }

    #[test]
    fn test_keys_aligned() {
        let markup = "<h1>Heading</h1><p>First paragraph.</p><p>Second paragraph.</p>";
        let (regions, rendered) = render(markup, 20);
        assert_eq!(regions.len(), 3);
        assert!(rendered.html_render_roi.keys().eq(regions.keys()));
        assert!(rendered.text_render_roi.keys().eq(regions.keys()));
        assert!(rendered.html_render_roi.values().all(|h| !h.is_empty()));
        assert!(rendered.text_render_roi.values().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_units_concatenated() {
        let (_, rendered) = render("<p>ab</p> <p>cd</p><p>efgh</p>", 5);
        assert_eq!(rendered.html_render_roi[&0], "<p>ab</p><p>cd</p>");
        assert_eq!(rendered.text_render_roi[&0], "ab cd");
        assert_eq!(rendered.html_render_roi[&1], "<p>efgh</p>");
        assert_eq!(rendered.text_render_roi[&1], "efgh");
    }

    #[test]
    fn test_adjacent_units_not_separated() {
        let (_, rendered) = render("<p>ab</p><p>cd</p>", 4);
        assert_eq!(rendered.text_render_roi[&0], "abcd");
    }

    #[test]
    fn test_no_leading_separator_after_empty_unit() {
        let tree = DomTree::parse("<div><br> <p>xyz</p></div>");
        let roi = RegionOfInterest {
            pos_xpath_list: vec!["/0/0".parse().expect("path"), "/0/1".parse().expect("path")],
            repr_length: 3,
        };
        assert_eq!(RenderSystem::text_render(&tree, &roi), "xyz");
        assert_eq!(RenderSystem::html_render(&tree, &roi), "<br><p>xyz</p>");
    }

    #[test]
    fn test_special_characters() {
        let (_, rendered) = render("<p>Caf&eacute; &amp; cr&egrave;me &lt;3 — ✓</p>", 1000);
        assert_eq!(
            rendered.html_render_roi[&0],
            "<p>Caf&eacute; &amp; cr&egrave;me &lt;3 — ✓</p>"
        );
        assert_eq!(rendered.text_render_roi[&0], "Café & crème <3 — ✓");
    }

    #[test]
    fn test_empty() {
        let (regions, rendered) = render("", 10);
        assert!(regions.is_empty());
        assert!(rendered.is_empty());
        assert!(rendered.text_render_roi.is_empty());
    }

    #[test]
    fn test_unknown_paths_skipped() {
        let tree = DomTree::parse("<p>x</p>");
        let roi = RegionOfInterest {
            pos_xpath_list: vec!["/7".parse().expect("path"), "/0".parse().expect("path")],
            repr_length: 1,
        };
        assert_eq!(RenderSystem::html_render(&tree, &roi), "<p>x</p>");
    }

    fn markup_strategy() -> impl Strategy<Value = String> {
        let leaf = prop_oneof![
            "[a-z &;]{0,20}",
            Just("<br>".to_string()),
            Just("<hr/>".to_string()),
            Just("<img src=\"a.png\">".to_string()),
            Just("<span></span>".to_string()),
            Just("<div></div>".to_string()),
            Just(" ".to_string()),
        ];
        leaf.prop_recursive(4, 48, 5, |inner| {
            (
                prop::sample::select(vec!["div", "p", "section", "li", "em"]),
                prop::collection::vec(inner, 0..5),
                prop::sample::select(vec!["", " "]),
            )
                .prop_map(|(tag, children, gap)| format!("<{tag}>{}</{tag}>", children.join(gap)))
        })
    }

    proptest! {
        #[test]
        fn prop_renders_aligned_and_non_empty(
            markup in markup_strategy(),
            budget in 1usize..120,
            by_html in any::<bool>(),
        ) {
            let metric = if by_html { ComparisonMetric::HtmlLength } else { ComparisonMetric::TextLength };
            let tree = DomTree::parse(&markup);
            let regions = RegionPartitioner::new(metric, budget).expect("budget").partition(&tree);
            let rendered = RenderSystem::render(&tree, &regions);

            prop_assert!(rendered.html_render_roi.keys().eq(regions.keys()));
            prop_assert!(rendered.text_render_roi.keys().eq(regions.keys()));

            for (index, roi) in &regions {
                prop_assert!(!rendered.html_render_roi[index].is_empty());

                let text_length: usize = roi
                    .pos_xpath_list
                    .iter()
                    .filter_map(|p| tree.metadata(p))
                    .map(|m| m.text_length)
                    .sum();
                // Markup-only regions (a lone `<br>` under the html metric) have no text
                prop_assert_eq!(!rendered.text_render_roi[index].is_empty(), text_length > 0);
                if !by_html {
                    prop_assert_eq!(roi.repr_length, text_length);
                }
            }
        }
    }
}
