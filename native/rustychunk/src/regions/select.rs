//! Unit selection
//!
//! Breadth-first cut through the tree: the first node on each root-to-leaf
//! line whose subtree fits the budget becomes a unit. Leaves that do not fit
//! are taken anyway since they cannot be subdivided.

use super::ComparisonMetric;
use crate::tree::DomTree;
use std::collections::VecDeque;

/// A subtree chosen as an indivisible packing unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedUnit {
    /// Arena index of the subtree root
    pub index: usize,
    /// Length of the subtree under the active metric
    pub length: usize,
}

/// Select units under `metric` and `budget`, returned in document order
pub fn select_units(tree: &DomTree, metric: ComparisonMetric, budget: usize) -> Vec<SelectedUnit> {
    let mut units = Vec::new();
    let mut queue: VecDeque<usize> = tree.roots().iter().copied().collect();
    let mut visited = 0usize;

    while let Some(index) = queue.pop_front() {
        let Some(node) = tree.get(index) else {
            continue;
        };
        visited += 1;
        let length = metric.length_of(&node.metadata);

        if length <= budget || node.is_leaf() {
            units.push(SelectedUnit { index, length });
        } else {
            queue.extend(node.children.iter().copied());
        }
    }

    // BFS visits level by level; arena order is path order
    units.sort_unstable_by_key(|unit| unit.index);

    tracing::debug!(visited, units = units.len(), %metric, budget, "selected units");
    units
}
