//! Region Partitioner
//!
//! Splits an element tree into an ordered sequence of bounded-size regions
//! of interest in two pure phases:
//! 1. [`select_units`]: breadth-first cut into maximal subtrees that fit
//! 2. [`pack_units`]: greedy first-fit packing of those units in document order
//!
//! Together they produce a complete, non-overlapping partition of the
//! selected units. Only a region holding a single oversized unit may exceed
//! the budget.

pub mod pack;
pub mod select;

use crate::error::{ChunkError, Result};
use crate::tree::{DomTree, NodeMetadata, PosPath};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use pack::{pack_units, PackedRegion};
pub use select::{select_units, SelectedUnit};

/// Which node size drives selection and packing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ComparisonMetric {
    /// Length of the rendered text
    #[default]
    TextLength,
    /// Length of the serialized markup
    HtmlLength,
}

impl ComparisonMetric {
    #[inline]
    pub fn length_of(self, metadata: &NodeMetadata) -> usize {
        match self {
            ComparisonMetric::TextLength => metadata.text_length,
            ComparisonMetric::HtmlLength => metadata.html_length,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonMetric::TextLength => "text_length",
            ComparisonMetric::HtmlLength => "html_length",
        }
    }
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMetric {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text_length" | "text" => Ok(ComparisonMetric::TextLength),
            "html_length" | "html" => Ok(ComparisonMetric::HtmlLength),
            _ => Err(ChunkError::UnknownMetric(s.to_string())),
        }
    }
}

/// One output chunk: the units it covers and their summed length
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionOfInterest {
    /// Unit paths in document order, never empty
    pub pos_xpath_list: Vec<PosPath>,
    /// Sum of the units' lengths under the active metric
    pub repr_length: usize,
}

/// Dense region index -> region, in document order
pub type RegionMap = BTreeMap<usize, RegionOfInterest>;

/// Partitions trees under a fixed metric and budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionPartitioner {
    metric: ComparisonMetric,
    max_node_repr_length: usize,
}

impl RegionPartitioner {
    /// Create a partitioner; a zero budget can never be satisfied
    pub fn new(metric: ComparisonMetric, max_node_repr_length: usize) -> Result<Self> {
        if max_node_repr_length == 0 {
            return Err(ChunkError::InvalidBudget { budget: 0 });
        }
        Ok(RegionPartitioner {
            metric,
            max_node_repr_length,
        })
    }

    #[inline]
    pub fn metric(&self) -> ComparisonMetric {
        self.metric
    }

    #[inline]
    pub fn max_node_repr_length(&self) -> usize {
        self.max_node_repr_length
    }

    /// Phase 1 only: the selected units in document order
    pub fn select(&self, tree: &DomTree) -> Vec<SelectedUnit> {
        select_units(tree, self.metric, self.max_node_repr_length)
    }

    /// Run both phases and build the region map
    pub fn partition(&self, tree: &DomTree) -> RegionMap {
        let units = self.select(tree);
        let packed = pack_units(
            units.iter().map(|unit| (unit.index, unit.length)),
            self.max_node_repr_length,
        );

        let regions: RegionMap = packed
            .into_iter()
            .enumerate()
            .map(|(i, region)| {
                let roi = RegionOfInterest {
                    pos_xpath_list: region
                        .units
                        .iter()
                        .map(|&index| tree.nodes()[index].path.clone())
                        .collect(),
                    repr_length: region.length,
                };
                (i, roi)
            })
            .collect();

        tracing::debug!(
            units = units.len(),
            regions = regions.len(),
            metric = %self.metric,
            budget = self.max_node_repr_length,
            "partitioned tree"
        );
        regions
    }
}
