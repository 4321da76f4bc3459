//! Chunker configuration
//!
//! Configuration is built in code (or decoded by the NIF adapter); there is
//! no file or environment loading. Validation happens once, before any
//! document is touched.

use crate::error::{ChunkError, Result};
use crate::regions::ComparisonMetric;

/// Budget used when none is given
pub const DEFAULT_MAX_NODE_REPR_LENGTH: usize = 1024;

/// Budget from a signed adapter value; zero and negatives are rejected
pub fn positive_budget(budget: i64) -> Result<usize> {
    usize::try_from(budget)
        .ok()
        .filter(|&b| b > 0)
        .ok_or(ChunkError::InvalidBudget { budget })
}

/// Everything one pipeline run needs besides the document itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkerConfig {
    /// Size budget per region, measured with `repr_length_compared_by`
    pub max_node_repr_length: usize,
    /// Which node size drives unit selection and packing
    pub repr_length_compared_by: ComparisonMetric,
    /// Tag names whose whole subtrees are removed before partitioning
    pub tag_list_to_filter_out: Vec<String>,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        ChunkerConfig {
            max_node_repr_length: DEFAULT_MAX_NODE_REPR_LENGTH,
            repr_length_compared_by: ComparisonMetric::TextLength,
            tag_list_to_filter_out: Vec::new(),
        }
    }
}

impl ChunkerConfig {
    /// Config with the given budget and default metric and filters
    pub fn new(max_node_repr_length: usize) -> Self {
        ChunkerConfig {
            max_node_repr_length,
            ..Default::default()
        }
    }

    /// Config from adapter-supplied values, where the budget may be signed
    pub fn from_signed(
        max_node_repr_length: i64,
        repr_length_compared_by: ComparisonMetric,
        tag_list_to_filter_out: Vec<String>,
    ) -> Result<Self> {
        Ok(ChunkerConfig::new(positive_budget(max_node_repr_length)?)
            .with_metric(repr_length_compared_by)
            .with_excluded_tags(tag_list_to_filter_out))
    }

    pub fn with_metric(mut self, metric: ComparisonMetric) -> Self {
        self.repr_length_compared_by = metric;
        self
    }

    /// Set the excluded tag names (matched case-insensitively)
    pub fn with_excluded_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tag_list_to_filter_out = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_ascii_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        self
    }

    /// Reject configurations no partition can satisfy
    pub fn validate(&self) -> Result<()> {
        if self.max_node_repr_length == 0 {
            return Err(ChunkError::InvalidBudget { budget: 0 });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ChunkerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_node_repr_length, DEFAULT_MAX_NODE_REPR_LENGTH);
        assert_eq!(config.repr_length_compared_by, ComparisonMetric::TextLength);
        assert!(config.tag_list_to_filter_out.is_empty());
    }

    #[test]
    fn test_zero_budget_rejected() {
        assert_eq!(
            ChunkerConfig::new(0).validate(),
            Err(ChunkError::InvalidBudget { budget: 0 })
        );
    }

    #[test]
    fn test_positive_budget() {
        assert_eq!(positive_budget(12), Ok(12));
        assert_eq!(positive_budget(0), Err(ChunkError::InvalidBudget { budget: 0 }));
        assert_eq!(positive_budget(-1), Err(ChunkError::InvalidBudget { budget: -1 }));
    }

    #[test]
    fn test_from_signed() {
        let config =
            ChunkerConfig::from_signed(100, ComparisonMetric::HtmlLength, vec!["SCRIPT".into()])
                .expect("valid config");
        assert_eq!(config.max_node_repr_length, 100);
        assert_eq!(config.repr_length_compared_by, ComparisonMetric::HtmlLength);
        assert_eq!(config.tag_list_to_filter_out, vec!["script".to_string()]);

        assert_eq!(
            ChunkerConfig::from_signed(-5, ComparisonMetric::TextLength, vec![]),
            Err(ChunkError::InvalidBudget { budget: -5 })
        );
        assert!(ChunkerConfig::from_signed(0, ComparisonMetric::TextLength, vec![]).is_err());
    }

    #[test]
    fn test_excluded_tags_normalized() {
        let config = ChunkerConfig::default().with_excluded_tags([" Style ", "", "nav"]);
        assert_eq!(config.tag_list_to_filter_out, vec!["style", "nav"]);
    }
}
