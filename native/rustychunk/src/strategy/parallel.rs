//! Parallel Chunking (Strategies B and C)
//!
//! Uses Rayon. Each run owns its own tree, so no synchronization is needed
//! beyond collecting the results.

use crate::config::ChunkerConfig;
use crate::error::Result;
use crate::pipeline::{partition_tree, ChunkedDocument, Chunker, Partition};
use crate::regions::{ComparisonMetric, RegionPartitioner};
use crate::tree::DomTree;
use rayon::prelude::*;

/// Chunk independent documents in parallel
///
/// The configuration is validated once; results keep input order.
pub fn chunk_batch<S>(config: &ChunkerConfig, documents: &[S]) -> Result<Vec<ChunkedDocument>>
where
    S: AsRef<str> + Sync,
{
    let chunker = Chunker::new(config.clone())?;
    tracing::debug!(documents = documents.len(), "chunking batch");
    Ok(documents
        .par_iter()
        .map(|markup| chunker.chunk(markup.as_ref()))
        .collect())
}

/// Partition one tree under several `(budget, metric)` requests in parallel
///
/// Every request is validated before any partitioning starts.
pub fn chunk_budgets(
    tree: &DomTree,
    requests: &[(usize, ComparisonMetric)],
) -> Result<Vec<Partition>> {
    let partitioners = requests
        .iter()
        .map(|&(budget, metric)| RegionPartitioner::new(metric, budget))
        .collect::<Result<Vec<_>>>()?;

    Ok(partitioners
        .par_iter()
        .map(|partitioner| partition_tree(tree, partitioner))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChunkError;

    #[test]
    fn test_batch_matches_sequential() {
        let docs = [
            "<p>one</p><p>two</p>",
            "",
            "<div><p>a much longer paragraph of text</p><p>short</p></div>",
        ];
        let config = ChunkerConfig::new(10);
        let batch = chunk_batch(&config, &docs).expect("valid config");
        assert_eq!(batch.len(), 3);

        let chunker = Chunker::new(config).expect("valid config");
        for (doc, result) in docs.iter().zip(&batch) {
            assert_eq!(result, &chunker.chunk(doc));
        }
        assert!(batch[1].is_empty());
    }

    #[test]
    fn test_batch_rejects_bad_config() {
        let docs = vec!["<p>x</p>".to_string()];
        assert_eq!(
            chunk_batch(&ChunkerConfig::new(0), &docs[..]).err(),
            Some(ChunkError::InvalidBudget { budget: 0 })
        );
    }

    #[test]
    fn test_budgets() {
        let tree = DomTree::parse("<p>aaaa</p><p>bbbb</p><p>cccc</p>");
        let results = chunk_budgets(
            &tree,
            &[
                (100, ComparisonMetric::TextLength),
                (4, ComparisonMetric::TextLength),
                (11, ComparisonMetric::HtmlLength),
            ],
        )
        .expect("valid budgets");
        assert_eq!(results.iter().map(Partition::len).collect::<Vec<_>>(), vec![1, 3, 3]);
    }

    #[test]
    fn test_budgets_validated_first() {
        let tree = DomTree::parse("<p>x</p>");
        let result = chunk_budgets(
            &tree,
            &[(5, ComparisonMetric::TextLength), (0, ComparisonMetric::HtmlLength)],
        );
        assert!(result.is_err());
    }
}
