//! ResourceArc Wrappers
//!
//! A parsed element tree kept alive on the BEAM side, with a small cache of
//! partitions so repeated requests for the same budget and metric are free.

use crate::error::{ChunkError, Result};
use crate::pipeline::{partition_tree, Partition};
use crate::regions::{ComparisonMetric, RegionPartitioner};
use crate::tree::DomTree;
use lru::LruCache;
use rustler::ResourceArc;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Partitions remembered per document
const PARTITION_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(16) {
    Some(n) => n,
    None => NonZeroUsize::MIN,
};

type PartitionKey = (usize, ComparisonMetric);

/// Wrapper for a DomTree that can be stored in a ResourceArc
pub struct DocumentResource {
    tree: DomTree,
    partitions: Mutex<LruCache<PartitionKey, Arc<Partition>>>,
}

impl DocumentResource {
    pub fn new(tree: DomTree) -> Self {
        DocumentResource {
            tree,
            partitions: Mutex::new(LruCache::new(PARTITION_CACHE_CAPACITY)),
        }
    }

    /// Parse ONCE and store the tree
    pub fn parse(markup: &str) -> Self {
        Self::new(DomTree::parse(markup))
    }

    #[inline]
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Partition the stored tree, reusing a cached result when present
    ///
    /// # Errors
    ///
    /// `InvalidBudget` for a zero budget, `DocumentUnavailable` if the cache
    /// mutex is poisoned.
    pub fn partition(&self, budget: usize, metric: ComparisonMetric) -> Result<Arc<Partition>> {
        let partitioner = RegionPartitioner::new(metric, budget)?;
        let key = (partitioner.max_node_repr_length(), partitioner.metric());

        if let Some(hit) = self.lock_partitions()?.get(&key) {
            tracing::trace!(budget, %metric, "partition cache hit");
            return Ok(Arc::clone(hit));
        }

        // Computed without holding the lock; a racing duplicate is harmless
        let computed = Arc::new(partition_tree(&self.tree, &partitioner));
        self.lock_partitions()?.put(key, Arc::clone(&computed));
        Ok(computed)
    }

    /// Number of partitions currently cached
    pub fn cached_partitions(&self) -> usize {
        self.partitions.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    fn lock_partitions(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, LruCache<PartitionKey, Arc<Partition>>>> {
        self.partitions
            .lock()
            .map_err(|_| ChunkError::DocumentUnavailable("mutex_poisoned"))
    }
}

#[rustler::resource_impl]
impl rustler::Resource for DocumentResource {}

impl Default for DocumentResource {
    fn default() -> Self {
        Self::new(DomTree::default())
    }
}

/// Type alias for document ResourceArc
pub type DocumentRef = ResourceArc<DocumentResource>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_cached() {
        let resource = DocumentResource::parse("<p>one</p><p>two</p><p>three</p>");
        let first = resource
            .partition(4, ComparisonMetric::TextLength)
            .expect("valid budget");
        let again = resource
            .partition(4, ComparisonMetric::TextLength)
            .expect("valid budget");
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(resource.cached_partitions(), 1);

        let other = resource
            .partition(4, ComparisonMetric::HtmlLength)
            .expect("valid budget");
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(resource.cached_partitions(), 2);
    }

    #[test]
    fn test_invalid_budget_not_cached() {
        let resource = DocumentResource::parse("<p>x</p>");
        assert_eq!(
            resource.partition(0, ComparisonMetric::TextLength).err(),
            Some(ChunkError::InvalidBudget { budget: 0 })
        );
        assert_eq!(resource.cached_partitions(), 0);
    }

    #[test]
    fn test_cache_bounded() {
        let resource = DocumentResource::parse("<p>abc</p>");
        for budget in 1..=40 {
            resource
                .partition(budget, ComparisonMetric::HtmlLength)
                .expect("valid budget");
        }
        assert_eq!(
            resource.cached_partitions(),
            PARTITION_CACHE_CAPACITY.get()
        );
    }
}
