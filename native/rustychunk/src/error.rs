//! Error types
//!
//! Only configuration and adapter decoding can fail. Degenerate input
//! (empty or filter-emptied documents) is not an error and malformed markup
//! is repaired by the parser.

use thiserror::Error;

/// Errors raised before any partitioning work starts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    /// The size budget must be a positive integer
    #[error("max_node_repr_length must be positive, got {budget}")]
    InvalidBudget { budget: i64 },

    #[error("unknown comparison metric `{0}` (expected `text_length` or `html_length`)")]
    UnknownMetric(String),

    #[error("invalid positional path `{0}`")]
    InvalidPath(String),

    /// A retained document could not be accessed
    #[error("document unavailable: {0}")]
    DocumentUnavailable(&'static str),
}

pub type Result<T> = std::result::Result<T, ChunkError>;
