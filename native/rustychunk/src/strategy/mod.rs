//! Chunking Strategy Module
//!
//! How chunking work is scheduled:
//! - Strategy A: Single document, single thread ([`crate::pipeline::Chunker`])
//! - Strategy B: Many documents in parallel ([`parallel::chunk_batch`])
//! - Strategy C: One tree under many budgets in parallel ([`parallel::chunk_budgets`])

pub mod parallel;

pub use parallel::{chunk_batch, chunk_budgets};
