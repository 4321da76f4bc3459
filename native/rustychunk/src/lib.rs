//! RustyChunk - Structure-aware HTML chunking
//!
//! Splits a markup document into ordered, size-bounded regions and renders
//! each region back to markup and text.
//!
//! Pipeline:
//! A: Lenient HTML parsing into an arena DOM (`dom`)
//! B: Addressable element tree with per-node sizes (`tree`)
//! C: Optional tag filtering (`tree::filter`)
//! D: Breadth-first unit selection and greedy packing (`regions`)
//! E: Markup and text rendering (`render`)
//!
//! Usable directly from Rust through [`pipeline::Chunker`] and from Elixir
//! through the NIFs below.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod regions;
pub mod render;
pub mod resource;
pub mod strategy;
pub mod term;
pub mod tree;

pub use config::ChunkerConfig;
pub use error::ChunkError;
pub use pipeline::{ChunkedDocument, Chunker, Partition};
pub use regions::{ComparisonMetric, RegionMap, RegionOfInterest, RegionPartitioner};
pub use render::{RenderSystem, RenderedRegions};
pub use tree::{DomTree, NodeMetadata, PosPath};

use resource::{DocumentRef, DocumentResource};
use term::{binary_to_markup, decode_metric, error_to_term, ok_partition};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Argument Decoding
// ============================================================================

fn decode_config(
    budget: i64,
    metric: Term<'_>,
    excluded_tags: Vec<String>,
) -> Result<ChunkerConfig, ChunkError> {
    let metric = decode_metric(metric)?;
    ChunkerConfig::from_signed(budget, metric, excluded_tags)
}

// ============================================================================
// One-Shot Chunking
// ============================================================================

/// Chunk markup in one call
///
/// Returns `{:ok, %{regions: [...], html: [...], text: [...]}}` or
/// `{:error, reason}` when the budget or metric is invalid.
#[rustler::nif(schedule = "DirtyCpu")]
fn chunk<'a>(
    env: Env<'a>,
    input: Binary<'a>,
    budget: i64,
    metric: Term<'a>,
    excluded_tags: Vec<String>,
) -> NifResult<Term<'a>> {
    let chunker = match decode_config(budget, metric, excluded_tags).and_then(Chunker::new) {
        Ok(chunker) => chunker,
        Err(e) => return Ok(error_to_term(env, &e)),
    };
    let markup = binary_to_markup(&input);
    let document = chunker.chunk(&markup);
    ok_partition(env, &document.partition)
}

/// Chunk many documents in parallel with one configuration
///
/// Returns `{:ok, [partition_map, ...]}` in input order.
#[rustler::nif(schedule = "DirtyCpu")]
fn chunk_batch<'a>(
    env: Env<'a>,
    inputs: Vec<Binary<'a>>,
    budget: i64,
    metric: Term<'a>,
    excluded_tags: Vec<String>,
) -> NifResult<Term<'a>> {
    let config = match decode_config(budget, metric, excluded_tags) {
        Ok(config) => config,
        Err(e) => return Ok(error_to_term(env, &e)),
    };
    let markups: Vec<_> = inputs.iter().map(binary_to_markup).collect();

    let documents = match strategy::chunk_batch(&config, markups.as_slice()) {
        Ok(documents) => documents,
        Err(e) => return Ok(error_to_term(env, &e)),
    };

    let mut list = Term::list_new_empty(env);
    for document in documents.iter().rev() {
        list = list.list_prepend(term::partition_to_term(env, &document.partition)?);
    }
    Ok((term::ok(), list).encode(env))
}

// ============================================================================
// Retained Documents
// ============================================================================

/// Parse markup into a retained element tree (returns ResourceArc)
#[rustler::nif(schedule = "DirtyCpu")]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let markup = binary_to_markup(&input);
    let arc = ResourceArc::new(DocumentResource::parse(&markup));
    Ok(arc.encode(env))
}

/// New retained document without the subtrees rooted at `excluded_tags`
#[rustler::nif(schedule = "DirtyCpu")]
fn filter_document<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    excluded_tags: Vec<String>,
) -> NifResult<Term<'a>> {
    let filtered = doc_ref.tree().filter_tags(excluded_tags.as_slice());
    let arc = ResourceArc::new(DocumentResource::new(filtered));
    Ok(arc.encode(env))
}

/// Partition a retained document; repeated requests hit the cache
#[rustler::nif(schedule = "DirtyCpu")]
fn chunk_document<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    budget: i64,
    metric: Term<'a>,
) -> NifResult<Term<'a>> {
    let partition = config::positive_budget(budget)
        .and_then(|budget| Ok((budget, decode_metric(metric)?)))
        .and_then(|(budget, metric)| doc_ref.partition(budget, metric));

    match partition {
        Ok(partition) => ok_partition(env, &partition),
        Err(e) => Ok(error_to_term(env, &e)),
    }
}

/// Paths, tag XPaths and sizes of every node, in document order
#[rustler::nif(schedule = "DirtyCpu")]
fn xpaths_metadata<'a>(env: Env<'a>, doc_ref: DocumentRef) -> NifResult<Term<'a>> {
    term::xpaths_metadata_to_term(env, doc_ref.tree())
}

/// Markup and text of one node by positional path (`"/0/2"`)
#[rustler::nif(schedule = "DirtyCpu")]
fn render_path<'a>(env: Env<'a>, doc_ref: DocumentRef, path: &str) -> NifResult<Term<'a>> {
    let tree = doc_ref.tree();
    let rendered = path
        .parse::<PosPath>()
        .and_then(|p| match (tree.html(&p), tree.text(&p)) {
            (Some(html), Some(text)) => Ok((html, text)),
            _ => Err(ChunkError::InvalidPath(path.to_string())),
        });

    match rendered {
        Ok((html, text)) => Ok((
            term::ok(),
            (
                term::str_to_binary(env, &html),
                term::str_to_binary(env, &text),
            ),
        )
            .encode(env)),
        Err(e) => Ok(error_to_term(env, &e)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.RustyChunk.Native");
