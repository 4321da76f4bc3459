//! Elixir Term Conversion Utilities
//!
//! Converts partitions, trees and errors to Elixir terms, and decodes NIF
//! arguments into Rust types.

use crate::error::ChunkError;
use crate::pipeline::Partition;
use crate::regions::{ComparisonMetric, RegionOfInterest};
use crate::tree::DomTree;
use rustler::{Binary, Encoder, Env, NewBinary, NifResult, Term};
use std::borrow::Cow;

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    regions,
    html,
    text,
    pos_xpath,
    pos_xpath_list,
    repr_length,
    xpath,
    text_length,
    html_length,
    invalid_budget,
    unknown_metric,
    invalid_path,
    document_unavailable,
}

/// Decode a metric given as an atom (`:text_length`) or a string
pub fn decode_metric(term: Term<'_>) -> Result<ComparisonMetric, ChunkError> {
    let name = term
        .atom_to_string()
        .or_else(|_| term.decode::<String>())
        .map_err(|_| ChunkError::UnknownMetric(format!("{:?}", term)))?;
    name.parse()
}

/// Markup from a binary; invalid UTF-8 is replaced rather than rejected
#[inline]
pub fn binary_to_markup<'a>(input: &'a Binary<'_>) -> Cow<'a, str> {
    String::from_utf8_lossy(input.as_slice())
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
pub fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

/// `{:error, reason}` for a chunking error
pub fn error_to_term<'a>(env: Env<'a>, err: &ChunkError) -> Term<'a> {
    let reason = match err {
        ChunkError::InvalidBudget { budget } => (invalid_budget(), *budget).encode(env),
        ChunkError::UnknownMetric(name) => (unknown_metric(), str_to_binary(env, name)).encode(env),
        ChunkError::InvalidPath(path) => (invalid_path(), str_to_binary(env, path)).encode(env),
        ChunkError::DocumentUnavailable(why) => (document_unavailable(), *why).encode(env),
    };
    (error(), reason).encode(env)
}

/// `%{pos_xpath_list: [...], repr_length: n}`
fn roi_to_term<'a>(env: Env<'a>, roi: &RegionOfInterest) -> NifResult<Term<'a>> {
    let mut paths = Term::list_new_empty(env);
    for path in roi.pos_xpath_list.iter().rev() {
        paths = paths.list_prepend(str_to_binary(env, &path.to_string()));
    }
    Term::map_new(env)
        .map_put(pos_xpath_list().encode(env), paths)?
        .map_put(repr_length().encode(env), roi.repr_length.encode(env))
}

/// `%{regions: [...], html: [...], text: [...]}`, all three lists index-aligned
pub fn partition_to_term<'a>(env: Env<'a>, partition: &Partition) -> NifResult<Term<'a>> {
    let mut region_list = Term::list_new_empty(env);
    let mut html_list = Term::list_new_empty(env);
    let mut text_list = Term::list_new_empty(env);

    for chunk in partition.chunks().collect::<Vec<_>>().into_iter().rev() {
        region_list = region_list.list_prepend(roi_to_term(env, chunk.roi)?);
        html_list = html_list.list_prepend(str_to_binary(env, chunk.html));
        text_list = text_list.list_prepend(str_to_binary(env, chunk.text));
    }

    Term::map_new(env)
        .map_put(regions().encode(env), region_list)?
        .map_put(html().encode(env), html_list)?
        .map_put(text().encode(env), text_list)
}

/// `{:ok, partition_map}`
pub fn ok_partition<'a>(env: Env<'a>, partition: &Partition) -> NifResult<Term<'a>> {
    Ok((ok(), partition_to_term(env, partition)?).encode(env))
}

/// Every node's paths and sizes, in document order
pub fn xpaths_metadata_to_term<'a>(env: Env<'a>, tree: &DomTree) -> NifResult<Term<'a>> {
    let tag_xpaths = tree.xpaths();
    let mut list = Term::list_new_empty(env);
    for (node, tag_xpath) in tree.nodes().iter().zip(&tag_xpaths).rev() {
        let entry = Term::map_new(env)
            .map_put(pos_xpath().encode(env), str_to_binary(env, &node.path.to_string()))?
            .map_put(xpath().encode(env), str_to_binary(env, tag_xpath))?
            .map_put(text_length().encode(env), node.metadata.text_length.encode(env))?
            .map_put(html_length().encode(env), node.metadata.html_length.encode(env))?;
        list = list.list_prepend(entry);
    }
    Ok(list)
}
