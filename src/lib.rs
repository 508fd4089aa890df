//! Typosquatting detection engine for a crate registry: name-mutation
//! heuristics, a metadata-similarity filter, and the driver that
//! combines them into a batch alert stream.

pub mod alert;
pub mod allowlist;
pub mod bitflip;
pub mod config;
pub mod context;
pub mod corpus;
pub mod download;
pub mod driver;
pub mod error;
pub mod mutators;
pub mod similarity;

use tracing::info;

use crate::allowlist::{default_entries, load_from_path};
use crate::bitflip::BitflipIndex;
use crate::context::EngineContext;
use crate::corpus::{loader::load_corpus, RegistryStore};
use crate::error::EngineResult;
use crate::similarity::hashing::HashingEmbeddingModel;
use crate::similarity::SimilarityConfig;

/// Builds the engine context: loads the corpus, builds the bitflip index
/// over it, and resolves the allowlist. This is the only place that
/// constructs an `EngineContext`; every other component receives it by
/// reference.
pub fn build_context(
    store: &dyn RegistryStore,
    top: usize,
    days: u32,
    similarity_threshold: f32,
    levenshtein_threshold: usize,
    allowlist_path: Option<&std::path::Path>,
) -> EngineResult<EngineContext> {
    let corpus = load_corpus(store, top, days)?;
    let bitflip_index = BitflipIndex::build(&corpus.popular_list);
    info!(mutants = bitflip_index.len(), "built bitflip index");

    let allowlist = match allowlist_path {
        Some(path) => load_from_path(path)?,
        None => default_entries(),
    };

    Ok(EngineContext {
        corpus,
        bitflip_index,
        allowlist,
        embedding_model: build_embedding_model()?,
        similarity: SimilarityConfig {
            similarity_threshold,
            levenshtein_threshold,
        },
    })
}

#[cfg(not(feature = "semantic-fastembed"))]
fn build_embedding_model() -> EngineResult<Box<dyn crate::similarity::EmbeddingModel>> {
    Ok(Box::new(HashingEmbeddingModel))
}

#[cfg(feature = "semantic-fastembed")]
fn build_embedding_model() -> EngineResult<Box<dyn crate::similarity::EmbeddingModel>> {
    use crate::similarity::fastembed_model::FastEmbedModel;
    info!("loading fastembed sentence-embedding model");
    Ok(Box::new(FastEmbedModel::new()?))
}
