//! The engine context: a single immutable value threaded through the
//! pipeline, bundling the corpus, bitflip index, allowlist, embedding
//! model, and similarity thresholds for one run.

use crate::allowlist::AllowlistEntry;
use crate::bitflip::BitflipIndex;
use crate::corpus::Corpus;
use crate::similarity::{EmbeddingModel, SimilarityConfig};

pub struct EngineContext {
    pub corpus: Corpus,
    pub bitflip_index: BitflipIndex,
    pub allowlist: Vec<AllowlistEntry>,
    pub embedding_model: Box<dyn EmbeddingModel>,
    pub similarity: SimilarityConfig,
}

impl EngineContext {
    /// The first element of `popular_list` that appears in `targets`,
    /// falling back to the first target in discovery order.
    pub fn most_popular_of(&self, targets: &[String]) -> String {
        for p in &self.corpus.popular_list {
            if targets.iter().any(|t| t == p) {
                return p.clone();
            }
        }
        targets[0].clone()
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::corpus::Package;
    use crate::similarity::hashing::HashingEmbeddingModel;
    use std::collections::{HashMap, HashSet};

    /// A small, in-memory `EngineContext` for mutator/similarity/driver
    /// unit tests. `popular` names are given in most-to-least-popular
    /// order; `candidates` are any other names to pre-populate the corpus
    /// with (e.g. the candidate under test, so owner lookups work).
    pub fn build(popular: &[(&str, &[&str])], candidates: &[(&str, &[&str])]) -> EngineContext {
        let mut packages = HashMap::new();
        let mut popular_list = Vec::new();
        for (name, owners) in popular {
            popular_list.push(name.to_string());
            packages.insert(
                name.to_string(),
                Package {
                    name: name.to_string(),
                    owners: owners.iter().map(|s| s.to_string()).collect(),
                    description: None,
                    homepage: None,
                    repository: None,
                    documentation: None,
                    downloads: 0,
                    recent_downloads: 0,
                },
            );
        }
        for (name, owners) in candidates {
            packages.insert(
                name.to_string(),
                Package {
                    name: name.to_string(),
                    owners: owners.iter().map(|s| s.to_string()).collect(),
                    description: None,
                    homepage: None,
                    repository: None,
                    documentation: None,
                    downloads: 0,
                    recent_downloads: 0,
                },
            );
        }
        let popular_set: HashSet<String> = popular_list.iter().cloned().collect();
        let bitflip_index = crate::bitflip::BitflipIndex::build(&popular_list);
        EngineContext {
            corpus: Corpus {
                packages,
                popular_list,
                popular_set,
            },
            bitflip_index,
            allowlist: Vec::new(),
            embedding_model: Box::new(HashingEmbeddingModel),
            similarity: crate::similarity::SimilarityConfig {
                similarity_threshold: 0.97,
                levenshtein_threshold: 10,
            },
        }
    }
}
