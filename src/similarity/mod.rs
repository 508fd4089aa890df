//! Suppresses mutator targets whose description is unrelated to the
//! candidate's, under a semantic-vector cosine test with a
//! Levenshtein-distance fallback.

pub mod hashing;
#[cfg(feature = "semantic-fastembed")]
pub mod fastembed_model;

use std::collections::BTreeMap;

use crate::corpus::Package;
use crate::error::{EngineError, EngineResult};

/// A text embedding. A zero-norm vector signals "the model has no
/// coverage for this text" and drives the Levenshtein fallback.
#[derive(Debug, Clone)]
pub struct Embedding(pub Vec<f32>);

impl Embedding {
    pub fn norm(&self) -> f32 {
        self.0.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    pub fn cosine(&self, other: &Embedding) -> f32 {
        let dot: f32 = self.0.iter().zip(other.0.iter()).map(|(a, b)| a * b).sum();
        let denom = self.norm() * other.norm();
        if denom == 0.0 { 0.0 } else { dot / denom }
    }
}

/// Any provider supplying `embed` plus the zero-norm fallback signal can
/// be plugged in here.
pub trait EmbeddingModel: Send + Sync {
    fn embed(&self, text: &str) -> Embedding;
}

/// A retained target's similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// Cosine similarity, 0..=1, higher = more similar.
    Cosine(f32),
    /// Levenshtein distance, lower = more similar.
    Levenshtein(usize),
    /// Sentinel for "both descriptions empty".
    BothEmpty,
}

pub struct SimilarityConfig {
    pub similarity_threshold: f32,
    pub levenshtein_threshold: usize,
}

/// Retain only targets whose description is similar to `candidate`'s.
/// `targets` must already be deduplicated, admissible mutator output.
pub fn filter_targets(
    model: &dyn EmbeddingModel,
    config: &SimilarityConfig,
    candidate: &Package,
    corpus: &std::collections::HashMap<String, Package>,
    targets: &[String],
) -> EngineResult<BTreeMap<String, Score>> {
    let mut out = BTreeMap::new();

    if candidate.description_is_empty() {
        for t in targets {
            if let Some(target_pkg) = corpus.get(t)
                && target_pkg.description_is_empty() {
                    out.insert(t.clone(), Score::BothEmpty);
                }
        }
        return Ok(out);
    }

    let candidate_desc = candidate.description.as_deref().unwrap_or("");
    let candidate_embedding = model.embed(candidate_desc);

    if candidate_embedding.norm() == 0.0 {
        // No recognized tokens: fall back globally to edit distance.
        for t in targets {
            let Some(target_pkg) = corpus.get(t) else {
                continue;
            };
            let target_desc = target_pkg.description.as_deref().unwrap_or("");
            let dist = strsim::levenshtein(candidate_desc, target_desc);
            if dist < config.levenshtein_threshold {
                out.insert(t.clone(), Score::Levenshtein(dist));
            }
        }
        return Ok(out);
    }

    for t in targets {
        let Some(target_pkg) = corpus.get(t) else {
            continue;
        };
        if target_pkg.description_is_empty() {
            continue;
        }
        let target_desc = target_pkg.description.as_deref().unwrap_or("");
        let target_embedding = model.embed(target_desc);
        if target_embedding.norm() == 0.0 {
            return Err(EngineError::DataQuality(format!(
                "no embedding coverage for popular target '{t}' (description: {target_desc:?})"
            )));
        }
        let sim = candidate_embedding.cosine(&target_embedding);
        if sim >= config.similarity_threshold {
            out.insert(t.clone(), Score::Cosine(sim));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::hashing::HashingEmbeddingModel;
    use std::collections::HashMap;

    fn pkg(name: &str, desc: Option<&str>) -> Package {
        Package {
            name: name.to_string(),
            owners: vec![],
            description: desc.map(str::to_string),
            homepage: None,
            repository: None,
            documentation: None,
            downloads: 0,
            recent_downloads: 0,
        }
    }

    #[test]
    fn empty_description_retains_only_empty_targets_at_sentinel_score() {
        let candidate = pkg("c", Some("   "));
        let mut corpus = HashMap::new();
        corpus.insert("t1".to_string(), pkg("t1", Some("")));
        corpus.insert("t2".to_string(), pkg("t2", Some("a real description")));
        let model = HashingEmbeddingModel;
        let config = SimilarityConfig {
            similarity_threshold: 0.97,
            levenshtein_threshold: 10,
        };
        let targets = vec!["t1".to_string(), "t2".to_string()];
        let result = filter_targets(&model, &config, &candidate, &corpus, &targets).unwrap();
        assert_eq!(result.get("t1"), Some(&Score::BothEmpty));
        assert_eq!(result.get("t2"), None);
    }

    #[test]
    fn zero_norm_embedding_falls_back_to_levenshtein() {
        let candidate = pkg("c", Some("... !!! ???"));
        let mut corpus = HashMap::new();
        corpus.insert("t1".to_string(), pkg("t1", Some("... !!!")));
        let model = HashingEmbeddingModel;
        let config = SimilarityConfig {
            similarity_threshold: 0.97,
            levenshtein_threshold: 10,
        };
        assert_eq!(model.embed("... !!! ???").norm(), 0.0);
        let targets = vec!["t1".to_string()];
        let result = filter_targets(&model, &config, &candidate, &corpus, &targets).unwrap();
        assert!(matches!(result.get("t1"), Some(Score::Levenshtein(_))));
    }
}
