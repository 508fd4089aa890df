//! Default, offline `EmbeddingModel`: a deterministic hashing bag-of-words
//! embedding. Needs no model weights or network access, so the engine is
//! runnable out of the box; swap in `fastembed_model` (feature
//! `semantic-fastembed`) for a real sentence embedding model.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::{Embedding, EmbeddingModel};

const DIMS: usize = 256;

/// Tokens are maximal runs of alphanumeric characters, lowercased. Text
/// with no such tokens (empty, or punctuation-only) has no recognized
/// vocabulary and embeds to the zero vector, driving the Levenshtein
/// fallback exactly as a real model's "no coverage" signal would.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

fn bucket(token: &str) -> usize {
    let mut hasher = DefaultHasher::new();
    token.hash(&mut hasher);
    (hasher.finish() as usize) % DIMS
}

#[derive(Default)]
pub struct HashingEmbeddingModel;

impl EmbeddingModel for HashingEmbeddingModel {
    fn embed(&self, text: &str) -> Embedding {
        let mut vector = vec![0.0f32; DIMS];
        for token in tokenize(text) {
            vector[bucket(&token)] += 1.0;
        }
        Embedding(vector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_zero_norm() {
        assert_eq!(HashingEmbeddingModel.embed("").norm(), 0.0);
    }

    #[test]
    fn punctuation_only_has_zero_norm() {
        assert_eq!(HashingEmbeddingModel.embed("... !!! ???").norm(), 0.0);
    }

    #[test]
    fn similar_text_has_high_cosine_similarity() {
        let model = HashingEmbeddingModel;
        let a = model.embed("a view library for building user interfaces");
        let b = model.embed("a view library for building user interfaces");
        assert!((a.cosine(&b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn unrelated_text_has_lower_similarity() {
        let model = HashingEmbeddingModel;
        let a = model.embed("a view library for building user interfaces");
        let b = model.embed("cryptographic hashing and signature verification");
        assert!(a.cosine(&b) < 0.5);
    }
}
