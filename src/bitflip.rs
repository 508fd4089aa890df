//! For every popular name, the set of syntactically legal names reachable
//! by flipping exactly one bit of its byte encoding, inverted into
//! `mutant -> [popular names]`.

use std::collections::HashMap;

use rayon::prelude::*;
use regex::Regex;
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// All single-bit-flip variants of `name`'s byte representation. A pure
/// function with no dependency on the rest of the engine, so it can be
/// swapped for a crate without touching callers.
pub fn flip_bits(name: &str) -> Vec<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 8);
    for i in 0..bytes.len() {
        for bit in 0..8u8 {
            let mut flipped = bytes.to_vec();
            flipped[i] ^= 1 << bit;
            if let Ok(s) = String::from_utf8(flipped) {
                out.push(s);
            }
        }
    }
    out
}

/// All bitflip variants of `name` that are valid, distinct package names.
fn legal_bitflips(name: &str) -> Vec<String> {
    flip_bits(name)
        .into_iter()
        .filter(|s| s != name && NAME_PATTERN.is_match(s))
        .collect()
}

/// `mutant -> [popular names]`. Appending order follows discovery order
/// across popular names (`popular_names` iteration order); downstream
/// mutators treat the list as a set.
pub struct BitflipIndex(HashMap<String, Vec<String>>);

impl BitflipIndex {
    pub fn build(popular_names: &[String]) -> Self {
        let per_name: Vec<(String, Vec<String>)> = popular_names
            .par_iter()
            .map(|p| (p.clone(), legal_bitflips(p)))
            .collect();

        let mut index: HashMap<String, Vec<String>> = HashMap::new();
        for (popular, mutants) in per_name {
            for mutant in mutants {
                index.entry(mutant).or_default().push(popular.clone());
            }
        }
        Self(index)
    }

    pub fn lookup(&self, candidate: &str) -> Option<&[String]> {
        self.0.get(candidate).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitflip_is_self_inverse_at_same_bit() {
        let variants = flip_bits("react");
        for v in &variants {
            // flipping the same bit back must recover the original
            assert!(flip_bits(v).contains(&"react".to_string()));
        }
    }

    #[test]
    fn legal_bitflips_differ_from_source_and_are_valid_names() {
        for v in legal_bitflips("serde") {
            assert_ne!(v, "serde");
            assert!(NAME_PATTERN.is_match(&v));
        }
    }

    #[test]
    fn index_maps_mutant_to_nonempty_popular_list() {
        let popular = vec!["serde".to_string(), "tokio".to_string()];
        let index = BitflipIndex::build(&popular);
        // every recorded mutant must map to at least one popular name
        for mutants in index.0.values() {
            assert!(!mutants.is_empty());
        }
    }
}
