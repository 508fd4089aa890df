use super::{finalize, Mutator};
use crate::context::EngineContext;

/// Swaps each pair of adjacent characters. `loadsh` -> `lodash`.
pub struct SwappedCharacters;

impl Mutator for SwappedCharacters {
    fn mutate(&self, ctx: &EngineContext, candidate: &str, return_all: bool) -> Vec<String> {
        let chars: Vec<char> = candidate.chars().collect();
        let mut raw = Vec::new();
        for i in 0..chars.len().saturating_sub(1) {
            let mut swapped = chars.clone();
            swapped.swap(i, i + 1);
            raw.push(swapped.into_iter().collect());
        }
        finalize(ctx, candidate, raw, return_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::build;

    #[test]
    fn loadsh_targets_lodash() {
        let ctx = build(&[("lodash", &["a"])], &[("loadsh", &["b"])]);
        let out = SwappedCharacters.mutate(&ctx, "loadsh", true);
        assert_eq!(out, vec!["lodash".to_string()]);
    }

    #[test]
    fn swap_is_self_inverse_at_same_index() {
        let candidate = "loadsh";
        let mut chars: Vec<char> = candidate.chars().collect();
        chars.swap(1, 2);
        chars.swap(1, 2);
        let restored: String = chars.into_iter().collect();
        assert_eq!(restored, candidate);
    }
}
