use super::{finalize, Mutator};
use crate::context::EngineContext;

/// Removes adjacent duplicate characters one at a time. `reeact` ->
/// `react`.
pub struct RepeatedCharacter;

impl Mutator for RepeatedCharacter {
    fn mutate(&self, ctx: &EngineContext, candidate: &str, return_all: bool) -> Vec<String> {
        let chars: Vec<char> = candidate.chars().collect();
        let mut raw = Vec::new();
        for i in 0..chars.len() {
            if i + 1 < chars.len() && chars[i + 1] == chars[i] {
                let mut s: String = chars[..i].iter().collect();
                s.extend(&chars[i + 1..]);
                raw.push(s);
            }
        }
        finalize(ctx, candidate, raw, return_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::build;

    #[test]
    fn reeact_targets_react() {
        let ctx = build(&[("react", &["a"])], &[("reeact", &["b"])]);
        let out = RepeatedCharacter.mutate(&ctx, "reeact", true);
        assert_eq!(out, vec!["react".to_string()]);
    }

    #[test]
    fn removing_and_reinserting_recovers_candidate() {
        // round-trip law: for every adjacent duplicate removed, reinserting
        // the character at the same position yields the original.
        let candidate = "reeact";
        let chars: Vec<char> = candidate.chars().collect();
        for i in 0..chars.len() {
            if i + 1 < chars.len() && chars[i + 1] == chars[i] {
                let mut removed: String = chars[..i].iter().collect();
                removed.extend(&chars[i + 1..]);
                let mut reinserted: Vec<char> = removed.chars().collect();
                reinserted.insert(i, chars[i]);
                let reinserted: String = reinserted.into_iter().collect();
                assert_eq!(reinserted, candidate);
            }
        }
    }

    #[test]
    fn shared_owner_suppresses_target() {
        let ctx = build(&[("react", &["a"])], &[("reeact", &["a"])]);
        assert!(RepeatedCharacter.mutate(&ctx, "reeact", true).is_empty());
    }
}
