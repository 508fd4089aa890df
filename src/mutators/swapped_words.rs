use itertools::Itertools;

use super::{finalize, Mutator};
use crate::context::EngineContext;

const DELIMITERS: [&str; 3] = ["", "-", "_"];
const MAX_TOKENS: usize = 8;

/// Reorders delimiter-separated tokens and tries each allowed delimiter,
/// catching reordering, delimiter substitution, and delimiter omission.
/// `stream-event` -> `event-stream`. Empty for names with no delimiter, or
/// more than 8 tokens (factorial cost guard).
pub struct SwappedWords;

impl Mutator for SwappedWords {
    fn mutate(&self, ctx: &EngineContext, candidate: &str, return_all: bool) -> Vec<String> {
        if !candidate.contains(['-', '_']) {
            return Vec::new();
        }
        let tokens: Vec<&str> = candidate.split(['-', '_']).filter(|t| !t.is_empty()).collect();
        if tokens.len() > MAX_TOKENS {
            return Vec::new();
        }

        let mut raw = Vec::new();
        for perm in tokens.iter().permutations(tokens.len()).unique() {
            for delimiter in DELIMITERS {
                raw.push(perm.iter().map(|s| **s).join(delimiter));
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
    fn stream_event_targets_event_stream() {
        let ctx = build(&[("event-stream", &["a"])], &[("stream-event", &["b"])]);
        let out = SwappedWords.mutate(&ctx, "stream-event", true);
        assert_eq!(out, vec!["event-stream".to_string()]);
    }

    #[test]
    fn no_delimiter_returns_empty() {
        let ctx = build(&[("react", &["a"])], &[("reactjs", &["b"])]);
        assert!(SwappedWords.mutate(&ctx, "reactjs", true).is_empty());
    }

    #[test]
    fn more_than_eight_tokens_returns_empty() {
        let ctx = build(&[("a-b-c-d-e-f-g-h-i", &["x"])], &[]);
        assert!(SwappedWords
            .mutate(&ctx, "a-b-c-d-e-f-g-h-i", true)
            .is_empty());
    }

    #[test]
    fn delimiter_substitution_is_caught() {
        let ctx = build(&[("event-stream", &["a"])], &[("event_stream", &["b"])]);
        let out = SwappedWords.mutate(&ctx, "event_stream", true);
        assert_eq!(out, vec!["event-stream".to_string()]);
    }
}
