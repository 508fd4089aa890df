use super::{finalize, Mutator, ALLOWED_CHARACTERS};
use crate::context::EngineContext;

/// Inserts every allowed character at every position, to catch
/// typosquatting by omission. `evnt-stream` -> `event-stream`. Skipped
/// for names under 4 characters (false-positive suppression).
pub struct OmittedCharacter;

impl Mutator for OmittedCharacter {
    fn mutate(&self, ctx: &EngineContext, candidate: &str, return_all: bool) -> Vec<String> {
        if candidate.chars().count() < 4 {
            return Vec::new();
        }
        let chars: Vec<char> = candidate.chars().collect();
        let mut raw = Vec::new();
        for i in 0..=chars.len() {
            for c in ALLOWED_CHARACTERS.chars() {
                let mut s: String = chars[..i].iter().collect();
                s.push(c);
                s.extend(&chars[i..]);
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
    fn evnt_stream_targets_event_stream() {
        let ctx = build(&[("event-stream", &["a"])], &[("evnt-stream", &["b"])]);
        let out = OmittedCharacter.mutate(&ctx, "evnt-stream", true);
        assert_eq!(out, vec!["event-stream".to_string()]);
    }

    #[test]
    fn short_names_return_empty() {
        let ctx = build(&[("abc", &["a"])], &[("ab", &["b"])]);
        assert!(OmittedCharacter.mutate(&ctx, "ab", true).is_empty());
    }

    #[test]
    fn removing_inserted_position_recovers_candidate() {
        let candidate = "evnt-stream";
        let chars: Vec<char> = candidate.chars().collect();
        let i = 3;
        let c = 'e';
        let mut s: String = chars[..i].iter().collect();
        s.push(c);
        s.extend(&chars[i..]);
        let mut removed: Vec<char> = s.chars().collect();
        removed.remove(i);
        let removed: String = removed.into_iter().collect();
        assert_eq!(removed, candidate);
    }
}
