use regex::Regex;
use std::sync::LazyLock;

use super::{finalize, Mutator};
use crate::context::EngineContext;

static VERSION_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)[_-]?\d+$").unwrap());

/// Strips a trailing version-number suffix. `react2` and `react-2` both
/// target `react`. Unlike the other mutators this can only ever produce
/// one candidate target, but still goes through `finalize` so the
/// `return_all` contract and admissibility checks stay uniform.
pub struct VersionNumbers;

impl Mutator for VersionNumbers {
    fn mutate(&self, ctx: &EngineContext, candidate: &str, return_all: bool) -> Vec<String> {
        let raw = match VERSION_NUMBER_PATTERN.captures(candidate) {
            Some(caps) => vec![caps[1].to_string()],
            None => Vec::new(),
        };
        finalize(ctx, candidate, raw, return_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::build;

    #[test]
    fn react2_targets_react() {
        let ctx = build(&[("react", &["a"])], &[("react2", &["b"])]);
        assert_eq!(
            VersionNumbers.mutate(&ctx, "react2", true),
            vec!["react".to_string()]
        );
    }

    #[test]
    fn react_dash_2_targets_react() {
        let ctx = build(&[("react", &["a"])], &[("react-2", &["b"])]);
        assert_eq!(
            VersionNumbers.mutate(&ctx, "react-2", true),
            vec!["react".to_string()]
        );
    }

    #[test]
    fn no_trailing_digits_returns_empty() {
        let ctx = build(&[("react", &["a"])], &[("reactor", &["b"])]);
        assert!(VersionNumbers.mutate(&ctx, "reactor", true).is_empty());
    }

    #[test]
    fn shared_owner_suppresses_target() {
        let ctx = build(&[("react", &["a"])], &[("react2", &["a"])]);
        assert!(VersionNumbers.mutate(&ctx, "react2", true).is_empty());
    }
}
