use super::{finalize, Mutator};
use crate::context::EngineContext;

/// QWERTY-adjacency and visual-confusable substitutions, keyed by the
/// character being replaced. A handful of entries substitute in more than
/// one character (`w` -> `vv`, `m` -> `rn`).
const TYPOS: &[(char, &[&str])] = &[
    ('1', &["2", "q", "i", "l"]),
    ('2', &["1", "q", "w", "3"]),
    ('3', &["2", "w", "e", "4"]),
    ('4', &["3", "e", "r", "5"]),
    ('5', &["4", "r", "t", "6", "s"]),
    ('6', &["5", "t", "y", "7"]),
    ('7', &["6", "y", "u", "8"]),
    ('8', &["7", "u", "i", "9"]),
    ('9', &["8", "i", "o", "0"]),
    ('0', &["9", "o", "p", "-"]),
    ('-', &["_", "0", "p", ".", ""]),
    ('_', &["-", "0", "p", ".", ""]),
    ('q', &["1", "2", "w", "a"]),
    ('w', &["2", "3", "e", "s", "a", "q", "vv"]),
    ('e', &["3", "4", "r", "d", "s", "w"]),
    ('r', &["4", "5", "t", "f", "d", "e"]),
    ('t', &["5", "6", "y", "g", "f", "r"]),
    ('y', &["6", "7", "u", "h", "t", "i"]),
    ('u', &["7", "8", "i", "j", "y", "v"]),
    ('i', &["1", "8", "9", "o", "l", "k", "j", "u", "y"]),
    ('o', &["9", "0", "p", "l", "i"]),
    ('p', &["0", "-", "o"]),
    ('a', &["q", "w", "s", "z"]),
    ('s', &["w", "d", "x", "z", "a", "5"]),
    ('d', &["e", "r", "f", "c", "x", "s"]),
    ('f', &["r", "g", "v", "c", "d"]),
    ('g', &["t", "h", "b", "v", "f"]),
    ('h', &["y", "j", "n", "b", "g"]),
    ('j', &["u", "i", "k", "m", "n", "h"]),
    ('k', &["i", "o", "l", "m", "j"]),
    ('l', &["i", "o", "p", "k", "1"]),
    ('z', &["a", "s", "x"]),
    ('x', &["z", "s", "d", "c"]),
    ('c', &["x", "d", "f", "v"]),
    ('v', &["c", "f", "g", "b", "u"]),
    ('b', &["v", "g", "h", "n"]),
    ('n', &["b", "h", "j", "m"]),
    ('m', &["n", "j", "k", "rn"]),
    ('.', &["-", "_", ""]),
];

fn typos_for(c: char) -> Option<&'static [&'static str]> {
    TYPOS.iter().find(|(k, _)| *k == c).map(|(_, v)| *v)
}

/// Substitutes each character with its common keyboard-adjacent or
/// visually-confusable typo. `kpm` -> `npm` (if `p` were mistyped as `k`).
pub struct CommonTypos;

impl Mutator for CommonTypos {
    fn mutate(&self, ctx: &EngineContext, candidate: &str, return_all: bool) -> Vec<String> {
        let chars: Vec<char> = candidate.chars().collect();
        let mut raw = Vec::new();
        for (i, &c) in chars.iter().enumerate() {
            let Some(typos) = typos_for(c) else {
                continue;
            };
            for typo in typos {
                let mut s: String = chars[..i].iter().collect();
                s.push_str(typo);
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
    fn npm_targets_crate_with_adjacent_key_typo() {
        let ctx = build(&[("npm", &["a"])], &[("nom", &["b"])]);
        let out = CommonTypos.mutate(&ctx, "nom", true);
        assert_eq!(out, vec!["npm".to_string()]);
    }

    #[test]
    fn multi_char_substitution_is_supported() {
        // 'm' is a listed typo for 'n', but also typos to the two-character
        // sequence "rn" - the substitution can grow the string.
        let ctx = build(&[("drurn", &["a"])], &[("drum", &["b"])]);
        let out = CommonTypos.mutate(&ctx, "drum", true);
        assert_eq!(out, vec!["drurn".to_string()]);
    }

    #[test]
    fn shared_owner_suppresses_target() {
        let ctx = build(&[("npm", &["a"])], &[("nom", &["a"])]);
        assert!(CommonTypos.mutate(&ctx, "nom", true).is_empty());
    }
}
