//! The seven name-mutator families. Each takes a candidate name and
//! returns the subset of the popular set it could plausibly be targeting
//! under that family, filtered to admissible targets.

mod common_typos;
mod omitted_character;
mod repeated_character;
mod swapped_characters;
mod swapped_words;
mod version_numbers;

pub use common_typos::CommonTypos;
pub use omitted_character::OmittedCharacter;
pub use repeated_character::RepeatedCharacter;
pub use swapped_characters::SwappedCharacters;
pub use swapped_words::SwappedWords;
pub use version_numbers::VersionNumbers;

use crate::context::EngineContext;

/// Characters the registry allows in a package name.
pub const ALLOWED_CHARACTERS: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Implemented by every mutator family.
pub trait Mutator: Sync {
    fn mutate(&self, ctx: &EngineContext, candidate: &str, return_all: bool) -> Vec<String>;
}

/// A target is admissible only if it is in the popular set, differs from
/// the candidate, and shares no owner with it.
pub fn is_admissible(ctx: &EngineContext, candidate: &str, target: &str) -> bool {
    if target == candidate {
        return false;
    }
    let Some(target_pkg) = ctx.corpus.get(target) else {
        return false;
    };
    if !ctx.corpus.is_popular(target) {
        return false;
    }
    let Some(candidate_pkg) = ctx.corpus.get(candidate) else {
        return true;
    };
    !candidate_pkg.shares_owner(target_pkg)
}

/// Filter raw generated names to admissible targets, then apply the
/// `return_all` collapse: when false and the admissible set is
/// non-empty, it collapses to the single most popular target.
pub fn finalize(
    ctx: &EngineContext,
    candidate: &str,
    raw: Vec<String>,
    return_all: bool,
) -> Vec<String> {
    let admissible: Vec<String> = raw
        .into_iter()
        .filter(|t| is_admissible(ctx, candidate, t))
        .collect();

    if return_all || admissible.is_empty() {
        admissible
    } else {
        vec![ctx.most_popular_of(&admissible)]
    }
}

/// Bitflips mutator: looks up the prebuilt index rather than generating
/// variants on the fly, so it lives directly in `mod.rs` rather than its
/// own file.
pub struct Bitflips;

impl Mutator for Bitflips {
    fn mutate(&self, ctx: &EngineContext, candidate: &str, return_all: bool) -> Vec<String> {
        let raw = ctx
            .bitflip_index
            .lookup(candidate)
            .map(|v| v.to_vec())
            .unwrap_or_default();
        finalize(ctx, candidate, raw, return_all)
    }
}

/// All seven mutator families.
pub fn all_mutators() -> Vec<Box<dyn Mutator>> {
    vec![
        Box::new(RepeatedCharacter),
        Box::new(OmittedCharacter),
        Box::new(SwappedCharacters),
        Box::new(SwappedWords),
        Box::new(CommonTypos),
        Box::new(VersionNumbers),
        Box::new(Bitflips),
    ]
}

/// Union of every mutator's output for `candidate`, run with
/// `return_all = true` as the driver requires.
pub fn all_targets(ctx: &EngineContext, candidate: &str) -> Vec<String> {
    all_mutators()
        .iter()
        .flat_map(|m| m.mutate(ctx, candidate, true))
        .collect()
}
