pub mod loader;
pub mod postgres_store;

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::error::EngineResult;

/// One row as returned by either of the two registry queries, before owner
/// deduplication. A single package may appear as several rows, one per
/// owner (user or team). Also the shape of a `--meta-dump` JSON snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageRow {
    pub name: String,
    /// `None` when the owner row has no matching user/team record.
    pub owner: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub documentation: Option<String>,
    pub description: Option<String>,
    pub downloads: u64,
    pub recent_downloads: u64,
}

/// One package, with owners unioned and deduplicated in first-appearance
/// order. Read-only once the corpus finishes loading.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub owners: Vec<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub documentation: Option<String>,
    pub downloads: u64,
    pub recent_downloads: u64,
}

impl Package {
    /// The "same author" test: true iff the two packages share any owner.
    pub fn shares_owner(&self, other: &Package) -> bool {
        let mine: HashSet<&str> = self.owners.iter().map(String::as_str).collect();
        other.owners.iter().any(|o| mine.contains(o.as_str()))
    }

    pub fn description_is_empty(&self) -> bool {
        self.description
            .as_deref()
            .map(|d| d.trim().is_empty())
            .unwrap_or(true)
    }
}

/// The full corpus: every package known to this run, plus the two derived
/// views over the popular subset.
pub struct Corpus {
    pub packages: HashMap<String, Package>,
    /// Top-N names in descending recent-downloads order. Iteration order
    /// matters: `most_popular_of` picks the first match in this order.
    pub popular_list: Vec<String>,
    pub popular_set: HashSet<String>,
}

impl Corpus {
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    pub fn is_popular(&self, name: &str) -> bool {
        self.popular_set.contains(name)
    }

    /// Names outside the popular set — the candidates a driver run iterates.
    pub fn candidate_names(&self) -> Vec<&str> {
        self.packages
            .keys()
            .filter(|n| !self.popular_set.contains(n.as_str()))
            .map(String::as_str)
            .collect()
    }
}

/// The registry's three query shapes, abstracted so the engine never
/// depends on a concrete database driver.
pub trait RegistryStore: Sync {
    /// Top-N packages by recent downloads, descending, with owners.
    fn top_popular(&self, n: usize) -> EngineResult<Vec<PackageRow>>;

    /// Packages ranked below position `n` with a non-yanked version
    /// updated within the last `days` days, with owners.
    fn candidates(&self, n: usize, days: u32) -> EngineResult<Vec<PackageRow>>;

    /// Non-yanked version strings for a package, for artifact download.
    fn versions(&self, name: &str) -> EngineResult<Vec<String>>;
}
