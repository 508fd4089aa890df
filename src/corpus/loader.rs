use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::corpus::{Corpus, Package, PackageRow, RegistryStore};
use crate::error::{EngineError, EngineResult};

/// Fold a store's rows (one per owner) into deduplicated `Package`s,
/// preserving first-appearance owner order.
fn merge_rows(rows: Vec<PackageRow>, packages: &mut HashMap<String, Package>) {
    for row in rows {
        let pkg = packages.entry(row.name.clone()).or_insert_with(|| Package {
            name: row.name.clone(),
            owners: Vec::new(),
            description: row.description.clone(),
            homepage: row.homepage.clone(),
            repository: row.repository.clone(),
            documentation: row.documentation.clone(),
            downloads: row.downloads,
            recent_downloads: row.recent_downloads,
        });
        if let Some(owner) = row.owner
            && !pkg.owners.iter().any(|o| o == &owner) {
                pkg.owners.push(owner);
            }
    }
}

/// Populate the corpus: top-N popular packages plus all recent candidates.
/// Popularity takes precedence — a name present in both query results is
/// treated purely as popular.
pub fn load_corpus(store: &dyn RegistryStore, top: usize, days: u32) -> EngineResult<Corpus> {
    let popular_rows = store.top_popular(top)?;

    // The store returns rows in descending recent-downloads order (one row
    // per owner); record that order by first appearance before folding the
    // rows into a map, so ties resolve the same way on every run instead of
    // depending on hash iteration order.
    let mut popular_list: Vec<String> = Vec::new();
    for row in &popular_rows {
        if !popular_list.iter().any(|n| n == &row.name) {
            popular_list.push(row.name.clone());
        }
    }

    let mut popular_packages: HashMap<String, Package> = HashMap::new();
    merge_rows(popular_rows, &mut popular_packages);

    let popular_set: HashSet<String> = popular_packages.keys().cloned().collect();
    if popular_set.len() != top {
        return Err(EngineError::Config(format!(
            "popular set size mismatch ({} != {top})",
            popular_set.len()
        )));
    }

    info!(count = popular_list.len(), "loaded popular package set");

    let candidate_rows = store.candidates(top, days)?;
    let mut packages = popular_packages;
    let before = packages.len();
    merge_rows(candidate_rows, &mut packages);
    let candidate_count = packages.len() - before;
    if candidate_count == 0 {
        warn!(days, "no candidate packages found in the recency window");
    } else {
        info!(count = candidate_count, days, "loaded candidate packages");
    }

    // Popularity takes precedence: a name cannot be both popular and a
    // candidate, so drop anything candidates reintroduced under a name
    // already in popular_set (merge_rows is a no-op there since the entry
    // already exists, but recent_downloads/description must stay the
    // popular version — already true because `or_insert_with` only runs
    // once per name).
    Ok(Corpus {
        packages,
        popular_list,
        popular_set,
    })
}
