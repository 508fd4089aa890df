//! An exact-metadata filter suppressing known benign typosquatters,
//! expressed as configurable data rather than embedded constants.

use serde::Deserialize;
use std::collections::HashSet;

use crate::corpus::Package;

#[derive(Debug, Deserialize)]
pub struct AllowlistEntry {
    pub owners: Vec<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub documentation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AllowlistFile {
    #[serde(default)]
    entries: Vec<AllowlistEntry>,
}

impl AllowlistEntry {
    fn matches(&self, pkg: &Package) -> bool {
        let wanted: HashSet<&str> = self.owners.iter().map(String::as_str).collect();
        let actual: HashSet<&str> = pkg.owners.iter().map(String::as_str).collect();
        if wanted != actual {
            return false;
        }
        field_matches(&self.homepage, &pkg.homepage)
            && field_matches(&self.repository, &pkg.repository)
            && field_matches(&self.documentation, &pkg.documentation)
    }
}

/// An unset field in the entry matches anything; a set field requires an
/// exact string match against the package's field.
fn field_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match wanted {
        None => true,
        Some(w) => actual.as_deref() == Some(w.as_str()),
    }
}

/// The default allowlist shipped with the engine.
pub fn default_entries() -> Vec<AllowlistEntry> {
    let toml_str = include_str!("../data/allowlist.toml");
    let file: AllowlistFile =
        toml::from_str(toml_str).expect("failed to parse built-in allowlist.toml");
    file.entries
}

/// Load an allowlist from an external file, overriding the built-in one.
pub fn load_from_path(path: &std::path::Path) -> crate::error::EngineResult<Vec<AllowlistEntry>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| crate::error::EngineError::Config(format!("reading allowlist: {e}")))?;
    let file: AllowlistFile = toml::from_str(&content)
        .map_err(|e| crate::error::EngineError::Config(format!("parsing allowlist: {e}")))?;
    Ok(file.entries)
}

pub fn is_allowlisted(entries: &[AllowlistEntry], pkg: &Package) -> bool {
    entries.iter().any(|e| e.matches(pkg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(owners: &[&str], homepage: Option<&str>, repository: Option<&str>, documentation: Option<&str>) -> Package {
        Package {
            name: "x".to_string(),
            owners: owners.iter().map(|s| s.to_string()).collect(),
            description: None,
            homepage: homepage.map(str::to_string),
            repository: repository.map(str::to_string),
            documentation: documentation.map(str::to_string),
            downloads: 0,
            recent_downloads: 0,
        }
    }

    #[test]
    fn default_entries_parse() {
        let entries = default_entries();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn blallo_entry_matches_exactly() {
        let entries = default_entries();
        let p = pkg(
            &["blallo"],
            Some("https://xkcd.com/386"),
            Some("https://github.com/blallo/xkcd-386"),
            Some("https://crates.io/policies"),
        );
        assert!(is_allowlisted(&entries, &p));
    }

    #[test]
    fn different_owner_does_not_match() {
        let entries = default_entries();
        let p = pkg(
            &["someone-else"],
            Some("https://xkcd.com/386"),
            Some("https://github.com/blallo/xkcd-386"),
            Some("https://crates.io/policies"),
        );
        assert!(!is_allowlisted(&entries, &p));
    }

    #[test]
    fn skerkour_entry_ignores_unset_fields() {
        let entries = default_entries();
        let p = pkg(&["skerkour"], None, Some("https://github.com/skerkour/black-hat-rust"), None);
        assert!(is_allowlisted(&entries, &p));
    }
}
