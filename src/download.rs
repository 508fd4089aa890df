//! Fetches the latest version's `.crate` file from the registry's HTTP
//! API, using synchronous `reqwest::blocking`; no tokio runtime anywhere
//! in this crate.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::corpus::RegistryStore;
use crate::error::{EngineError, EngineResult};

static CRATE_FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_-]+-(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)\.(?:0|[1-9]\d*)(?:-((?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9]\d*|\d*[a-zA-Z-][0-9a-zA-Z-]*))*))?(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?\.crate$",
    )
    .unwrap()
});

/// Where a candidate's downloaded artifact ended up, or why it didn't.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactRef {
    Downloaded(PathBuf),
    /// Download failed with a `TransientNetworkError`; the alert is still
    /// emitted rather than dropped.
    Placeholder(String),
}

fn latest_version(store: &dyn RegistryStore, name: &str) -> EngineResult<Option<String>> {
    let mut versions: Vec<semver::Version> = store
        .versions(name)?
        .into_iter()
        .filter_map(|v| semver::Version::parse(&v).ok())
        .collect();
    versions.sort();
    Ok(versions.pop().map(|v| v.to_string()))
}

/// Downloads the latest version of `name` into `download_dir`. Any
/// deviation from the expected HTTP contract (non-302 initial response,
/// missing `Location`, malformed crate filename, non-200 final response)
/// is reported as `ArtifactRef::Placeholder` rather than propagated.
pub fn fetch_latest_artifact(
    client: &Client,
    store: &dyn RegistryStore,
    download_dir: &Path,
    registry_base_url: &str,
    name: &str,
) -> EngineResult<ArtifactRef> {
    match fetch_latest_artifact_inner(client, store, download_dir, registry_base_url, name) {
        Ok(path) => Ok(ArtifactRef::Downloaded(path)),
        Err(EngineError::TransientNetwork(detail)) => Ok(ArtifactRef::Placeholder(detail)),
        Err(other) => Err(other),
    }
}

fn fetch_latest_artifact_inner(
    client: &Client,
    store: &dyn RegistryStore,
    download_dir: &Path,
    registry_base_url: &str,
    name: &str,
) -> EngineResult<PathBuf> {
    let version = latest_version(store, name)?.ok_or_else(|| {
        EngineError::TransientNetwork(format!("no non-yanked versions for '{name}'"))
    })?;

    std::fs::create_dir_all(download_dir)
        .map_err(|e| EngineError::Config(format!("creating download dir: {e}")))?;

    let url = format!("{registry_base_url}/api/v1/crates/{name}/{version}/download");
    let first = client
        .get(&url)
        .send()
        .map_err(|e| EngineError::TransientNetwork(format!("fetching {url}: {e}")))?;

    if first.status() != reqwest::StatusCode::FOUND {
        return Err(EngineError::TransientNetwork(format!(
            "unexpected HTTP response {} fetching {url}",
            first.status()
        )));
    }
    let location = first
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            EngineError::TransientNetwork(format!("302 without Location header fetching {url}"))
        })?
        .to_string();

    let crate_file = location
        .rsplit('/')
        .next()
        .ok_or_else(|| EngineError::TransientNetwork(format!("empty Location from {url}")))?;
    if !CRATE_FILE_PATTERN.is_match(crate_file) {
        return Err(EngineError::TransientNetwork(format!(
            "invalid crate filename '{crate_file}' from {url}"
        )));
    }

    let second = client
        .get(&location)
        .send()
        .map_err(|e| EngineError::TransientNetwork(format!("fetching {location}: {e}")))?;
    if second.status() != reqwest::StatusCode::OK {
        return Err(EngineError::TransientNetwork(format!(
            "unexpected HTTP response {} fetching {location}",
            second.status()
        )));
    }

    let local_path = download_dir.join(crate_file);
    let bytes = second
        .bytes()
        .map_err(|e| EngineError::TransientNetwork(format!("reading body from {location}: {e}")))?;
    std::fs::write(&local_path, &bytes)
        .map_err(|e| EngineError::TransientNetwork(format!("writing {}: {e}", local_path.display())))?;

    Ok(local_path)
}

/// A client with redirects disabled, so the 302 from the download
/// endpoint surfaces as a response rather than being followed
/// transparently.
pub fn build_client() -> EngineResult<Client> {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .map_err(|e| EngineError::Config(format!("building HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_file_pattern_accepts_semver_with_prerelease() {
        assert!(CRATE_FILE_PATTERN.is_match("serde-1.0.0-beta.1.crate"));
        assert!(CRATE_FILE_PATTERN.is_match("serde-1.0.0+build.5.crate"));
        assert!(CRATE_FILE_PATTERN.is_match("serde_json-1.0.0.crate"));
    }

    #[test]
    fn crate_file_pattern_rejects_missing_version() {
        assert!(!CRATE_FILE_PATTERN.is_match("serde.crate"));
        assert!(!CRATE_FILE_PATTERN.is_match("serde-1.0.crate"));
    }
}
