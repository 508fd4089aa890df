//! The per-candidate detection pipeline, fanned out with `rayon` and
//! re-sorted into ascending candidate-name order before reaching the
//! output sink, regardless of scheduling.

use std::collections::BTreeSet;

use rayon::prelude::*;
use reqwest::blocking::Client;
use tracing::{info, info_span};

use crate::alert::Alert;
use crate::allowlist::is_allowlisted;
use crate::context::EngineContext;
use crate::corpus::RegistryStore;
use crate::download;
use crate::error::EngineResult;
use crate::mutators::all_targets;
use crate::similarity::filter_targets;

/// Runs the batch pipeline once over every candidate in `ctx.corpus`,
/// returning alerts in ascending candidate-name order.
pub fn run(
    ctx: &EngineContext,
    store: &dyn RegistryStore,
    client: &Client,
    download_dir: &std::path::Path,
    registry_base_url: &str,
) -> EngineResult<Vec<Alert>> {
    let span = info_span!(
        "driver_run",
        popular = ctx.corpus.popular_set.len(),
        candidates = ctx.corpus.candidate_names().len()
    );
    let _enter = span.enter();

    let mut names = ctx.corpus.candidate_names();
    names.sort_unstable();

    let results: Vec<EngineResult<Option<Alert>>> = names
        .par_iter()
        .map(|name| scan_candidate(ctx, store, client, download_dir, registry_base_url, name))
        .collect();

    let mut alerts = Vec::with_capacity(results.len());
    for result in results {
        if let Some(alert) = result? {
            alerts.push(alert);
        }
    }
    alerts.sort_by(|a, b| a.candidate_name.cmp(&b.candidate_name));

    info!(count = alerts.len(), "driver run complete");
    Ok(alerts)
}

fn scan_candidate(
    ctx: &EngineContext,
    store: &dyn RegistryStore,
    client: &Client,
    download_dir: &std::path::Path,
    registry_base_url: &str,
    name: &str,
) -> EngineResult<Option<Alert>> {
    if ctx.corpus.is_popular(name) {
        return Ok(None);
    }
    let Some(candidate) = ctx.corpus.get(name) else {
        return Ok(None);
    };
    if is_allowlisted(&ctx.allowlist, candidate) {
        return Ok(None);
    }

    let raw: BTreeSet<String> = all_targets(ctx, name).into_iter().collect();
    if raw.is_empty() {
        return Ok(None);
    }
    let raw: Vec<String> = raw.into_iter().collect();

    let targets = filter_targets(
        ctx.embedding_model.as_ref(),
        &ctx.similarity,
        candidate,
        &ctx.corpus.packages,
        &raw,
    )?;
    if targets.is_empty() {
        return Ok(None);
    }

    let artifact =
        download::fetch_latest_artifact(client, store, download_dir, registry_base_url, name)?;

    info!(candidate = name, targets = targets.len(), "suspect found");

    Ok(Some(Alert {
        candidate_name: name.to_string(),
        candidate_downloads: candidate.downloads,
        targets,
        artifact: artifact.into(),
    }))
}
