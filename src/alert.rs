//! Alert shape and output sink: colored text for a terminal, or pretty
//! JSON for machine consumption.

use std::collections::BTreeMap;

use colored::Colorize;
use serde::Serialize;

use crate::download::ArtifactRef;
use crate::similarity::Score;

/// One emitted suspect, with its surviving mutation targets and scores.
/// `targets` is a `BTreeMap` so both text and JSON output list targets in
/// a fixed, deterministic order.
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub candidate_name: String,
    pub candidate_downloads: u64,
    #[serde(serialize_with = "serialize_targets")]
    pub targets: BTreeMap<String, Score>,
    pub artifact: ArtifactLocation,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactLocation {
    Downloaded { path: String },
    Placeholder { reason: String },
}

impl From<ArtifactRef> for ArtifactLocation {
    fn from(r: ArtifactRef) -> Self {
        match r {
            ArtifactRef::Downloaded(p) => ArtifactLocation::Downloaded {
                path: p.display().to_string(),
            },
            ArtifactRef::Placeholder(reason) => ArtifactLocation::Placeholder { reason },
        }
    }
}

impl Serialize for Score {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Score::Cosine(s) => serializer.serialize_f32(*s),
            Score::Levenshtein(d) => serializer.serialize_u64(*d as u64),
            Score::BothEmpty => serializer.serialize_u64(100),
        }
    }
}

fn serialize_targets<S: serde::Serializer>(
    targets: &BTreeMap<String, Score>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    targets.serialize(serializer)
}

fn format_score(score: &Score) -> String {
    match score {
        Score::Cosine(s) => format!("cosine={s:.3}"),
        Score::Levenshtein(d) => format!("levenshtein={d}"),
        Score::BothEmpty => "100 (both descriptions empty)".to_string(),
    }
}

/// Human-readable line per alert: candidate name, artifact location,
/// total downloads, target-to-score map.
pub fn print_text(alert: &Alert) {
    let artifact = match &alert.artifact {
        ArtifactLocation::Downloaded { path } => path.clone(),
        ArtifactLocation::Placeholder { reason } => format!("<placeholder: {reason}>"),
    };
    println!(
        "{} {} ({} downloads) -> {}",
        "suspect:".red().bold(),
        alert.candidate_name.bold(),
        alert.candidate_downloads,
        artifact,
    );
    for (target, score) in &alert.targets {
        println!("    {} {target}: {}", "->".yellow(), format_score(score));
    }
}

pub fn print_json(alert: &Alert) {
    let json = serde_json::to_string_pretty(alert).expect("alert always serializes");
    println!("{json}");
}

pub fn print_summary(count: usize) {
    if count == 0 {
        println!("{}", "no suspects found".green());
    } else {
        println!("{}", format!("{count} suspect(s) found").red().bold());
    }
}
