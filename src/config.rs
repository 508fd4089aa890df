//! CLI surface and ambient configuration: `clap` derive for the command
//! line, TOML-with-fallback for the database connection file.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};

#[derive(Parser)]
#[command(name = "typogard", about = "Typosquatting detection engine for a crate registry")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the batch detection pipeline once over the current corpus.
    Run(RunArgs),
    /// Benchmark the engine's own throughput over a synthetic or
    /// meta-dumped corpus (ambient test tooling, not part of detection).
    Bench {
        #[arg(long, default_value_t = 20_000)]
        corpus_size: usize,
        #[arg(long, default_value_t = 4)]
        jobs: usize,
    },
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Candidate recency window, in days.
    #[arg(long, default_value_t = 3)]
    pub days: u32,

    /// Size of the popular set N.
    #[arg(long, default_value_t = 3000)]
    pub top: usize,

    /// Semantic-mode retain threshold, in [0, 1].
    #[arg(long, default_value_t = 0.97)]
    pub similarity_threshold: f32,

    /// Edit-distance-mode retain threshold.
    #[arg(long = "lev-threshold", default_value_t = 10)]
    pub lev_threshold: usize,

    /// Artifact download destination (created if missing).
    #[arg(long, default_value = "/var/tmp/cratefiles")]
    pub download_dir: PathBuf,

    /// Relational-store connection configuration.
    #[arg(long, default_value = "db.conf")]
    pub dbconf: PathBuf,

    /// Base URL of the registry's HTTP API.
    #[arg(long, default_value = "https://crates.io")]
    pub registry_base_url: String,

    /// External allowlist file, overriding the built-in defaults.
    #[arg(long)]
    pub allowlist: Option<PathBuf>,

    /// Skip the live database and load a JSON corpus snapshot instead,
    /// so the pipeline is runnable without Postgres.
    #[arg(long)]
    pub meta_dump: Option<PathBuf>,

    /// Emit JSON instead of human-readable text.
    #[arg(long)]
    pub json: bool,
}

/// `db.conf`'s shape: a small TOML document with connection parameters.
#[derive(Debug, Deserialize)]
pub struct DbConfig {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub dbname: String,
}

fn default_port() -> u16 {
    5432
}

impl DbConfig {
    pub fn to_connection_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }
}

pub fn load_dbconf(path: &std::path::Path) -> EngineResult<DbConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Config(format!("reading {}: {e}", path.display())))?;
    toml::from_str(&content).map_err(|e| EngineError::Config(format!("parsing {}: {e}", path.display())))
}
