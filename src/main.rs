mod bench;

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use typogard::alert::{print_json, print_summary, print_text};
use typogard::config::{Cli, Commands, RunArgs};
use typogard::corpus::postgres_store::PostgresStore;
use typogard::corpus::{Corpus, PackageRow, RegistryStore};
use typogard::error::{EngineError, EngineResult};
use typogard::{build_context, driver};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Bench { corpus_size, jobs } => bench::run(corpus_size, jobs),
    };

    process::exit(exit_code);
}

fn cmd_run(args: RunArgs) -> i32 {
    match run_pipeline(&args) {
        Ok(alert_count) => {
            if alert_count > 0 {
                42
            } else {
                0
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            1
        }
    }
}

fn run_pipeline(args: &RunArgs) -> EngineResult<usize> {
    let store: Box<dyn RegistryStore> = if let Some(path) = &args.meta_dump {
        Box::new(load_meta_dump(path)?)
    } else {
        let dbconf = typogard::config::load_dbconf(&args.dbconf)?;
        Box::new(PostgresStore::connect(&dbconf.to_connection_string())?)
    };

    let ctx = build_context(
        store.as_ref(),
        args.top,
        args.days,
        args.similarity_threshold,
        args.lev_threshold,
        args.allowlist.as_deref(),
    )?;

    let client = typogard::download::build_client()?;
    let alerts = driver::run(&ctx, store.as_ref(), &client, &args.download_dir, &args.registry_base_url)?;

    for alert in &alerts {
        if args.json {
            print_json(alert);
        } else {
            print_text(alert);
        }
    }
    print_summary(alerts.len());

    Ok(alerts.len())
}

/// A `RegistryStore` over a JSON corpus snapshot, for running the full
/// pipeline without a live database (`--meta-dump`).
struct MetaDumpStore {
    corpus: Corpus,
}

fn load_meta_dump(path: &std::path::Path) -> EngineResult<MetaDumpStore> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Config(format!("reading meta-dump {}: {e}", path.display())))?;
    let rows: Vec<PackageRow> = serde_json::from_str(&content)
        .map_err(|e| EngineError::Config(format!("parsing meta-dump {}: {e}", path.display())))?;

    use std::collections::{HashMap, HashSet};
    let mut packages = HashMap::new();
    for row in rows {
        let pkg = packages
            .entry(row.name.clone())
            .or_insert_with(|| typogard::corpus::Package {
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
    Ok(MetaDumpStore {
        corpus: Corpus {
            packages,
            popular_list: Vec::new(),
            popular_set: HashSet::new(),
        },
    })
}

impl RegistryStore for MetaDumpStore {
    fn top_popular(&self, n: usize) -> EngineResult<Vec<PackageRow>> {
        let mut names: Vec<&String> = self.corpus.packages.keys().collect();
        names.sort_by(|a, b| {
            let da = self.corpus.packages[*a].recent_downloads;
            let db = self.corpus.packages[*b].recent_downloads;
            db.cmp(&da)
        });
        Ok(names
            .into_iter()
            .take(n)
            .flat_map(|name| self.package_to_rows(name))
            .collect())
    }

    fn candidates(&self, n: usize, _days: u32) -> EngineResult<Vec<PackageRow>> {
        let mut names: Vec<&String> = self.corpus.packages.keys().collect();
        names.sort_by(|a, b| {
            let da = self.corpus.packages[*a].recent_downloads;
            let db = self.corpus.packages[*b].recent_downloads;
            db.cmp(&da)
        });
        Ok(names
            .into_iter()
            .skip(n)
            .flat_map(|name| self.package_to_rows(name))
            .collect())
    }

    fn versions(&self, _name: &str) -> EngineResult<Vec<String>> {
        Ok(Vec::new())
    }
}

impl MetaDumpStore {
    fn package_to_rows(&self, name: &str) -> Vec<PackageRow> {
        let pkg = &self.corpus.packages[name];
        if pkg.owners.is_empty() {
            return vec![PackageRow {
                name: pkg.name.clone(),
                owner: None,
                homepage: pkg.homepage.clone(),
                repository: pkg.repository.clone(),
                documentation: pkg.documentation.clone(),
                description: pkg.description.clone(),
                downloads: pkg.downloads,
                recent_downloads: pkg.recent_downloads,
            }];
        }
        pkg.owners
            .iter()
            .map(|owner| PackageRow {
                name: pkg.name.clone(),
                owner: Some(owner.clone()),
                homepage: pkg.homepage.clone(),
                repository: pkg.repository.clone(),
                documentation: pkg.documentation.clone(),
                description: pkg.description.clone(),
                downloads: pkg.downloads,
                recent_downloads: pkg.recent_downloads,
            })
            .collect()
    }
}
