//! Engine throughput benchmark: a prefetch/build/scan timing breakdown
//! over a synthetic corpus. Not part of detection semantics.

use std::time::Instant;

use rand_free_synthetic::synthetic_corpus;

use typogard::context::EngineContext;
use typogard::corpus::RegistryStore;
use typogard::driver;
use typogard::error::EngineResult;
use typogard::similarity::hashing::HashingEmbeddingModel;
use typogard::similarity::SimilarityConfig;

mod rand_free_synthetic {
    //! A tiny deterministic name/description generator, good enough to
    //! drive throughput measurement without a live database. Deliberately
    //! not random (`Math.random`-style nondeterminism has no place in a
    //! benchmark meant to be re-run for comparison).
    use typogard::corpus::Package;
    use std::collections::{HashMap, HashSet};

    pub fn synthetic_corpus(size: usize) -> typogard::corpus::Corpus {
        let popular_n = (size / 10).max(1);
        let mut packages = HashMap::new();
        let mut popular_list = Vec::new();

        for i in 0..popular_n {
            let name = format!("pkg{i}");
            popular_list.push(name.clone());
            packages.insert(
                name.clone(),
                Package {
                    name,
                    owners: vec![format!("owner{}", i % 50)],
                    description: Some(format!("a library for task number {i}")),
                    homepage: None,
                    repository: None,
                    documentation: None,
                    downloads: (size - i) as u64,
                    recent_downloads: (size - i) as u64,
                },
            );
        }
        let popular_set: HashSet<String> = popular_list.iter().cloned().collect();

        for i in 0..(size - popular_n) {
            // Perturb a popular name so some candidates actually alert.
            let base = &popular_list[i % popular_list.len()];
            let name = if i % 7 == 0 {
                format!("{base}2")
            } else {
                format!("pkg-candidate-{i}")
            };
            if packages.contains_key(&name) {
                continue;
            }
            packages.insert(
                name.clone(),
                Package {
                    name,
                    owners: vec![format!("owner{}", (i + 1) % 50)],
                    description: Some(format!("a library for task number {i}")),
                    homepage: None,
                    repository: None,
                    documentation: None,
                    downloads: i as u64,
                    recent_downloads: 0,
                },
            );
        }

        typogard::corpus::Corpus {
            packages,
            popular_list,
            popular_set,
        }
    }
}

struct NullStore;

impl RegistryStore for NullStore {
    fn top_popular(&self, _n: usize) -> EngineResult<Vec<typogard::corpus::PackageRow>> {
        Ok(Vec::new())
    }
    fn candidates(&self, _n: usize, _days: u32) -> EngineResult<Vec<typogard::corpus::PackageRow>> {
        Ok(Vec::new())
    }
    fn versions(&self, _name: &str) -> EngineResult<Vec<String>> {
        Ok(Vec::new())
    }
}

pub fn run(corpus_size: usize, jobs: usize) -> i32 {
    let start = Instant::now();

    eprintln!("Phase 1: building synthetic corpus ({corpus_size} packages)...");
    let corpus = synthetic_corpus(corpus_size);
    let build_time = start.elapsed();
    eprintln!(
        "  {} popular, {} candidates, built in {:.2}s",
        corpus.popular_list.len(),
        corpus.candidate_names().len(),
        build_time.as_secs_f64()
    );

    let index_start = Instant::now();
    let bitflip_index = typogard::bitflip::BitflipIndex::build(&corpus.popular_list);
    let index_time = index_start.elapsed();
    eprintln!(
        "  bitflip index: {} mutants in {:.2}s",
        bitflip_index.len(),
        index_time.as_secs_f64()
    );

    let ctx = EngineContext {
        corpus,
        bitflip_index,
        allowlist: Vec::new(),
        embedding_model: Box::new(HashingEmbeddingModel),
        similarity: SimilarityConfig {
            similarity_threshold: 0.97,
            levenshtein_threshold: 10,
        },
    };

    eprintln!("Phase 2: scanning ({jobs} rayon threads)...");
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .expect("failed to build thread pool");

    let client = match typogard::download::build_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error building HTTP client: {e}");
            return 1;
        }
    };
    let download_dir = std::env::temp_dir().join("typogard-bench");
    let store = NullStore;

    let scan_start = Instant::now();
    let alerts = pool.install(|| {
        driver::run(&ctx, &store, &client, &download_dir, "https://crates.io")
    });
    let scan_time = scan_start.elapsed();

    let alerts = match alerts {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error during scan: {e}");
            return 1;
        }
    };

    let total_time = start.elapsed();
    let candidate_count = ctx.corpus.candidate_names().len();

    println!();
    println!("=== typogard bench results ===");
    println!();
    println!("  Corpus:      {candidate_count} candidates, {} popular", ctx.corpus.popular_list.len());
    println!("  Suspects:    {}", alerts.len());
    println!();
    println!("  Timing:");
    println!("    Corpus build: {:>7.2}s", build_time.as_secs_f64());
    println!("    Bitflip idx:  {:>7.2}s", index_time.as_secs_f64());
    println!("    Scan:         {:>7.2}s", scan_time.as_secs_f64());
    println!("    Total:        {:>7.2}s", total_time.as_secs_f64());
    println!(
        "    Throughput:   {:>7.1} candidates/s",
        candidate_count as f64 / scan_time.as_secs_f64()
    );

    0
}
