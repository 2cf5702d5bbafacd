//! Command handlers for semcache CLI.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use semcache::errors::Error;
use semcache::{import_from_json, Embedder, SemanticCache};

use crate::output::*;

/// Exit code for a search that found nothing close enough.
const EXIT_MISS: u8 = 2;

/// Commands supported by semcache CLI.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Store an answer for a query
    Save {
        /// Query text
        query: String,
        /// Answer text
        answer: String,
    },
    /// Look up a cached answer (exit code 2 on a miss)
    Search {
        /// Query text
        query: String,
    },
    /// List the stored entries closest to a query, ignoring the threshold
    Nearest {
        /// Query text
        query: String,

        /// Maximum number of results (default: 5)
        #[arg(short = 'l', long, default_value = "5")]
        limit: usize,
    },
    /// List stored entries in insertion order
    List {
        /// Maximum number of results (default: 10)
        #[arg(short = 'l', long, default_value = "10")]
        limit: usize,
    },
    /// Import question/answer pairs from a JSON file
    Import {
        /// Path to a JSON array of {"query", "answer"} objects
        file: PathBuf,
    },
    /// Show store location, model, and entry count
    Stats,
    /// Print version information
    Version,
}

/// Execute a CLI command against an open cache.
pub fn execute<E: Embedder>(
    command: &Commands,
    cache: &mut SemanticCache<E>,
    json: bool,
) -> Result<ExitCode, Error> {
    match command {
        Commands::Save { query, answer } => handle_save(cache, query, answer, json),
        Commands::Search { query } => handle_search(cache, query, json),
        Commands::Nearest { query, limit } => handle_nearest(cache, query, *limit, json),
        Commands::List { limit } => handle_list(cache, *limit, json),
        Commands::Import { file } => handle_import(cache, file, json),
        Commands::Stats => handle_stats(cache, json),
        Commands::Version => handle_version(json),
    }
}

fn handle_save<E: Embedder>(
    cache: &mut SemanticCache<E>,
    query: &str,
    answer: &str,
    json: bool,
) -> Result<ExitCode, Error> {
    let id = cache.save(query, answer)?;
    if json {
        print_json(&SaveResponse {
            status: "saved".to_string(),
            id,
        });
    } else {
        println!("Saved entry: {}", id);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_search<E: Embedder>(
    cache: &mut SemanticCache<E>,
    query: &str,
    json: bool,
) -> Result<ExitCode, Error> {
    match cache.lookup(query)? {
        Some(hit) => {
            if json {
                print_json(&SearchResponse {
                    status: "hit".to_string(),
                    hit: Some(hit.into()),
                });
            } else {
                println!("{}", hit.answer);
            }
            Ok(ExitCode::SUCCESS)
        }
        None => {
            if json {
                print_json(&SearchResponse {
                    status: "miss".to_string(),
                    hit: None,
                });
            } else {
                eprintln!("No cached answer within distance {}", cache.distance_threshold());
            }
            Ok(ExitCode::from(EXIT_MISS))
        }
    }
}

fn handle_nearest<E: Embedder>(
    cache: &mut SemanticCache<E>,
    query: &str,
    limit: usize,
    json: bool,
) -> Result<ExitCode, Error> {
    let hits = cache.nearest(query, limit)?;
    if json {
        print_json(&NearestResponse {
            results: hits.into_iter().map(NeighborItem::from).collect(),
        });
    } else {
        for hit in hits {
            println!(
                "{} [distance: {:.4}]\n  Q: {}\n  A: {}\n",
                hit.id, hit.distance, hit.query, hit.answer
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_list<E: Embedder>(
    cache: &SemanticCache<E>,
    limit: usize,
    json: bool,
) -> Result<ExitCode, Error> {
    let entries = cache.entries(limit)?;
    if json {
        let items: Vec<ListItem> = entries
            .into_iter()
            .map(|e| ListItem {
                id: e.id,
                query: e.query,
                answer: e.answer,
                created_at: e.created_at,
            })
            .collect();
        print_json(&ListResponse { entries: items });
    } else {
        for entry in entries {
            println!("{}: {}\n  {}", entry.id, entry.query, entry.answer);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_import<E: Embedder>(
    cache: &mut SemanticCache<E>,
    file: &Path,
    json: bool,
) -> Result<ExitCode, Error> {
    let stats = import_from_json(file, cache)?;
    if json {
        print_json(&ImportResponse {
            status: "imported".to_string(),
            total: stats.total,
            imported: stats.imported,
            skipped_duplicates: stats.skipped_duplicates,
            skipped_invalid: stats.skipped_invalid,
        });
    } else {
        println!(
            "Imported {} of {} pairs ({} duplicates, {} invalid skipped)",
            stats.imported, stats.total, stats.skipped_duplicates, stats.skipped_invalid
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_stats<E: Embedder>(cache: &SemanticCache<E>, json: bool) -> Result<ExitCode, Error> {
    let entries = cache.len()?;
    if json {
        print_json(&StatsResponse {
            store_path: cache.store_path().display().to_string(),
            model: cache.model_id().to_string(),
            entries,
            distance_threshold: cache.distance_threshold(),
        });
    } else {
        println!("Store: {}", cache.store_path().display());
        println!("Model: {}", cache.model_id());
        println!("Entries: {}", entries);
        println!("Distance threshold: {}", cache.distance_threshold());
    }
    Ok(ExitCode::SUCCESS)
}

/// Print version information. Needs no cache.
pub fn handle_version(json: bool) -> Result<ExitCode, Error> {
    if json {
        print_json(&serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "name": env!("CARGO_PKG_NAME")
        }));
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }
    Ok(ExitCode::SUCCESS)
}
