mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use semcache::{Config, Error, SemanticCache};
use tracing_subscriber::EnvFilter;

use commands::Commands;
use output::{print_json, ErrorResponse};

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "SEMCACHE_LOG";

/// semcache - A semantic response cache for question answering
#[derive(Parser)]
#[command(name = "semcache", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Cache store directory (overrides config and environment)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Maximum squared-L2 distance for a hit (overrides config and environment)
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Path to a config file (default: ~/.config/semcache/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if cli.json {
                print_json(&ErrorResponse {
                    status: "error".to_string(),
                    error: e.to_string(),
                });
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    if matches!(cli.command, Commands::Version) {
        return commands::handle_version(cli.json);
    }

    let config = resolve_config(cli)?;
    tracing::debug!(store = %config.store_path.display(), model = %config.embedding_model, "opening cache");
    let mut cache = SemanticCache::open(&config)?;
    commands::execute(&cli.command, &mut cache, cli.json)
}

/// Load configuration and apply command-line overrides on top.
fn resolve_config(cli: &Cli) -> Result<Config, Error> {
    let mut config = match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(Error::FileNotFound(path.clone()));
            }
            Config::load_from(path)?
        }
        None => Config::load()?,
    };

    if let Some(store) = &cli.store {
        config.store_path = store.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.distance_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

/// Log to stderr, filtered by `SEMCACHE_LOG` when set.
fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "semcache=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
