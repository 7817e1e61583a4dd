use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use urlcache_core::orchestrator::Orchestrator;
use urlcache_core::{config, logging};

mod app;
mod handlers;
mod render;

/// Fetch-and-cache gateway: caches a user-supplied URL via the external
/// download worker and serves the cached copy under `/cache/`.
#[derive(Debug, Parser)]
#[command(name = "urlcache-server")]
#[command(about = "urlcache: fetch, cache, and serve remote resources", long_about = None)]
struct Args {
    /// Bind address (overrides config.toml).
    #[arg(long)]
    listen: Option<String>,

    /// Cache root directory (overrides config.toml).
    #[arg(long)]
    cache_root: Option<PathBuf>,

    /// Download worker executable (overrides config.toml).
    #[arg(long)]
    worker: Option<PathBuf>,

    /// Worker timeout in seconds (overrides config.toml).
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Show worker diagnostics on result pages (may expose server paths).
    #[arg(long)]
    expose_worker_output: bool,
}

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible.
    logging::init();

    if let Err(err) = run().await {
        eprintln!("urlcache error: {:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let mut cfg = config::load_or_init()?;
    if let Some(listen) = args.listen {
        cfg.listen_addr = listen;
    }
    if let Some(root) = args.cache_root {
        cfg.cache_root = root;
    }
    if let Some(worker) = args.worker {
        cfg.worker_path = worker;
    }
    if let Some(secs) = args.timeout_secs {
        cfg.worker_timeout_secs = secs;
    }
    if args.expose_worker_output {
        cfg.expose_worker_output = true;
    }
    tracing::debug!("effective config: {:?}", cfg);

    let orchestrator = Arc::new(Orchestrator::from_config(&cfg)?);
    let state = handlers::AppState {
        orchestrator,
        expose_worker_output: cfg.expose_worker_output,
    };

    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr).await?;
    tracing::info!("listening on {}", cfg.listen_addr);
    axum::serve(listener, app::router(state)).await?;

    Ok(())
}
