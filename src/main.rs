mod config;
mod error;
mod export;
mod models;
mod report;
mod run;
mod storage;
mod store;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = config::Config::load()?;
    let storage = storage::SqliteStorage::open(&config.data_path)?;
    info!(
        path = %config.data_path.display(),
        validation = config.validation.as_str(),
        "Storage ready"
    );

    let books = run::Books::new(&storage, config.store_config());
    run::as_cli(&args, &books)
}
