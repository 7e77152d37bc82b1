mod cli;
mod config;

use std::sync::Arc;

use clap::Parser;
use tracing::info;

use pantry_core::{Pantry, SharedStore};
use pantry_db::Database;

use crate::cli::Cli;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pantry=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    let config = AppConfig::from_env();

    // Init database
    let db_path = args.db.clone().unwrap_or_else(|| config.db_path.clone());
    let db = Arc::new(Database::open(&db_path)?);
    info!("Database at {}", db_path.display());

    let store: SharedStore = db.clone();
    let generator = config.generation_client();
    let pantry = Pantry::new(store, generator.clone(), config.ai_notifications);

    cli::run(args.command, &db, &pantry, generator.as_ref()).await
}
