use clap::Parser;
use tracing_subscriber::EnvFilter;

use attendance_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and friends are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli::run(cli).await {
        tracing::error!("{:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}
