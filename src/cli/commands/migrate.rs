use anyhow::Context;
use tracing::info;

use crate::config::AppConfig;
use crate::database::Database;

pub async fn handle(config: &AppConfig) -> anyhow::Result<()> {
    let db = Database::connect(&config.database)
        .await
        .context("connecting to database")?;

    db.migrate().await.context("applying migrations")?;
    info!("Migrations applied");

    db.close().await;
    Ok(())
}
