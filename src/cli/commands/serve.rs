use anyhow::Context;
use tracing::info;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::Database;
use crate::routes;
use crate::state::AppState;

pub async fn handle(config: &AppConfig, port: Option<u16>, migrate: bool) -> anyhow::Result<()> {
    info!("Starting attendance API in {:?} mode", config.environment);

    let jwt = JwtKeys::from_config(&config.security).context("SECURITY_JWT_SECRET must be set")?;

    let db = Database::connect(&config.database)
        .await
        .context("connecting to database")?;
    if migrate {
        db.migrate().await.context("applying migrations")?;
        info!("Migrations applied");
    }

    let app = routes::app(AppState::from_database(db.clone(), jwt, config), config);

    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.server.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
