//! Evently - event publishing service
//!
//! Accepts event submissions over HTTP, validates and normalizes them, and
//! stores them in PostgreSQL.

use std::sync::Arc;

use evently::{
    api::{health_monitor, HealthState},
    config::Config,
    db::{self, PgEventRepository},
    logging, Result,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Arc::new(Config::from_env()?);
    config.validate()?;

    logging::init_tracing(&config.server.log_level, &config.server.environment)?;
    config.log_config();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Evently");

    let pool = db::create_pool(&config.database).await?;
    if config.database.run_migrations {
        db::run_migrations(&pool).await?;
    }

    let repo = Arc::new(PgEventRepository::new(pool.clone()));
    let health = Arc::new(HealthState::new());
    let monitor = tokio::spawn(health_monitor(
        health.clone(),
        repo.clone(),
        config.api.health_check_interval(),
    ));

    let served = evently::create_server(config.clone(), repo, health).await;

    monitor.abort();
    if tokio::time::timeout(config.server.shutdown_timeout(), db::pool::close_pool(&pool))
        .await
        .is_err()
    {
        tracing::warn!("Timed out waiting for database connections to close");
    }

    served?;
    tracing::info!("Evently shutdown complete");
    Ok(())
}
