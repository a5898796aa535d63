//! Database module for Evently
//!
//! This module provides database connectivity, connection pooling,
//! and the event repository backing the HTTP API.

pub mod event_repo;
pub mod pool;
pub mod repository;

// Re-export commonly used types
pub use event_repo::{EventRepository, PgEventRepository};
pub use pool::{create_pool, DbPool};
pub use repository::{Repository, RepositoryError, RepositoryResult, RetryConfig};

use sqlx::migrate::Migrator;

use crate::error::{Error, Result};

/// Database migrator for running schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

    tracing::info!(migrations = MIGRATOR.iter().count(), "Database migrations applied");
    Ok(())
}
