//! Repository abstractions for Evently
//!
//! This module defines the base repository trait and the error type shared
//! by every storage backend, along with the retry policy applied to reads.

use async_trait::async_trait;
use backoff::ExponentialBackoff;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

use crate::error::Error;

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Name of the unique index guarding event slugs
pub const SLUG_UNIQUE_INDEX: &str = "events_slug_key";

/// PostgreSQL SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// Repository error types
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query execution error: {0}")]
    QueryExecution(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Another event already holds this slug
    #[error("Duplicate slug: {0}")]
    DuplicateSlug(String),

    /// A stored row could not be mapped back into a record
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Classify a failed write; a unique violation on the slug index becomes
    /// [`RepositoryError::DuplicateSlug`]
    pub fn from_write(err: sqlx::Error, slug: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let unique = db_err.code().is_some_and(|code| code == UNIQUE_VIOLATION);
            if unique && db_err.constraint() == Some(SLUG_UNIQUE_INDEX) {
                return RepositoryError::DuplicateSlug(slug.to_string());
            }
        }
        RepositoryError::classify(err)
    }

    /// Map sqlx failures onto the transient variants where possible
    pub fn classify(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => RepositoryError::PoolExhausted,
            sqlx::Error::Io(e) => RepositoryError::Connection(e.to_string()),
            other => RepositoryError::Database(other),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            RepositoryError::Connection(_)
            | RepositoryError::PoolExhausted
            | RepositoryError::Timeout(_) => true,
            RepositoryError::Database(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut
                    | sqlx::Error::PoolClosed
                    | sqlx::Error::Io(_)
                    | sqlx::Error::Tls(_)
            ),
            _ => false,
        }
    }

    /// Slug collision, classified or not
    pub fn is_conflict(&self) -> bool {
        match self {
            RepositoryError::DuplicateSlug(_) => true,
            RepositoryError::Database(sqlx::Error::Database(db_err)) => {
                db_err.code().is_some_and(|code| code == UNIQUE_VIOLATION)
            },
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RepositoryError::NotFound(_) | RepositoryError::Database(sqlx::Error::RowNotFound)
        )
    }
}

/// Convert repository errors to application errors
impl From<RepositoryError> for Error {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateSlug(slug) => Error::DuplicateSlug(slug),
            RepositoryError::NotFound(msg) => Error::NotFound(msg),
            RepositoryError::Database(sqlx::Error::RowNotFound) => {
                Error::NotFound("event".to_string())
            },
            RepositoryError::Timeout(msg) => Error::Timeout(msg),
            other => Error::database(other.to_string()),
        }
    }
}

/// Keyed storage shared by every backend, including the in-memory one used
/// in tests
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: Send + Sync;
    type Id: Send + Sync + Debug;

    async fn find_by_id(&self, id: Self::Id) -> RepositoryResult<Option<Self::Entity>>;

    async fn exists(&self, id: Self::Id) -> RepositoryResult<bool>;

    async fn count(&self) -> RepositoryResult<i64>;

    /// Cheap round trip used by the readiness probe
    async fn health_check(&self) -> RepositoryResult<()>;
}

/// Retry configuration for repository reads
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    /// Cap on a single delay
    pub max_backoff_ms: u64,
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 5000,
            multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn with_initial_backoff(mut self, ms: u64) -> Self {
        self.initial_backoff_ms = ms;
        self
    }

    pub fn with_max_backoff(mut self, ms: u64) -> Self {
        self.max_backoff_ms = ms;
        self
    }

    /// Build the backoff policy; total elapsed time is bounded by the
    /// geometric sum of `max_retries` delays
    pub fn backoff(&self) -> ExponentialBackoff {
        let initial = Duration::from_millis(self.initial_backoff_ms);
        let max = Duration::from_millis(self.max_backoff_ms);
        let budget = (0..=self.max_retries).fold(Duration::ZERO, |total, attempt| {
            let delay = initial.mul_f64(self.multiplier.powi(attempt as i32));
            total + delay.min(max)
        });

        ExponentialBackoff {
            initial_interval: initial,
            current_interval: initial,
            max_interval: max,
            multiplier: self.multiplier,
            max_elapsed_time: Some(budget),
            ..Default::default()
        }
    }
}
