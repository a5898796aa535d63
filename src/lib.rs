//! Evently Library
//!
//! Event publishing service: submissions are validated and normalized by the
//! model pipeline, stored in PostgreSQL and served over HTTP. The modules are
//! exposed here for the binary and for integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod test_utils;

// Re-export commonly used types at the crate root
pub use config::Config;
pub use error::{Error, Result};

// Re-export model types
pub use models::{
    prepare_create, prepare_update, EventError, EventMode, EventRecord, NewEvent, RawEvent,
    ValidationError, ValidationErrorKind,
};

// Re-export API server functions
pub use api::server::{create_router, create_server, shutdown_signal, AppState};

// Re-export health check types
pub use api::{BuildInfo, ComponentHealth, HealthResponse, HealthState, HealthStatus, ReadyResponse};
