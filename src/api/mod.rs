//! HTTP layer: event endpoints, submission extractor, health probes and
//! server setup.

pub mod events;
pub mod extract;
pub mod health;
pub mod server;

use serde::Serialize;

pub use events::{EventListResponse, EventResponse, ListParams};
pub use extract::EventSubmission;
pub use health::{
    build_info, health_check, health_monitor, ready_check, ComponentHealth, HealthResponse,
    HealthState, HealthStatus, ReadyResponse,
};
pub use server::{create_router, create_server, shutdown_signal, AppState};

/// Served by `GET /build`
pub const BUILD_INFO: BuildInfo = BuildInfo {
    service: env!("CARGO_PKG_NAME"),
    version: env!("CARGO_PKG_VERSION"),
    commit: or_unknown(option_env!("GIT_COMMIT")),
    build_time: or_unknown(option_env!("BUILD_TIME")),
};

const fn or_unknown(value: Option<&'static str>) -> &'static str {
    match value {
        Some(value) => value,
        None => "unknown",
    }
}

/// Compile-time build metadata
#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
    /// `GIT_COMMIT` at build time
    pub commit: &'static str,
    /// `BUILD_TIME` at build time
    pub build_time: &'static str,
}
