//! Health check endpoints for Evently
//!
//! Liveness never touches the database. Readiness reports the state
//! recorded by [`health_monitor`], which probes storage in the background.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::api::BUILD_INFO;
use crate::db::Repository;

/// Component name the storage probe reports under
pub const DATABASE_COMPONENT: &str = "database";

/// Probes slower than this report as degraded
const SLOW_PROBE: Duration = Duration::from_secs(1);

/// Component status, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    /// Reachable but slow
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Degraded still serves traffic
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, ComponentHealth>,
    pub timestamp: DateTime<Utc>,
}

/// Result of the latest probe of one component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    /// Failure or slowness detail
    pub message: Option<String>,
    pub latency_ms: Option<u64>,
    pub last_check: DateTime<Utc>,
}

impl ComponentHealth {
    pub fn new(status: HealthStatus, message: Option<String>) -> Self {
        Self {
            status,
            message,
            latency_ms: None,
            last_check: Utc::now(),
        }
    }
}

/// Shared component health, written by the monitor and read by `/readyz`
#[derive(Clone, Default)]
pub struct HealthState {
    pub components: Arc<RwLock<HashMap<String, ComponentHealth>>>,
}

impl HealthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn update_component(
        &self,
        name: impl Into<String>,
        status: HealthStatus,
        message: Option<String>,
    ) {
        self.record(name, ComponentHealth::new(status, message)).await;
    }

    pub async fn record(&self, name: impl Into<String>, health: ComponentHealth) {
        self.components.write().await.insert(name.into(), health);
    }

    /// Worst status across all components; healthy when nothing was probed yet
    pub async fn get_status(&self) -> HealthStatus {
        self.components
            .read()
            .await
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(HealthStatus::Healthy)
    }
}

/// Liveness check: `GET /healthz`
pub async fn health_check() -> Response {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// Readiness check: `GET /readyz`
///
/// Returns 503 while any component is unhealthy.
pub async fn ready_check(State(state): State<Arc<HealthState>>) -> Response {
    let checks = state.components.read().await.clone();
    let status = checks
        .values()
        .map(|c| c.status)
        .max()
        .unwrap_or(HealthStatus::Healthy);

    let response = ReadyResponse {
        status,
        checks,
        timestamp: Utc::now(),
    };

    (status.to_status_code(), Json(response)).into_response()
}

/// Build information: `GET /build`
pub async fn build_info() -> Response {
    (StatusCode::OK, Json(&BUILD_INFO)).into_response()
}

/// Probe the event store once
pub async fn check_database_health<R>(repo: &R) -> ComponentHealth
where
    R: Repository + ?Sized,
{
    let start = Instant::now();
    let result = repo.health_check().await;
    let elapsed = start.elapsed();
    let latency_ms = elapsed.as_millis() as u64;

    let mut health = match result {
        Ok(()) if elapsed > SLOW_PROBE => {
            tracing::warn!(latency_ms, "Database health check slow");
            ComponentHealth::new(
                HealthStatus::Degraded,
                Some(format!("Health check took {}ms", latency_ms)),
            )
        },
        Ok(()) => ComponentHealth::new(HealthStatus::Healthy, None),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            ComponentHealth::new(HealthStatus::Unhealthy, Some(e.to_string()))
        },
    };
    health.latency_ms = Some(latency_ms);
    health
}

/// Periodically probe storage and record the result
///
/// The first probe runs immediately so readiness reflects storage from
/// startup.
pub async fn health_monitor<R>(state: Arc<HealthState>, repo: Arc<R>, every: Duration)
where
    R: Repository + ?Sized,
{
    let mut interval = tokio::time::interval(every);

    loop {
        interval.tick().await;

        let health = check_database_health(repo.as_ref()).await;
        tracing::debug!(status = ?health.status, "Database probe finished");
        state.record(DATABASE_COMPONENT, health).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::InMemoryEventRepository;

    #[test]
    fn test_status_ordering_and_codes() {
        assert!(HealthStatus::Healthy < HealthStatus::Degraded);
        assert!(HealthStatus::Degraded < HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::Degraded.to_status_code(), StatusCode::OK);
        assert_eq!(
            HealthStatus::Unhealthy.to_status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn test_health_state() {
        let state = HealthState::new();
        assert_eq!(state.get_status().await, HealthStatus::Healthy);

        state.update_component("cache", HealthStatus::Degraded, None).await;
        assert_eq!(state.get_status().await, HealthStatus::Degraded);

        state
            .update_component(
                DATABASE_COMPONENT,
                HealthStatus::Unhealthy,
                Some("Connection failed".to_string()),
            )
            .await;
        assert_eq!(state.get_status().await, HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_check_database_health() {
        let repo = InMemoryEventRepository::new();
        let health = check_database_health(&repo).await;
        assert_eq!(health.status, HealthStatus::Healthy);
        assert!(health.latency_ms.is_some());

        repo.fail_next_operation("connection refused");
        let health = check_database_health(&repo).await;
        assert_eq!(health.status, HealthStatus::Unhealthy);
        assert!(health.message.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_ready_check_reports_unhealthy_database() {
        let state = Arc::new(HealthState::new());
        state
            .update_component(DATABASE_COMPONENT, HealthStatus::Unhealthy, None)
            .await;

        let response = ready_check(State(state)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_monitor_first_probe() {
        let state = Arc::new(HealthState::new());
        let repo = Arc::new(InMemoryEventRepository::new());
        repo.fail_next_operation("down");

        let monitor = tokio::spawn(health_monitor(state.clone(), repo, Duration::from_secs(3600)));
        for _ in 0..50 {
            if state.components.read().await.contains_key(DATABASE_COMPONENT) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        monitor.abort();

        assert_eq!(state.get_status().await, HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_health_and_build_endpoints() {
        assert_eq!(health_check().await.status(), StatusCode::OK);
        assert_eq!(build_info().await.status(), StatusCode::OK);
    }
}
