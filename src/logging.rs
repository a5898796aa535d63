//! Logging setup
//!
//! Structured logging via tracing: JSON lines in production, pretty output
//! everywhere else.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

use crate::error::{Error, Result};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn for_environment(environment: &str) -> Self {
        if environment.eq_ignore_ascii_case("production") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over `log_level`. Fails if a subscriber is
/// already installed.
pub fn init_tracing(log_level: &str, environment: &str) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));
    let format = LogFormat::for_environment(environment);

    let json_layer = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
    });
    let pretty_layer = (format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
    });

    Registry::default()
        .with(env_filter)
        .with(json_layer)
        .with(pretty_layer)
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to initialize tracing: {}", e)))?;

    tracing::info!(environment, log_level, ?format, "Logging initialized");
    Ok(())
}

/// Filter directives used when RUST_LOG is unset
pub fn default_directives(log_level: &str) -> String {
    format!("evently={},tower_http=debug", log_level)
}

/// Span around a storage operation on the events table
///
/// `attempts` is filled in by the retrying read path.
#[macro_export]
macro_rules! db_span {
    ($operation:expr) => {
        tracing::info_span!(
            "db",
            operation = $operation,
            table = "events",
            attempts = tracing::field::Empty,
        )
    };
}

/// Log an error with its Debug form and optional display fields
#[macro_export]
macro_rules! log_error {
    ($error:expr, $msg:expr) => {
        tracing::error!(error = %$error, details = ?$error, $msg)
    };
    ($error:expr, $msg:expr, $($key:ident = $value:expr),* $(,)?) => {
        tracing::error!(
            error = %$error,
            details = ?$error,
            $($key = tracing::field::display(&$value),)*
            $msg
        )
    };
}

/// Wall-clock timer for a named operation, logged at debug on stop
pub struct Timer {
    operation: &'static str,
    started: std::time::Instant,
}

impl Timer {
    pub fn start(operation: &'static str) -> Self {
        Timer {
            operation,
            started: std::time::Instant::now(),
        }
    }

    pub fn stop(self) -> std::time::Duration {
        let elapsed = self.started.elapsed();
        tracing::debug!(
            operation = self.operation,
            elapsed_ms = elapsed.as_millis() as u64,
            "Storage operation finished"
        );
        elapsed
    }
}
