use super::config::ConfigError;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the global tracing subscriber.
/// Uses JSON format when `RUST_LOG_FORMAT=json`; `RUST_LOG` overrides `default_level`.
pub fn init_tracing(default_level: Level) -> Result<(), ConfigError> {
    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env()
        .map_err(|e| ConfigError::EnvError(format!("Invalid RUST_LOG: {e}")))?;

    let result = if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_names(true)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| {
        ConfigError::SubscriberInit(format!("Failed to set global tracing subscriber: {e}"))
    })
}
