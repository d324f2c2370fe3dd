//! Logging setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the global subscriber from the app's logging section.
///
/// `RUST_LOG` takes precedence over the configured level. Span events are
/// not emitted; request handling is logged through plain events.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_target(true))
            .init(),
    }

    tracing::info!(level = %config.level, format = ?config.format, "logging initialized");
}
