//! Logging initialization.
//!
//! Logs go to stderr so stdout carries only the rendered report.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
};

use crate::config::{LogFormat, LoggingConfig};

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured level; otherwise each `-v` raises it
/// one step (`debug`, then `trace`).
pub fn init_logging(config: &LoggingConfig, verbosity: u8) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(effective_level(&config.level, verbosity)));

    let subscriber = tracing_subscriber::registry().with(env_filter);
    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    match config.format {
        LogFormat::Json => subscriber
            .with(
                layer
                    .json()
                    .with_span_events(FmtSpan::CLOSE)
                    .with_current_span(true),
            )
            .try_init(),
        LogFormat::Compact => subscriber.with(layer.compact()).try_init(),
        LogFormat::Pretty => subscriber
            .with(layer.pretty().with_span_events(FmtSpan::CLOSE))
            .try_init(),
    }
}

fn effective_level(configured: &str, verbosity: u8) -> String {
    match verbosity {
        0 => configured.to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}
