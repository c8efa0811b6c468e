//! Tracing subscriber setup

use tracing_subscriber::{fmt, EnvFilter};

use tg_shared::{LogFormat, LoggingConfig};

/// Filter from `RUST_LOG` when set, otherwise the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},sqlx=warn", config.level)))
}

/// Install the global subscriber
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let builder = fmt()
        .with_env_filter(env_filter(config))
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let installed = match config.format {
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {}", e))
}
