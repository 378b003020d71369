//! Structured logging setup for promptgate services

use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Output format for the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,
    /// Human-readable lines
    Console,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT`-style value, falling back to console output
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Console,
        }
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize structured JSON logging
///
/// `RUST_LOG` takes precedence over `default_level`.
pub fn init_logging(service_name: &str, default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    tracing::info!(service = service_name, "Logging initialized");
}

/// Initialize human-readable console logging (for development)
///
/// Logs go to stderr so stdout stays free for command output.
pub fn init_console_logging(service_name: &str, default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_level))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!(service = service_name, "Console logging initialized");
}

/// Initialize logging in the requested format
pub fn init_with_format(format: LogFormat, service_name: &str, default_level: &str) {
    match format {
        LogFormat::Json => init_logging(service_name, default_level),
        LogFormat::Console => init_console_logging(service_name, default_level),
    }
}
