//! Logging for Lingua
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a pretty
//! or JSON `fmt` layer.

use lingua_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Initialize logging from configuration
///
/// `RUST_LOG` wins over the configured filter, which wins over
/// `default_filter`. An unparseable filter falls back to `info`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&LoggingConfig>, default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let filter = build_filter(config, default_filter);
    let format = config.map(|c| c.format).unwrap_or_default();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(fmt_layer).try_init(),
        LogFormat::Json => registry.with(fmt_layer.json()).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))
}

/// Resolve the effective filter directives
fn build_filter(config: Option<&LoggingConfig>, default_filter: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let directives = config
        .and_then(|c| c.filter.as_deref())
        .filter(|f| !f.trim().is_empty())
        .unwrap_or(default_filter);

    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_beats_default() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                filter: Some("lingua_llm=trace".to_owned()),
                format: LogFormat::Json,
            };
            let filter = build_filter(Some(&config), "warn");
            assert_eq!(filter.to_string(), "lingua_llm=trace");
        });
    }

    #[test]
    fn rust_log_beats_configuration() {
        temp_env::with_var("RUST_LOG", Some("debug"), || {
            let config = LoggingConfig {
                filter: Some("lingua_llm=trace".to_owned()),
                format: LogFormat::Pretty,
            };
            assert_eq!(build_filter(Some(&config), "warn").to_string(), "debug");
        });
    }

    #[test]
    fn blank_filter_uses_default() {
        temp_env::with_var_unset("RUST_LOG", || {
            let config = LoggingConfig {
                filter: Some("  ".to_owned()),
                format: LogFormat::Pretty,
            };
            assert_eq!(build_filter(Some(&config), "warn").to_string(), "warn");
        });
    }
}
