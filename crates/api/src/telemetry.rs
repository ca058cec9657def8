//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LogFormat;

/// Installs the global tracing subscriber.
///
/// `level` is the filter directive resolved by [`Config`](crate::config::Config),
/// which already reads `RUST_LOG`.
pub fn init_tracing(level: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(filter(level));

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn filter(level: &str) -> EnvFilter {
    EnvFilter::new(level)
}
