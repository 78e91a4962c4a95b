//! Subscriber setup for the binary.

use std::io;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::app::config::{LOG_ENV, LogConfig, LogFormat};

/// Install the global subscriber, writing to stderr.
///
/// `CONFWIZ_LOG` overrides `[log] level`. A second call is a no-op.
pub fn init(config: &LogConfig) {
    let filter = filter(config);
    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr).with_target(false))
            .try_init(),
        LogFormat::Json => {
            registry.with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr)).try_init()
        }
    };
    if let Err(err) = result {
        tracing::debug!("subscriber already installed: {err}");
    }
}

fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level))
}
