//! Tracing subscriber setup for embedders.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::config::Config;

fn filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Panics if a
/// global subscriber is already set; use [`try_init`] where that can
/// happen.
pub fn init(config: &Config) {
    tracing_subscriber::registry()
        .with(filter(config))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Like [`init`], but reports an already-set subscriber as an error.
pub fn try_init(config: &Config) -> Result<(), TryInitError> {
    tracing_subscriber::registry()
        .with(filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
