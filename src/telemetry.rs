//! Log output setup for the binary

use crate::error::{Result, ScrapeError};
use tracing_subscriber::EnvFilter;

/// Install a compact fmt subscriber. `RUST_LOG` wins over `level`.
pub fn init(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).map_err(|e| ScrapeError::Config {
            key: "LISTINGS_LOG_LEVEL".to_string(),
            details: e.to_string(),
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| ScrapeError::Config {
            key: "RUST_LOG".to_string(),
            details: e.to_string(),
        })
}
