//! Environment-driven configuration

use crate::error::{Result, ScrapeError};
use crate::types::RETENTION_CAP;
use chrono::Duration;
use std::env;
use std::path::PathBuf;

const DEFAULT_STORE_PATH: &str = "public/data/listings.json";
const DEFAULT_MAILBOX_DIR: &str = "mail/inbox";
const DEFAULT_LOOKBACK_DAYS: u32 = 7;

/// Top-level configuration for a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON store read at start and overwritten at the end
    pub store_path: PathBuf,

    /// Directory of `.eml` files to scan
    pub mailbox_dir: PathBuf,

    /// How far back to look for alert emails
    pub lookback_days: u32,

    /// Maximum number of listings kept
    pub retention: usize,

    /// Tracing filter used when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            mailbox_dir: PathBuf::from(DEFAULT_MAILBOX_DIR),
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            retention: RETENTION_CAP,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Read `LISTINGS_*` variables from the environment and an optional `.env`
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            store_path: lookup("LISTINGS_STORE_PATH").map_or(defaults.store_path, PathBuf::from),
            mailbox_dir: lookup("LISTINGS_MAILBOX_DIR").map_or(defaults.mailbox_dir, PathBuf::from),
            lookback_days: parse_positive(&lookup, "LISTINGS_LOOKBACK_DAYS")?
                .unwrap_or(defaults.lookback_days),
            retention: parse_positive(&lookup, "LISTINGS_RETENTION")?.unwrap_or(defaults.retention),
            log_level: lookup("LISTINGS_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    #[must_use]
    pub fn lookback(&self) -> Duration {
        Duration::days(i64::from(self.lookback_days))
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(Some(value)),
        _ => Err(ScrapeError::Config {
            key: key.to_string(),
            details: format!("expected a positive integer, got {raw:?}"),
        }),
    }
}
