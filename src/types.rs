//! Core types for alert emails and the listing store

use crate::provider::Provider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Addresses must be longer than this many characters to be accepted
pub const MIN_ADDRESS_LEN: usize = 5;

/// Maximum number of listings kept in the store
pub const RETENTION_CAP: usize = 100;

/// Region code used when no state can be extracted
pub const DEFAULT_STATE: &str = "PA";

/// One decoded alert email, reduced to what the listing builder needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertEmail {
    /// Position of the message in the mailbox listing
    pub uid: u32,

    /// `Message-ID` header, verbatim (angle brackets included)
    pub message_id: Option<MessageId>,

    /// Raw `From` header value
    pub from: String,

    /// Decoded subject line
    pub subject: String,

    /// `Date` header, if it parsed
    pub date: Option<DateTime<Utc>>,

    /// Plain-text view with whitespace collapsed
    pub text: String,

    /// Raw HTML part, kept for image extraction
    pub html: Option<String>,
}

/// Message ID wrapper type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A property record derived from one alert email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// `<source>_<message id>`; unique within the store
    pub id: String,

    pub source: Provider,

    /// Best-effort street address
    #[serde(default)]
    pub address: String,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default = "default_state")]
    pub state: String,

    #[serde(default)]
    pub zip: Option<String>,

    #[serde(default)]
    pub price: Option<u64>,

    #[serde(default)]
    pub beds: Option<u32>,

    #[serde(default)]
    pub baths: Option<f64>,

    #[serde(default)]
    pub sqft: Option<u32>,

    /// When the pipeline first created this record
    #[serde(with = "timestamp")]
    pub date_added: DateTime<Utc>,

    /// When the source email was sent
    #[serde(default, with = "timestamp::option")]
    pub email_date: Option<DateTime<Utc>>,

    /// Owned by the consumer of the store
    #[serde(default)]
    pub viewed: bool,

    pub url: String,

    #[serde(default)]
    pub image_url: Option<String>,

    /// Keys written by other tools, preserved as-is
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Listing {
    /// Build the store key for a message from `source`
    #[must_use]
    pub fn make_id(source: Provider, message_id: &str) -> String {
        format!("{source}_{message_id}")
    }

    /// Whether the address is long enough to be a real street address
    #[must_use]
    pub fn has_plausible_address(&self) -> bool {
        self.address.trim().chars().count() > MIN_ADDRESS_LEN
    }
}

fn default_state() -> String {
    DEFAULT_STATE.to_string()
}

/// The persisted document: listings, most recent first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingStore {
    #[serde(default)]
    pub listings: Vec<Listing>,

    #[serde(default, with = "timestamp::option")]
    pub last_scanned: Option<DateTime<Utc>>,
}

impl ListingStore {
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

/// Timestamps are written as RFC 3339. Older documents carry naive
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]` values, which are read as UTC.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Parse either an RFC 3339 or a naive ISO 8601 timestamp
    #[must_use]
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        #[allow(clippy::ref_option)]
        pub fn serialize<S: Serializer>(
            dt: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_some(&dt.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            // Unparseable values read as absent
            let raw = Option::<String>::deserialize(d)?;
            Ok(raw.as_deref().and_then(super::parse))
        }
    }
}
