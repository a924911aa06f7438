// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

//! Listing Alerts
//!
//! Turns real-estate alert emails (Zillow, Redfin, Realtor.com, Trulia,
//! Homes.com) into structured listing records and keeps a deduplicated,
//! size-capped JSON store of the most recent ones.
//!
//! # Pipeline
//!
//! - [`classify`] attributes a message to a provider from its sender, then
//!   its subject
//! - [`build_listing`] runs the field extractors over the decoded message
//! - [`Reconciler`] inserts new listings, merges re-seen ones with [`merge`]
//!   and applies the retention cap
//! - [`pipeline::run`] ties a [`Mailbox`] and the store file together
//!
//! # Example
//!
//! ```rust
//! use listing_alerts::{build_listing, classify, parse_alert};
//!
//! let raw = b"From: Redfin <listings@redfin.com>\r\n\
//!             Subject: Roci wants you to see the home at 616 Tennis Ave, Glenside, PA\r\n\
//!             Message-ID: <abc@redfin.com>\r\n\
//!             \r\n\
//!             $425,000 3 bd 2.5 ba 1,850 sqft";
//! let email = parse_alert(1, raw).unwrap();
//! let source = classify(&email.from, &email.subject).unwrap();
//! let listing = build_listing(&email, source, chrono::Utc::now());
//!
//! assert_eq!(listing.address, "616 Tennis Ave");
//! assert_eq!(listing.price, Some(425_000));
//! ```

mod builder;
mod cleanup;
pub mod config;
mod error;
mod extract;
pub mod mailbox;
mod parser;
pub mod pipeline;
mod provider;
mod reconcile;
pub mod store;
pub mod telemetry;
mod types;

pub use builder::build_listing;
pub use cleanup::{CleanupReport, MIN_PRICE, clean_listings};
pub use config::Config;
pub use error::{Result, ScrapeError};
pub use extract::*;
pub use mailbox::{DirectoryMailbox, Mailbox, RawMessage};
pub use parser::parse_alert;
pub use provider::{Provider, ProviderProfile, classify};
pub use reconcile::{MergeOutcome, Reconciler, Reconciliation, apply_retention, merge};
pub use store::{load_store, save_store};
pub use types::*;
