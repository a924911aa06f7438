//! One scan: mailbox -> classify -> build -> reconcile -> store

use crate::builder::build_listing;
use crate::config::Config;
use crate::error::Result;
use crate::mailbox::{Mailbox, RawMessage};
use crate::parser::parse_alert;
use crate::provider::classify;
use crate::reconcile::{Reconciler, Reconciliation};
use crate::store::{load_store, save_store};
use crate::types::ListingStore;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// Counters for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Messages fetched from the mailbox
    pub scanned: usize,
    /// Messages attributed to a provider
    pub classified: usize,
    /// Messages that could not be decoded
    pub skipped: usize,
    /// Listings added to the store
    pub inserted: usize,
    /// Stored listings that gained data
    pub merged: usize,
    /// Store size after the run
    pub total: usize,
}

/// Apply a batch of raw messages to the stored listings.
///
/// Pure with respect to I/O: the caller loads and saves the store.
pub fn process_messages(
    store: ListingStore,
    messages: &[RawMessage],
    retention: usize,
    now: DateTime<Utc>,
) -> (ListingStore, RunReport) {
    let mut report = RunReport {
        scanned: messages.len(),
        ..RunReport::default()
    };
    let mut reconciler = Reconciler::new(store.listings);

    for message in messages {
        let email = match parse_alert(message.uid, &message.bytes) {
            Ok(email) => email,
            Err(e) => {
                warn!("Skipping message #{}: {e}", message.uid);
                report.skipped += 1;
                continue;
            }
        };

        let Some(source) = classify(&email.from, &email.subject) else {
            info!("Not a listing alert: {}", email.subject);
            continue;
        };
        report.classified += 1;
        info!("Found {source} listing: {}", truncate(&email.subject, 60));

        match reconciler.offer(build_listing(&email, source, now)) {
            Reconciliation::Merged(_) => report.merged += 1,
            Reconciliation::Inserted | Reconciliation::Duplicate | Reconciliation::Rejected => {}
        }
    }

    report.inserted = reconciler.inserted();
    let listings = reconciler.finish(retention);
    report.total = listings.len();

    (
        ListingStore {
            listings,
            last_scanned: Some(now),
        },
        report,
    )
}

fn truncate(s: &str, max: usize) -> &str {
    s.char_indices().nth(max).map_or(s, |(i, _)| &s[..i])
}

/// Run one scan. The store is read once up front and written once at the
/// end; any error before that write leaves the file untouched.
pub fn run(config: &Config, mailbox: &mut impl Mailbox) -> Result<RunReport> {
    let now = Utc::now();
    info!("Starting email scan at {now}");

    let store = load_store(&config.store_path)?;
    let messages = mailbox.fetch_since(now - config.lookback())?;
    info!("Found {} emails to check", messages.len());

    let (store, report) = process_messages(store, &messages, config.retention, now);
    save_store(&config.store_path, &store)?;

    info!(
        "Scan complete. Found {} new listings. Total listings: {}",
        report.inserted, report.total
    );
    Ok(report)
}

/// Like [`run`], but a failed run is logged and counts as zero new listings
pub fn run_or_zero(config: &Config, mailbox: &mut impl Mailbox) -> usize {
    match run(config, mailbox) {
        Ok(report) => report.inserted,
        Err(e) => {
            error!("Scan aborted: {e}");
            0
        }
    }
}
