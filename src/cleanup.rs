//! Offline sanity pass over stored listings

use crate::extract::find_street_address;
use crate::types::Listing;
use tracing::info;

/// Listings priced below this are treated as extraction failures
pub const MIN_PRICE: u64 = 10_000;

/// Subject boilerplate that means address stripping went wrong
const BAD_PHRASES: &[&str] = &[
    "wants you to see",
    "new listing",
    "check out",
    "for sale:",
    "no image",
];

/// Counts from one cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub kept: usize,
    pub cleaned: usize,
    pub removed: usize,
}

/// Drop listings without a usable address or price and repair addresses
/// that still carry subject boilerplate.
pub fn clean_listings(listings: Vec<Listing>) -> (Vec<Listing>, CleanupReport) {
    let mut report = CleanupReport::default();
    let mut kept = Vec::with_capacity(listings.len());

    for mut listing in listings {
        let address = listing.address.trim();
        if address.chars().count() < 5 {
            info!("Removing (no address): {address}");
            report.removed += 1;
            continue;
        }

        let lower = address.to_lowercase();
        if BAD_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            if let Some(street) = find_street_address(address) {
                info!("Cleaned: {address} -> {street}");
                listing.address = street;
                report.cleaned += 1;
            } else {
                info!("Removing (bad address): {address}");
                report.removed += 1;
                continue;
            }
        }

        if listing.price.is_none_or(|price| price < MIN_PRICE) {
            info!("Removing (no price): {}", listing.address);
            report.removed += 1;
            continue;
        }

        kept.push(listing);
    }

    report.kept = kept.len();
    (kept, report)
}
