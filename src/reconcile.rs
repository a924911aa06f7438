//! Insert / merge / drop decisions against the persisted listings

use crate::types::Listing;
use std::collections::HashMap;
use tracing::{debug, info};

/// Result of merging a re-encountered listing into its stored record
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub listing: Listing,

    /// Names of the fields that changed, in store (camelCase) spelling
    pub changed: Vec<&'static str>,
}

impl MergeOutcome {
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.changed.is_empty()
    }
}

fn fill_blank<T: Clone>(
    target: &mut Option<T>,
    candidate: Option<&T>,
    field: &'static str,
    changed: &mut Vec<&'static str>,
) {
    if target.is_none()
        && let Some(value) = candidate
    {
        *target = Some(value.clone());
        changed.push(field);
    }
}

/// Merge `incoming` into `existing` without losing information.
///
/// Blank `imageUrl`, `city`, `sqft` and `emailDate` are filled from the new
/// copy. The address is replaced only by a strictly shorter, non-empty one,
/// since failed boilerplate stripping leaves addresses too long. Price, beds
/// and baths keep their first-seen values.
#[must_use]
pub fn merge(existing: &Listing, incoming: &Listing) -> MergeOutcome {
    let mut listing = existing.clone();
    let mut changed = Vec::new();

    fill_blank(
        &mut listing.image_url,
        incoming.image_url.as_ref(),
        "imageUrl",
        &mut changed,
    );

    let new_len = incoming.address.chars().count();
    if new_len > 0 && new_len < existing.address.chars().count() {
        listing.address.clone_from(&incoming.address);
        changed.push("address");
    }

    fill_blank(&mut listing.city, incoming.city.as_ref(), "city", &mut changed);
    fill_blank(&mut listing.sqft, incoming.sqft.as_ref(), "sqft", &mut changed);
    fill_blank(
        &mut listing.email_date,
        incoming.email_date.as_ref(),
        "emailDate",
        &mut changed,
    );

    MergeOutcome { listing, changed }
}

/// What happened to one offered listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// New id with a plausible address; will be prepended to the store
    Inserted,
    /// Known id; the listed fields were filled in
    Merged(Vec<&'static str>),
    /// Known id and nothing new to add
    Duplicate,
    /// New id but the address is empty or too short
    Rejected,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Fresh(usize),
    Existing(usize),
}

/// Applies a batch of freshly built listings to the stored ones
#[derive(Debug, Default)]
pub struct Reconciler {
    fresh: Vec<Listing>,
    existing: Vec<Listing>,
    index: HashMap<String, Slot>,
}

impl Reconciler {
    /// Start from the stored listings, most recent first
    #[must_use]
    pub fn new(existing: Vec<Listing>) -> Self {
        let mut index = HashMap::with_capacity(existing.len());
        for (i, listing) in existing.iter().enumerate() {
            index.entry(listing.id.clone()).or_insert(Slot::Existing(i));
        }

        Self {
            fresh: Vec::new(),
            existing,
            index,
        }
    }

    /// Insert, merge or drop one listing
    pub fn offer(&mut self, incoming: Listing) -> Reconciliation {
        let Some(slot) = self.index.get(&incoming.id).copied() else {
            if !incoming.has_plausible_address() {
                debug!("Rejected {}: address {:?} too short", incoming.id, incoming.address);
                return Reconciliation::Rejected;
            }

            info!(
                "New listing: {} in {} - ${}",
                incoming.address,
                incoming.city.as_deref().unwrap_or("?"),
                incoming
                    .price
                    .map_or_else(|| "?".to_string(), |p| p.to_string())
            );
            self.index
                .insert(incoming.id.clone(), Slot::Fresh(self.fresh.len()));
            self.fresh.push(incoming);
            return Reconciliation::Inserted;
        };

        let target = match slot {
            Slot::Fresh(i) => &mut self.fresh[i],
            Slot::Existing(i) => &mut self.existing[i],
        };

        let outcome = merge(target, &incoming);
        if outcome.is_unchanged() {
            return Reconciliation::Duplicate;
        }

        info!(
            "Updated {} for: {}",
            outcome.changed.join(", "),
            outcome.listing.address
        );
        *target = outcome.listing;
        Reconciliation::Merged(outcome.changed)
    }

    /// Number of listings inserted so far
    #[must_use]
    pub const fn inserted(&self) -> usize {
        self.fresh.len()
    }

    /// New listings (in offer order) ahead of the stored ones, capped
    #[must_use]
    pub fn finish(self, cap: usize) -> Vec<Listing> {
        let mut all = self.fresh;
        all.extend(self.existing);
        apply_retention(&mut all, cap);
        all
    }
}

/// Keep the first `cap` listings, dropping the oldest by insertion order
pub fn apply_retention(listings: &mut Vec<Listing>, cap: usize) {
    if listings.len() > cap {
        debug!("Evicting {} listings beyond cap {cap}", listings.len() - cap);
        listings.truncate(cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::Provider;
    use chrono::Utc;

    fn listing(id: &str, address: &str) -> Listing {
        Listing {
            id: id.to_string(),
            source: Provider::Zillow,
            address: address.to_string(),
            city: None,
            state: "PA".to_string(),
            zip: None,
            price: None,
            beds: None,
            baths: None,
            sqft: None,
            date_added: Utc::now(),
            email_date: None,
            viewed: false,
            url: "https://www.zillow.com".to_string(),
            image_url: None,
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn existing_duplicate_ids_resolve_to_first() {
        let reconciler = Reconciler::new(vec![
            listing("a", "1 First St"),
            listing("a", "2 Second St"),
        ]);
        assert!(matches!(reconciler.index.get("a"), Some(Slot::Existing(0))));
    }

    #[test]
    fn same_batch_duplicate_merges_into_fresh_record() {
        let mut reconciler = Reconciler::new(Vec::new());
        assert_eq!(
            reconciler.offer(listing("x", "12 Oak Ln, Ambler, PA")),
            Reconciliation::Inserted
        );
        assert_eq!(
            reconciler.offer(listing("x", "12 Oak Ln")),
            Reconciliation::Merged(vec!["address"])
        );
        assert_eq!(reconciler.inserted(), 1);
        assert_eq!(reconciler.finish(10)[0].address, "12 Oak Ln");
    }
}
