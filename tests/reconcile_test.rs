use chrono::{TimeZone, Utc};
use listing_alerts::*;

fn listing(id: &str, address: &str) -> Listing {
    Listing {
        id: id.to_string(),
        source: Provider::Redfin,
        address: address.to_string(),
        city: None,
        state: DEFAULT_STATE.to_string(),
        zip: None,
        price: None,
        beds: None,
        baths: None,
        sqft: None,
        date_added: Utc.with_ymd_and_hms(2025, 2, 19, 0, 0, 0).unwrap(),
        email_date: None,
        viewed: false,
        url: "https://www.redfin.com".to_string(),
        image_url: None,
        extra: serde_json::Map::new(),
    }
}

#[test]
fn test_merge_fills_blanks() {
    let existing = listing("a", "616 Tennis Ave");
    let mut incoming = listing("a", "616 Tennis Ave");
    incoming.image_url = Some("https://ssl.cdn-redfin.com/photo/1/a.jpg".into());
    incoming.city = Some("Glenside".into());
    incoming.sqft = Some(1586);
    incoming.email_date = Some(Utc.with_ymd_and_hms(2025, 2, 19, 17, 15, 0).unwrap());

    let outcome = merge(&existing, &incoming);

    assert_eq!(outcome.changed, vec!["imageUrl", "city", "sqft", "emailDate"]);
    assert_eq!(outcome.listing.city.as_deref(), Some("Glenside"));
    assert_eq!(outcome.listing.sqft, Some(1586));
    assert!(outcome.listing.image_url.is_some());
    assert!(outcome.listing.email_date.is_some());
}

#[test]
fn test_merge_never_overwrites_present_values() {
    let mut existing = listing("a", "616 Tennis Ave");
    existing.price = Some(425_000);
    existing.beds = Some(3);
    existing.baths = Some(2.5);
    existing.city = Some("Glenside".into());
    existing.sqft = Some(1586);

    let mut incoming = listing("a", "616 Tennis Ave");
    incoming.price = Some(399_000);
    incoming.beds = Some(4);
    incoming.baths = Some(1.0);
    incoming.city = Some("Ambler".into());
    incoming.sqft = Some(2000);

    let outcome = merge(&existing, &incoming);

    assert!(outcome.is_unchanged());
    assert_eq!(outcome.listing, existing);
}

#[test]
fn test_merge_never_clears_values() {
    let mut existing = listing("a", "616 Tennis Ave");
    existing.image_url = Some("https://x/photo.jpg".into());
    let incoming = listing("a", "616 Tennis Ave");

    let outcome = merge(&existing, &incoming);
    assert_eq!(outcome.listing.image_url, existing.image_url);
}

#[test]
fn test_merge_price_not_backfilled() {
    let existing = listing("a", "616 Tennis Ave");
    let mut incoming = listing("a", "616 Tennis Ave");
    incoming.price = Some(425_000);

    assert_eq!(merge(&existing, &incoming).listing.price, None);
}

#[test]
fn test_merge_address_rule() {
    let long = "616 Tennis Ave, Glenside, PA";
    let short = "616 Tennis Ave";

    let shorter = merge(&listing("a", long), &listing("a", short));
    assert_eq!(shorter.listing.address, short);
    assert_eq!(shorter.changed, vec!["address"]);

    let longer = merge(&listing("a", short), &listing("a", long));
    assert_eq!(longer.listing.address, short);

    let same_len = merge(&listing("a", "12 Oak Ln"), &listing("a", "14 Elm St"));
    assert_eq!(same_len.listing.address, "12 Oak Ln");
}

#[test]
fn test_merge_ignores_empty_address() {
    let outcome = merge(&listing("a", "616 Tennis Ave"), &listing("a", ""));

    assert_eq!(outcome.listing.address, "616 Tennis Ave");
    assert!(outcome.is_unchanged());
}

#[test]
fn test_reconciler_insert_and_reject() {
    let mut reconciler = Reconciler::new(Vec::new());

    assert_eq!(reconciler.offer(listing("a", "")), Reconciliation::Rejected);
    assert_eq!(reconciler.offer(listing("b", "12 Ok")), Reconciliation::Rejected);
    assert_eq!(reconciler.offer(listing("c", "12 Oak Ln")), Reconciliation::Inserted);
    assert_eq!(reconciler.inserted(), 1);

    let all = reconciler.finish(RETENTION_CAP);
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, "c");
}

#[test]
fn test_reconciler_idempotent() {
    let mut reconciler = Reconciler::new(vec![listing("a", "616 Tennis Ave")]);

    assert_eq!(reconciler.offer(listing("a", "616 Tennis Ave")), Reconciliation::Duplicate);
    assert_eq!(reconciler.offer(listing("a", "616 Tennis Ave")), Reconciliation::Duplicate);

    let all = reconciler.finish(RETENTION_CAP);
    assert_eq!(all.len(), 1);
}

#[test]
fn test_reconciler_merges_existing() {
    let mut reconciler = Reconciler::new(vec![listing("a", "616 Tennis Ave, Glenside")]);
    let mut incoming = listing("a", "616 Tennis Ave");
    incoming.city = Some("Glenside".into());

    assert_eq!(
        reconciler.offer(incoming),
        Reconciliation::Merged(vec!["address", "city"])
    );
    assert_eq!(reconciler.inserted(), 0);

    let all = reconciler.finish(RETENTION_CAP);
    assert_eq!(all[0].address, "616 Tennis Ave");
    assert_eq!(all[0].city.as_deref(), Some("Glenside"));
}

#[test]
fn test_reconciler_order_and_retention() {
    let existing: Vec<Listing> = (0..5)
        .map(|i| listing(&format!("old{i}"), &format!("{i} Old Mill Rd")))
        .collect();
    let mut reconciler = Reconciler::new(existing);

    reconciler.offer(listing("new1", "1 New Farm Rd"));
    reconciler.offer(listing("new2", "2 New Farm Rd"));

    let all = reconciler.finish(4);
    let ids: Vec<&str> = all.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["new1", "new2", "old0", "old1"]);
}

#[test]
fn test_apply_retention() {
    let mut listings: Vec<Listing> = (0..120)
        .map(|i| listing(&i.to_string(), "12 Oak Ln"))
        .collect();

    apply_retention(&mut listings, RETENTION_CAP);
    assert_eq!(listings.len(), 100);
    assert_eq!(listings[99].id, "99");

    apply_retention(&mut listings, 200);
    assert_eq!(listings.len(), 100);
}
