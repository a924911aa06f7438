//! Turns one classified alert email into a listing record

use crate::extract::{
    extract_image_url, extract_listing_url, parse_baths, parse_beds, parse_locality, parse_price,
    parse_sqft, resolve_address,
};
use crate::provider::Provider;
use crate::types::{AlertEmail, Listing};
use chrono::{DateTime, SecondsFormat, Utc};

/// Build a listing from an alert email already attributed to `source`.
///
/// `now` stamps `dateAdded` and stands in for an unparseable `Date` header.
/// A message without `Message-ID` gets `<now>-<uid>` as its id suffix, so it
/// never collides with another message of the batch and is never matched
/// again on a later run.
#[must_use]
pub fn build_listing(email: &AlertEmail, source: Provider, now: DateTime<Utc>) -> Listing {
    let id = email.message_id.as_ref().map_or_else(
        || {
            let stamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
            Listing::make_id(source, &format!("{stamp}-{}", email.uid))
        },
        |message_id| Listing::make_id(source, message_id.as_str()),
    );

    let address = resolve_address(&email.subject, &email.text);
    let locality = parse_locality(&email.text, &address);
    let full_text = format!("{} {}", email.subject, email.text);

    Listing {
        id,
        source,
        city: locality.city,
        state: locality.state,
        zip: locality.zip,
        price: parse_price(&full_text),
        beds: parse_beds(&full_text),
        baths: parse_baths(&full_text),
        sqft: parse_sqft(&email.text),
        date_added: now,
        email_date: Some(email.date.unwrap_or(now)),
        viewed: false,
        url: extract_listing_url(&email.text, email.html.as_deref(), source),
        image_url: email
            .html
            .as_deref()
            .and_then(|html| extract_image_url(html, source)),
        address,
        extra: serde_json::Map::new(),
    }
}
