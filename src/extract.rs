//! Field extraction from alert email content
//!
//! Every extractor is best-effort: a field that cannot be found is `None`,
//! never an error. Patterns are tried in order and the first match wins.

use crate::provider::Provider;
use crate::types::DEFAULT_STATE;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// City, state and zip pulled from an email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub city: Option<String>,
    pub state: String,
    pub zip: Option<String>,
}

/// Known towns in the service area, matched as `<city>, PA`
pub const GAZETTEER: &[&str] = &[
    "Conshohocken",
    "Oreland",
    "Plymouth Meeting",
    "Norristown",
    "Glenside",
    "Ambler",
    "Blue Bell",
    "Horsham",
    "Hatboro",
    "Warrington",
    "North Wales",
    "Fort Washington",
    "Flourtown",
    "Lafayette Hill",
    "Narberth",
    "Ardmore",
    "Bryn Mawr",
];

// Regex patterns
static PRICE_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\$\s?(\d{1,3}(?:,\d{3})+|\d+)").unwrap());

static BEDS_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(?:bd|bed|bedroom)").unwrap()
});

static BATHS_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.5)?)\s*(?:ba|bath|bathroom)").unwrap()
});

static SQFT_REGEXES: std::sync::LazyLock<Vec<Regex>> = std::sync::LazyLock::new(|| {
    [
        r"(?i)(\d{1,3},\d{3})\s*(?:sqft|sq ft|square feet)",
        r"(?i)\b(\d{3,4})\s*(?:sqft|sq ft|square feet)",
        r"(?i)(\d{1,3},\d{3})\s*Sq\.?\s*Ft",
        r"(?i)\b(\d{3,4})\s*Sq\.?\s*Ft",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static SUBJECT_PREFIXES: std::sync::LazyLock<Vec<Regex>> = std::sync::LazyLock::new(|| {
    [
        r"(?i)^Roci wants you to see the home at\s*",
        r"(?i)^New Listing:\s*",
        r"(?i)^Price Changed:\s*",
        r"(?i)^New home:\s*",
        r"(?i)^Check out\b\s*",
        r"(?i)^See\b\s*",
        r"(?i)^For sale:\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static SUBJECT_SUFFIX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r"(?i)\s*[-|]?\s*(?:Redfin|Zillow|Realtor|Trulia|Homes\.com).*$").unwrap()
});

/// House number, one to five words, then a street suffix
static STREET_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d+\s+(?:[a-z0-9]*[a-z][a-z0-9'.\-]*\s+){1,5}?(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Lane|Ln|Drive|Dr|Court|Ct|Way|Circle|Cir|Trail|Trl|Terrace|Ter|Place|Pl|Highway|Hwy|Parkway|Pkwy)\b",
    )
    .unwrap()
});

static CITY_REGEXES: std::sync::LazyLock<Vec<(&'static str, Regex)>> =
    std::sync::LazyLock::new(|| {
        GAZETTEER
            .iter()
            .map(|city| {
                let pattern = format!(r"(?i){},?\s*PA\b", regex::escape(city));
                (*city, Regex::new(&pattern).unwrap())
            })
            .collect()
    });

static ZIP_REGEX: std::sync::LazyLock<Regex> =
    std::sync::LazyLock::new(|| Regex::new(r"\b(190\d{2}|189\d{2}|194\d{2})\b").unwrap());

static IMAGE_REGEX: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>"']+\.(?:jpg|jpeg|png)"#).unwrap()
});

const IMAGE_BLACKLIST: &[&str] = &[
    "logo", "icon", "button", "arrow", "social", "spacer", "pixel", "tracking", "1x1", "beacon",
];

const IMAGE_PREFERRED: &[&str] = &["photo", "image", "listing", "property", "home", "house"];

fn parse_digits<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.replace(',', "").parse().ok()
}

/// First `$` amount in the text, thousands separators removed
#[must_use]
pub fn parse_price(text: &str) -> Option<u64> {
    PRICE_REGEX
        .captures(text)
        .and_then(|cap| parse_digits(&cap[1]))
}

/// First "N bd" / "N bed" / "N bedroom"
#[must_use]
pub fn parse_beds(text: &str) -> Option<u32> {
    BEDS_REGEX
        .captures(text)
        .and_then(|cap| cap[1].parse().ok())
}

/// First "N ba" / "N.5 bath" / "N bathroom"
#[must_use]
pub fn parse_baths(text: &str) -> Option<f64> {
    BATHS_REGEX
        .captures(text)
        .and_then(|cap| cap[1].parse().ok())
}

#[must_use]
pub fn parse_sqft(text: &str) -> Option<u32> {
    SQFT_REGEXES
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|cap| parse_digits(&cap[1]))
}

/// Strip alert boilerplate and the trailing provider name from a subject.
///
/// Assumes the subject reads `<boilerplate><address><provider suffix>`; the
/// locality after the street is left in place.
#[must_use]
pub fn address_from_subject(subject: &str) -> String {
    let mut clean = subject.trim().to_string();

    for prefix in SUBJECT_PREFIXES.iter() {
        clean = prefix.replace(&clean, "").into_owned();
    }

    SUBJECT_SUFFIX.replace(&clean, "").trim().to_string()
}

/// First "<number> <words> <street suffix>" in the text
#[must_use]
pub fn find_street_address(text: &str) -> Option<String> {
    STREET_REGEX
        .find(text)
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Pick the best address from the subject, falling back to the body.
#[must_use]
pub fn resolve_address(subject: &str, body: &str) -> String {
    let stripped = address_from_subject(subject);

    if let Some(street) = find_street_address(&stripped) {
        return street;
    }

    let combined = format!("{subject} {body}");
    if let Some(street) = find_street_address(&combined) {
        return street;
    }

    let base = if stripped.is_empty() {
        subject.trim()
    } else {
        stripped.as_str()
    };

    base.split(" - ").next().unwrap_or(base).trim().to_string()
}

/// Find city, state and zip in the body, using the address as a last resort
#[must_use]
pub fn parse_locality(body: &str, address: &str) -> Locality {
    let city = CITY_REGEXES
        .iter()
        .find(|(_, re)| re.is_match(body))
        .map(|(city, _)| *city)
        .or_else(|| {
            let address_lower = address.to_lowercase();
            GAZETTEER
                .iter()
                .find(|city| !address.is_empty() && address_lower.contains(&city.to_lowercase()))
                .copied()
        });

    let zip = ZIP_REGEX.captures(body).map(|cap| cap[1].to_string());

    Locality {
        city: city.map(str::to_string),
        state: DEFAULT_STATE.to_string(),
        zip,
    }
}

fn is_blacklisted_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    IMAGE_BLACKLIST.iter().any(|skip| lower.contains(skip))
}

fn is_preferred_image(url: &str) -> bool {
    let lower = url.to_lowercase();
    IMAGE_PREFERRED.iter().any(|good| lower.contains(good))
}

/// Pick a property photo out of the raw HTML.
///
/// Provider CDN patterns come first. Otherwise every image URL in the
/// document is considered, skipping logos, icons and tracking pixels, and
/// preferring URLs that look like listing photos.
#[must_use]
pub fn extract_image_url(html: &str, provider: Provider) -> Option<String> {
    if html.is_empty() {
        return None;
    }

    if let Some(found) = provider
        .image_regexes()
        .iter()
        .find_map(|re| re.find(html))
    {
        return Some(found.as_str().to_string());
    }

    let candidates: Vec<&str> = IMAGE_REGEX
        .find_iter(html)
        .map(|m| m.as_str())
        .filter(|url| !is_blacklisted_image(url))
        .collect();

    candidates
        .iter()
        .find(|url| is_preferred_image(url))
        .or_else(|| candidates.first())
        .map(|url| (*url).to_string())
}

/// Listing detail URL, or the provider homepage when none is present
#[must_use]
pub fn extract_listing_url(text: &str, html: Option<&str>, provider: Provider) -> String {
    let re = provider.listing_url_regex();

    std::iter::once(text)
        .chain(html)
        .find_map(|haystack| re.find(haystack))
        .map_or_else(
            || provider.homepage().to_string(),
            |m| {
                m.as_str()
                    .trim_end_matches(['.', ',', ')', ';'])
                    .to_string()
            },
        )
}
