//! Listing providers and the source classifier

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// A real-estate site whose alert emails we understand
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Provider {
    Zillow,
    Redfin,
    #[serde(rename = "Realtor.com")]
    RealtorCom,
    Trulia,
    #[serde(rename = "Homes.com")]
    HomesCom,
}

/// Static description of how a provider's alerts look
#[derive(Debug)]
pub struct ProviderProfile {
    /// Display name, also used as the listing id prefix
    pub name: &'static str,

    /// Case-insensitive substrings of the sender address
    pub sender_patterns: &'static [&'static str],

    /// Case-insensitive substrings of the subject line
    pub subject_patterns: &'static [&'static str],

    /// Regex for a listing detail page
    pub listing_url: &'static str,

    /// CDN image regexes, most specific first
    pub image_patterns: &'static [&'static str],

    /// Used when no detail page URL is found
    pub homepage: &'static str,
}

const ZILLOW: ProviderProfile = ProviderProfile {
    name: "Zillow",
    sender_patterns: &["zillow.com", "zillow"],
    subject_patterns: &["New listing", "Price change", "New home"],
    listing_url: r#"https?://www\.zillow\.com/homedetails/[^\s<>"]+"#,
    image_patterns: &[
        r#"(?i)https://photos\.zillowstatic\.com/[^\s<>"']+\.jpg"#,
        r#"(?i)https://[\w\-]+\.zillow\.com/[^\s<>"']+\.jpg"#,
    ],
    homepage: "https://www.zillow.com",
};

const REDFIN: ProviderProfile = ProviderProfile {
    name: "Redfin",
    sender_patterns: &["redfin.com", "redfin"],
    subject_patterns: &["New Listing", "Price Changed", "New property", "wants you to see"],
    listing_url: r#"https?://www\.redfin\.com/[^\s<>"]+"#,
    image_patterns: &[
        r#"(?i)https://ssl\.cdn-redfin\.com/photo/\d+/[^\s<>"']+\.jpg"#,
        r#"(?i)https://ssl\.cdn-redfin\.com/photo/\d+/bigphoto/[^\s<>"']+\.jpg"#,
        r#"(?i)https://[\w\-]*\.cdn-redfin\.com/[^\s<>"']+\.jpg"#,
    ],
    homepage: "https://www.redfin.com",
};

const REALTOR_COM: ProviderProfile = ProviderProfile {
    name: "Realtor.com",
    sender_patterns: &["realtor.com"],
    subject_patterns: &["New Listing", "Price Reduced"],
    listing_url: r#"https?://www\.realtor\.com/realestateandhomes-detail/[^\s<>"]+"#,
    image_patterns: &[r#"(?i)https://[\w\-.]*rdcpix\.com/[^\s<>"']+\.(?:jpg|jpeg|webp)"#],
    homepage: "https://www.realtor.com",
};

const TRULIA: ProviderProfile = ProviderProfile {
    name: "Trulia",
    sender_patterns: &["trulia.com"],
    subject_patterns: &["New Listing"],
    listing_url: r#"https?://www\.trulia\.com/[^\s<>"]+"#,
    image_patterns: &[r#"(?i)https://[\w\-.]*trulia-cdn\.com/[^\s<>"']+\.(?:jpg|jpeg|webp)"#],
    homepage: "https://www.trulia.com",
};

const HOMES_COM: ProviderProfile = ProviderProfile {
    name: "Homes.com",
    sender_patterns: &["homes.com"],
    subject_patterns: &["New Listing"],
    listing_url: r#"https?://www\.homes\.com/[^\s<>"]+"#,
    image_patterns: &[r#"(?i)https://images\.homes\.com/[^\s<>"']+\.(?:jpg|jpeg|webp)"#],
    homepage: "https://www.homes.com",
};

struct CompiledPatterns {
    listing_url: Regex,
    images: Vec<Regex>,
}

static COMPILED: LazyLock<Vec<CompiledPatterns>> = LazyLock::new(|| {
    Provider::ALL
        .iter()
        .map(|provider| {
            let profile = provider.profile();
            CompiledPatterns {
                listing_url: Regex::new(profile.listing_url).unwrap(),
                images: profile
                    .image_patterns
                    .iter()
                    .map(|p| Regex::new(p).unwrap())
                    .collect(),
            }
        })
        .collect()
});

impl Provider {
    /// Classification order; the first matching provider wins
    pub const ALL: [Self; 5] = [
        Self::Zillow,
        Self::Redfin,
        Self::RealtorCom,
        Self::Trulia,
        Self::HomesCom,
    ];

    #[must_use]
    pub const fn profile(self) -> &'static ProviderProfile {
        match self {
            Self::Zillow => &ZILLOW,
            Self::Redfin => &REDFIN,
            Self::RealtorCom => &REALTOR_COM,
            Self::Trulia => &TRULIA,
            Self::HomesCom => &HOMES_COM,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        self.profile().name
    }

    #[must_use]
    pub const fn homepage(self) -> &'static str {
        self.profile().homepage
    }

    pub(crate) fn listing_url_regex(self) -> &'static Regex {
        &COMPILED[self as usize].listing_url
    }

    pub(crate) fn image_regexes(self) -> &'static [Regex] {
        &COMPILED[self as usize].images
    }

    fn matches_sender(self, sender_lower: &str) -> bool {
        self.profile()
            .sender_patterns
            .iter()
            .any(|p| sender_lower.contains(&p.to_lowercase()))
    }

    fn matches_subject(self, subject_lower: &str) -> bool {
        self.profile()
            .subject_patterns
            .iter()
            .any(|p| subject_lower.contains(&p.to_lowercase()))
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identify the provider behind an alert email.
///
/// Every provider's sender patterns are checked before any subject pattern,
/// so a Redfin sender with a subject that reads like a Zillow alert is still
/// Redfin. Returns `None` for messages that are not listing alerts.
#[must_use]
pub fn classify(from: &str, subject: &str) -> Option<Provider> {
    let from_lower = from.to_lowercase();
    let subject_lower = subject.to_lowercase();

    Provider::ALL
        .into_iter()
        .find(|p| p.matches_sender(&from_lower))
        .or_else(|| {
            Provider::ALL
                .into_iter()
                .find(|p| p.matches_subject(&subject_lower))
        })
}
