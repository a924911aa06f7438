use listing_alerts::*;

#[test]
fn test_classify_by_sender() {
    assert_eq!(
        classify(
            "Redfin <listings@redfin.com>",
            "Roci wants you to see the home at 616 Tennis Ave, Glenside, PA"
        ),
        Some(Provider::Redfin)
    );
    assert_eq!(
        classify("Zillow <instant-updates@mail.zillow.com>", "3 new homes for you"),
        Some(Provider::Zillow)
    );
    assert_eq!(
        classify("alerts@email.realtor.com", "Homes you may like"),
        Some(Provider::RealtorCom)
    );
    assert_eq!(
        classify("Homes.com <noreply@HOMES.COM>", "Your search"),
        Some(Provider::HomesCom)
    );
}

#[test]
fn test_classify_by_subject() {
    assert_eq!(
        classify("friend@example.com", "Roci wants you to see the home at 12 Oak Ln"),
        Some(Provider::Redfin)
    );
    assert_eq!(
        classify("friend@example.com", "PRICE REDUCED on 4 Elm St"),
        Some(Provider::RealtorCom)
    );
}

#[test]
fn test_classify_subject_order() {
    // "New Listing" is listed for every provider; Zillow comes first
    assert_eq!(
        classify("friend@example.com", "New Listing: 12 Oak Ln"),
        Some(Provider::Zillow)
    );
}

#[test]
fn test_classify_no_match() {
    assert_eq!(classify("boss@work.com", "Quarterly numbers"), None);
    assert_eq!(classify("", ""), None);
}

#[test]
fn test_provider_names_and_homepages() {
    for provider in Provider::ALL {
        assert!(provider.homepage().starts_with("https://www."));
        assert_eq!(provider.to_string(), provider.profile().name);
    }
    assert_eq!(Provider::RealtorCom.name(), "Realtor.com");
}

#[test]
fn test_provider_serde_names() {
    let json = serde_json::to_string(&Provider::HomesCom).unwrap();
    assert_eq!(json, "\"Homes.com\"");

    let provider: Provider = serde_json::from_str("\"Realtor.com\"").unwrap();
    assert_eq!(provider, Provider::RealtorCom);
}
