use chrono::{TimeZone, Utc};
use listing_alerts::*;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 20, 12, 0, 0).unwrap()
}

#[test]
fn test_build_redfin_listing() {
    let raw = b"From: Redfin <listings@redfin.com>\r\n\
                Subject: Roci wants you to see the home at 616 Tennis Ave, Glenside, PA\r\n\
                Date: Wed, 19 Feb 2025 17:15:00 +0000\r\n\
                Message-ID: <CAJBdUFe@mail.gmail.com>\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <div>$425,000</div><div>3 bd</div><div>2.5 ba</div><div>1,850 sqft</div>\
                <div>Glenside, PA 19038</div>\
                <img src=\"https://ssl.cdn-redfin.com/photo/235/bigphoto/013/PAMC2082013_0.jpg\">\
                <a href=\"https://www.redfin.com/PA/Glenside/616-Tennis-Ave-19038/home/39182\">View</a>";

    let email = parse_alert(1, raw).unwrap();
    let source = classify(&email.from, &email.subject).unwrap();
    let listing = build_listing(&email, source, now());

    assert_eq!(source, Provider::Redfin);
    assert_eq!(listing.id, "Redfin_<CAJBdUFe@mail.gmail.com>");
    assert_eq!(listing.address, "616 Tennis Ave");
    assert_eq!(listing.city.as_deref(), Some("Glenside"));
    assert_eq!(listing.state, "PA");
    assert_eq!(listing.zip.as_deref(), Some("19038"));
    assert_eq!(listing.price, Some(425_000));
    assert_eq!(listing.beds, Some(3));
    assert_eq!(listing.baths, Some(2.5));
    assert_eq!(listing.sqft, Some(1850));
    assert_eq!(
        listing.image_url.as_deref(),
        Some("https://ssl.cdn-redfin.com/photo/235/bigphoto/013/PAMC2082013_0.jpg")
    );
    assert_eq!(
        listing.url,
        "https://www.redfin.com/PA/Glenside/616-Tennis-Ave-19038/home/39182"
    );
    assert_eq!(listing.date_added, now());
    assert_eq!(
        listing.email_date,
        Some(Utc.with_ymd_and_hms(2025, 2, 19, 17, 15, 0).unwrap())
    );
    assert!(!listing.viewed);
}

#[test]
fn test_build_realtor_default_url() {
    let raw = b"From: alerts@realtor.com\r\n\
                Subject: New Listing: 1107 Lansdale Ave\r\n\
                Message-ID: <r1@realtor.com>\r\n\
                \r\n\
                $289,000 for this 3 bed home";

    let email = parse_alert(1, raw).unwrap();
    let listing = build_listing(&email, Provider::RealtorCom, now());

    assert_eq!(listing.id, "Realtor.com_<r1@realtor.com>");
    assert_eq!(listing.url, "https://www.realtor.com");
    assert_eq!(listing.image_url, None);
    assert_eq!(listing.address, "1107 Lansdale Ave");
}

#[test]
fn test_build_without_message_id_or_date() {
    let raw = b"From: alerts@zillow.com\r\n\
                Subject: New home: 9 Elm St\r\n\
                \r\n\
                nothing else";

    let email = parse_alert(4, raw).unwrap();
    let listing = build_listing(&email, Provider::Zillow, now());

    assert_eq!(listing.id, "Zillow_2025-02-20T12:00:00.000000Z-4");
    assert_eq!(listing.email_date, Some(now()));
    assert_eq!(listing.price, None);
    assert_eq!(listing.sqft, None);
    assert_eq!(listing.city, None);
    assert_eq!(listing.url, "https://www.zillow.com");
}
