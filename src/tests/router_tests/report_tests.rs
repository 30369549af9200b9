use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::router::REPORT_CREATED_MESSAGE;
use crate::tests::fakes::{png_bytes, FixedGeocoder};
use crate::tests::utils::{
    body_string, get, guest, location, post_form, register, test_app, test_app_with,
};

fn pet_form<'a>(extra: &[(&'a str, &'a str)]) -> Vec<(&'a str, &'a str)> {
    let mut form = vec![
        ("name", "Buddy"),
        ("species", "Dog"),
        ("description", "Golden retriever, red collar"),
        ("latitude", "39.7817"),
        ("longitude", "-89.6501"),
        ("contact_info", "owner@example.com"),
    ];
    for &(key, value) in extra {
        form.retain(|(k, _)| *k != key);
        form.push((key, value));
    }
    form
}

#[test]
fn report_form_lists_species() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    let resp = get(&app, "/report", Some(&cookie));
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    for species in ["Dog", "Cat", "Bird", "Other"] {
        assert!(body.contains(&format!("<option value=\"{species}\"")));
    }
    assert!(body.contains("Submit Report"));
}

#[test]
fn guests_cannot_open_or_submit_the_form() {
    let app = test_app();
    let cookie = guest(&app);

    let page = get(&app, "/report", Some(&cookie));
    assert_eq!(page.status(), 401);
    assert!(body_string(page).contains("User not authenticated"));

    let submit = post_form(&app, "/pets", Some(&cookie), &pet_form(&[]));
    assert_eq!(submit.status(), 401);

    let listing = body_string(get(&app, "/", Some(&cookie)));
    assert!(listing.contains("No pets found"));
}

#[test]
fn submit_without_session_is_rejected() {
    let app = test_app();
    assert_eq!(post_form(&app, "/pets", None, &pet_form(&[])).status(), 401);
}

#[test]
fn successful_submit_redirects_with_confirmation() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    let resp = post_form(&app, "/pets", Some(&cookie), &pet_form(&[]));
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/report?created=1");

    let page = body_string(get(&app, "/report?created=1", Some(&cookie)));
    assert!(page.contains(REPORT_CREATED_MESSAGE));
}

#[test]
fn blank_fields_rerender_the_form() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    let resp = post_form(
        &app,
        "/pets",
        Some(&cookie),
        &pet_form(&[("description", "  "), ("contact_info", "")]),
    );
    assert_eq!(resp.status(), 400);

    let body = body_string(resp);
    assert!(body.contains("Please fill in: description, contact info"));
    // what was typed survives
    assert!(body.contains("value=\"Buddy\""));
}

#[test]
fn out_of_range_coordinates_are_rejected() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    let resp = post_form(&app, "/pets", Some(&cookie), &pet_form(&[("latitude", "95")]));
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("out of range"));

    let resp = post_form(&app, "/pets", Some(&cookie), &pet_form(&[("longitude", "east")]));
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("longitude must be a number"));
}

#[test]
fn unknown_species_is_rejected() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    let resp = post_form(&app, "/pets", Some(&cookie), &pet_form(&[("species", "Dragon")]));
    assert_eq!(resp.status(), 400);
}

#[test]
fn supplied_address_is_kept() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    post_form(
        &app,
        "/pets",
        Some(&cookie),
        &pet_form(&[("address", "Behind the bakery")]),
    );

    let body = body_string(get(&app, "/", Some(&cookie)));
    assert!(body.contains("Behind the bakery"));
    assert!(!body.contains("Main St"));
}

#[test]
fn geocoder_outage_still_saves_the_report() {
    let app = test_app_with(FixedGeocoder::offline());
    let cookie = register(&app, "a@example.com");

    let resp = post_form(&app, "/pets", Some(&cookie), &pet_form(&[]));
    assert_eq!(resp.status(), 303);

    let body = body_string(get(&app, "/", Some(&cookie)));
    assert!(body.contains("Buddy"));
    assert!(!body.contains("Last seen:"));
}

#[test]
fn photo_is_stored_and_served() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");
    let encoded = STANDARD.encode(png_bytes());

    let resp = post_form(
        &app,
        "/pets",
        Some(&cookie),
        &pet_form(&[("image_base64", encoded.as_str())]),
    );
    assert_eq!(resp.status(), 303);

    let listing = body_string(get(&app, "/", Some(&cookie)));
    let prefix = "src=\"http://pets.test/blobs/";
    let start = listing.find(prefix).unwrap() + "src=\"http://pets.test".len();
    let end = start + listing[start..].find('"').unwrap();
    let path = &listing[start..end];
    assert!(path.starts_with("/blobs/pet_images/"));
    assert!(path.ends_with(".jpg"));

    let blob = get(&app, path, None);
    assert_eq!(blob.status(), 200);
    assert_eq!(blob.headers().get("Content-Type").unwrap(), "image/jpeg");
    let mut bytes = Vec::new();
    std::io::Read::read_to_end(&mut blob.into_body().reader(), &mut bytes).unwrap();
    assert!(bytes.starts_with(&[0xFF, 0xD8, 0xFF]));
    assert!(bytes.len() < png_bytes().len());
}

#[test]
fn unreadable_photo_saves_nothing() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");
    let encoded = STANDARD.encode(b"definitely not a picture");

    let resp = post_form(
        &app,
        "/pets",
        Some(&cookie),
        &pet_form(&[("image_base64", encoded.as_str())]),
    );
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("Failed to upload image: failed to convert image to data"));

    let listing = body_string(get(&app, "/", Some(&cookie)));
    assert!(listing.contains("No pets found"));
}

#[test]
fn blob_keys_cannot_escape_the_root() {
    let app = test_app();
    assert_eq!(get(&app, "/blobs/../pets.sqlite3", None).status(), 404);
    assert_eq!(get(&app, "/blobs/pet_images/missing.png", None).status(), 404);
}

#[test]
fn location_lookup_returns_address_fragment() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    for source in ["pin", "device"] {
        let resp = get(
            &app,
            &format!("/location/address?lat=39.78&lon=-89.65&source={source}"),
            Some(&cookie),
        );
        assert_eq!(resp.status(), 200);

        let body = body_string(resp);
        assert!(body.contains("Main St, Springfield, IL, USA"));
        assert!(body.contains("name=\"address\""));
        assert!(body.contains("marker=39.78,-89.65"));
        assert!(!body.contains("<html"));
    }
}

#[test]
fn location_lookup_failure_leaves_address_blank() {
    let app = test_app_with(FixedGeocoder::offline());
    let cookie = register(&app, "a@example.com");

    let body = body_string(get(
        &app,
        "/location/address?lat=1&lon=2&source=pin",
        Some(&cookie),
    ));
    assert!(body.contains("Address unavailable"));
}

#[test]
fn location_lookup_validates_input() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    let bad_lat = get(&app, "/location/address?lat=200&lon=0", Some(&cookie));
    assert_eq!(bad_lat.status(), 400);

    let bad_source = get(
        &app,
        "/location/address?lat=1&lon=2&source=satellite",
        Some(&cookie),
    );
    assert_eq!(bad_source.status(), 400);
}
