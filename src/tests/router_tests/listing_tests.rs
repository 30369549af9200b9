use crate::router::AppState;
use crate::tests::utils::{body_string, get, guest, post_form, register, test_app};

fn report(app: &AppState, cookie: &str, name: &str, species: &str) {
    let resp = post_form(
        app,
        "/pets",
        Some(cookie),
        &[
            ("name", name),
            ("species", species),
            ("description", "Friendly, answers to her name"),
            ("latitude", "39.7817"),
            ("longitude", "-89.6501"),
            ("contact_info", "555-0100"),
        ],
    );
    assert_eq!(resp.status(), 303, "report {name} was not created");
}

#[test]
fn empty_listing_shows_placeholder() {
    let app = test_app();
    let cookie = register(&app, "owner@example.com");

    let resp = get(&app, "/", Some(&cookie));
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("No pets found"));
}

#[test]
fn signed_in_user_sees_only_their_own_reports() {
    let app = test_app();
    let owner = register(&app, "owner@example.com");
    let other = register(&app, "other@example.com");
    report(&app, &owner, "Buddy", "Dog");

    let mine = body_string(get(&app, "/", Some(&owner)));
    assert!(mine.contains("Buddy"));

    let theirs = body_string(get(&app, "/", Some(&other)));
    assert!(!theirs.contains("Buddy"));
    assert!(theirs.contains("No pets found"));
}

#[test]
fn guests_see_every_report() {
    let app = test_app();
    let a = register(&app, "a@example.com");
    let b = register(&app, "b@example.com");
    report(&app, &a, "Buddy", "Dog");
    report(&app, &b, "Whiskers", "Cat");

    let body = body_string(get(&app, "/", Some(&guest(&app))));
    assert!(body.contains("Buddy"));
    assert!(body.contains("Whiskers"));
}

#[test]
fn listing_is_newest_first() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");
    report(&app, &cookie, "First", "Dog");
    report(&app, &cookie, "Second", "Cat");

    let body = body_string(get(&app, "/", Some(&cookie)));
    let first = body.find("First").unwrap();
    let second = body.find("Second").unwrap();
    assert!(second < first);
}

#[test]
fn search_filters_the_whole_collection() {
    let app = test_app();
    let owner = register(&app, "owner@example.com");
    let other = register(&app, "other@example.com");
    report(&app, &owner, "Buddy", "Dog");
    report(&app, &owner, "Whiskers", "Cat");

    // not visible without a query, found once searching
    let body = body_string(get(&app, "/?q=DOG", Some(&other)));
    assert!(body.contains("Buddy"));
    assert!(!body.contains("Whiskers"));

    let by_address = body_string(get(&app, "/?q=springfield", Some(&other)));
    assert!(by_address.contains("Buddy"));
    assert!(by_address.contains("Whiskers"));

    let none = body_string(get(&app, "/?q=parrot", Some(&other)));
    assert!(none.contains("No pets found"));

    let trailing_space = body_string(get(&app, "/?q=dog%20", Some(&other)));
    assert!(trailing_space.contains("No pets found"));
}

#[test]
fn live_search_returns_list_fragment() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");
    report(&app, &cookie, "Buddy", "Dog");

    let resp = get(&app, "/pets/search?q=dog", Some(&cookie));
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("id=\"pet-list\""));
    assert!(body.contains("Buddy"));
    assert!(!body.contains("<html"));
}

#[test]
fn live_search_needs_a_session() {
    let app = test_app();
    assert_eq!(get(&app, "/pets/search?q=dog", None).status(), 401);
}

#[test]
fn detail_page_shows_report_and_map() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");
    report(&app, &cookie, "Buddy", "Dog");

    let listing = body_string(get(&app, "/", Some(&cookie)));
    let start = listing.find("href=\"/pets/").unwrap() + "href=\"".len();
    let end = start + listing[start..].find('"').unwrap();
    let href = &listing[start..end];

    let resp = get(&app, href, Some(&cookie));
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Buddy"));
    assert!(body.contains("555-0100"));
    assert!(body.contains("Main St, Springfield, IL, USA"));
    assert!(body.contains("openstreetmap.org/export/embed.html"));
}

#[test]
fn unknown_pet_is_404() {
    let app = test_app();
    let cookie = register(&app, "a@example.com");

    assert_eq!(get(&app, "/pets/doesnotexist", Some(&cookie)).status(), 404);
}
