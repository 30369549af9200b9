use crate::auth::reset::RESET_SENT_MESSAGE;
use crate::tests::utils::{
    body_string, get, guest, location, post_form, register, session_from, test_app,
};
use astra::Body;
use http::{Method, Request};

#[test]
fn login_page_loads_successfully() {
    let app = test_app();

    let resp = get(&app, "/login", None);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Sign in"));
    assert!(body.contains("Continue as guest"));
    assert!(body.contains("/auth/reset"));
}

#[test]
fn listing_redirects_to_login_without_a_session() {
    let app = test_app();

    let resp = get(&app, "/", None);
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/login");
}

#[test]
fn register_sets_cookie_and_profile_shows_email() {
    let app = test_app();
    let cookie = register(&app, "Owner@Example.com");
    assert!(cookie.starts_with("session="));

    let body = body_string(get(&app, "/profile", Some(&cookie)));
    assert!(body.contains("owner@example.com"));
    assert!(body.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn duplicate_registration_is_rejected_on_the_form() {
    let app = test_app();
    register(&app, "dup@example.com");

    let resp = post_form(
        &app,
        "/auth/register",
        None,
        &[("email", "dup@example.com"), ("password", "another1")],
    );
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("already exists"));
}

#[test]
fn wrong_password_rerenders_login_with_401() {
    let app = test_app();
    register(&app, "a@example.com");

    let resp = post_form(
        &app,
        "/auth/login",
        None,
        &[("email", "a@example.com"), ("password", "wrong-password")],
    );
    assert_eq!(resp.status(), 401);
    let body = body_string(resp);
    assert!(body.contains("invalid email or password"));
    assert!(body.contains("a@example.com"));
}

#[test]
fn login_after_register_works() {
    let app = test_app();
    register(&app, "b@example.com");

    let resp = post_form(
        &app,
        "/auth/login",
        None,
        &[("email", "b@example.com"), ("password", "hunter22")],
    );
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/");

    let cookie = session_from(&resp);
    assert_eq!(get(&app, "/", Some(&cookie)).status(), 200);
}

#[test]
fn guest_profile_says_guest_user() {
    let app = test_app();
    let cookie = guest(&app);

    let body = body_string(get(&app, "/profile", Some(&cookie)));
    assert!(body.contains("Guest User"));
}

#[test]
fn logout_revokes_the_session() {
    let app = test_app();
    let cookie = register(&app, "c@example.com");

    let resp = post_form(&app, "/auth/logout", Some(&cookie), &[]);
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/login");
    assert!(session_from(&resp).starts_with("session="));

    let after = get(&app, "/", Some(&cookie));
    assert_eq!(after.status(), 303);
}

#[test]
fn reset_request_answers_the_same_for_unknown_email() {
    let app = test_app();
    register(&app, "known@example.com");

    let known = body_string(post_form(
        &app,
        "/auth/reset",
        None,
        &[("email", "known@example.com")],
    ));
    let unknown = body_string(post_form(
        &app,
        "/auth/reset",
        None,
        &[("email", "nobody@example.com")],
    ));

    assert!(known.contains(RESET_SENT_MESSAGE));
    assert_eq!(known, unknown);
}

#[test]
fn reset_request_returns_partial_html_for_htmx() {
    let app = test_app();

    let req = Request::builder()
        .method(Method::POST)
        .uri("/auth/reset")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("HX-Request", "true")
        .body(Body::from("email=someone%40example.com"))
        .unwrap();

    let resp = crate::tests::utils::send(&app, req);
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains(RESET_SENT_MESSAGE));
    assert!(!body.contains("<!DOCTYPE html>"));
    assert!(!body.contains("<html"));
}

#[test]
fn reset_confirm_rejects_unknown_token() {
    let app = test_app();

    let resp = get(&app, "/auth/reset/confirm?token=not-a-token", None);
    assert_eq!(resp.status(), 401);
    assert!(body_string(resp).contains("invalid or has expired"));
}

#[test]
fn full_password_reset_flow() {
    let app = test_app();
    register(&app, "reset@example.com");

    let issued = app
        .db
        .with_conn(|conn| {
            app.resets
                .request_reset(conn, "reset@example.com", chrono::Utc::now().timestamp())
        })
        .unwrap()
        .unwrap();
    assert!(issued.link.starts_with("http://pets.test/auth/reset/confirm?token="));

    let form_page = get(
        &app,
        &format!("/auth/reset/confirm?token={}", issued.token()),
        None,
    );
    assert_eq!(form_page.status(), 200);
    assert!(body_string(form_page).contains(issued.token()));

    let resp = post_form(
        &app,
        "/auth/reset/confirm",
        None,
        &[("token", issued.token()), ("password", "brand-new-pass")],
    );
    assert_eq!(resp.status(), 303);
    assert_eq!(location(&resp), "/login?reset=1");

    // token is single use
    let again = post_form(
        &app,
        "/auth/reset/confirm",
        None,
        &[("token", issued.token()), ("password", "another-pass")],
    );
    assert_eq!(again.status(), 401);

    let login = post_form(
        &app,
        "/auth/login",
        None,
        &[("email", "reset@example.com"), ("password", "brand-new-pass")],
    );
    assert_eq!(login.status(), 303);
}

#[test]
fn short_new_password_keeps_the_confirm_form() {
    let app = test_app();
    register(&app, "short@example.com");

    let issued = app
        .db
        .with_conn(|conn| {
            app.resets
                .request_reset(conn, "short@example.com", chrono::Utc::now().timestamp())
        })
        .unwrap()
        .unwrap();

    let resp = post_form(
        &app,
        "/auth/reset/confirm",
        None,
        &[("token", issued.token()), ("password", "abc")],
    );
    assert_eq!(resp.status(), 400);
    assert!(body_string(resp).contains("at least"));
}
