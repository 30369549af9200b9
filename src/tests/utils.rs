use crate::config::AppConfig;
use crate::db::init_db;
use crate::geo::ReverseGeocoder;
use crate::router::{handle, AppState};
use crate::tests::fakes::FixedGeocoder;
use astra::{Body, Response};
use http::{Method, Request};
use std::io::Read;
use std::sync::Arc;

/// A fresh app on its own temp database and blob directory.
pub fn test_app() -> AppState {
    test_app_with(FixedGeocoder::springfield())
}

pub fn test_app_with(geocoder: impl ReverseGeocoder + 'static) -> AppState {
    let dir = std::env::temp_dir().join(format!("pets_test_{}", rand::random::<u64>()));
    std::fs::create_dir_all(&dir).unwrap();

    let config = AppConfig {
        db_path: dir.join("pets.sqlite3").to_string_lossy().into_owned(),
        blob_root: dir.join("blobs"),
        public_base_url: "http://pets.test".to_string(),
        ..AppConfig::default()
    };
    // low work factor keeps account tests fast
    let state = AppState::with_password_iterations(config, Arc::new(geocoder), 10);
    init_db(&state.db).unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    state
}

pub fn get(app: &AppState, uri: &str, cookie: Option<&str>) -> Response {
    let mut req = Request::builder().method(Method::GET).uri(uri);
    if let Some(c) = cookie {
        req = req.header("Cookie", c);
    }
    send(app, req.body(Body::empty()).unwrap())
}

pub fn post_form(app: &AppState, uri: &str, cookie: Option<&str>, form: &[(&str, &str)]) -> Response {
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(form)
        .finish();
    let mut req = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if let Some(c) = cookie {
        req = req.header("Cookie", c);
    }
    send(app, req.body(Body::from(body)).unwrap())
}

/// Route the request; handler errors are rendered the way the server does.
pub fn send(app: &AppState, req: Request<Body>) -> Response {
    handle(req, app).unwrap_or_else(crate::responses::error_to_response)
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// `session=<token>` from a Set-Cookie header, ready for a Cookie header.
pub fn session_from(resp: &Response) -> String {
    let set_cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .expect("no Set-Cookie header");
    set_cookie.split(';').next().unwrap().to_string()
}

pub fn register(app: &AppState, email: &str) -> String {
    let resp = post_form(
        app,
        "/auth/register",
        None,
        &[("email", email), ("password", "hunter22")],
    );
    assert_eq!(resp.status(), 303);
    session_from(&resp)
}

pub fn guest(app: &AppState) -> String {
    let resp = post_form(app, "/auth/guest", None, &[]);
    assert_eq!(resp.status(), 303);
    session_from(&resp)
}
