// src/router.rs
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use astra::{Body, Request};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::Utc;
use url::form_urlencoded;

use crate::auth::accounts::{AccountConfig, AccountService, SignedIn};
use crate::auth::reset::{PasswordResetService, ResetConfig, RESET_SENT_MESSAGE};
use crate::auth::sessions::{
    clear_session_cookie, load_session, session_cookie, token_from_cookie_header,
};
use crate::auth::token::PASSWORD_ITERATIONS;
use crate::auth::RequestAuth;
use crate::config::AppConfig;
use crate::db::{Database, SqliteDocumentStore};
use crate::domain::{GeoPoint, Report, ReportFeed, SPECIES_OPTIONS};
use crate::errors::ServerError;
use crate::geo::{GeolocationProvider, ReverseGeocoder};
use crate::repository::{ReportError, ReportRepository};
use crate::responses::{
    blob_response, html_response, html_response_with_status, redirect, redirect_with_cookie,
    status_code, ResultResp,
};
use crate::storage::{BlobError, FsBlobStore, IMAGE_DECODE_FAILED};
use crate::templates::components::pet_list;
use crate::templates::pages::{
    detail_page, listing_page, location_fragment, login_page, profile_page, report_form_page,
    reset_confirm_page, reset_request_page, reset_sent_content, reset_sent_page, ReportFormVm,
};

// Forms carry the photo inline as base64.
const MAX_FORM_BYTES: u64 = 12 * 1024 * 1024;

pub const REPORT_CREATED_MESSAGE: &str = "Pet added successfully";
pub const PASSWORD_UPDATED_MESSAGE: &str = "Password updated. Sign in with your new password.";
const INVALID_RESET_LINK: &str = "This reset link is invalid or has expired.";

/// Everything a request handler needs, shared by all workers.
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub blobs: FsBlobStore,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub accounts: AccountService,
    pub resets: PasswordResetService,
}

impl AppState {
    pub fn new(config: AppConfig, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self::with_password_iterations(config, geocoder, PASSWORD_ITERATIONS)
    }

    pub fn with_password_iterations(
        config: AppConfig,
        geocoder: Arc<dyn ReverseGeocoder>,
        password_iterations: u32,
    ) -> Self {
        let db = Database::new(config.db_path.clone());
        let blobs = FsBlobStore::new(config.blob_root.clone(), config.public_base_url.clone());
        let accounts = AccountService::new(AccountConfig {
            password_iterations,
            session_ttl_secs: config.session_ttl_secs,
        });
        let resets = PasswordResetService::new(ResetConfig {
            ttl_secs: config.reset_ttl_secs,
            confirm_path: format!("{}/auth/reset/confirm", config.public_base_url),
            password_iterations,
        });

        Self {
            config,
            db,
            blobs,
            geocoder,
            accounts,
            resets,
        }
    }

    fn repository(&self) -> ReportRepository<SqliteDocumentStore, FsBlobStore> {
        ReportRepository::new(SqliteDocumentStore::new(self.db.clone()), self.blobs.clone())
    }
}

struct Session {
    token: String,
    auth: RequestAuth,
}

/// Per-request data pulled off the head before the body is consumed.
struct RequestCtx {
    query: HashMap<String, String>,
    session: Option<Session>,
    htmx: bool,
    now: i64,
}

impl RequestCtx {
    fn require_session(&self) -> Result<&Session, ServerError> {
        self.session
            .as_ref()
            .ok_or_else(|| ServerError::Unauthorized("sign in required".into()))
    }

    fn query_param(&self, key: &str) -> &str {
        self.query.get(key).map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LocationSource {
    Pin,
    Device,
}

impl LocationSource {
    fn parse(raw: &str) -> Result<Self, ServerError> {
        match raw {
            "" | "pin" => Ok(Self::Pin),
            "device" => Ok(Self::Device),
            other => Err(ServerError::BadRequest(format!(
                "unknown location source: {other}"
            ))),
        }
    }
}

pub fn handle(req: Request, state: &AppState) -> ResultResp {
    let now = Utc::now().timestamp();
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let ctx = RequestCtx {
        query: parse_query(&req),
        session: current_session(&req, state, now)?,
        htmx: req.headers().contains_key("hx-request"),
        now,
    };
    tracing::debug!(%method, %path, signed_in = ctx.session.is_some(), "request");
    let body = req.into_body();

    match (method.as_str(), path.as_str()) {
        ("GET", "/login") => login_form(&ctx),
        ("POST", "/auth/login") => login(body, &ctx, state),
        ("POST", "/auth/register") => register(body, &ctx, state),
        ("POST", "/auth/guest") => continue_as_guest(&ctx, state),
        ("POST", "/auth/logout") => logout(&ctx, state),
        ("GET", "/auth/reset") => html_response(reset_request_page(None)),
        ("POST", "/auth/reset") => request_reset(body, &ctx, state),
        ("GET", "/auth/reset/confirm") => reset_confirm_form(&ctx, state),
        ("POST", "/auth/reset/confirm") => confirm_reset(body, &ctx, state),

        ("GET", "/") => list_pets(&ctx, state),
        ("GET", "/pets/search") => search_pets(&ctx, state),
        ("GET", "/report") => report_form(&ctx),
        ("POST", "/pets") => create_pet(body, &ctx, state),
        ("GET", "/location/address") => location_address(&ctx, state),
        ("GET", "/profile") => profile(&ctx),

        ("GET", p) if p.starts_with("/pets/") => pet_detail(&p["/pets/".len()..], &ctx, state),
        ("GET", p) if p.starts_with("/blobs/") => serve_blob(&p["/blobs/".len()..], state),

        _ => Err(ServerError::NotFound),
    }
}

// ---------- auth ----------

fn login_form(ctx: &RequestCtx) -> ResultResp {
    if ctx.session.is_some() {
        return redirect("/");
    }
    let notice = ctx.query.contains_key("reset").then_some(PASSWORD_UPDATED_MESSAGE);
    html_response(login_page(None, notice, ""))
}

fn login(body: Body, ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let form = read_form(body)?;
    let email = field(&form, "email");
    let result = state
        .db
        .with_conn(|conn| state.accounts.login(conn, email, field(&form, "password"), ctx.now));
    finish_sign_in(result, state, email)
}

fn register(body: Body, ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let form = read_form(body)?;
    let email = field(&form, "email");
    let result = state
        .db
        .with_conn(|conn| state.accounts.register(conn, email, field(&form, "password"), ctx.now));
    finish_sign_in(result, state, email)
}

fn continue_as_guest(ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let result = state
        .db
        .with_conn(|conn| state.accounts.login_as_guest(conn, ctx.now));
    finish_sign_in(result, state, "")
}

/// Set the cookie on success; bad input goes back to the login page.
fn finish_sign_in(
    result: Result<SignedIn, ServerError>,
    state: &AppState,
    email: &str,
) -> ResultResp {
    match result {
        Ok(signed_in) => {
            tracing::debug!(
                guest = signed_in.auth.is_guest(),
                principal = signed_in.auth.principal.as_ref().map(|p| p.as_str()),
                "issuing session cookie"
            );
            redirect_with_cookie(
                "/",
                &session_cookie(&signed_in.token, state.accounts.session_ttl_secs()),
            )
        }
        Err(err) => match user_message(&err) {
            Some(msg) => {
                html_response_with_status(status_code(&err), login_page(Some(msg), None, email))
            }
            None => Err(err),
        },
    }
}

fn logout(ctx: &RequestCtx, state: &AppState) -> ResultResp {
    if let Some(session) = &ctx.session {
        state
            .db
            .with_conn(|conn| state.accounts.sign_out(conn, &session.token, ctx.now))?;
        tracing::info!(guest = session.auth.is_guest(), "signed out");
    }
    redirect_with_cookie("/login", &clear_session_cookie())
}

fn request_reset(body: Body, ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let form = read_form(body)?;
    let result = state
        .db
        .with_conn(|conn| state.resets.request_reset(conn, field(&form, "email"), ctx.now));

    match result {
        Ok(issued) => {
            // No outbound mail; the link goes to the operator log.
            if let Some(issued) = issued {
                tracing::info!(
                    email = %issued.email,
                    link = %issued.link,
                    expires_at = issued.expires_at,
                    "password reset link issued"
                );
            }
            if ctx.htmx {
                html_response(reset_sent_content(RESET_SENT_MESSAGE))
            } else {
                html_response(reset_sent_page(RESET_SENT_MESSAGE))
            }
        }
        Err(err) => match user_message(&err) {
            Some(msg) => html_response_with_status(status_code(&err), reset_request_page(Some(msg))),
            None => Err(err),
        },
    }
}

fn reset_confirm_form(ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let token = ctx.query_param("token");
    let valid = state
        .db
        .with_conn(|conn| state.resets.token_is_valid(conn, token, ctx.now))?;

    if valid {
        html_response(reset_confirm_page(token, None))
    } else {
        html_response_with_status(401, reset_request_page(Some(INVALID_RESET_LINK)))
    }
}

fn confirm_reset(body: Body, ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let form = read_form(body)?;
    let token = field(&form, "token");
    let result = state.db.with_conn(|conn| {
        state
            .resets
            .reset_password(conn, token, field(&form, "password"), ctx.now)
    });

    match result {
        Ok(()) => redirect("/login?reset=1"),
        Err(ServerError::Unauthorized(_)) => {
            html_response_with_status(401, reset_request_page(Some(INVALID_RESET_LINK)))
        }
        Err(ServerError::BadRequest(msg)) => {
            html_response_with_status(400, reset_confirm_page(token, Some(&msg)))
        }
        Err(err) => Err(err),
    }
}

// ---------- pets ----------

fn load_feed(session: &Session, state: &AppState) -> Result<ReportFeed, ServerError> {
    let mut repo = state.repository();
    let all = repo.fetch_all_reports()?.to_vec();
    Ok(ReportFeed::load(all, session.auth.principal.as_ref()))
}

fn list_pets(ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let Some(session) = &ctx.session else {
        return redirect("/login");
    };

    let mut feed = load_feed(session, state)?;
    let query = ctx.query.get("q").map(String::as_str);
    if let Some(q) = query {
        feed.search(q);
    }
    html_response(listing_page(feed.displayed(), query.unwrap_or("")))
}

/// List fragment for live search.
fn search_pets(ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let session = ctx.require_session()?;
    let mut feed = load_feed(session, state)?;
    html_response(pet_list(feed.search(ctx.query_param("q"))))
}

fn pet_detail(id: &str, ctx: &RequestCtx, state: &AppState) -> ResultResp {
    ctx.require_session()?;
    if id.is_empty() || id.contains('/') {
        return Err(ServerError::NotFound);
    }
    let report = state
        .repository()
        .find_report(id)?
        .ok_or(ServerError::NotFound)?;
    html_response(detail_page(&report))
}

fn report_form(ctx: &RequestCtx) -> ResultResp {
    let session = ctx.require_session()?;
    if session.auth.is_guest() {
        return Err(ReportError::Unauthenticated.into());
    }

    let vm = ReportFormVm {
        species: SPECIES_OPTIONS[0].to_string(),
        flash: ctx
            .query
            .contains_key("created")
            .then(|| REPORT_CREATED_MESSAGE.to_string()),
        ..ReportFormVm::default()
    };
    html_response(report_form_page(&vm))
}

fn create_pet(body: Body, ctx: &RequestCtx, state: &AppState) -> ResultResp {
    let session = ctx
        .session
        .as_ref()
        .ok_or(ServerError::Report(ReportError::Unauthenticated))?;
    let form = read_form(body)?;

    let mut vm = ReportFormVm {
        name: field(&form, "name").to_string(),
        species: field(&form, "species").to_string(),
        description: field(&form, "description").to_string(),
        contact_info: field(&form, "contact_info").to_string(),
        latitude: field(&form, "latitude").to_string(),
        longitude: field(&form, "longitude").to_string(),
        address: field(&form, "address").to_string(),
        ..ReportFormVm::default()
    };

    let (mut draft, image) = match build_draft(&form) {
        Ok(parsed) => parsed,
        Err(msg) => {
            vm.error = Some(msg);
            return html_response_with_status(400, report_form_page(&vm));
        }
    };

    if draft.last_seen_address.is_empty() {
        let provider = locate(state, draft.last_seen_location, LocationSource::Pin);
        draft.last_seen_address = provider.snapshot().address.clone();
    }

    match state
        .repository()
        .create_report(&session.auth, draft, image.as_deref())
    {
        Ok(_) => redirect("/report?created=1"),
        Err(err) => {
            tracing::warn!(error = %err, "pet report rejected");
            vm.error = Some(err.to_string());
            let status = status_code(&ServerError::Report(err));
            html_response_with_status(status, report_form_page(&vm))
        }
    }
}

/// Form fields -> draft report plus decoded photo bytes.
fn build_draft(form: &HashMap<String, String>) -> Result<(Report, Option<Vec<u8>>), String> {
    let species = field(form, "species").trim();
    if !SPECIES_OPTIONS.contains(&species) {
        return Err(format!("Unknown species: {species}"));
    }

    let location = GeoPoint::new(
        parse_degrees(field(form, "latitude"), "latitude")?,
        parse_degrees(field(form, "longitude"), "longitude")?,
    )?;

    let draft = Report::draft(
        field(form, "name").trim(),
        species,
        field(form, "description").trim(),
        location,
        field(form, "address").trim(),
        field(form, "contact_info").trim(),
    );

    let missing = draft.missing_fields();
    if !missing.is_empty() {
        return Err(format!("Please fill in: {}", missing.join(", ")));
    }

    let image = match field(form, "image_base64").trim() {
        "" => None,
        encoded => Some(
            STANDARD
                .decode(encoded)
                .map_err(|_| IMAGE_DECODE_FAILED.to_string())?,
        ),
    };

    Ok((draft, image))
}

fn parse_degrees(raw: &str, name: &str) -> Result<f64, String> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| format!("{name} must be a number"))
}

/// Run one location change through a fresh provider and wait for its address.
fn locate(state: &AppState, point: GeoPoint, source: LocationSource) -> GeolocationProvider {
    let mut provider = GeolocationProvider::new(Arc::clone(&state.geocoder));
    match source {
        LocationSource::Pin => provider.set_manual_location(point),
        LocationSource::Device => {
            provider.start_updates();
            provider.on_device_location_update(point);
        }
    }
    provider.settle();
    provider
}

fn location_address(ctx: &RequestCtx, state: &AppState) -> ResultResp {
    ctx.require_session()?;

    let lat = parse_degrees(ctx.query_param("lat"), "lat").map_err(ServerError::BadRequest)?;
    let lon = parse_degrees(ctx.query_param("lon"), "lon").map_err(ServerError::BadRequest)?;
    let point = GeoPoint::new(lat, lon).map_err(ServerError::BadRequest)?;
    let source = LocationSource::parse(ctx.query_param("source"))?;

    let provider = locate(state, point, source);
    html_response(location_fragment(provider.snapshot(), provider.region()))
}

fn profile(ctx: &RequestCtx) -> ResultResp {
    let session = ctx.require_session()?;
    html_response(profile_page(
        session.auth.email.as_deref(),
        env!("CARGO_PKG_VERSION"),
    ))
}

fn serve_blob(key: &str, state: &AppState) -> ResultResp {
    let bytes = state.blobs.read(key).map_err(|e| match e {
        BlobError::InvalidKey(_) | BlobError::NotFound(_) => ServerError::NotFound,
        BlobError::Io(msg) => {
            tracing::error!(key, error = %msg, "blob read failed");
            ServerError::InternalError
        }
    })?;
    blob_response(bytes, key)
}

// ---------- helpers ----------

fn current_session(
    req: &Request,
    state: &AppState,
    now: i64,
) -> Result<Option<Session>, ServerError> {
    let Some(token) = req
        .headers()
        .get("cookie")
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_cookie_header)
    else {
        return Ok(None);
    };

    let auth = state.db.with_conn(|conn| load_session(conn, token, now))?;
    Ok(auth.map(|auth| Session {
        token: token.to_string(),
        auth,
    }))
}

fn parse_query(req: &Request) -> HashMap<String, String> {
    req.uri()
        .query()
        .map(|q| form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default()
}

fn read_form(mut body: Body) -> Result<HashMap<String, String>, ServerError> {
    let mut raw = Vec::new();
    body.reader()
        .take(MAX_FORM_BYTES + 1)
        .read_to_end(&mut raw)
        .map_err(|e| ServerError::BadRequest(format!("failed to read body: {e}")))?;

    if raw.len() as u64 > MAX_FORM_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    Ok(form_urlencoded::parse(&raw).into_owned().collect())
}

fn field<'a>(form: &'a HashMap<String, String>, key: &str) -> &'a str {
    form.get(key).map(String::as_str).unwrap_or("")
}

/// Errors whose text is meant for the person filling in the form.
fn user_message(err: &ServerError) -> Option<&str> {
    match err {
        ServerError::BadRequest(msg) | ServerError::Unauthorized(msg) => Some(msg),
        _ => None,
    }
}
