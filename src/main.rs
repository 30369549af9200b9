use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::geo::NominatimGeocoder;
use crate::router::{handle, AppState};
use astra::Server;
use std::env;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod db;
mod domain;
mod errors;
mod geo;
mod repository;
mod responses;
mod router;
mod storage;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    // 1️⃣ Apply the schema before any worker touches the database
    if let Err(e) = init_db(&Database::new(config.db_path.clone())) {
        tracing::error!(error = %e, "database initialization failed");
        std::process::exit(1);
    }

    // 2️⃣ Reverse geocoder for last-seen addresses
    let geocoder = match NominatimGeocoder::new(
        &config.geocoder_url,
        &config.geocoder_user_agent,
        config.geocoder_timeout_secs,
    ) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!(error = %e, "geocoder setup failed");
            std::process::exit(1);
        }
    };

    let state = AppState::new(config, Arc::new(geocoder));
    let addr = state.config.bind_addr;
    let max_workers = state.config.max_workers;
    tracing::info!(%addr, max_workers, blobs = %state.blobs.root().display(), "starting server");

    // 3️⃣ Serve requests; handler errors become HTML error pages
    let result = Server::bind(&addr)
        .max_workers(max_workers)
        .serve(move |req, _info| match handle(req, &state) {
            Ok(resp) => resp,
            Err(err) => responses::error_to_response(err),
        });

    if let Err(e) = result {
        tracing::error!(error = %e, "server ended with error");
    }

    tracing::info!("server shut down cleanly");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_json = env::var("PETS_LOG_JSON")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);

    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
