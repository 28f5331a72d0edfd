#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the incident dashboard.
//!
//! The incident list is fetched once at startup and held read-only for the
//! life of the process. Each request carries the full dashboard state as
//! query parameters, so handlers are stateless: they filter the shared
//! store and derive every view synchronously before responding.

mod handlers;
pub mod interactive;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use incident_dashboard_incident_models::{IncidentRecord, ZoneMode};
use incident_dashboard_session::{RecordStore, failure_message};
use incident_dashboard_source::{IncidentSource, SourceError};

/// Shared application state.
pub struct AppState {
    /// Loaded records, or the message explaining why loading failed.
    pub records: Result<RecordStore, String>,
    /// Zone for floating timestamps and hour-of-day.
    pub zone: ZoneMode,
}

impl AppState {
    /// Builds the state that follows a completed load.
    #[must_use]
    pub fn from_load(result: Result<Vec<IncidentRecord>, SourceError>, zone: ZoneMode) -> Self {
        let records = match result {
            Ok(records) => {
                log::info!("Loaded {} incidents", records.len());
                Ok(RecordStore::new(records))
            }
            Err(e) => {
                log::error!("Incident load failed: {e}");
                Err(failure_message(&e))
            }
        };
        Self { records, zone }
    }

    /// Loads records from `source`.
    pub async fn load(source: &dyn IncidentSource, zone: ZoneMode) -> Self {
        log::info!("Loading incidents from {}...", source.name());
        Self::from_load(source.load().await, zone)
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/dashboard", web::get().to(handlers::dashboard))
            .route("/filter-options", web::get().to(handlers::filter_options)),
    );
}

/// Bind address and port from `BIND_ADDR` and `PORT`, defaulting to
/// `127.0.0.1:8080`.
#[must_use]
pub fn bind_from_env() -> (String, u16) {
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    (bind_addr, port)
}

/// Loads the incident list from `source` and serves the API until shut
/// down. A failed load still starts the server; data endpoints then
/// report the failure with `503 Service Unavailable`.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(source: &dyn IncidentSource, zone: ZoneMode) -> std::io::Result<()> {
    let state = web::Data::new(AppState::load(source, zone).await);

    let (bind_addr, port) = bind_from_env();
    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
