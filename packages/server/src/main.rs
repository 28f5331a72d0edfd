#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone entry point for the incident dashboard API server.
//!
//! Fetches from the live endpoint configured by the embedded source
//! definition and its `INCIDENT_DASHBOARD_*` environment overrides.

use incident_dashboard_incident_models::ZoneMode;
use incident_dashboard_source::{SocrataSource, SourceDefinition};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let definition = SourceDefinition::from_env().map_err(std::io::Error::other)?;
    let source = SocrataSource::new(definition).map_err(std::io::Error::other)?;

    incident_dashboard_server::run_server(&source, ZoneMode::default()).await
}
