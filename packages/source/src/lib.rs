#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dispatch incident sources.
//!
//! An [`IncidentSource`] produces the session's record list exactly once.
//! The live source issues a single Socrata GET (see [`socrata`]); the
//! snapshot source reads a JSON file previously saved with
//! [`snapshot::save_snapshot`]. Neither retries: a failure is reported to
//! the caller, which shows it instead of the dashboard.

pub mod snapshot;
pub mod socrata;
pub mod source_def;

use std::path::PathBuf;

use async_trait::async_trait;
use incident_dashboard_incident_models::IncidentRecord;

pub use snapshot::SnapshotSource;
pub use socrata::SocrataSource;
pub use source_def::SourceDefinition;

/// Errors that can occur while loading incidents.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error (snapshot read/write).
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Source definition could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

/// Something that can supply the session's incident list.
#[async_trait]
pub trait IncidentSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"sf_dispatch"`).
    fn id(&self) -> &str;

    /// Returns the human-readable name of this source.
    fn name(&self) -> &str;

    /// Loads the full record list.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the records cannot be retrieved or the
    /// payload is not a JSON array.
    async fn load(&self) -> Result<Vec<IncidentRecord>, SourceError>;
}

/// Decodes raw JSON rows into records, skipping rows that are not objects.
#[must_use]
pub fn decode_records(rows: Vec<serde_json::Value>) -> Vec<IncidentRecord> {
    let raw_count = rows.len();
    let records: Vec<IncidentRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed row {idx}: {e}");
                None
            }
        })
        .collect();

    log::debug!("Decoded {} records from {raw_count} rows", records.len());
    records
}

/// Drops records beyond `limit`.
#[must_use]
pub fn enforce_limit(mut records: Vec<IncidentRecord>, limit: usize) -> Vec<IncidentRecord> {
    if records.len() > limit {
        log::warn!(
            "Source returned {} records, keeping the first {limit}",
            records.len()
        );
        records.truncate(limit);
    }
    records
}
