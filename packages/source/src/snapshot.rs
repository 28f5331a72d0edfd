//! Offline snapshots of the raw dataset.
//!
//! A snapshot is the JSON array exactly as the API returned it, so a saved
//! file can stand in for the live endpoint.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use incident_dashboard_incident_models::IncidentRecord;

use crate::{IncidentSource, SourceError, decode_records, enforce_limit};

/// Writes raw rows to `path` as a JSON array, creating parent directories.
///
/// # Errors
///
/// Returns [`SourceError`] if serialization or file I/O fails.
pub fn save_snapshot(path: &Path, rows: &[serde_json::Value]) -> Result<(), SourceError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| SourceError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string(rows)?;
    std::fs::write(path, json).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Reads a snapshot file and decodes its rows.
///
/// # Errors
///
/// Returns [`SourceError`] if the file cannot be read or is not a JSON
/// array.
pub fn load_snapshot(path: &Path) -> Result<Vec<IncidentRecord>, SourceError> {
    let data = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<serde_json::Value> = serde_json::from_str(&data)?;
    Ok(decode_records(rows))
}

/// Source that replays a saved snapshot.
pub struct SnapshotSource {
    path: PathBuf,
    record_limit: usize,
    label: String,
}

impl SnapshotSource {
    /// Creates a source reading `path`, keeping at most `record_limit` rows.
    #[must_use]
    pub fn new(path: PathBuf, record_limit: usize) -> Self {
        let label = format!("Snapshot {}", path.display());
        Self {
            path,
            record_limit,
            label,
        }
    }
}

#[async_trait]
impl IncidentSource for SnapshotSource {
    fn id(&self) -> &str {
        "snapshot"
    }

    fn name(&self) -> &str {
        &self.label
    }

    async fn load(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        log::info!("Loading incidents from {}", self.path.display());
        Ok(enforce_limit(load_snapshot(&self.path)?, self.record_limit))
    }
}
