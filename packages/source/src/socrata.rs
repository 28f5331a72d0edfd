//! Socrata SODA fetcher.
//!
//! Issues exactly one `GET {api_url}?$limit={record_limit}` and decodes the
//! JSON array body. There is no pagination of requests and no retry.

use std::time::Duration;

use async_trait::async_trait;
use incident_dashboard_incident_models::IncidentRecord;

use crate::{IncidentSource, SourceDefinition, SourceError, decode_records, enforce_limit};

/// Live source backed by a Socrata dataset.
pub struct SocrataSource {
    definition: SourceDefinition,
    client: reqwest::Client,
}

impl SocrataSource {
    /// Creates a source for `definition`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(definition: SourceDefinition) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(definition.request_timeout_secs))
            .build()?;
        Ok(Self { definition, client })
    }

    /// The definition this source fetches from.
    #[must_use]
    pub const fn definition(&self) -> &SourceDefinition {
        &self.definition
    }

    /// Fetches the raw JSON rows without decoding them into records.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure, a non-success status,
    /// or a body that is not a JSON array.
    pub async fn fetch_rows(&self) -> Result<Vec<serde_json::Value>, SourceError> {
        let url = &self.definition.api_url;
        let limit = self.definition.record_limit.to_string();

        log::info!("Fetching {} (limit={limit})", self.definition.name);
        let response = self
            .client
            .get(url)
            .query(&[("$limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::error!("{url} returned HTTP {status}");
            return Err(SourceError::Status {
                url: response.url().to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let rows: Vec<serde_json::Value> = serde_json::from_str(&body)?;
        log::info!("Downloaded {} {} rows", rows.len(), self.definition.id);
        Ok(rows)
    }
}

#[async_trait]
impl IncidentSource for SocrataSource {
    fn id(&self) -> &str {
        &self.definition.id
    }

    fn name(&self) -> &str {
        &self.definition.name
    }

    async fn load(&self) -> Result<Vec<IncidentRecord>, SourceError> {
        let rows = self.fetch_rows().await?;
        Ok(enforce_limit(
            decode_records(rows),
            self.definition.record_limit,
        ))
    }
}
