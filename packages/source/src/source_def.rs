//! Config-driven source definition.
//!
//! The dashboard reads from one fixed endpoint. Its definition is baked into
//! the binary from `sources/sf_dispatch.toml` and may be overridden through
//! environment variables.

use serde::Deserialize;

use crate::SourceError;

/// Embedded default definition.
const SF_DISPATCH_TOML: &str = include_str!("../sources/sf_dispatch.toml");

/// Overrides [`SourceDefinition::api_url`].
pub const API_URL_ENV: &str = "INCIDENT_DASHBOARD_API_URL";

/// Overrides [`SourceDefinition::record_limit`].
pub const RECORD_LIMIT_ENV: &str = "INCIDENT_DASHBOARD_RECORD_LIMIT";

/// Where and how to fetch the incident list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceDefinition {
    /// Unique identifier (e.g., `"sf_dispatch"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Socrata resource URL (`.../resource/<dataset>.json`).
    pub api_url: String,
    /// Human-readable data portal page.
    #[serde(default)]
    pub portal_url: Option<String>,
    /// Value sent as `$limit`; also the maximum number of records kept.
    pub record_limit: usize,
    /// Whole-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    30
}

impl SourceDefinition {
    /// Returns the embedded SF dispatch definition.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the embedded TOML is invalid.
    pub fn embedded() -> Result<Self, SourceError> {
        parse_source_toml(SF_DISPATCH_TOML)
    }

    /// Returns the embedded definition with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if the embedded TOML is invalid or
    /// an override does not parse.
    pub fn from_env() -> Result<Self, SourceError> {
        Self::embedded()?.with_overrides(
            std::env::var(API_URL_ENV).ok().as_deref(),
            std::env::var(RECORD_LIMIT_ENV).ok().as_deref(),
        )
    }

    /// Applies optional string overrides for the URL and record limit.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Config`] if `record_limit` is not a positive
    /// integer.
    pub fn with_overrides(
        mut self,
        api_url: Option<&str>,
        record_limit: Option<&str>,
    ) -> Result<Self, SourceError> {
        if let Some(url) = api_url.map(str::trim).filter(|s| !s.is_empty()) {
            log::debug!("Overriding API URL: {url}");
            self.api_url = url.to_string();
        }

        if let Some(limit) = record_limit.map(str::trim).filter(|s| !s.is_empty()) {
            self.record_limit = match limit.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(SourceError::Config {
                        message: format!("Invalid record limit '{limit}'"),
                    });
                }
            };
        }

        Ok(self)
    }
}

/// Parses a source definition from TOML.
///
/// # Errors
///
/// Returns [`SourceError::Config`] if the TOML is malformed or missing
/// required fields.
pub fn parse_source_toml(toml_str: &str) -> Result<SourceDefinition, SourceError> {
    toml::de::from_str(toml_str).map_err(|e| SourceError::Config {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_definition_parses() {
        let def = SourceDefinition::embedded().unwrap();
        assert_eq!(def.id, "sf_dispatch");
        assert_eq!(def.record_limit, 5000);
        assert!(def.api_url.ends_with("gnap-fj3t.json"));
        assert_eq!(def.request_timeout_secs, 30);
    }

    #[test]
    fn overrides_replace_url_and_limit() {
        let def = SourceDefinition::embedded()
            .unwrap()
            .with_overrides(Some("http://localhost:9000/rows.json"), Some("250"))
            .unwrap();
        assert_eq!(def.api_url, "http://localhost:9000/rows.json");
        assert_eq!(def.record_limit, 250);
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let embedded = SourceDefinition::embedded().unwrap();
        let def = embedded.clone().with_overrides(Some("  "), None).unwrap();
        assert_eq!(def, embedded);
    }

    #[test]
    fn rejects_invalid_limit() {
        let result = SourceDefinition::embedded()
            .unwrap()
            .with_overrides(None, Some("0"));
        assert!(matches!(result, Err(SourceError::Config { .. })));
    }

    #[test]
    fn timeout_defaults_when_missing() {
        let def = parse_source_toml(
            r#"
            id = "x"
            name = "X"
            api_url = "http://example.com/x.json"
            record_limit = 10
            "#,
        )
        .unwrap();
        assert_eq!(def.request_timeout_secs, 30);
        assert!(def.portal_url.is_none());
    }

    #[test]
    fn missing_fields_are_config_errors() {
        assert!(matches!(
            parse_source_toml("id = \"x\""),
            Err(SourceError::Config { .. })
        ));
    }
}
