#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the incident dashboard server.
//!
//! Query parameters arrive as loose strings using the same `"All"`
//! sentinel as the dashboard's selectors; [`DashboardQueryParams::to_state`]
//! turns them into a typed [`DashboardState`].

use std::str::FromStr;

use incident_dashboard_analytics_models::{
    ALL, DateRange, FilterCriteria, SortDirection, SortState, ViewMode,
};
use incident_dashboard_incident_models::{IncidentField, Priority};
use incident_dashboard_session::{DashboardState, DashboardViews};
use serde::{Deserialize, Serialize};

/// A query parameter that could not be interpreted.
#[derive(Debug, thiserror::Error)]
#[error("Invalid value '{value}' for parameter '{param}'")]
pub struct InvalidParam {
    /// Parameter name as sent on the wire.
    pub param: &'static str,
    /// The rejected value.
    pub value: String,
}

/// Query parameters for the dashboard endpoint. Every parameter is
/// optional and defaults to the dashboard's initial state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQueryParams {
    /// Free-text search over call-type descriptions.
    pub search: Option<String>,
    /// `all`, `24h`, `7d` or `30d`.
    pub date_range: Option<String>,
    /// `A`, `B`, `C` or `All`.
    pub priority: Option<String>,
    /// Police district or `All`.
    pub district: Option<String>,
    /// Final call-type description or `All`.
    pub call_type: Option<String>,
    /// `callVolume` or `responseTime`.
    pub view: Option<String>,
    /// Column to sort by, as the dataset field name.
    pub sort: Option<String>,
    /// `asc` or `desc`.
    pub direction: Option<String>,
    /// Table page, 1-based.
    pub page: Option<usize>,
}

/// `None` for a missing, blank or `"All"` selection.
fn selection(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty() && *v != ALL)
}

fn parse_param<T: FromStr>(param: &'static str, value: &str) -> Result<T, InvalidParam> {
    value.parse().map_err(|_| InvalidParam {
        param,
        value: value.to_string(),
    })
}

impl DashboardQueryParams {
    /// Converts the parameters into a dashboard state.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidParam`] for an unrecognised date range, priority,
    /// view, sort column or direction.
    pub fn to_state(&self) -> Result<DashboardState, InvalidParam> {
        let defaults = DashboardState::default();

        let date_range = match self.date_range.as_deref() {
            Some(v) if !v.is_empty() => parse_param::<DateRange>("dateRange", v)?,
            _ => DateRange::All,
        };
        let priority = selection(self.priority.as_deref())
            .map(|v| parse_param::<Priority>("priority", v))
            .transpose()?;
        let view = match self.view.as_deref() {
            Some(v) if !v.is_empty() => parse_param::<ViewMode>("view", v)?,
            _ => defaults.view,
        };
        let field = match self.sort.as_deref() {
            Some(v) if !v.is_empty() => parse_param::<IncidentField>("sort", v)?,
            _ => defaults.sort.field,
        };
        let direction = match self.direction.as_deref() {
            Some(v) if !v.is_empty() => parse_param::<SortDirection>("direction", v)?,
            _ => defaults.sort.direction,
        };

        Ok(DashboardState {
            filters: FilterCriteria {
                priority,
                police_district: selection(self.district.as_deref()).map(ToString::to_string),
                search: self.search.clone().unwrap_or_default(),
                date_range,
                call_type: selection(self.call_type.as_deref()).map(ToString::to_string),
            },
            view,
            sort: SortState { field, direction },
            page: self.page.unwrap_or(defaults.page),
        })
    }
}

/// Response body for `GET /api/dashboard`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDashboard {
    /// The state the views were computed from.
    pub state: DashboardState,
    /// Derived metrics, chart and table page.
    pub views: DashboardViews,
    /// Records in the store before filtering.
    pub total_records: usize,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the record store loaded.
    pub healthy: bool,
    /// Service version.
    pub version: String,
    /// Records held in the store.
    pub records: usize,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// User-facing message.
    pub error: String,
}

impl ApiError {
    /// Wraps a message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
