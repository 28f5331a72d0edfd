#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Input and output types for the dashboard analytics.
//!
//! Inputs describe what the user has selected (filter criteria, view mode,
//! sort order); outputs are the derived views (metrics, chart buckets, table
//! page) computed from the filtered record list.

use chrono::{DateTime, TimeDelta, Utc};
use incident_dashboard_incident_models::{IncidentField, IncidentRecord, Priority, ZoneMode};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Rows per table page.
pub const PAGE_SIZE: usize = 10;

/// Maximum number of bars in the call-volume chart.
pub const TOP_CALL_TYPES: usize = 12;

/// Label for records without a final call-type description.
pub const UNKNOWN_CALL_TYPE: &str = "Unknown";

/// Sentinel used on external surfaces for "no constraint".
pub const ALL: &str = "All";

/// Relative window on the received timestamp.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum DateRange {
    /// No constraint.
    #[default]
    #[serde(rename = "all")]
    #[strum(serialize = "all")]
    All,
    /// Received within the last 24 hours.
    #[serde(rename = "24h")]
    #[strum(serialize = "24h")]
    Last24Hours,
    /// Received within the last 7 days.
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Last7Days,
    /// Received within the last 30 days.
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Last30Days,
}

impl DateRange {
    /// All ranges in selector order.
    pub const ALL: &[Self] = &[
        Self::All,
        Self::Last24Hours,
        Self::Last7Days,
        Self::Last30Days,
    ];

    /// How far back from the evaluation instant the window reaches, or
    /// `None` when unbounded.
    #[must_use]
    pub fn window(self) -> Option<TimeDelta> {
        match self {
            Self::All => None,
            Self::Last24Hours => Some(TimeDelta::hours(24)),
            Self::Last7Days => Some(TimeDelta::days(7)),
            Self::Last30Days => Some(TimeDelta::days(30)),
        }
    }

    /// Selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Time",
            Self::Last24Hours => "Last 24 Hours",
            Self::Last7Days => "Last 7 Days",
            Self::Last30Days => "Last 30 Days",
        }
    }
}

/// Which chart is shown, and whether the call-type predicate applies.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum ViewMode {
    /// Call counts by type; the call-type filter is active.
    #[default]
    CallVolume,
    /// Average response minutes by hour of day.
    ResponseTime,
}

impl ViewMode {
    /// All views in selector order.
    pub const ALL: &[Self] = &[Self::CallVolume, Self::ResponseTime];

    /// Selector label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CallVolume => "Call Volume Analysis",
            Self::ResponseTime => "Response Performance",
        }
    }
}

/// The conjunctive set of user-selected constraints. `None`/empty/`All`
/// means the predicate does not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Exact final priority.
    pub priority: Option<Priority>,
    /// Exact police district.
    pub police_district: Option<String>,
    /// Case-insensitive substring over either call-type description.
    pub search: String,
    /// Relative received-time window.
    pub date_range: DateRange,
    /// Exact final call-type description (call-volume view only).
    pub call_type: Option<String>,
}

impl FilterCriteria {
    /// Whether no predicate constrains.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

/// Table sort direction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Header indicator.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "\u{2191}",
            Self::Desc => "\u{2193}",
        }
    }
}

/// Table sort key and direction. Defaults to newest received first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    /// Column to sort by.
    pub field: IncidentField,
    /// Direction.
    pub direction: SortDirection,
}

impl SortState {
    /// The sort state after clicking `field`'s header: the same column
    /// flips direction, a different column starts ascending.
    #[must_use]
    pub fn toggled(self, field: IncidentField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::Asc,
            }
        }
    }
}

/// The instant and clock zone a computation is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalContext {
    /// Evaluation instant for relative date ranges.
    pub now: DateTime<Utc>,
    /// Zone for floating timestamps and hour-of-day.
    pub zone: ZoneMode,
}

impl EvalContext {
    /// A context evaluated at the current instant.
    #[must_use]
    pub fn current(zone: ZoneMode) -> Self {
        Self {
            now: Utc::now(),
            zone,
        }
    }
}

/// Scalar summaries of the filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    /// Number of filtered records.
    pub total_calls: usize,
    /// Rounded mean response minutes (0 when nothing qualifies).
    pub avg_response_minutes: i64,
    /// Rounded share of priority-A calls, 0-100.
    pub high_priority_percent: u8,
    /// District with the most calls, or `"N/A"`.
    pub top_district: String,
}

/// One bar of the call-volume chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallTypeCount {
    /// Final call-type description, or [`UNKNOWN_CALL_TYPE`].
    pub name: String,
    /// Number of filtered records with this description.
    pub count: u64,
}

/// One point of the response-time chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyResponse {
    /// Hour label, `"0:00"` through `"23:00"`.
    pub hour: String,
    /// Rounded mean response minutes for calls received in this hour.
    pub avg_response_minutes: i64,
}

/// Position of the current page within the sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Current page, 1-based.
    pub page: usize,
    /// `ceil(total / page_size)`; 0 for an empty list.
    pub total_pages: usize,
    /// Rows per page.
    pub page_size: usize,
    /// 1-based index of the first row shown (0 when empty).
    pub start: usize,
    /// 1-based index of the last row shown (0 when empty).
    pub end: usize,
    /// Total rows across all pages.
    pub total: usize,
}

impl PageInfo {
    /// `"Showing 11 - 20 of 25"`.
    #[must_use]
    pub fn showing(&self) -> String {
        format!("Showing {} - {} of {}", self.start, self.end, self.total)
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// The rows on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    /// Rows in sorted order.
    pub rows: Vec<IncidentRecord>,
    /// Pagination details.
    pub info: PageInfo,
}
