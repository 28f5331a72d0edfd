#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dispatch incident record types, table column definitions and timestamp
//! parsing.
//!
//! An [`IncidentRecord`] mirrors one row of the SF "Law Enforcement
//! Dispatched Calls for Service" dataset. Every field is optional and
//! deserialization never fails on a single bad field: numbers and booleans
//! are kept as their string form, and anything else is dropped.

use chrono::{
    DateTime, Local, NaiveDate, NaiveDateTime, Offset as _, TimeDelta, TimeZone, Timelike as _, Utc,
};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Placeholder shown for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// The clock zone used to interpret floating timestamps and to derive the
/// hour of day.
///
/// Socrata publishes timestamps without an offset (`2024-01-15T14:30:00.000`).
/// They are read as wall-clock time in this zone, the same way a browser
/// reads them.
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
pub enum ZoneMode {
    /// The host's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

impl ZoneMode {
    /// Parses an ISO-8601 timestamp into an absolute instant.
    ///
    /// Accepts RFC 3339 values (`Z` or an explicit offset), floating
    /// date-times with or without fractional seconds, and bare dates
    /// (midnight). Returns `None` for empty or unparseable input.
    #[must_use]
    pub fn parse_timestamp(self, s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&Utc));
        }

        let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })?;

        self.localize(naive)
    }

    /// Resolves a wall-clock time in this zone to an instant. Ambiguous
    /// times (DST fall-back) resolve to the earlier instant; nonexistent
    /// times (DST spring-forward gap) are shifted forward past the gap.
    #[must_use]
    pub fn localize(self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            Self::Utc => Some(naive.and_utc()),
            Self::Local => resolve_wall_clock(&Local, naive),
        }
    }

    /// Returns the hour of day (0-23) of `instant` in this zone.
    #[must_use]
    pub fn hour_of_day(self, instant: DateTime<Utc>) -> u32 {
        match self {
            Self::Utc => instant.hour(),
            Self::Local => instant.with_timezone(&Local).hour(),
        }
    }

    /// Formats `instant` for display in this zone.
    #[must_use]
    pub fn format(self, instant: DateTime<Utc>) -> String {
        const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
        match self {
            Self::Utc => instant.format(FORMAT).to_string(),
            Self::Local => instant.with_timezone(&Local).format(FORMAT).to_string(),
        }
    }
}

/// Longest DST gap searched backwards for the offset in effect before it.
const MAX_GAP_HOURS: i64 = 24;

/// Resolves `naive` in `tz`. A wall time inside a spring-forward gap is read
/// with the offset in effect just before the gap, which lands it the gap's
/// width later on the new offset.
fn resolve_wall_clock<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return Some(dt.with_timezone(&Utc));
    }

    let before = (1..=MAX_GAP_HOURS)
        .find_map(|h| tz.from_local_datetime(&(naive - TimeDelta::hours(h))).earliest())?;
    let offset = before.offset().fix();
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Dispatch priority assigned to a call.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum Priority {
    /// Emergency: imminent threat to life or property.
    A,
    /// Urgent, no immediate threat.
    B,
    /// Routine.
    C,
}

impl Priority {
    /// Human-readable urgency label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "High",
            Self::B => "Medium",
            Self::C => "Low",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::A, Self::B, Self::C]
    }
}

/// One dispatched call for service.
///
/// Field names match the source dataset so that raw snapshots round-trip
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Row identifier.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Computer-aided dispatch case number.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub cad_number: Option<String>,
    /// When the call was received.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub received_datetime: Option<String>,
    /// When the first unit arrived on scene.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub onscene_datetime: Option<String>,
    /// When the call was closed.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub close_datetime: Option<String>,
    /// Call-type code at intake.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub call_type_original: Option<String>,
    /// Call-type description at intake.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub call_type_original_desc: Option<String>,
    /// Call-type code after disposition.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub call_type_final: Option<String>,
    /// Call-type description after disposition.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub call_type_final_desc: Option<String>,
    /// Final priority code (`"A"`, `"B"` or `"C"`).
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub priority_final: Option<String>,
    /// Responding agency.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    /// Police district the call was assigned to.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub police_district: Option<String>,
}

impl IncidentRecord {
    /// Parsed received timestamp.
    #[must_use]
    pub fn received_at(&self, zone: ZoneMode) -> Option<DateTime<Utc>> {
        self.received_datetime
            .as_deref()
            .and_then(|s| zone.parse_timestamp(s))
    }

    /// Parsed on-scene timestamp.
    #[must_use]
    pub fn onscene_at(&self, zone: ZoneMode) -> Option<DateTime<Utc>> {
        self.onscene_datetime
            .as_deref()
            .and_then(|s| zone.parse_timestamp(s))
    }

    /// Minutes from receipt to arrival on scene. Negative when the source
    /// data has the two timestamps inverted. `None` unless both timestamps
    /// are present and parseable.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn response_minutes(&self, zone: ZoneMode) -> Option<f64> {
        let received = self.received_at(zone)?;
        let onscene = self.onscene_at(zone)?;
        let elapsed = onscene.signed_duration_since(received);
        Some(elapsed.num_milliseconds() as f64 / 60_000.0)
    }

    /// Whether the final priority is [`Priority::A`].
    #[must_use]
    pub fn is_high_priority(&self) -> bool {
        self.priority_final.as_deref() == Some(Priority::A.as_ref())
    }
}

/// Keeps strings as-is, stringifies numbers and booleans, and drops
/// everything else.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A table column. Each variant names one [`IncidentRecord`] field, and its
/// wire form is the dataset's field name.
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
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IncidentField {
    Id,
    CadNumber,
    #[default]
    ReceivedDatetime,
    OnsceneDatetime,
    CloseDatetime,
    CallTypeOriginal,
    CallTypeOriginalDesc,
    CallTypeFinal,
    CallTypeFinalDesc,
    PriorityFinal,
    Agency,
    PoliceDistrict,
}

impl IncidentField {
    /// Columns in table order.
    pub const ALL: &[Self] = &[
        Self::Id,
        Self::CadNumber,
        Self::ReceivedDatetime,
        Self::OnsceneDatetime,
        Self::CloseDatetime,
        Self::CallTypeOriginal,
        Self::CallTypeOriginalDesc,
        Self::CallTypeFinal,
        Self::CallTypeFinalDesc,
        Self::PriorityFinal,
        Self::Agency,
        Self::PoliceDistrict,
    ];

    /// Column header text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::CadNumber => "CAD Number",
            Self::ReceivedDatetime => "Received",
            Self::OnsceneDatetime => "On Scene",
            Self::CloseDatetime => "Close",
            Self::CallTypeOriginal => "Call Type O",
            Self::CallTypeOriginalDesc => "Call Type O Desc",
            Self::CallTypeFinal => "Call Type F",
            Self::CallTypeFinalDesc => "Call Type F Desc",
            Self::PriorityFinal => "Priority",
            Self::Agency => "Agency",
            Self::PoliceDistrict => "Police District",
        }
    }

    /// Whether this column holds a timestamp.
    #[must_use]
    pub const fn is_timestamp(self) -> bool {
        matches!(
            self,
            Self::ReceivedDatetime | Self::OnsceneDatetime | Self::CloseDatetime
        )
    }

    /// The raw value of this column in `record`.
    #[must_use]
    pub fn value(self, record: &IncidentRecord) -> Option<&str> {
        match self {
            Self::Id => record.id.as_deref(),
            Self::CadNumber => record.cad_number.as_deref(),
            Self::ReceivedDatetime => record.received_datetime.as_deref(),
            Self::OnsceneDatetime => record.onscene_datetime.as_deref(),
            Self::CloseDatetime => record.close_datetime.as_deref(),
            Self::CallTypeOriginal => record.call_type_original.as_deref(),
            Self::CallTypeOriginalDesc => record.call_type_original_desc.as_deref(),
            Self::CallTypeFinal => record.call_type_final.as_deref(),
            Self::CallTypeFinalDesc => record.call_type_final_desc.as_deref(),
            Self::PriorityFinal => record.priority_final.as_deref(),
            Self::Agency => record.agency.as_deref(),
            Self::PoliceDistrict => record.police_district.as_deref(),
        }
    }

    /// Display text for this column in `record`: timestamps rendered in
    /// `zone`, absent values as [`NOT_AVAILABLE`].
    #[must_use]
    pub fn display(self, record: &IncidentRecord, zone: ZoneMode) -> String {
        let Some(raw) = self.value(record).filter(|s| !s.is_empty()) else {
            return NOT_AVAILABLE.to_string();
        };
        if self.is_timestamp() {
            return zone
                .parse_timestamp(raw)
                .map_or_else(|| raw.to_string(), |dt| zone.format(dt));
        }
        raw.to_string()
    }
}
