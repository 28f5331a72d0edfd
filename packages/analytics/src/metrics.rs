//! Scalar summaries of the filtered list.

use incident_dashboard_analytics_models::DashboardMetrics;
use incident_dashboard_incident_models::{IncidentRecord, NOT_AVAILABLE, ZoneMode};

use crate::{grouping::OrderedCounter, round_half_up};

/// Rounded mean response minutes over records with both timestamps
/// parseable, or 0 when none qualify.
///
/// Negative elapsed times (on-scene before received) are included, unlike
/// [`crate::hourly::bucket_hourly_response`] which discards them.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_response_minutes(records: &[&IncidentRecord], zone: ZoneMode) -> i64 {
    let (sum, count) = records
        .iter()
        .filter_map(|r| r.response_minutes(zone))
        .fold((0.0_f64, 0_usize), |(sum, count), minutes| {
            (sum + minutes, count + 1)
        });

    if count == 0 {
        return 0;
    }

    round_half_up(sum / count as f64)
}

/// Share of priority-A records as a rounded percentage, 0 for an empty
/// list.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn high_priority_percent(records: &[&IncidentRecord]) -> u8 {
    if records.is_empty() {
        return 0;
    }

    let high = records.iter().filter(|r| r.is_high_priority()).count();
    round_half_up(high as f64 / records.len() as f64 * 100.0).clamp(0, 100) as u8
}

/// The most frequent non-empty police district. Ties go to the district
/// seen first; `"N/A"` when no record has a district.
#[must_use]
pub fn top_district(records: &[&IncidentRecord]) -> String {
    let counter: OrderedCounter = records
        .iter()
        .filter_map(|r| r.police_district.as_deref())
        .filter(|d| !d.is_empty())
        .collect();

    counter
        .leader()
        .map_or_else(|| NOT_AVAILABLE.to_string(), ToString::to_string)
}

/// Computes all four dashboard metrics.
#[must_use]
pub fn compute_metrics(records: &[&IncidentRecord], zone: ZoneMode) -> DashboardMetrics {
    DashboardMetrics {
        total_calls: records.len(),
        avg_response_minutes: average_response_minutes(records, zone),
        high_priority_percent: high_priority_percent(records),
        top_district: top_district(records),
    }
}
