//! Response-time chart buckets.

use incident_dashboard_analytics_models::HourlyResponse;
use incident_dashboard_incident_models::{IncidentRecord, ZoneMode};

use crate::round_half_up;

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: usize = 24;

/// Axis label for `hour`, e.g. `"7:00"`.
#[must_use]
pub fn hour_label(hour: usize) -> String {
    format!("{hour}:00")
}

/// Averages response minutes per hour of day the call was received.
///
/// Always returns 24 entries ordered `"0:00"` through `"23:00"`. Records
/// without both timestamps, or with on-scene before received, are skipped;
/// an hour with no remaining records reports 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bucket_hourly_response(records: &[&IncidentRecord], zone: ZoneMode) -> Vec<HourlyResponse> {
    let mut sums = [0.0_f64; HOURS_PER_DAY];
    let mut counts = [0_usize; HOURS_PER_DAY];

    for record in records {
        let Some(received) = record.received_at(zone) else {
            continue;
        };
        let Some(minutes) = record.response_minutes(zone) else {
            continue;
        };
        if minutes < 0.0 {
            log::trace!("Skipping inverted response time for {:?}", record.id);
            continue;
        }

        let hour = zone.hour_of_day(received) as usize;
        sums[hour] += minutes;
        counts[hour] += 1;
    }

    sums.iter()
        .zip(counts)
        .enumerate()
        .map(|(hour, (sum, count))| HourlyResponse {
            hour: hour_label(hour),
            avg_response_minutes: if count == 0 {
                0
            } else {
                round_half_up(sum / count as f64)
            },
        })
        .collect()
}
