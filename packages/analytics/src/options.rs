//! Selector choices derived from the loaded record list.

use std::collections::HashSet;

use incident_dashboard_incident_models::IncidentRecord;

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .flatten()
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(ToString::to_string)
        .collect()
}

/// Distinct final call-type descriptions in first-seen order.
#[must_use]
pub fn distinct_call_types(records: &[IncidentRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.call_type_final_desc.as_deref()))
}

/// Distinct police districts in first-seen order.
#[must_use]
pub fn distinct_districts(records: &[IncidentRecord]) -> Vec<String> {
    distinct(records.iter().map(|r| r.police_district.as_deref()))
}
