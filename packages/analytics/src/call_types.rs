//! Call-volume chart buckets.

use incident_dashboard_analytics_models::{CallTypeCount, TOP_CALL_TYPES, UNKNOWN_CALL_TYPE};
use incident_dashboard_incident_models::IncidentRecord;

use crate::grouping::OrderedCounter;

/// Longest chart axis label shown before truncation.
pub const MAX_LABEL_CHARS: usize = 12;

/// The bucket label for `record`: its final call-type description, or
/// [`UNKNOWN_CALL_TYPE`] when missing or empty.
#[must_use]
pub fn call_type_label(record: &IncidentRecord) -> &str {
    record
        .call_type_final_desc
        .as_deref()
        .filter(|desc| !desc.is_empty())
        .unwrap_or(UNKNOWN_CALL_TYPE)
}

/// Counts records per call type and keeps the [`TOP_CALL_TYPES`] largest.
/// Equal counts keep the order in which the call type first appeared.
#[must_use]
pub fn bucket_call_types(records: &[&IncidentRecord]) -> Vec<CallTypeCount> {
    let counter: OrderedCounter = records.iter().map(|r| call_type_label(r)).collect();
    log::trace!("Bucketed {} distinct call types", counter.len());

    counter
        .ranked()
        .into_iter()
        .take(TOP_CALL_TYPES)
        .map(|(name, count)| CallTypeCount { name, count })
        .collect()
}

/// The call-type selection after clicking the bar labelled `clicked`:
/// clicking the selected bar or an unlabelled bar clears the selection, any
/// other bar selects it.
#[must_use]
pub fn toggled_call_type(current: Option<&str>, clicked: &str) -> Option<String> {
    if clicked.is_empty() || current == Some(clicked) {
        None
    } else {
        Some(clicked.to_string())
    }
}

/// Shortens a chart axis label to [`MAX_LABEL_CHARS`] characters plus
/// `"..."`.
#[must_use]
pub fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_LABEL_CHARS {
        let head: String = label.chars().take(MAX_LABEL_CHARS).collect();
        format!("{head}...")
    } else {
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_desc(desc: Option<&str>) -> IncidentRecord {
        IncidentRecord {
            call_type_final_desc: desc.map(ToString::to_string),
            ..IncidentRecord::default()
        }
    }

    fn names(buckets: &[CallTypeCount]) -> Vec<&str> {
        buckets.iter().map(|b| b.name.as_str()).collect()
    }

    #[test]
    fn missing_descriptions_bucket_as_unknown() {
        let records = [with_desc(None), with_desc(Some("")), with_desc(Some("Theft"))];
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        let buckets = bucket_call_types(&refs);
        assert_eq!(
            buckets,
            vec![
                CallTypeCount {
                    name: "Unknown".to_string(),
                    count: 2,
                },
                CallTypeCount {
                    name: "Theft".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn ranks_by_count_with_first_seen_tie_break() {
        let records = [
            with_desc(Some("Noise")),
            with_desc(Some("Theft")),
            with_desc(Some("Assault")),
            with_desc(Some("Theft")),
            with_desc(Some("Assault")),
            with_desc(Some("Noise")),
            with_desc(Some("Fire")),
            with_desc(Some("Assault")),
        ];
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        let buckets = bucket_call_types(&refs);
        assert_eq!(names(&buckets), vec!["Assault", "Noise", "Theft", "Fire"]);
        assert_eq!(buckets[0].count, 3);
    }

    #[test]
    fn keeps_at_most_twelve_buckets() {
        let labels: Vec<String> = (0..20).map(|i| format!("Type {i:02}")).collect();
        let records: Vec<IncidentRecord> = labels
            .iter()
            .enumerate()
            .flat_map(|(i, label)| {
                std::iter::repeat_n(with_desc(Some(label)), 20 - i)
            })
            .collect();
        let refs: Vec<&IncidentRecord> = records.iter().collect();

        let buckets = bucket_call_types(&refs);
        assert_eq!(buckets.len(), TOP_CALL_TYPES);
        assert_eq!(buckets[0].name, "Type 00");
        assert_eq!(buckets[11].name, "Type 11");
        assert!(buckets.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn empty_input_has_no_buckets() {
        assert!(bucket_call_types(&[]).is_empty());
    }

    #[test]
    fn clicking_selected_bar_clears_selection() {
        let selected = toggled_call_type(None, "Theft");
        assert_eq!(selected.as_deref(), Some("Theft"));

        let cleared = toggled_call_type(selected.as_deref(), "Theft");
        assert_eq!(cleared, None);

        let switched = toggled_call_type(Some("Theft"), "Noise");
        assert_eq!(switched.as_deref(), Some("Noise"));
    }

    #[test]
    fn unlabelled_bar_clears_selection() {
        assert_eq!(toggled_call_type(None, ""), None);
        assert_eq!(toggled_call_type(Some("Theft"), ""), None);
    }

    #[test]
    fn truncates_long_labels() {
        assert_eq!(truncate_label("Traffic Stop"), "Traffic Stop");
        assert_eq!(truncate_label("Suspicious Person"), "Suspicious P...");
        assert_eq!(truncate_label(""), "");
    }
}
