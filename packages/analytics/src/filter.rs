//! Filter evaluation.
//!
//! Predicates compose by logical AND. A predicate left at its default
//! (`None`, empty search, `DateRange::All`) does not constrain. A record
//! missing the field a predicate inspects does not match it.

use chrono::{DateTime, Utc};
use incident_dashboard_analytics_models::{EvalContext, FilterCriteria, ViewMode};
use incident_dashboard_incident_models::{IncidentRecord, Priority, ZoneMode};

/// Criteria resolved once per evaluation: search lowered, cutoff computed,
/// call type dropped outside the call-volume view.
struct Predicate<'c> {
    priority: Option<&'c str>,
    police_district: Option<&'c str>,
    needle: Option<String>,
    cutoff: Option<DateTime<Utc>>,
    call_type: Option<&'c str>,
    zone: ZoneMode,
}

impl<'c> Predicate<'c> {
    fn new(criteria: &'c FilterCriteria, view: ViewMode, ctx: &EvalContext) -> Self {
        Self {
            priority: criteria.priority.as_ref().map(<Priority as AsRef<str>>::as_ref),
            police_district: criteria.police_district.as_deref(),
            needle: (!criteria.search.is_empty()).then(|| criteria.search.to_lowercase()),
            cutoff: criteria.date_range.window().map(|window| ctx.now - window),
            call_type: match view {
                ViewMode::CallVolume => criteria.call_type.as_deref(),
                ViewMode::ResponseTime => None,
            },
            zone: ctx.zone,
        }
    }

    fn matches(&self, record: &IncidentRecord) -> bool {
        if let Some(priority) = self.priority
            && record.priority_final.as_deref() != Some(priority)
        {
            return false;
        }

        if let Some(district) = self.police_district
            && record.police_district.as_deref() != Some(district)
        {
            return false;
        }

        if let Some(needle) = &self.needle {
            let contains = |desc: Option<&str>| {
                desc.is_some_and(|d| d.to_lowercase().contains(needle.as_str()))
            };
            if !contains(record.call_type_final_desc.as_deref())
                && !contains(record.call_type_original_desc.as_deref())
            {
                return false;
            }
        }

        if let Some(cutoff) = self.cutoff
            && record.received_at(self.zone).is_none_or(|at| at < cutoff)
        {
            return false;
        }

        if let Some(call_type) = self.call_type
            && record.call_type_final_desc.as_deref() != Some(call_type)
        {
            return false;
        }

        true
    }
}

/// Whether `record` satisfies every active predicate.
#[must_use]
pub fn matches(
    record: &IncidentRecord,
    criteria: &FilterCriteria,
    view: ViewMode,
    ctx: &EvalContext,
) -> bool {
    Predicate::new(criteria, view, ctx).matches(record)
}

/// Returns the records satisfying every active predicate, in their original
/// relative order. The call-type predicate applies only in
/// [`ViewMode::CallVolume`].
#[must_use]
pub fn filter_incidents<'a>(
    records: &'a [IncidentRecord],
    criteria: &FilterCriteria,
    view: ViewMode,
    ctx: &EvalContext,
) -> Vec<&'a IncidentRecord> {
    let predicate = Predicate::new(criteria, view, ctx);
    let filtered: Vec<&IncidentRecord> = records.iter().filter(|r| predicate.matches(r)).collect();
    log::debug!(
        "Filtered {} of {} records (view={view})",
        filtered.len(),
        records.len()
    );
    filtered
}
