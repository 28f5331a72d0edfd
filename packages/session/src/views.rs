//! Derived views: everything shown on screen, computed from the record
//! store and the session state in one synchronous pass.

use incident_dashboard_analytics::{
    bucket_call_types, bucket_hourly_response, compute_metrics, filter_incidents, paginate,
    sort_incidents,
};
use incident_dashboard_analytics_models::{
    CallTypeCount, DashboardMetrics, EvalContext, HourlyResponse, TablePage, ViewMode,
};
use incident_dashboard_incident_models::IncidentRecord;
use serde::{Deserialize, Serialize};

use crate::DashboardState;

/// The chart for the active view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChartView {
    /// Top call types by count.
    #[serde(rename_all = "camelCase")]
    CallVolume {
        /// Up to 12 bars, largest first.
        buckets: Vec<CallTypeCount>,
        /// The highlighted bar, if a call type is selected.
        selected: Option<String>,
    },
    /// Mean response minutes by hour received.
    #[serde(rename_all = "camelCase")]
    ResponseTime {
        /// Exactly 24 points, hour 0 first.
        hourly: Vec<HourlyResponse>,
    },
}

/// Everything derived from one state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViews {
    /// Headline numbers.
    pub metrics: DashboardMetrics,
    /// Chart for the active view.
    pub chart: ChartView,
    /// Current table page.
    pub table: TablePage,
}

impl DashboardViews {
    /// Page count of the table, used to bound page navigation.
    #[must_use]
    pub const fn total_pages(&self) -> usize {
        self.table.info.total_pages
    }

    /// Whether the filters left nothing to show.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.table.info.total == 0
    }
}

/// Filters `records` by `state` and derives every view from the result.
#[must_use]
pub fn compute_views(
    records: &[IncidentRecord],
    state: &DashboardState,
    ctx: &EvalContext,
) -> DashboardViews {
    let mut filtered = filter_incidents(records, &state.filters, state.view, ctx);

    let metrics = compute_metrics(&filtered, ctx.zone);
    let chart = match state.view {
        ViewMode::CallVolume => ChartView::CallVolume {
            buckets: bucket_call_types(&filtered),
            selected: state.filters.call_type.clone(),
        },
        ViewMode::ResponseTime => ChartView::ResponseTime {
            hourly: bucket_hourly_response(&filtered, ctx.zone),
        },
    };

    sort_incidents(&mut filtered, state.sort);
    let table = paginate(&filtered, state.page);

    DashboardViews {
        metrics,
        chart,
        table,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone as _, Utc};
    use incident_dashboard_analytics_models::SortState;
    use incident_dashboard_incident_models::{IncidentField, Priority, ZoneMode};

    use super::*;

    fn ctx() -> EvalContext {
        EvalContext {
            now: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            zone: ZoneMode::Utc,
        }
    }

    fn scenario() -> Vec<IncidentRecord> {
        vec![
            IncidentRecord {
                id: Some("1".to_string()),
                priority_final: Some("A".to_string()),
                received_datetime: Some("2024-01-01T10:00:00Z".to_string()),
                onscene_datetime: Some("2024-01-01T10:08:00Z".to_string()),
                police_district: Some("Mission".to_string()),
                ..IncidentRecord::default()
            },
            IncidentRecord {
                id: Some("2".to_string()),
                priority_final: Some("B".to_string()),
                received_datetime: Some("2024-01-01T11:00:00Z".to_string()),
                onscene_datetime: None,
                police_district: Some("Mission".to_string()),
                ..IncidentRecord::default()
            },
        ]
    }

    #[test]
    fn unfiltered_scenario_views() {
        let views = compute_views(&scenario(), &DashboardState::default(), &ctx());
        assert_eq!(views.metrics.total_calls, 2);
        assert_eq!(views.metrics.avg_response_minutes, 8);
        assert_eq!(views.metrics.top_district, "Mission");
        assert_eq!(
            views.chart,
            ChartView::CallVolume {
                buckets: vec![CallTypeCount {
                    name: "Unknown".to_string(),
                    count: 2,
                }],
                selected: None,
            }
        );
        // Newest first.
        assert_eq!(views.table.rows[0].id.as_deref(), Some("2"));
    }

    #[test]
    fn priority_filter_narrows_every_view() {
        let state = DashboardState {
            filters: incident_dashboard_analytics_models::FilterCriteria {
                priority: Some(Priority::A),
                ..Default::default()
            },
            ..DashboardState::default()
        };
        let views = compute_views(&scenario(), &state, &ctx());
        assert_eq!(views.metrics.total_calls, 1);
        assert_eq!(views.metrics.high_priority_percent, 100);
        assert_eq!(views.table.rows.len(), 1);
        assert_eq!(views.table.rows[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn response_view_has_hourly_chart() {
        let state = DashboardState {
            view: ViewMode::ResponseTime,
            sort: SortState::default().toggled(IncidentField::Id),
            ..DashboardState::default()
        };
        let views = compute_views(&scenario(), &state, &ctx());
        let ChartView::ResponseTime { hourly } = &views.chart else {
            panic!("expected response time chart");
        };
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly[10].avg_response_minutes, 8);
        assert_eq!(views.table.rows[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn empty_result_is_reported() {
        let state = DashboardState {
            filters: incident_dashboard_analytics_models::FilterCriteria {
                search: "nothing matches".to_string(),
                ..Default::default()
            },
            ..DashboardState::default()
        };
        let views = compute_views(&scenario(), &state, &ctx());
        assert!(views.is_empty());
        assert_eq!(views.total_pages(), 0);
        assert_eq!(views.metrics.top_district, "N/A");
    }

    #[test]
    fn serializes_chart_with_kind_tag() {
        let views = compute_views(&scenario(), &DashboardState::default(), &ctx());
        let json = serde_json::to_value(&views).unwrap();
        assert_eq!(json["chart"]["kind"], "callVolume");
        assert_eq!(json["metrics"]["avgResponseMinutes"], 8);
        assert_eq!(json["table"]["info"]["totalPages"], 1);
    }
}
