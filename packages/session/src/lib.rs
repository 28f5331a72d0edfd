#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard session orchestration.
//!
//! A session owns the record store (written once when the fetch completes),
//! the user's [`DashboardState`], and the [`DashboardViews`] derived from
//! both. Every [`Dashboard::dispatch`] reduces the state and recomputes all
//! views before any subscriber sees them, so no view is ever stale relative
//! to another.

pub mod state;
pub mod views;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use incident_dashboard_analytics::{distinct_call_types, distinct_districts};
use incident_dashboard_analytics_models::EvalContext;
use incident_dashboard_incident_models::{IncidentRecord, ZoneMode};
use incident_dashboard_source::{IncidentSource, SourceError};
use serde::{Deserialize, Serialize};

pub use state::{DashboardAction, DashboardState, reduce_dashboard_state};
pub use views::{ChartView, DashboardViews, compute_views};

/// The immutable list of records loaded for this session.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Arc<[IncidentRecord]>,
}

impl RecordStore {
    /// Wraps a freshly loaded record list.
    #[must_use]
    pub fn new(records: Vec<IncidentRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// All records, in load order.
    #[must_use]
    pub fn records(&self) -> &[IncidentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Selector choices for the district and call-type filters.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            call_types: distinct_call_types(&self.records),
            districts: distinct_districts(&self.records),
        }
    }
}

/// Distinct selector values present in the store, first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Final call-type descriptions.
    pub call_types: Vec<String>,
    /// Police districts.
    pub districts: Vec<String>,
}

/// Called after every state change with the new state and views.
pub type Subscriber = Box<dyn FnMut(&DashboardState, &DashboardViews) + Send>;

/// A loaded session: store, state, and the views derived from them.
pub struct Dashboard {
    store: RecordStore,
    state: DashboardState,
    zone: ZoneMode,
    pinned_now: Option<DateTime<Utc>>,
    views: DashboardViews,
    subscribers: Vec<Subscriber>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("records", &self.store.len())
            .field("state", &self.state)
            .field("zone", &self.zone)
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Starts a session with default state. Relative date ranges are
    /// evaluated against the clock at each recomputation.
    #[must_use]
    pub fn new(store: RecordStore, zone: ZoneMode) -> Self {
        Self::build(store, zone, None)
    }

    /// Starts a session whose relative date ranges are always evaluated at
    /// `now`.
    #[must_use]
    pub fn at(store: RecordStore, zone: ZoneMode, now: DateTime<Utc>) -> Self {
        Self::build(store, zone, Some(now))
    }

    fn build(store: RecordStore, zone: ZoneMode, pinned_now: Option<DateTime<Utc>>) -> Self {
        let state = DashboardState::default();
        let ctx = Self::context_for(zone, pinned_now);
        let views = compute_views(store.records(), &state, &ctx);
        log::debug!("Session started with {} records", store.len());
        Self {
            store,
            state,
            zone,
            pinned_now,
            views,
            subscribers: Vec::new(),
        }
    }

    fn context_for(zone: ZoneMode, pinned_now: Option<DateTime<Utc>>) -> EvalContext {
        pinned_now.map_or_else(
            || EvalContext::current(zone),
            |now| EvalContext { now, zone },
        )
    }

    /// The evaluation context for the next recomputation.
    #[must_use]
    pub fn context(&self) -> EvalContext {
        Self::context_for(self.zone, self.pinned_now)
    }

    /// The loaded records.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Views derived from the current state.
    #[must_use]
    pub const fn views(&self) -> &DashboardViews {
        &self.views
    }

    /// Registers a callback run after every dispatch.
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    /// Applies `action`, recomputes every view, then notifies subscribers.
    pub fn dispatch(&mut self, action: DashboardAction) -> &DashboardViews {
        log::debug!("Dispatching {action:?}");
        let state = std::mem::take(&mut self.state);
        self.state = reduce_dashboard_state(state, action, self.views.total_pages());
        self.refresh();
        &self.views
    }

    /// Recomputes every view against the current clock without changing
    /// state.
    pub fn refresh(&mut self) {
        self.views = compute_views(self.store.records(), &self.state, &self.context());
        for subscriber in &mut self.subscribers {
            subscriber(&self.state, &self.views);
        }
    }
}

/// Where the session is in its lifecycle.
#[derive(Debug)]
pub enum SessionStatus {
    /// The fetch has not completed.
    Loading,
    /// The fetch failed; holds the user-facing message.
    Failed(String),
    /// Records are loaded.
    Ready(Box<Dashboard>),
}

impl SessionStatus {
    /// Builds the status that follows a completed load.
    #[must_use]
    pub fn from_load(result: Result<Vec<IncidentRecord>, SourceError>, zone: ZoneMode) -> Self {
        match result {
            Ok(records) => {
                log::info!("Loaded {} incidents", records.len());
                Self::Ready(Box::new(Dashboard::new(RecordStore::new(records), zone)))
            }
            Err(e) => {
                log::error!("Incident load failed: {e}");
                Self::Failed(failure_message(&e))
            }
        }
    }

    /// Whether the fetch is still running.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// The message shown when loading fails.
#[must_use]
pub fn failure_message(error: &SourceError) -> String {
    format!("Failed to fetch incidents: {error}")
}

/// Loads records from `source` and starts a session over them.
pub async fn load_session(source: &dyn IncidentSource, zone: ZoneMode) -> SessionStatus {
    load_session_observed(source, zone, |_| {}).await
}

/// Like [`load_session`], but reports [`SessionStatus::Loading`] to
/// `observe` before the fetch starts and the final status once it settles.
pub async fn load_session_observed(
    source: &dyn IncidentSource,
    zone: ZoneMode,
    mut observe: impl FnMut(&SessionStatus),
) -> SessionStatus {
    log::info!("Loading incidents from {}", source.name());
    observe(&SessionStatus::Loading);
    let status = SessionStatus::from_load(source.load().await, zone);
    observe(&status);
    status
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::TimeZone as _;
    use incident_dashboard_analytics_models::{DateRange, ViewMode};
    use incident_dashboard_incident_models::IncidentField;

    use super::*;

    fn record(id: usize, district: &str, call_type: &str, received: &str) -> IncidentRecord {
        IncidentRecord {
            id: Some(id.to_string()),
            police_district: Some(district.to_string()),
            call_type_final_desc: Some(call_type.to_string()),
            received_datetime: Some(received.to_string()),
            ..IncidentRecord::default()
        }
    }

    fn store() -> RecordStore {
        let mut records = Vec::new();
        for i in 0..25 {
            let (district, call_type) = if i % 2 == 0 {
                ("Mission", "Theft")
            } else {
                ("Bayview", "Noise")
            };
            let day = if i < 5 { 14 } else { 1 };
            records.push(record(
                i,
                district,
                call_type,
                &format!("2024-06-{day:02}T{:02}:00:00Z", i % 24),
            ));
        }
        RecordStore::new(records)
    }

    fn dashboard() -> Dashboard {
        Dashboard::at(
            store(),
            ZoneMode::Utc,
            Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn filter_options_in_first_seen_order() {
        let options = store().filter_options();
        assert_eq!(options.districts, vec!["Mission", "Bayview"]);
        assert_eq!(options.call_types, vec!["Theft", "Noise"]);
    }

    #[test]
    fn initial_views_cover_every_record() {
        let dashboard = dashboard();
        assert_eq!(dashboard.views().metrics.total_calls, 25);
        assert_eq!(dashboard.views().total_pages(), 3);
        assert_eq!(dashboard.state().page, 1);
    }

    #[test]
    fn dispatch_recomputes_before_returning() {
        let mut dashboard = dashboard();
        let views = dashboard.dispatch(DashboardAction::SetDateRange(DateRange::Last7Days));
        assert_eq!(views.metrics.total_calls, 5);
        assert_eq!(views.total_pages(), 1);
    }

    #[test]
    fn page_resets_when_filters_change() {
        let mut dashboard = dashboard();
        dashboard.dispatch(DashboardAction::NextPage);
        dashboard.dispatch(DashboardAction::NextPage);
        assert_eq!(dashboard.state().page, 3);
        assert_eq!(dashboard.views().table.rows.len(), 5);

        dashboard.dispatch(DashboardAction::SetDistrict(Some("Mission".to_string())));
        assert_eq!(dashboard.state().page, 1);
        assert_eq!(dashboard.views().metrics.total_calls, 13);
    }

    #[test]
    fn bar_click_toggles_call_type() {
        let mut dashboard = dashboard();
        dashboard.dispatch(DashboardAction::ToggleCallType("Noise".to_string()));
        assert_eq!(dashboard.views().metrics.total_calls, 12);
        assert_eq!(
            dashboard.views().chart,
            ChartView::CallVolume {
                buckets: vec![incident_dashboard_analytics_models::CallTypeCount {
                    name: "Noise".to_string(),
                    count: 12,
                }],
                selected: Some("Noise".to_string()),
            }
        );

        dashboard.dispatch(DashboardAction::ToggleCallType("Noise".to_string()));
        assert_eq!(dashboard.views().metrics.total_calls, 25);
    }

    #[test]
    fn call_type_selection_ignored_in_response_view() {
        let mut dashboard = dashboard();
        dashboard.dispatch(DashboardAction::SetCallType(Some("Noise".to_string())));
        assert_eq!(dashboard.views().metrics.total_calls, 12);

        dashboard.dispatch(DashboardAction::SetView(ViewMode::ResponseTime));
        assert_eq!(dashboard.views().metrics.total_calls, 25);
        assert!(matches!(
            dashboard.views().chart,
            ChartView::ResponseTime { .. }
        ));
    }

    #[test]
    fn sorting_reorders_table() {
        let mut dashboard = dashboard();
        dashboard.dispatch(DashboardAction::SortBy(IncidentField::PoliceDistrict));
        assert!(
            dashboard
                .views()
                .table
                .rows
                .iter()
                .all(|r| r.police_district.as_deref() == Some("Bayview"))
        );
    }

    #[test]
    fn subscribers_see_every_update() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut dashboard = dashboard();
        dashboard.subscribe(Box::new(move |state, views| {
            sink.lock()
                .unwrap()
                .push((state.page, views.metrics.total_calls));
        }));

        dashboard.dispatch(DashboardAction::NextPage);
        dashboard.dispatch(DashboardAction::SetSearch("theft".to_string()));

        assert_eq!(*seen.lock().unwrap(), vec![(2, 25), (1, 13)]);
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl IncidentSource for FailingSource {
        fn id(&self) -> &str {
            "failing"
        }

        fn name(&self) -> &str {
            "Failing"
        }

        async fn load(&self) -> Result<Vec<IncidentRecord>, SourceError> {
            Err(SourceError::Status {
                url: "http://example.invalid/rows.json".to_string(),
                status: 503,
            })
        }
    }

    #[tokio::test]
    async fn failed_load_carries_message() {
        let status = load_session(&FailingSource, ZoneMode::Utc).await;
        let SessionStatus::Failed(message) = status else {
            panic!("expected failure");
        };
        assert!(message.starts_with("Failed to fetch incidents: "));
    }

    #[tokio::test]
    async fn observer_sees_loading_before_outcome() {
        let mut seen = Vec::new();
        let status = load_session_observed(&FailingSource, ZoneMode::Utc, |status| {
            seen.push(match status {
                SessionStatus::Loading => "loading",
                SessionStatus::Failed(_) => "failed",
                SessionStatus::Ready(_) => "ready",
            });
        })
        .await;
        assert!(!status.is_loading());
        assert_eq!(seen, vec!["loading", "failed"]);
    }

    #[test]
    fn successful_load_is_ready() {
        let status = SessionStatus::from_load(Ok(store().records().to_vec()), ZoneMode::Utc);
        let SessionStatus::Ready(dashboard) = status else {
            panic!("expected ready");
        };
        assert_eq!(dashboard.store().len(), 25);
        assert!(SessionStatus::Loading.is_loading());
    }
}
