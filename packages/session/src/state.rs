//! Session state and the actions that change it.
//!
//! [`reduce_dashboard_state`] is the only way state changes. It is pure, so
//! every control can be exercised without a terminal or a server.

use incident_dashboard_analytics::toggled_call_type;
use incident_dashboard_analytics_models::{DateRange, FilterCriteria, SortState, ViewMode};
use incident_dashboard_incident_models::{IncidentField, Priority};
use serde::{Deserialize, Serialize};

/// Everything the user has selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Active filter criteria.
    pub filters: FilterCriteria,
    /// Which chart is shown.
    pub view: ViewMode,
    /// Table sort.
    pub sort: SortState,
    /// Current table page, 1-based.
    pub page: usize,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            filters: FilterCriteria::default(),
            view: ViewMode::default(),
            sort: SortState::default(),
            page: 1,
        }
    }
}

/// All user interactions on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    // Filters
    /// Replace the free-text search.
    SetSearch(String),
    /// Select a date range.
    SetDateRange(DateRange),
    /// Select a priority, or `None` for all.
    SetPriority(Option<Priority>),
    /// Select a district, or `None` for all.
    SetDistrict(Option<String>),
    /// Select a call type, or `None` for all.
    SetCallType(Option<String>),
    /// Click a call-volume bar. Ignored outside the call-volume view.
    ToggleCallType(String),
    /// Restore every filter to its default.
    ResetFilters,

    // View
    /// Switch charts.
    SetView(ViewMode),

    // Table
    /// Click a column header.
    SortBy(IncidentField),
    /// Jump to a page. Ignored outside `[1, total_pages]`.
    GoToPage(usize),
    /// Next page, if any.
    NextPage,
    /// Previous page, if any.
    PreviousPage,
}

/// Applies `action` to `state`.
///
/// `total_pages` is the page count of the table as currently displayed;
/// page navigation outside `[1, total_pages]` leaves the state unchanged.
/// Any change to the filters, the view or the sort returns to page 1.
#[must_use]
pub fn reduce_dashboard_state(
    mut state: DashboardState,
    action: DashboardAction,
    total_pages: usize,
) -> DashboardState {
    match action {
        DashboardAction::SetSearch(search) => {
            state.filters.search = search;
            state.page = 1;
        }
        DashboardAction::SetDateRange(range) => {
            state.filters.date_range = range;
            state.page = 1;
        }
        DashboardAction::SetPriority(priority) => {
            state.filters.priority = priority;
            state.page = 1;
        }
        DashboardAction::SetDistrict(district) => {
            state.filters.police_district = district;
            state.page = 1;
        }
        DashboardAction::SetCallType(call_type) => {
            state.filters.call_type = call_type;
            state.page = 1;
        }
        DashboardAction::ToggleCallType(label) => {
            if state.view != ViewMode::CallVolume {
                log::debug!("Ignoring call type click outside call volume view");
                return state;
            }
            state.filters.call_type = toggled_call_type(state.filters.call_type.as_deref(), &label);
            state.page = 1;
        }
        DashboardAction::ResetFilters => {
            state.filters = FilterCriteria::default();
            state.page = 1;
        }
        DashboardAction::SetView(view) => {
            state.view = view;
            state.page = 1;
        }
        DashboardAction::SortBy(field) => {
            state.sort = state.sort.toggled(field);
            state.page = 1;
        }
        DashboardAction::GoToPage(page) => {
            if (1..=total_pages).contains(&page) {
                state.page = page;
            }
        }
        DashboardAction::NextPage => {
            if state.page < total_pages {
                state.page += 1;
            }
        }
        DashboardAction::PreviousPage => {
            if state.page > 1 && total_pages > 0 {
                state.page -= 1;
            }
        }
    }

    state
}
