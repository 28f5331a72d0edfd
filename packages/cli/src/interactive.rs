//! Interactive dashboard session.
//!
//! Renders the dashboard, offers every control the current state allows,
//! and dispatches the chosen action until the user quits.

use dialoguer::{Input, Select};
use incident_dashboard_analytics_models::{ALL, DateRange, ViewMode};
use incident_dashboard_incident_models::{IncidentField, Priority};
use incident_dashboard_session::{
    ChartView, Dashboard, DashboardAction, DashboardState, DashboardViews,
};

use crate::render;

/// A control offered in the session menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Search,
    DateRange,
    Priority,
    District,
    CallType,
    ClickBar,
    ResetFilters,
    SwitchView,
    SortColumn,
    NextPage,
    PreviousPage,
    GoToPage,
    Quit,
}

impl Control {
    const ALL: &[Self] = &[
        Self::Search,
        Self::DateRange,
        Self::Priority,
        Self::District,
        Self::CallType,
        Self::ClickBar,
        Self::ResetFilters,
        Self::SwitchView,
        Self::SortColumn,
        Self::NextPage,
        Self::PreviousPage,
        Self::GoToPage,
        Self::Quit,
    ];

    #[must_use]
    const fn label(self) -> &'static str {
        match self {
            Self::Search => "Search call types",
            Self::DateRange => "Date range",
            Self::Priority => "Priority",
            Self::District => "Police district",
            Self::CallType => "Call type",
            Self::ClickBar => "Select chart bar",
            Self::ResetFilters => "Reset filters",
            Self::SwitchView => "Switch view",
            Self::SortColumn => "Sort by column",
            Self::NextPage => "Next page",
            Self::PreviousPage => "Previous page",
            Self::GoToPage => "Go to page",
            Self::Quit => "Quit",
        }
    }

    /// Whether this control is usable in `state` with `views` on screen.
    fn is_available(self, state: &DashboardState, views: &DashboardViews) -> bool {
        let info = &views.table.info;
        match self {
            Self::CallType => state.view == ViewMode::CallVolume,
            Self::ClickBar => matches!(&views.chart, ChartView::CallVolume { buckets, .. } if !buckets.is_empty()),
            Self::NextPage => info.has_next(),
            Self::PreviousPage => info.has_previous(),
            Self::GoToPage => info.total_pages > 1,
            _ => true,
        }
    }
}

/// Controls offered for the current state, in menu order.
fn available_controls(state: &DashboardState, views: &DashboardViews) -> Vec<Control> {
    Control::ALL
        .iter()
        .copied()
        .filter(|c| c.is_available(state, views))
        .collect()
}

/// `["All", values...]` with the index of `current` (0 for `None`).
fn choices_with_all(values: &[String], current: Option<&str>) -> (Vec<String>, usize) {
    let mut items = vec![ALL.to_string()];
    items.extend(values.iter().cloned());
    let selected = current
        .and_then(|c| values.iter().position(|v| v == c))
        .map_or(0, |i| i + 1);
    (items, selected)
}

fn select(prompt: &str, items: &[String], default: usize) -> dialoguer::Result<Option<usize>> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(default)
        .interact_opt()
}

/// Prompts for the details of `control` and returns the action to apply,
/// or `None` if the user backed out.
#[allow(clippy::too_many_lines)]
fn prompt_action(
    control: Control,
    dashboard: &Dashboard,
    districts: &[String],
    call_types: &[String],
) -> Result<Option<DashboardAction>, Box<dyn std::error::Error>> {
    let state = dashboard.state();
    let filters = &state.filters;

    Ok(match control {
        Control::Search => {
            let search: String = Input::new()
                .with_prompt("Search")
                .with_initial_text(filters.search.clone())
                .allow_empty(true)
                .interact_text()?;
            Some(DashboardAction::SetSearch(search))
        }
        Control::DateRange => {
            let items: Vec<String> = DateRange::ALL
                .iter()
                .map(|r| r.label().to_string())
                .collect();
            let current = DateRange::ALL
                .iter()
                .position(|r| *r == filters.date_range)
                .unwrap_or(0);
            select("Date range", &items, current)?
                .map(|i| DashboardAction::SetDateRange(DateRange::ALL[i]))
        }
        Control::Priority => {
            let mut items = vec![ALL.to_string()];
            items.extend(
                Priority::all()
                    .iter()
                    .map(|p| format!("{p} ({})", p.label())),
            );
            let current = filters
                .priority
                .and_then(|p| Priority::all().iter().position(|x| *x == p))
                .map_or(0, |i| i + 1);
            select("Priority", &items, current)?.map(|i| {
                DashboardAction::SetPriority(i.checked_sub(1).map(|i| Priority::all()[i]))
            })
        }
        Control::District => {
            let (items, current) = choices_with_all(districts, filters.police_district.as_deref());
            select("Police district", &items, current)?.map(|i| {
                DashboardAction::SetDistrict(i.checked_sub(1).map(|i| districts[i].clone()))
            })
        }
        Control::CallType => {
            let (items, current) = choices_with_all(call_types, filters.call_type.as_deref());
            select("Call type", &items, current)?.map(|i| {
                DashboardAction::SetCallType(i.checked_sub(1).map(|i| call_types[i].clone()))
            })
        }
        Control::ClickBar => {
            let ChartView::CallVolume { buckets, selected } = &dashboard.views().chart else {
                return Ok(None);
            };
            let items: Vec<String> = buckets
                .iter()
                .map(|b| format!("{} ({})", b.name, b.count))
                .collect();
            let current = selected
                .as_deref()
                .and_then(|s| buckets.iter().position(|b| b.name == s))
                .unwrap_or(0);
            select("Chart bar", &items, current)?
                .map(|i| DashboardAction::ToggleCallType(buckets[i].name.clone()))
        }
        Control::ResetFilters => Some(DashboardAction::ResetFilters),
        Control::SwitchView => {
            let items: Vec<String> = ViewMode::ALL
                .iter()
                .map(|v| v.label().to_string())
                .collect();
            let current = ViewMode::ALL
                .iter()
                .position(|v| *v == state.view)
                .unwrap_or(0);
            select("View", &items, current)?.map(|i| DashboardAction::SetView(ViewMode::ALL[i]))
        }
        Control::SortColumn => {
            let items: Vec<String> = IncidentField::ALL
                .iter()
                .map(|f| render::header_label(*f, state.sort))
                .collect();
            let current = IncidentField::ALL
                .iter()
                .position(|f| *f == state.sort.field)
                .unwrap_or(0);
            select("Sort by", &items, current)?
                .map(|i| DashboardAction::SortBy(IncidentField::ALL[i]))
        }
        Control::NextPage => Some(DashboardAction::NextPage),
        Control::PreviousPage => Some(DashboardAction::PreviousPage),
        Control::GoToPage => {
            let total = dashboard.views().total_pages();
            let page: usize = Input::new()
                .with_prompt(format!("Page (1-{total})"))
                .default(state.page)
                .interact_text()?;
            Some(DashboardAction::GoToPage(page))
        }
        Control::Quit => None,
    })
}

/// Runs the session loop until the user quits.
///
/// # Errors
///
/// Returns an error if a terminal prompt fails.
pub fn run(mut dashboard: Box<Dashboard>) -> Result<(), Box<dyn std::error::Error>> {
    let options = dashboard.store().filter_options();
    let term = console::Term::stdout();

    loop {
        let zone = dashboard.context().zone;
        term.write_line(&render::render_dashboard(
            dashboard.state(),
            dashboard.views(),
            zone,
        ))?;

        let controls = available_controls(dashboard.state(), dashboard.views());
        let labels: Vec<&str> = controls.iter().map(|c| c.label()).collect();
        let Some(idx) = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact_opt()?
        else {
            break;
        };

        let control = controls[idx];
        if control == Control::Quit {
            break;
        }

        if let Some(action) =
            prompt_action(control, &dashboard, &options.districts, &options.call_types)?
        {
            dashboard.dispatch(action);
        }
    }

    Ok(())
}
