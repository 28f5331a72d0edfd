#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line dashboard for SF dispatched calls for service.
//!
//! Loads the incident list once (from the live endpoint or a saved
//! snapshot) and then either prints a one-shot summary, runs an
//! interactive session, saves a snapshot, or serves the JSON API.
//!
//! Uses `indicatif-log-bridge` (via
//! [`incident_dashboard_cli_utils::init_logger`]) so that log lines and the
//! fetch spinner never fight for the terminal.

mod interactive;
mod render;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dialoguer::Select;
use incident_dashboard_analytics_models::{ALL, DateRange, SortDirection, SortState, ViewMode};
use incident_dashboard_cli_utils::{FetchSpinner, MultiProgress};
use incident_dashboard_incident_models::{IncidentField, Priority, ZoneMode};
use incident_dashboard_server_models::ApiDashboard;
use incident_dashboard_session::{
    Dashboard, DashboardAction, SessionStatus, load_session_observed,
};
use incident_dashboard_source::{
    IncidentSource, SnapshotSource, SocrataSource, SourceDefinition, SourceError,
    snapshot::save_snapshot,
};

#[derive(Parser)]
#[command(
    name = "incident_dashboard",
    about = "Explore SF dispatched calls for service"
)]
struct Cli {
    /// Read incidents from a saved snapshot instead of the live endpoint
    #[arg(long, global = true)]
    file: Option<PathBuf>,
    /// Override the dataset URL (also `INCIDENT_DASHBOARD_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Interpret and display timestamps in UTC instead of local time
    #[arg(long, global = true)]
    utc: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print metrics, chart and one table page for a set of filters
    Summary {
        #[command(flatten)]
        view: ViewArgs,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Explore the dashboard interactively
    Interactive,
    /// Download the raw dataset to a snapshot file
    Fetch {
        /// Where to write the snapshot
        #[arg(long)]
        output: PathBuf,
    },
    /// Serve the dashboard JSON API
    Serve,
}

/// Filter, view, sort and page selections for a one-shot summary.
#[derive(Args, Debug, Default)]
struct ViewArgs {
    /// Case-insensitive text matched against call-type descriptions
    #[arg(long)]
    search: Option<String>,
    /// `all`, `24h`, `7d` or `30d`
    #[arg(long)]
    date_range: Option<DateRange>,
    /// `A`, `B` or `C`
    #[arg(long)]
    priority: Option<Priority>,
    /// Police district, or `All`
    #[arg(long)]
    district: Option<String>,
    /// Final call-type description, or `All`
    #[arg(long)]
    call_type: Option<String>,
    /// `callVolume` or `responseTime`
    #[arg(long)]
    view: Option<ViewMode>,
    /// Column to sort by (dataset field name, e.g. `police_district`)
    #[arg(long)]
    sort: Option<IncidentField>,
    /// `asc` or `desc`
    #[arg(long)]
    direction: Option<SortDirection>,
    /// Table page, 1-based
    #[arg(long)]
    page: Option<usize>,
}

/// `None` for a blank or `"All"` selection.
fn selection(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != ALL)
}

impl ViewArgs {
    /// The actions that take a fresh session to this selection. Page comes
    /// last because every other action returns to page 1.
    fn into_actions(self) -> Vec<DashboardAction> {
        let mut actions = Vec::new();
        if let Some(search) = self.search {
            actions.push(DashboardAction::SetSearch(search));
        }
        if let Some(range) = self.date_range {
            actions.push(DashboardAction::SetDateRange(range));
        }
        if let Some(priority) = self.priority {
            actions.push(DashboardAction::SetPriority(Some(priority)));
        }
        if let Some(district) = selection(self.district) {
            actions.push(DashboardAction::SetDistrict(Some(district)));
        }
        if let Some(call_type) = selection(self.call_type) {
            actions.push(DashboardAction::SetCallType(Some(call_type)));
        }
        if let Some(view) = self.view {
            actions.push(DashboardAction::SetView(view));
        }
        if self.sort.is_some() || self.direction.is_some() {
            actions.extend(sort_actions(self.sort, self.direction));
        }
        if let Some(page) = self.page {
            actions.push(DashboardAction::GoToPage(page));
        }
        actions
    }
}

/// Header clicks that move the default sort to `field` in `direction`.
fn sort_actions(
    field: Option<IncidentField>,
    direction: Option<SortDirection>,
) -> Vec<DashboardAction> {
    let default = SortState::default();
    let field = field.unwrap_or(default.field);
    let mut sort = default;
    let mut actions = Vec::new();

    if sort.field != field {
        sort = sort.toggled(field);
        actions.push(DashboardAction::SortBy(field));
    }
    if let Some(direction) = direction
        && sort.direction != direction
    {
        actions.push(DashboardAction::SortBy(field));
    }
    actions
}

/// Top-level choices when no subcommand is given.
enum Tool {
    Explore,
    Summary,
    Fetch,
    Server,
}

impl Tool {
    const ALL: &[Self] = &[Self::Explore, Self::Summary, Self::Fetch, Self::Server];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Explore => "Explore dashboard",
            Self::Summary => "Print summary",
            Self::Fetch => "Save snapshot",
            Self::Server => "Start server",
        }
    }
}

/// The live source definition with CLI and environment overrides applied.
fn live_definition(api_url: Option<&str>) -> Result<SourceDefinition, SourceError> {
    SourceDefinition::from_env()?.with_overrides(api_url, None)
}

/// The source selected by `--file` / `--api-url`.
fn select_source(cli: &Cli) -> Result<Box<dyn IncidentSource>, SourceError> {
    let definition = live_definition(cli.api_url.as_deref())?;
    Ok(match &cli.file {
        Some(path) => Box::new(SnapshotSource::new(path.clone(), definition.record_limit)),
        None => Box::new(SocrataSource::new(definition)?),
    })
}

/// Loads the session behind a spinner.
async fn load(
    source: &dyn IncidentSource,
    zone: ZoneMode,
    multi: &MultiProgress,
) -> SessionStatus {
    let mut spinner = None;
    load_session_observed(source, zone, |status| match status {
        SessionStatus::Loading => {
            spinner = Some(FetchSpinner::start(
                multi,
                &format!("Loading {}...", source.name()),
            ));
        }
        SessionStatus::Ready(dashboard) => {
            if let Some(spinner) = spinner.take() {
                spinner.finish(format!("Loaded {} incidents", dashboard.store().len()));
            }
        }
        SessionStatus::Failed(_) => {
            if let Some(spinner) = spinner.take() {
                spinner.finish_and_clear();
            }
        }
    })
    .await
}

/// Unwraps a ready session, printing the failure message otherwise.
fn ready(status: SessionStatus) -> Result<Box<Dashboard>, Box<dyn std::error::Error>> {
    match status {
        SessionStatus::Ready(dashboard) => Ok(dashboard),
        SessionStatus::Failed(message) => {
            eprintln!("{}", console::style(&message).red());
            Err(message.into())
        }
        SessionStatus::Loading => Err("Incidents are still loading".into()),
    }
}

fn print_summary(
    mut dashboard: Box<Dashboard>,
    view: ViewArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    for action in view.into_actions() {
        dashboard.dispatch(action);
    }

    if json {
        let body = ApiDashboard {
            state: dashboard.state().clone(),
            views: dashboard.views().clone(),
            total_records: dashboard.store().len(),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!(
            "{}",
            render::render_dashboard(
                dashboard.state(),
                dashboard.views(),
                dashboard.context().zone
            )
        );
    }
    Ok(())
}

async fn fetch_snapshot(
    api_url: Option<&str>,
    output: &std::path::Path,
    multi: &MultiProgress,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = SocrataSource::new(live_definition(api_url)?)?;
    let spinner = FetchSpinner::start(multi, &format!("Downloading {}...", source.name()));
    let rows = match source.fetch_rows().await {
        Ok(rows) => rows,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    save_snapshot(output, &rows)?;
    spinner.finish(format!("Saved {} rows to {}", rows.len(), output.display()));
    Ok(())
}

/// Runs the API server on actix-web's own runtime.
async fn serve(
    source: Box<dyn IncidentSource>,
    zone: ZoneMode,
    prompt: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // The server uses actix-web's runtime, so we need to run it
    // in a blocking task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        let system = actix_web::rt::System::new();
        if prompt {
            system.block_on(incident_dashboard_server::interactive::run(
                source.as_ref(),
                zone,
            ))
        } else {
            system.block_on(incident_dashboard_server::run_server(source.as_ref(), zone))
        }
    })
    .await??;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = incident_dashboard_cli_utils::init_logger();
    let mut cli = Cli::parse();
    let zone = if cli.utc {
        ZoneMode::Utc
    } else {
        ZoneMode::Local
    };
    log::debug!("Using {zone} clock zone");

    let command = if let Some(command) = cli.command.take() {
        command
    } else {
        println!("Incident Dashboard");
        println!();

        let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();
        let idx = Select::new()
            .with_prompt("What would you like to do?")
            .items(&labels)
            .default(0)
            .interact()?;

        match Tool::ALL[idx] {
            Tool::Explore => Commands::Interactive,
            Tool::Summary => Commands::Summary {
                view: ViewArgs::default(),
                json: false,
            },
            Tool::Fetch => {
                let output: String = dialoguer::Input::new()
                    .with_prompt("Snapshot path")
                    .default("data/incidents.json".to_string())
                    .interact_text()?;
                Commands::Fetch {
                    output: PathBuf::from(output),
                }
            }
            Tool::Server => {
                let source = select_source(&cli)?;
                return serve(source, zone, true).await;
            }
        }
    };

    match command {
        Commands::Summary { view, json } => {
            let source = select_source(&cli)?;
            let dashboard = ready(load(source.as_ref(), zone, &multi).await)?;
            print_summary(dashboard, view, json)?;
        }
        Commands::Interactive => {
            let source = select_source(&cli)?;
            let dashboard = ready(load(source.as_ref(), zone, &multi).await)?;
            interactive::run(dashboard)?;
        }
        Commands::Fetch { output } => {
            fetch_snapshot(cli.api_url.as_deref(), &output, &multi).await?;
        }
        Commands::Serve => {
            let source = select_source(&cli)?;
            serve(source, zone, false).await?;
        }
    }

    Ok(())
}
