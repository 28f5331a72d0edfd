//! Terminal rendering of the dashboard views.

use std::fmt::Write as _;

use console::{Style, pad_str, style, truncate_str};
use incident_dashboard_analytics::call_types::truncate_label;
use incident_dashboard_analytics_models::{
    CallTypeCount, DashboardMetrics, HourlyResponse, SortState, TablePage, ViewMode,
};
use incident_dashboard_incident_models::{IncidentField, ZoneMode};
use incident_dashboard_session::{ChartView, DashboardState, DashboardViews};

const BAR_WIDTH: usize = 40;
const MAX_COLUMN_WIDTH: usize = 22;

/// Renders everything for one state: filters, metrics, chart and table.
#[must_use]
pub fn render_dashboard(state: &DashboardState, views: &DashboardViews, zone: ZoneMode) -> String {
    let mut out = String::new();
    out.push_str(&render_filters(state));
    out.push('\n');
    out.push_str(&render_metrics(&views.metrics));
    out.push('\n');
    out.push_str(&render_chart(&views.chart));
    out.push('\n');
    out.push_str(&render_table(&views.table, state.sort, zone));
    out
}

/// One line summarising the active filters.
#[must_use]
pub fn render_filters(state: &DashboardState) -> String {
    let filters = &state.filters;
    let mut parts = vec![format!("Range: {}", filters.date_range.label())];
    parts.push(format!(
        "Priority: {}",
        filters
            .priority
            .map_or_else(|| "All".to_string(), |p| format!("{p} ({})", p.label()))
    ));
    parts.push(format!(
        "District: {}",
        filters.police_district.as_deref().unwrap_or("All")
    ));
    if state.view == ViewMode::CallVolume {
        parts.push(format!(
            "Call Type: {}",
            filters.call_type.as_deref().unwrap_or("All")
        ));
    }
    if !filters.search.is_empty() {
        parts.push(format!("Search: \"{}\"", filters.search));
    }

    format!(
        "{} {}\n",
        style(state.view.label()).bold().underlined(),
        style(parts.join(" | ")).dim()
    )
}

/// The four headline metrics.
#[must_use]
pub fn render_metrics(metrics: &DashboardMetrics) -> String {
    let label = Style::new().dim();
    let value = Style::new().bold();
    format!(
        "{} {}   {} {}   {} {}   {} {}\n",
        label.apply_to("Total Calls"),
        value.apply_to(metrics.total_calls),
        label.apply_to("Avg Response"),
        value.apply_to(format!("{} min", metrics.avg_response_minutes)),
        label.apply_to("High Priority"),
        value.apply_to(format!("{}%", metrics.high_priority_percent)),
        label.apply_to("Top District"),
        value.apply_to(&metrics.top_district),
    )
}

/// Scales `value` against `max` to a bar of at most [`BAR_WIDTH`] cells.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let cells = ((value / max) * BAR_WIDTH as f64).round().max(1.0) as usize;
    "\u{2588}".repeat(cells.min(BAR_WIDTH))
}

/// The chart for the active view.
#[must_use]
pub fn render_chart(chart: &ChartView) -> String {
    match chart {
        ChartView::CallVolume { buckets, selected } => {
            render_call_volume(buckets, selected.as_deref())
        }
        ChartView::ResponseTime { hourly } => render_hourly(hourly),
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_call_volume(buckets: &[CallTypeCount], selected: Option<&str>) -> String {
    let mut out = format!("{}\n", style("Calls by Type").bold());
    if buckets.is_empty() {
        out.push_str("  (no calls)\n");
        return out;
    }

    let max = buckets.iter().map(|b| b.count).max().unwrap_or(0) as f64;
    for bucket in buckets {
        let is_selected = selected == Some(bucket.name.as_str());
        let label = pad_str(
            &truncate_label(&bucket.name),
            15,
            console::Alignment::Left,
            None,
        )
        .into_owned();
        let bars = bar(bucket.count as f64, max);
        let line = format!("{label} {bars} {}", bucket.count);
        if is_selected {
            let _ = writeln!(out, "{} {}", style(">").cyan(), style(line).cyan().bold());
        } else {
            let _ = writeln!(out, "  {line}");
        }
    }
    out
}

#[allow(clippy::cast_precision_loss)]
fn render_hourly(hourly: &[HourlyResponse]) -> String {
    let mut out = format!("{}\n", style("Average Response by Hour").bold());
    let max = hourly
        .iter()
        .map(|h| h.avg_response_minutes)
        .max()
        .unwrap_or(0) as f64;
    for point in hourly {
        let _ = writeln!(
            out,
            "  {:>5} {} {} min",
            point.hour,
            style(bar(point.avg_response_minutes as f64, max)).green(),
            point.avg_response_minutes
        );
    }
    out
}

/// Header text for `field`, with an arrow when it is the sort column.
#[must_use]
pub fn header_label(field: IncidentField, sort: SortState) -> String {
    if sort.field == field {
        format!("{} {}", field.label(), sort.direction.arrow())
    } else {
        field.label().to_string()
    }
}

/// The current table page, or the empty-result message.
#[must_use]
pub fn render_table(page: &TablePage, sort: SortState, zone: ZoneMode) -> String {
    if page.rows.is_empty() {
        return format!(
            "{}\n{}\n",
            style("No incidents found").bold(),
            style("Try adjusting your filters").dim()
        );
    }

    let headers: Vec<String> = IncidentField::ALL
        .iter()
        .map(|f| header_label(*f, sort))
        .collect();
    let cells: Vec<Vec<String>> = page
        .rows
        .iter()
        .map(|row| {
            IncidentField::ALL
                .iter()
                .map(|f| f.display(row, zone))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            cells
                .iter()
                .map(|row| console::measure_text_width(&row[i]))
                .chain(std::iter::once(console::measure_text_width(header)))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let format_row = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(value, width)| {
                let cut = truncate_str(value, *width, "\u{2026}");
                pad_str(&cut, *width, console::Alignment::Left, None).into_owned()
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", style(format_row(&headers)).bold());
    for row in &cells {
        let _ = writeln!(out, "{}", format_row(row));
    }
    let _ = writeln!(
        out,
        "{}   {}",
        style(page.info.showing()).dim(),
        style(format!(
            "Page {} of {}",
            page.info.page, page.info.total_pages
        ))
        .dim()
    );
    out
}

#[cfg(test)]
mod tests {
    use incident_dashboard_analytics_models::{PAGE_SIZE, PageInfo, SortDirection};
    use incident_dashboard_incident_models::IncidentRecord;

    use super::*;

    fn page(rows: Vec<IncidentRecord>) -> TablePage {
        let total = rows.len();
        TablePage {
            info: PageInfo {
                page: 1,
                total_pages: usize::from(total > 0),
                page_size: PAGE_SIZE,
                start: usize::from(total > 0),
                end: total,
                total,
            },
            rows,
        }
    }

    #[test]
    fn empty_table_shows_hint() {
        let text = render_table(&page(Vec::new()), SortState::default(), ZoneMode::Utc);
        assert!(text.contains("No incidents found"));
        assert!(text.contains("Try adjusting your filters"));
    }

    #[test]
    fn table_marks_sort_column_and_missing_values() {
        let rows = vec![IncidentRecord {
            id: Some("42".to_string()),
            received_datetime: Some("2024-01-01T10:00:00Z".to_string()),
            ..IncidentRecord::default()
        }];
        let text = render_table(&page(rows), SortState::default(), ZoneMode::Utc);
        assert!(text.contains("Received \u{2193}"));
        assert!(text.contains("N/A"));
        assert!(text.contains("2024-01-01 10:00:00"));
        assert!(text.contains("Showing 1 - 1 of 1"));
        assert!(text.contains("Page 1 of 1"));
    }

    #[test]
    fn header_arrow_follows_direction() {
        let sort = SortState {
            field: IncidentField::Agency,
            direction: SortDirection::Asc,
        };
        assert_eq!(header_label(IncidentField::Agency, sort), "Agency \u{2191}");
        assert_eq!(header_label(IncidentField::Id, sort), "ID");
    }

    #[test]
    fn chart_truncates_and_highlights() {
        let buckets = vec![
            CallTypeCount {
                name: "Suspicious Person".to_string(),
                count: 4,
            },
            CallTypeCount {
                name: "Noise".to_string(),
                count: 2,
            },
        ];
        let text = render_chart(&ChartView::CallVolume {
            buckets,
            selected: Some("Noise".to_string()),
        });
        assert!(text.contains("Suspicious P..."));
        assert!(text.contains('>'));
    }

    #[test]
    fn hourly_chart_lists_every_hour() {
        let hourly: Vec<HourlyResponse> = (0..24)
            .map(|h| HourlyResponse {
                hour: format!("{h}:00"),
                avg_response_minutes: 0,
            })
            .collect();
        let text = render_chart(&ChartView::ResponseTime { hourly });
        assert!(text.contains("0:00"));
        assert!(text.contains("23:00"));
    }

    #[test]
    fn metrics_line() {
        let text = render_metrics(&DashboardMetrics {
            total_calls: 2,
            avg_response_minutes: 8,
            high_priority_percent: 50,
            top_district: "Mission".to_string(),
        });
        assert!(text.contains("8 min"));
        assert!(text.contains("50%"));
        assert!(text.contains("Mission"));
    }
}
