//! Table sorting and pagination.

use std::cmp::Ordering;

use incident_dashboard_analytics_models::{PAGE_SIZE, PageInfo, SortDirection, SortState, TablePage};
use incident_dashboard_incident_models::IncidentRecord;

/// Compares two records on the sort column's raw string value. Missing
/// values compare as the empty string.
fn compare(a: &IncidentRecord, b: &IncidentRecord, sort: SortState) -> Ordering {
    let left = sort.field.value(a).unwrap_or_default();
    let right = sort.field.value(b).unwrap_or_default();
    match sort.direction {
        SortDirection::Asc => left.cmp(right),
        SortDirection::Desc => right.cmp(left),
    }
}

/// Sorts in place by `sort`. The sort is stable in both directions: records
/// with equal keys keep their relative order.
pub fn sort_incidents(records: &mut [&IncidentRecord], sort: SortState) {
    records.sort_by(|a, b| compare(a, b, sort));
}

/// `ceil(total / PAGE_SIZE)`; 0 for an empty list.
#[must_use]
pub const fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Clamps a requested page into `[1, total_pages]`, treating an empty list
/// as having a single page.
#[must_use]
pub const fn clamp_page(page: usize, total_pages: usize) -> usize {
    if page < 1 || total_pages == 0 {
        1
    } else if page > total_pages {
        total_pages
    } else {
        page
    }
}

/// Slices the `page`th page (1-based) out of an already sorted list.
#[must_use]
pub fn paginate(sorted: &[&IncidentRecord], page: usize) -> TablePage {
    let total = sorted.len();
    let pages = total_pages(total);
    let page = clamp_page(page, pages);

    let offset = (page - 1) * PAGE_SIZE;
    let rows: Vec<IncidentRecord> = sorted
        .iter()
        .skip(offset)
        .take(PAGE_SIZE)
        .map(|r| (*r).clone())
        .collect();

    let (start, end) = if rows.is_empty() {
        (0, 0)
    } else {
        (offset + 1, offset + rows.len())
    };

    TablePage {
        rows,
        info: PageInfo {
            page,
            total_pages: pages,
            page_size: PAGE_SIZE,
            start,
            end,
            total,
        },
    }
}

#[cfg(test)]
mod tests {
    use incident_dashboard_incident_models::IncidentField;

    use super::*;

    fn row(id: &str, district: Option<&str>) -> IncidentRecord {
        IncidentRecord {
            id: Some(id.to_string()),
            police_district: district.map(ToString::to_string),
            ..IncidentRecord::default()
        }
    }

    fn ids(records: &[&IncidentRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| r.id.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn sorts_ascending_with_missing_first() {
        let records = [
            row("1", Some("Mission")),
            row("2", None),
            row("3", Some("Bayview")),
        ];
        let mut refs: Vec<&IncidentRecord> = records.iter().collect();
        sort_incidents(
            &mut refs,
            SortState {
                field: IncidentField::PoliceDistrict,
                direction: SortDirection::Asc,
            },
        );
        assert_eq!(ids(&refs), vec!["2", "3", "1"]);
    }

    #[test]
    fn sorts_descending_with_missing_last() {
        let records = [
            row("1", Some("Mission")),
            row("2", None),
            row("3", Some("Bayview")),
        ];
        let mut refs: Vec<&IncidentRecord> = records.iter().collect();
        sort_incidents(
            &mut refs,
            SortState {
                field: IncidentField::PoliceDistrict,
                direction: SortDirection::Desc,
            },
        );
        assert_eq!(ids(&refs), vec!["1", "3", "2"]);
    }

    #[test]
    fn equal_keys_keep_relative_order() {
        let records = [
            row("a", Some("Mission")),
            row("b", Some("Bayview")),
            row("c", Some("Mission")),
            row("d", Some("Bayview")),
        ];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut refs: Vec<&IncidentRecord> = records.iter().collect();
            sort_incidents(
                &mut refs,
                SortState {
                    field: IncidentField::PoliceDistrict,
                    direction,
                },
            );
            let order = ids(&refs);
            let pos = |id: &str| order.iter().position(|x| x == id).unwrap();
            assert!(pos("a") < pos("c"));
            assert!(pos("b") < pos("d"));
        }
    }

    #[test]
    fn default_sort_is_newest_received_first() {
        let records = [
            IncidentRecord {
                received_datetime: Some("2024-01-01T08:00:00.000".to_string()),
                ..row("old", None)
            },
            IncidentRecord {
                received_datetime: Some("2024-03-01T08:00:00.000".to_string()),
                ..row("new", None)
            },
        ];
        let mut refs: Vec<&IncidentRecord> = records.iter().collect();
        sort_incidents(&mut refs, SortState::default());
        assert_eq!(ids(&refs), vec!["new", "old"]);
    }

    #[test]
    fn page_counts() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(10), 1);
        assert_eq!(total_pages(11), 2);
        assert_eq!(total_pages(25), 3);
    }

    #[test]
    fn paginates_twenty_five_records() {
        let records: Vec<IncidentRecord> = (1..=25).map(|i| row(&i.to_string(), None)).collect();
        let refs: Vec<&IncidentRecord> = records.iter().collect();

        let first = paginate(&refs, 1);
        assert_eq!(first.rows.len(), 10);
        assert_eq!(first.info.total_pages, 3);
        assert_eq!(first.info.showing(), "Showing 1 - 10 of 25");
        assert!(!first.info.has_previous());

        let last = paginate(&refs, 3);
        assert_eq!(last.rows.len(), 5);
        assert_eq!(last.rows[0].id.as_deref(), Some("21"));
        assert_eq!(last.info.showing(), "Showing 21 - 25 of 25");
        assert!(!last.info.has_next());
    }

    #[test]
    fn out_of_range_pages_clamp() {
        let records: Vec<IncidentRecord> = (1..=25).map(|i| row(&i.to_string(), None)).collect();
        let refs: Vec<&IncidentRecord> = records.iter().collect();
        assert_eq!(paginate(&refs, 0).info.page, 1);
        assert_eq!(paginate(&refs, 9).info.page, 3);
    }

    #[test]
    fn empty_list_is_single_empty_page() {
        let page = paginate(&[], 1);
        assert!(page.rows.is_empty());
        assert_eq!(page.info.page, 1);
        assert_eq!(page.info.total_pages, 0);
        assert_eq!((page.info.start, page.info.end), (0, 0));
        assert_eq!(page.info.showing(), "Showing 0 - 0 of 0");
    }
}
