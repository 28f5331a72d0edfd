#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory analytics over a dispatch incident list.
//!
//! Every function here is pure and total: it never fails, never performs
//! I/O, and treats missing or unparseable fields as non-matching or
//! excluded rather than as errors. The [`filter`] stage narrows the full
//! list; the remaining stages ([`metrics`], [`call_types`], [`hourly`],
//! [`table`]) each derive one view from the filtered list.

pub mod call_types;
pub mod filter;
pub mod grouping;
pub mod hourly;
pub mod metrics;
pub mod options;
pub mod table;

pub use call_types::{bucket_call_types, toggled_call_type};
pub use filter::filter_incidents;
pub use hourly::bucket_hourly_response;
pub use metrics::compute_metrics;
pub use options::{distinct_call_types, distinct_districts};
pub use table::{paginate, sort_incidents, total_pages};

/// Rounds half-way values towards positive infinity (`2.5 -> 3`,
/// `-2.5 -> -2`), the rounding the dashboard has always displayed.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(0.0), 0);
    }
}
