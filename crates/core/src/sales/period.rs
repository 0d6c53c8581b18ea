//! Period statistics over a reconstructed series.
//!
//! Series values are cumulative, so "activity within a period" is the
//! value at the end of the period minus the value just before it starts.

use serde::{Deserialize, Serialize};

use crate::dates::parse_day;
use crate::types::Day;

use super::SeriesPoint;

/// Inclusive date-range filter. Bounds are ISO date strings; an absent or
/// unparseable bound leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRange {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl PeriodRange {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }

    fn bound(raw: Option<&String>) -> Option<Day> {
        let raw = raw?;
        let day = parse_day(raw);
        if day.is_none() {
            tracing::debug!(bound = %raw, "Unparseable period bound treated as open");
        }
        day
    }

    /// Parse both bounds.
    pub fn days(&self) -> DayRange {
        DayRange {
            from: Self::bound(self.from.as_ref()),
            to: Self::bound(self.to.as_ref()),
        }
    }
}

/// A [`PeriodRange`] with its bounds parsed; `None` is an open side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayRange {
    pub from: Option<Day>,
    pub to: Option<Day>,
}

impl DayRange {
    pub fn contains(&self, day: Day) -> bool {
        self.from.map_or(true, |f| day >= f) && self.to.map_or(true, |t| day <= t)
    }
}

/// Activity within a period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeriodDelta {
    pub sold: f64,
    pub free: f64,
    pub revenue: f64,
}

/// Delta between the last in-range point and the point just before the
/// first in-range point (zero when the range starts with the series).
///
/// A range matching no point yields a zero delta.
pub fn period_delta(series: &[SeriesPoint], range: &PeriodRange) -> PeriodDelta {
    let range = range.days();
    let Some(first) = series.iter().position(|p| range.contains(p.date)) else {
        return PeriodDelta::default();
    };
    let last = series
        .iter()
        .rposition(|p| range.contains(p.date))
        .unwrap_or(first);

    let end = &series[last];
    let (sold, free, revenue) = match first.checked_sub(1).map(|i| &series[i]) {
        Some(base) => (base.sold, base.free, base.revenue),
        None => (0.0, 0.0, 0.0),
    };

    PeriodDelta {
        sold: end.sold - sold,
        free: end.free - free,
        revenue: end.revenue - revenue,
    }
}

/// Per-day increments of a cumulative series. The first day's increment
/// is its own value.
pub fn daily_increments(series: &[SeriesPoint]) -> Vec<SeriesPoint> {
    let mut previous: Option<&SeriesPoint> = None;
    series
        .iter()
        .map(|p| {
            let inc = match previous {
                Some(prev) => SeriesPoint {
                    date: p.date,
                    sold: p.sold - prev.sold,
                    free: p.free - prev.free,
                    revenue: p.revenue - prev.revenue,
                },
                None => *p,
            };
            previous = Some(p);
            inc
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn series(sold: &[f64]) -> Vec<SeriesPoint> {
        sold.iter()
            .enumerate()
            .map(|(i, s)| SeriesPoint {
                date: NaiveDate::from_ymd_opt(2024, 6, i as u32 + 1).unwrap(),
                sold: *s,
                free: 0.0,
                revenue: *s * 20.0,
            })
            .collect()
    }

    #[test]
    fn delta_uses_point_before_range_as_baseline() {
        let s = series(&[0.0, 4.0, 10.0, 10.0, 15.0]);
        let delta = period_delta(&s, &PeriodRange::new(Some("2024-06-03"), Some("2024-06-05")));
        assert_eq!(delta.sold, 11.0);
        assert_eq!(delta.revenue, 220.0);
    }

    #[test]
    fn delta_from_series_start_uses_zero_baseline() {
        let s = series(&[3.0, 4.0, 10.0]);
        let delta = period_delta(&s, &PeriodRange::new(Some("2024-06-01"), Some("2024-06-02")));
        assert_eq!(delta.sold, 4.0);
    }

    #[test]
    fn open_range_is_whole_series() {
        let s = series(&[3.0, 4.0, 10.0]);
        assert_eq!(period_delta(&s, &PeriodRange::default()).sold, 10.0);
        assert_eq!(period_delta(&s, &PeriodRange::new(Some("2024-06-02"), None)).sold, 7.0);
        assert_eq!(period_delta(&s, &PeriodRange::new(None, Some("2024-06-02"))).sold, 4.0);
    }

    #[test]
    fn range_outside_series_is_zero() {
        let s = series(&[3.0, 4.0]);
        let delta = period_delta(&s, &PeriodRange::new(Some("2025-01-01"), None));
        assert_eq!(delta, PeriodDelta::default());
    }

    #[test]
    fn datetime_bounds_are_truncated() {
        let s = series(&[0.0, 4.0, 10.0]);
        let delta = period_delta(
            &s,
            &PeriodRange::new(Some("2024-06-02T00:00:00Z"), Some("2024-06-03T23:59:59Z")),
        );
        assert_eq!(delta.sold, 10.0);
    }

    #[test]
    fn days_resolve_both_bounds() {
        let range = PeriodRange::new(Some("2024-06-02T10:00:00Z"), Some("not a date")).days();
        assert_eq!(range.from, NaiveDate::from_ymd_opt(2024, 6, 2));
        assert_eq!(range.to, None);
        assert!(!range.contains(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap()));
    }

    #[test]
    fn unparseable_bound_leaves_side_open() {
        let s = series(&[3.0, 4.0, 10.0]);
        let delta = period_delta(&s, &PeriodRange::new(Some("garbage"), Some("2024-06-02")));
        assert_eq!(delta.sold, 4.0);
    }

    #[test]
    fn increments_are_differences() {
        let s = series(&[2.0, 5.0, 5.0, 9.0]);
        let inc: Vec<f64> = daily_increments(&s).iter().map(|p| p.sold).collect();
        assert_eq!(inc, vec![2.0, 3.0, 0.0, 4.0]);
    }
}
