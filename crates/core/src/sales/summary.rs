//! Dashboard headline figures.

use serde::{Deserialize, Serialize};

use super::{Performance, SeriesPoint};

/// Latest cumulative totals against the selected performances' capacity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SalesSummary {
    pub performance_count: usize,
    pub sold: f64,
    pub free: f64,
    pub revenue: f64,
    pub capacity: f64,
    pub revenue_capacity: f64,
    /// `(sold + free) / capacity`, absent when capacity is unknown or zero.
    pub fill_rate: Option<f64>,
    /// `revenue / revenue_capacity`, same convention.
    pub revenue_rate: Option<f64>,
}

fn rate(value: f64, capacity: f64) -> Option<f64> {
    (capacity > 0.0).then(|| value / capacity)
}

impl SalesSummary {
    pub fn from_series(series: &[SeriesPoint], performances: &[&Performance]) -> Self {
        let (sold, free, revenue) = series
            .last()
            .map_or((0.0, 0.0, 0.0), |p| (p.sold, p.free, p.revenue));
        let capacity: f64 = performances.iter().filter_map(|p| p.capacity).sum();
        let revenue_capacity: f64 = performances.iter().filter_map(|p| p.revenue_capacity).sum();

        Self {
            performance_count: performances.len(),
            sold,
            free,
            revenue,
            capacity,
            revenue_capacity,
            fill_rate: rate(sold + free, capacity),
            revenue_rate: rate(revenue, revenue_capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::types::RecordId;

    fn perf(capacity: Option<f64>, revenue_capacity: Option<f64>) -> Performance {
        Performance {
            id: RecordId::from("recP"),
            name: "P".into(),
            show_id: None,
            capacity,
            revenue_capacity,
            date: None,
            venue: None,
            city: None,
            status: None,
        }
    }

    fn point(sold: f64, free: f64, revenue: f64) -> SeriesPoint {
        SeriesPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            sold,
            free,
            revenue,
        }
    }

    #[test]
    fn uses_latest_point_and_summed_capacity() {
        let a = perf(Some(100.0), Some(2000.0));
        let b = perf(Some(50.0), None);
        let series = vec![point(10.0, 0.0, 100.0), point(60.0, 15.0, 1000.0)];
        let summary = SalesSummary::from_series(&series, &[&a, &b]);
        assert_eq!(summary.performance_count, 2);
        assert_eq!(summary.sold, 60.0);
        assert_eq!(summary.capacity, 150.0);
        assert_eq!(summary.fill_rate, Some(0.5));
        assert_eq!(summary.revenue_rate, Some(0.5));
    }

    #[test]
    fn unknown_capacity_has_no_rate() {
        let a = perf(None, None);
        let summary = SalesSummary::from_series(&[point(5.0, 0.0, 50.0)], &[&a]);
        assert_eq!(summary.fill_rate, None);
        assert_eq!(summary.revenue_rate, None);
    }

    #[test]
    fn empty_series_is_zero() {
        let summary = SalesSummary::from_series(&[], &[]);
        assert_eq!(summary, SalesSummary::default());
    }
}
