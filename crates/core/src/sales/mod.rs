//! Box-office sales reconstruction.
//!
//! The remote store keeps one cumulative snapshot per performance per day.
//! This module turns those rows into calendar-dense series ([`series`]),
//! derives period statistics ([`period`]), and selects and summarizes
//! performances for the dashboard ([`performance`], [`summary`]).

pub mod performance;
pub mod period;
pub mod series;
pub mod summary;

use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::parse_day;
use crate::types::{Day, RecordId};

pub use performance::{select_performances, Performance, PerformanceConfig, PerformanceFilter};
pub use period::{daily_increments, period_delta, DayRange, PeriodDelta, PeriodRange};
pub use series::{reconstruct, SeriesMode};
pub use summary::SalesSummary;

/// One cumulative snapshot as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    pub record_id: RecordId,
    /// ISO date or datetime.
    pub date: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub sold: f64,
    #[serde(default, deserialize_with = "lenient_number")]
    pub free: f64,
    /// Cumulative revenue.
    #[serde(default, deserialize_with = "lenient_number")]
    pub total: f64,
}

impl SnapshotRow {
    /// Calendar day of the snapshot.
    pub fn day(&self) -> Option<Day> {
        parse_day(&self.date)
    }
}

/// One day of a reconstructed series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: Day,
    pub sold: f64,
    pub free: f64,
    pub revenue: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberLike {
    Number(f64),
    Text(String),
}

/// Accept numbers, numeric strings and `null`; anything unusable is 0.
fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberLike>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberLike::Number(n)) if n.is_finite() => n,
        Some(NumberLike::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    })
}
