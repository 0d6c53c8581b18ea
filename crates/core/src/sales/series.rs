//! Calendar-dense, monotonic reconstruction of cumulative sales.
//!
//! Source rows are cumulative counters per performance per day. They may
//! arrive out of order, repeat a day, skip days, or even go down after a
//! data-entry correction. The reconstructed series has exactly one point
//! per calendar day between the earliest and latest observed date, and
//! each component never decreases: a day's value is the element-wise max
//! of the previous value and the day's row, and days without a row carry
//! the previous value forward.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::dates::day_span;
use crate::types::{Day, RecordId};

use super::{SeriesPoint, SnapshotRow};

/// How rows are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesMode {
    /// All rows describe one performance.
    #[default]
    Single,
    /// Rows are grouped per performance, carried forward independently,
    /// then summed per day.
    Aggregate,
}

/// Cumulative counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Totals {
    sold: f64,
    free: f64,
    revenue: f64,
}

impl Totals {
    fn from_row(row: &SnapshotRow) -> Self {
        Self {
            sold: row.sold,
            free: row.free,
            revenue: row.total,
        }
    }

    fn max(self, other: Totals) -> Self {
        Self {
            sold: self.sold.max(other.sold),
            free: self.free.max(other.free),
            revenue: self.revenue.max(other.revenue),
        }
    }

    fn add(self, other: Totals) -> Self {
        Self {
            sold: self.sold + other.sold,
            free: self.free + other.free,
            revenue: self.revenue + other.revenue,
        }
    }

    fn point(self, date: Day) -> SeriesPoint {
        SeriesPoint {
            date,
            sold: self.sold,
            free: self.free,
            revenue: self.revenue,
        }
    }
}

/// Per-day totals for one performance, duplicates merged by max.
type DayTotals = BTreeMap<Day, Totals>;

fn group_by_day<'a>(rows: impl IntoIterator<Item = &'a SnapshotRow>) -> DayTotals {
    let mut by_day = DayTotals::new();
    for row in rows {
        let Some(day) = row.day() else {
            tracing::debug!(record_id = %row.record_id, date = %row.date, "Snapshot row with unparseable date skipped");
            continue;
        };
        let totals = Totals::from_row(row);
        by_day
            .entry(day)
            .and_modify(|t| *t = t.max(totals))
            .or_insert(totals);
    }
    by_day
}

/// Carry-forward cursor over one performance's day totals.
struct CarryForward<'a> {
    by_day: &'a DayTotals,
    last: Totals,
}

impl<'a> CarryForward<'a> {
    fn new(by_day: &'a DayTotals) -> Self {
        Self {
            by_day,
            last: Totals::default(),
        }
    }

    /// Advance to `day` (days must be visited in ascending order).
    fn advance(&mut self, day: Day) -> Totals {
        if let Some(row) = self.by_day.get(&day) {
            self.last = self.last.max(*row);
        }
        self.last
    }
}

fn span(groups: &[DayTotals]) -> Option<(Day, Day)> {
    let first = groups.iter().filter_map(|g| g.keys().next()).min()?;
    let last = groups.iter().filter_map(|g| g.keys().next_back()).max()?;
    Some((*first, *last))
}

/// Reconstruct a daily series from snapshot rows.
///
/// Returns an empty series when no row has a usable date.
pub fn reconstruct(rows: &[SnapshotRow], mode: SeriesMode) -> Vec<SeriesPoint> {
    let groups: Vec<DayTotals> = match mode {
        SeriesMode::Single => vec![group_by_day(rows)],
        SeriesMode::Aggregate => {
            let mut per_performance: HashMap<&RecordId, Vec<&SnapshotRow>> = HashMap::new();
            let mut order: Vec<&RecordId> = Vec::new();
            for row in rows {
                per_performance
                    .entry(&row.record_id)
                    .or_insert_with(|| {
                        order.push(&row.record_id);
                        Vec::new()
                    })
                    .push(row);
            }
            order
                .into_iter()
                .filter_map(|id| per_performance.remove(id))
                .map(group_by_day)
                .collect()
        }
    };

    let Some((first, last)) = span(&groups) else {
        return Vec::new();
    };

    let mut cursors: Vec<CarryForward<'_>> = groups.iter().map(CarryForward::new).collect();
    day_span(first, last)
        .map(|day| {
            cursors
                .iter_mut()
                .map(|c| c.advance(day))
                .fold(Totals::default(), Totals::add)
                .point(day)
        })
        .collect()
}
