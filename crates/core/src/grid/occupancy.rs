//! Per-cell occupancy counts and threshold alerting.

use serde::Serialize;

use crate::dates::DayCode;

/// A cell holding strictly more marks than this is flagged.
pub const ALERT_THRESHOLD: u32 = 5;

/// Number of event rows marked active in one (week, bloc, day) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellCount {
    pub count: u32,
    pub over_threshold: bool,
}

impl CellCount {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            over_threshold: count > ALERT_THRESHOLD,
        }
    }

    /// Value shown in the cell: an empty cell shows nothing, not `0`.
    pub fn display(&self) -> Option<u32> {
        (self.count > 0).then_some(self.count)
    }
}

/// Count, for each day column, how many of `day_sets` have that day active.
pub fn count_days<'a>(day_sets: impl IntoIterator<Item = &'a [bool; 7]>) -> [CellCount; 7] {
    let mut counts = [0u32; 7];
    for days in day_sets {
        for code in DayCode::ALL {
            if days[code.offset()] {
                counts[code.offset()] += 1;
            }
        }
    }
    counts.map(CellCount::new)
}
