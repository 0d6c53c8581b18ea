//! Row-per-event layout.
//!
//! Each surviving event gets one row in every week it links to. A row is
//! marked in a (bloc, day) cell when the event links to that bloc and has
//! that day active.

use std::collections::HashMap;

use serde::Serialize;

use crate::dates::DayCode;
use crate::types::RecordId;

use super::join::{ordered_weeks, place_events};
use super::occupancy::{count_days, CellCount};
use super::{GridFilters, GridInput, WeekInfo};

/// One event's row within a week.
#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    pub event_id: RecordId,
    pub name: String,
    /// Vocabulary positions of the event's recognized blocs, ascending.
    pub blocs: Vec<usize>,
    /// Active days, in sequence order.
    pub days: Vec<DayCode>,
    /// `marks[bloc][day]`, bloc indexed by vocabulary position.
    pub marks: Vec<[bool; 7]>,
}

impl EventRow {
    pub fn is_marked(&self, bloc: usize, day: DayCode) -> bool {
        self.marks
            .get(bloc)
            .is_some_and(|days| days[day.offset()])
    }
}

/// Per-bloc occupancy of a week.
#[derive(Debug, Clone, Serialize)]
pub struct BlocOccupancy {
    pub bloc: String,
    pub cells: [CellCount; 7],
}

/// A week group of the row-per-event layout.
#[derive(Debug, Clone, Serialize)]
pub struct WeekGrid {
    pub week: WeekInfo,
    pub rows: Vec<EventRow>,
    pub occupancy: Vec<BlocOccupancy>,
}

impl WeekGrid {
    pub fn cell(&self, bloc: usize, day: DayCode) -> CellCount {
        self.occupancy
            .get(bloc)
            .map(|o| o.cells[day.offset()])
            .unwrap_or_default()
    }
}

pub(crate) fn build_rows(input: &GridInput<'_>, filters: &GridFilters) -> Vec<WeekGrid> {
    let placements = place_events(input, filters);
    let bloc_count = input.vocabulary.len();

    let mut rows_by_week: HashMap<&RecordId, Vec<EventRow>> = HashMap::new();
    for placement in &placements {
        let marks: Vec<[bool; 7]> = (0..bloc_count)
            .map(|bloc| {
                if placement.has_bloc(bloc) {
                    placement.days
                } else {
                    [false; 7]
                }
            })
            .collect();

        for week_id in &placement.weeks {
            rows_by_week.entry(week_id).or_default().push(EventRow {
                event_id: placement.event.id.clone(),
                name: placement.event.name.clone(),
                blocs: placement.blocs.clone(),
                days: placement.active_days(),
                marks: marks.clone(),
            });
        }
    }

    ordered_weeks(input)
        .into_iter()
        .filter_map(|week| {
            let rows = rows_by_week.remove(&week.id)?;
            let occupancy = input
                .vocabulary
                .names()
                .iter()
                .enumerate()
                .map(|(bloc, name)| BlocOccupancy {
                    bloc: name.clone(),
                    cells: count_days(rows.iter().map(|r| &r.marks[bloc])),
                })
                .collect();
            Some(WeekGrid {
                week,
                rows,
                occupancy,
            })
        })
        .collect()
}
