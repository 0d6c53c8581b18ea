//! Cross-product layout.
//!
//! Every (week, bloc) pair an event links to produces an entry in that
//! bloc's column. Columns are then padded with empty slots to the height
//! of the tallest column of the week, so row `i` of the rendered table is
//! `columns[*].rows[i]`. Row position carries no event identity.

use std::collections::HashMap;

use serde::Serialize;

use crate::dates::DayCode;
use crate::types::RecordId;

use super::join::{ordered_weeks, place_events};
use super::occupancy::{count_days, CellCount};
use super::{GridFilters, GridInput, WeekInfo};

/// One event placed in one bloc column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixEntry {
    pub event_id: RecordId,
    pub name: String,
    pub days: [bool; 7],
}

impl MatrixEntry {
    pub fn is_active(&self, day: DayCode) -> bool {
        self.days[day.offset()]
    }
}

/// A bloc column: stacked entries padded to the week's height.
#[derive(Debug, Clone, Serialize)]
pub struct BlocColumn {
    pub bloc: String,
    pub rows: Vec<Option<MatrixEntry>>,
    pub occupancy: [CellCount; 7],
}

/// A week group of the cross-product layout.
#[derive(Debug, Clone, Serialize)]
pub struct WeekMatrix {
    pub week: WeekInfo,
    pub height: usize,
    pub columns: Vec<BlocColumn>,
}

impl WeekMatrix {
    /// Slots of rendered row `index`, one per bloc column.
    pub fn row(&self, index: usize) -> Vec<Option<&MatrixEntry>> {
        self.columns
            .iter()
            .map(|c| c.rows.get(index).and_then(Option::as_ref))
            .collect()
    }

    pub fn cell(&self, bloc: usize, day: DayCode) -> CellCount {
        self.columns
            .get(bloc)
            .map(|c| c.occupancy[day.offset()])
            .unwrap_or_default()
    }
}

pub(crate) fn build_matrix(input: &GridInput<'_>, filters: &GridFilters) -> Vec<WeekMatrix> {
    let placements = place_events(input, filters);
    let bloc_count = input.vocabulary.len();

    let mut stacks: HashMap<&RecordId, Vec<Vec<MatrixEntry>>> = HashMap::new();
    for placement in &placements {
        for week_id in &placement.weeks {
            let columns = stacks
                .entry(week_id)
                .or_insert_with(|| vec![Vec::new(); bloc_count]);
            for &bloc in &placement.blocs {
                columns[bloc].push(MatrixEntry {
                    event_id: placement.event.id.clone(),
                    name: placement.event.name.clone(),
                    days: placement.days,
                });
            }
        }
    }

    ordered_weeks(input)
        .into_iter()
        .filter_map(|week| {
            let stacked = stacks.remove(&week.id)?;
            let height = stacked.iter().map(Vec::len).max().unwrap_or(0);
            let columns = stacked
                .into_iter()
                .zip(input.vocabulary.names())
                .map(|(entries, name)| {
                    let occupancy = count_days(entries.iter().map(|e| &e.days));
                    let mut rows: Vec<Option<MatrixEntry>> =
                        entries.into_iter().map(Some).collect();
                    rows.resize(height, None);
                    BlocColumn {
                        bloc: name.clone(),
                        rows,
                        occupancy,
                    }
                })
                .collect();
            Some(WeekMatrix {
                week,
                height,
                columns,
            })
        })
        .collect()
}
