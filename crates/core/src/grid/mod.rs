//! Routing / scheduling grid.
//!
//! Turns flat event records plus their linked weeks, blocs and active-day
//! selections into week-ordered groups of per-day, per-bloc occupancy.
//! Two layouts are supported, selected by [`GridLayout`]:
//!
//! - [`GridLayout::Rows`]: one row per (event, week). See [`rows`].
//! - [`GridLayout::Matrix`]: one stacked entry per (event, week, bloc),
//!   columns padded to equal height. See [`matrix`].
//!
//! Everything here is a pure function of the input snapshot. Unresolved
//! links, unknown blocs and unknown day options are dropped silently
//! (logged at `debug`).

pub mod config;
mod join;
pub mod matrix;
pub mod occupancy;
pub mod rows;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::record::{HostSnapshot, Record};
use crate::types::{Day, RecordId};

pub use config::{GridConfig, GridFields, ResolvedGrid};
pub use matrix::{BlocColumn, MatrixEntry, WeekMatrix};
pub use occupancy::{CellCount, ALERT_THRESHOLD};
pub use rows::{BlocOccupancy, EventRow, WeekGrid};

/// Canonical bloc names, in column order.
pub const DEFAULT_BLOCS: [&str; 4] = ["Matin", "Après-midi", "Soir", "Nuit"];

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Ordered list of recognized bloc names. Defines the column groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocVocabulary {
    names: Vec<String>,
}

impl BlocVocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Column position of a bloc name, ignoring case and surrounding
    /// whitespace.
    pub fn position(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.names.iter().position(|n| n.to_lowercase() == wanted)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for BlocVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCS)
    }
}

/// Live filters applied before the join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridFilters {
    pub site: Option<RecordId>,
    pub canal: Option<RecordId>,
    /// Restrict materialized week links to this week.
    pub week: Option<RecordId>,
}

/// Which join semantics to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridLayout {
    #[default]
    Rows,
    Matrix,
}

impl FromStr for GridLayout {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rows" | "row" | "events" => Ok(GridLayout::Rows),
            "matrix" | "cross" | "stacked" => Ok(GridLayout::Matrix),
            other => Err(CoreError::Validation(format!("Unknown grid layout: {other}"))),
        }
    }
}

/// Borrowed builder input.
#[derive(Debug, Clone, Copy)]
pub struct GridInput<'a> {
    pub events: &'a [Record],
    pub weeks: &'a [Record],
    pub blocs: &'a [Record],
    pub fields: &'a GridFields,
    pub vocabulary: &'a BlocVocabulary,
}

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Week header shared by both layouts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekInfo {
    pub id: RecordId,
    pub name: String,
    pub start: Option<Day>,
    pub end: Option<Day>,
    /// Day-of-month number per day column.
    pub day_numbers: [Option<u32>; 7],
}

/// Result of a grid computation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "layout", content = "weeks", rename_all = "snake_case")]
pub enum GridView {
    Rows(Vec<WeekGrid>),
    Matrix(Vec<WeekMatrix>),
}

impl GridView {
    pub fn empty(layout: GridLayout) -> Self {
        match layout {
            GridLayout::Rows => GridView::Rows(Vec::new()),
            GridLayout::Matrix => GridView::Matrix(Vec::new()),
        }
    }

    pub fn week_count(&self) -> usize {
        match self {
            GridView::Rows(weeks) => weeks.len(),
            GridView::Matrix(weeks) => weeks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.week_count() == 0
    }
}

/// What the grid extension should show.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GridState {
    /// A required slot is unresolved; the operator must finish configuring.
    NeedsConfiguration { slot: String },
    Ready { view: GridView },
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Build the grid for already-resolved input.
pub fn build_grid(input: &GridInput<'_>, filters: &GridFilters, layout: GridLayout) -> GridView {
    let view = match layout {
        GridLayout::Rows => GridView::Rows(rows::build_rows(input, filters)),
        GridLayout::Matrix => GridView::Matrix(matrix::build_matrix(input, filters)),
    };
    tracing::debug!(
        events = input.events.len(),
        weeks = view.week_count(),
        ?layout,
        "Grid built",
    );
    view
}

/// Resolve configuration and build the grid.
///
/// Incomplete configuration becomes [`GridState::NeedsConfiguration`]. A
/// host-reported configuration error is returned as-is.
pub fn grid_state(
    config: &GridConfig,
    snapshot: &HostSnapshot,
    vocabulary: &BlocVocabulary,
    filters: &GridFilters,
    layout: GridLayout,
) -> Result<GridState, CoreError> {
    let resolved = match config.resolve(snapshot) {
        Ok(resolved) => resolved,
        Err(CoreError::NotConfigured { slot }) | Err(CoreError::IncompatibleField { slot, .. }) => {
            tracing::debug!(slot, "Grid not configured");
            return Ok(GridState::NeedsConfiguration {
                slot: slot.to_string(),
            });
        }
        Err(e) => return Err(e),
    };
    let input = resolved.input(vocabulary);
    Ok(GridState::Ready {
        view: build_grid(&input, filters, layout),
    })
}
