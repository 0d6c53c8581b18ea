//! Performances: loading from host records, filtering, ordering.

use serde::{Deserialize, Serialize};

use crate::config::{check_upstream, optional_field, require_field, require_table};
use crate::error::CoreError;
use crate::field::{FieldRef, FieldRole};
use crate::record::{HostSnapshot, Record, Table};
use crate::types::{Day, RecordId};

/// A scheduled performance of a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    pub id: RecordId,
    pub name: String,
    pub show_id: Option<RecordId>,
    pub capacity: Option<f64>,
    pub revenue_capacity: Option<f64>,
    pub date: Option<Day>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub status: Option<String>,
}

impl Performance {
    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref().is_some_and(|s| {
            let s = s.to_lowercase();
            s.contains("annul") || s.contains("cancel")
        })
    }

    pub fn is_past(&self, today: Day) -> bool {
        self.date.is_some_and(|d| d < today)
    }
}

/// Dashboard filters over a show's performances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceFilter {
    pub exclude_cancelled: bool,
    pub exclude_past: bool,
}

/// Performances of `show`, filtered, in chronological order (undated last).
pub fn select_performances<'a>(
    performances: &'a [Performance],
    show: &RecordId,
    filter: PerformanceFilter,
    today: Day,
) -> Vec<&'a Performance> {
    let mut selected: Vec<&Performance> = performances
        .iter()
        .filter(|p| p.show_id.as_ref() == Some(show))
        .filter(|p| !(filter.exclude_cancelled && p.is_cancelled()))
        .filter(|p| !(filter.exclude_past && p.is_past(today)))
        .collect();
    selected.sort_by_key(|p| (p.date.is_none(), p.date));
    selected
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Unresolved dashboard slots for the performances table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerformanceConfig {
    pub performances_table: Option<String>,
    pub show_field: Option<String>,
    pub date_field: Option<String>,
    pub capacity_field: Option<String>,
    pub revenue_capacity_field: Option<String>,
    pub venue_field: Option<String>,
    pub city_field: Option<String>,
    pub status_field: Option<String>,
}

/// Resolved performances table.
#[derive(Debug, Clone)]
pub struct ResolvedPerformances<'a> {
    pub table: &'a Table,
    show: FieldRef,
    date: FieldRef,
    capacity: Option<FieldRef>,
    revenue_capacity: Option<FieldRef>,
    venue: Option<FieldRef>,
    city: Option<FieldRef>,
    status: Option<FieldRef>,
}

impl PerformanceConfig {
    pub fn resolve<'a>(
        &self,
        snapshot: &'a HostSnapshot,
    ) -> Result<ResolvedPerformances<'a>, CoreError> {
        check_upstream(snapshot)?;
        let table = require_table(
            snapshot,
            "performances_table",
            self.performances_table.as_deref(),
        )?;
        Ok(ResolvedPerformances {
            table,
            show: require_field(table, "show_field", self.show_field.as_deref(), FieldRole::Link)?,
            date: require_field(table, "date_field", self.date_field.as_deref(), FieldRole::Date)?,
            capacity: optional_field(
                table,
                "capacity_field",
                self.capacity_field.as_deref(),
                FieldRole::Numeric,
            )?,
            revenue_capacity: optional_field(
                table,
                "revenue_capacity_field",
                self.revenue_capacity_field.as_deref(),
                FieldRole::Numeric,
            )?,
            venue: optional_field(table, "venue_field", self.venue_field.as_deref(), FieldRole::Text)?,
            city: optional_field(table, "city_field", self.city_field.as_deref(), FieldRole::Text)?,
            status: optional_field(
                table,
                "status_field",
                self.status_field.as_deref(),
                FieldRole::Text,
            )?,
        })
    }
}

impl ResolvedPerformances<'_> {
    fn performance(&self, record: &Record) -> Performance {
        let text = |f: &Option<FieldRef>| f.as_ref().and_then(|f| f.text(record));
        let number = |f: &Option<FieldRef>| f.as_ref().and_then(|f| f.number(record));
        Performance {
            id: record.id.clone(),
            name: record.name.clone(),
            show_id: self.show.linked_ids(record).into_iter().next(),
            capacity: number(&self.capacity),
            revenue_capacity: number(&self.revenue_capacity),
            date: self.date.date(record),
            venue: text(&self.venue),
            city: text(&self.city),
            status: text(&self.status),
        }
    }

    /// All performances in table order.
    pub fn load(&self) -> Vec<Performance> {
        self.table.records.iter().map(|r| self.performance(r)).collect()
    }
}
