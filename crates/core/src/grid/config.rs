//! Grid configuration slots and their resolution.

use serde::{Deserialize, Serialize};

use crate::config::{check_upstream, optional_field, require_field, require_table};
use crate::error::CoreError;
use crate::field::{FieldRef, FieldRole};
use crate::record::{HostSnapshot, Table};

use super::{BlocVocabulary, GridInput};

/// Unresolved grid slots as saved by the configuration UI.
///
/// Every value is a table or field id (or name).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridConfig {
    pub events_table: Option<String>,
    pub weeks_table: Option<String>,
    pub blocs_table: Option<String>,
    /// Link field on events pointing at weeks.
    pub week_links_field: Option<String>,
    /// Link field on events pointing at blocs.
    pub bloc_links_field: Option<String>,
    /// Multi-select field on events listing active days.
    pub active_days_field: Option<String>,
    pub site_field: Option<String>,
    pub canal_field: Option<String>,
    /// Date field on weeks.
    pub week_start_field: Option<String>,
    pub week_end_field: Option<String>,
}

/// Fields resolved once for the whole grid computation.
#[derive(Debug, Clone)]
pub struct GridFields {
    pub week_links: FieldRef,
    pub bloc_links: FieldRef,
    pub active_days: FieldRef,
    pub site_links: Option<FieldRef>,
    pub canal_links: Option<FieldRef>,
    pub week_start: FieldRef,
    pub week_end: Option<FieldRef>,
}

/// Tables and fields ready to feed the builder.
#[derive(Debug, Clone)]
pub struct ResolvedGrid<'a> {
    pub events: &'a Table,
    pub weeks: &'a Table,
    pub blocs: &'a Table,
    pub fields: GridFields,
}

impl GridConfig {
    /// Resolve every slot against the snapshot.
    pub fn resolve<'a>(&self, snapshot: &'a HostSnapshot) -> Result<ResolvedGrid<'a>, CoreError> {
        check_upstream(snapshot)?;

        let events = require_table(snapshot, "events_table", self.events_table.as_deref())?;
        let weeks = require_table(snapshot, "weeks_table", self.weeks_table.as_deref())?;
        let blocs = require_table(snapshot, "blocs_table", self.blocs_table.as_deref())?;

        let fields = GridFields {
            week_links: require_field(
                events,
                "week_links_field",
                self.week_links_field.as_deref(),
                FieldRole::Link,
            )?,
            bloc_links: require_field(
                events,
                "bloc_links_field",
                self.bloc_links_field.as_deref(),
                FieldRole::Link,
            )?,
            active_days: require_field(
                events,
                "active_days_field",
                self.active_days_field.as_deref(),
                FieldRole::MultiSelect,
            )?,
            site_links: optional_field(
                events,
                "site_field",
                self.site_field.as_deref(),
                FieldRole::Link,
            )?,
            canal_links: optional_field(
                events,
                "canal_field",
                self.canal_field.as_deref(),
                FieldRole::Link,
            )?,
            week_start: require_field(
                weeks,
                "week_start_field",
                self.week_start_field.as_deref(),
                FieldRole::Date,
            )?,
            week_end: optional_field(
                weeks,
                "week_end_field",
                self.week_end_field.as_deref(),
                FieldRole::Date,
            )?,
        };

        Ok(ResolvedGrid {
            events,
            weeks,
            blocs,
            fields,
        })
    }
}

impl<'a> ResolvedGrid<'a> {
    /// Borrow the resolved tables as builder input.
    pub fn input<'b>(&'b self, vocabulary: &'b BlocVocabulary) -> GridInput<'b>
    where
        'a: 'b,
    {
        GridInput {
            events: &self.events.records,
            weeks: &self.weeks.records,
            blocs: &self.blocs.records,
            fields: &self.fields,
            vocabulary,
        }
    }
}
