//! Read-only snapshots of host platform tables and records.
//!
//! The host owns all data. Extensions only ever see these immutable
//! snapshots; nothing here is written back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::field::FieldKind;
use crate::types::{FieldId, RecordId, TableId};

/// A choice of a single- or multi-select field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub name: String,
}

/// A reference to a record in another table, as held by a link field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
}

/// Raw value of one cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Checkbox(bool),
    /// ISO date or datetime as reported by the host.
    Date(String),
    SingleSelect(SelectOption),
    MultiSelect(Vec<SelectOption>),
    LinkedRecords(Vec<LinkedRecord>),
}

/// A single host record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cells: HashMap<FieldId, CellValue>,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Builder-style cell assignment, mostly for fixtures.
    pub fn with_cell(mut self, field: impl Into<FieldId>, value: CellValue) -> Self {
        self.cells.insert(field.into(), value);
        self
    }

    /// Raw cell for a field; a missing cell reads as [`CellValue::Empty`].
    pub fn cell(&self, field: &FieldId) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(field).unwrap_or(&EMPTY)
    }
}

/// Metadata describing one field of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMeta {
    pub id: FieldId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

/// A table snapshot: field metadata plus all records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldMeta>,
    #[serde(default)]
    pub records: Vec<Record>,
}

impl Table {
    /// Find a field by id first, then by case-insensitive name.
    pub fn field(&self, id_or_name: &str) -> Option<&FieldMeta> {
        self.fields
            .iter()
            .find(|f| f.id.as_str() == id_or_name)
            .or_else(|| {
                self.fields
                    .iter()
                    .find(|f| f.name.eq_ignore_ascii_case(id_or_name))
            })
    }

    /// Fields whose kind is accepted by `predicate`.
    ///
    /// Used to offer candidate fields for a configuration slot.
    pub fn candidate_fields<'a>(
        &'a self,
        predicate: impl Fn(FieldKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a FieldMeta> + 'a {
        self.fields.iter().filter(move |f| predicate(f.kind))
    }
}

/// Export of the host base as seen by an extension.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostSnapshot {
    #[serde(default)]
    pub workspace_id: String,
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Whether the current user may open record detail views.
    #[serde(default)]
    pub can_expand_records: bool,
    /// Configuration error reported by the host (e.g. missing permissions).
    #[serde(default)]
    pub configuration_error: Option<String>,
}

impl HostSnapshot {
    /// Find a table by id first, then by case-insensitive name.
    pub fn table(&self, id_or_name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|t| t.id.as_str() == id_or_name)
            .or_else(|| {
                self.tables
                    .iter()
                    .find(|t| t.name.eq_ignore_ascii_case(id_or_name))
            })
    }
}

/// Host capability to open a record's detail view.
///
/// Views expose row expansion through this trait; the grid itself never
/// opens anything.
pub trait RecordExpander {
    /// Whether expansion is permitted for the current user.
    fn can_expand(&self) -> bool;

    /// Open the detail view for `record_id`.
    fn expand(&self, record_id: &RecordId);
}

/// Expand a record only when the host allows it. Returns whether the
/// request was forwarded.
pub fn expand_if_permitted(expander: &dyn RecordExpander, record_id: &RecordId) -> bool {
    if !expander.can_expand() {
        tracing::debug!(record_id = %record_id, "Record expansion not permitted");
        return false;
    }
    expander.expand(record_id);
    true
}
