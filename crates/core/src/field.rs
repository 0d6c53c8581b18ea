//! Field-kind dispatch.
//!
//! The host reports a semantic type for every field. Each configuration
//! slot plays a logical [`FieldRole`]; the pair `(role, kind)` selects an
//! [`Extractor`] from [`EXTRACTION_TABLE`] once, when the slot is resolved.
//! Per-record reads then go straight through the chosen extractor.

use serde::{Deserialize, Serialize};

use crate::dates::parse_day;
use crate::error::CoreError;
use crate::record::{CellValue, FieldMeta, Record};
use crate::types::{Day, FieldId, RecordId};

/// Semantic field types reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    SingleLineText,
    MultilineText,
    Number,
    Currency,
    Percent,
    Date,
    DateTime,
    Checkbox,
    SingleSelect,
    MultipleSelects,
    MultipleRecordLinks,
    Lookup,
    Formula,
}

/// The logical role a configured field plays for an extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    Link,
    Date,
    MultiSelect,
    Numeric,
    Text,
}

/// How a cell value is read for a given role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    Links,
    Date,
    Options,
    Number,
    Text,
}

/// `(role, kind) -> extractor`. A pair absent from the table is not
/// type-compatible.
pub const EXTRACTION_TABLE: &[(FieldRole, FieldKind, Extractor)] = &[
    (FieldRole::Link, FieldKind::MultipleRecordLinks, Extractor::Links),
    (FieldRole::Date, FieldKind::Date, Extractor::Date),
    (FieldRole::Date, FieldKind::DateTime, Extractor::Date),
    (FieldRole::Date, FieldKind::Formula, Extractor::Date),
    (FieldRole::Date, FieldKind::Lookup, Extractor::Date),
    (FieldRole::MultiSelect, FieldKind::MultipleSelects, Extractor::Options),
    (FieldRole::MultiSelect, FieldKind::SingleSelect, Extractor::Options),
    (FieldRole::Numeric, FieldKind::Number, Extractor::Number),
    (FieldRole::Numeric, FieldKind::Currency, Extractor::Number),
    (FieldRole::Numeric, FieldKind::Percent, Extractor::Number),
    (FieldRole::Numeric, FieldKind::Formula, Extractor::Number),
    (FieldRole::Numeric, FieldKind::Lookup, Extractor::Number),
    (FieldRole::Text, FieldKind::SingleLineText, Extractor::Text),
    (FieldRole::Text, FieldKind::MultilineText, Extractor::Text),
    (FieldRole::Text, FieldKind::SingleSelect, Extractor::Text),
    (FieldRole::Text, FieldKind::Formula, Extractor::Text),
    (FieldRole::Text, FieldKind::Lookup, Extractor::Text),
];

impl FieldRole {
    /// Extractor for a field of `kind` playing this role, if compatible.
    pub fn extractor_for(self, kind: FieldKind) -> Option<Extractor> {
        EXTRACTION_TABLE
            .iter()
            .find(|(role, k, _)| *role == self && *k == kind)
            .map(|(_, _, extractor)| *extractor)
    }

    /// Type-compatibility predicate used to list candidate fields.
    pub fn accepts(self, kind: FieldKind) -> bool {
        self.extractor_for(kind).is_some()
    }
}

/// Value produced by an [`Extractor`].
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Links(Vec<RecordId>),
    Options(Vec<String>),
    Date(Option<Day>),
    Number(Option<f64>),
    Text(Option<String>),
}

impl Extractor {
    pub fn extract(self, value: &CellValue) -> Extracted {
        match self {
            Extractor::Links => Extracted::Links(match value {
                CellValue::LinkedRecords(links) => links.iter().map(|l| l.id.clone()).collect(),
                _ => Vec::new(),
            }),
            Extractor::Options => Extracted::Options(match value {
                CellValue::MultiSelect(options) => {
                    options.iter().map(|o| o.name.clone()).collect()
                }
                CellValue::SingleSelect(option) => vec![option.name.clone()],
                CellValue::Text(text) => text
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
                _ => Vec::new(),
            }),
            Extractor::Date => Extracted::Date(match value {
                CellValue::Date(raw) | CellValue::Text(raw) => parse_day(raw),
                _ => None,
            }),
            Extractor::Number => Extracted::Number(match value {
                CellValue::Number(n) if n.is_finite() => Some(*n),
                CellValue::Text(raw) => raw.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
                _ => None,
            }),
            Extractor::Text => Extracted::Text(match value {
                CellValue::Text(s) | CellValue::Date(s) => Some(s.clone()),
                CellValue::Number(n) => Some(n.to_string()),
                CellValue::Checkbox(b) => Some(b.to_string()),
                CellValue::SingleSelect(option) => Some(option.name.clone()),
                CellValue::MultiSelect(options) => Some(
                    options
                        .iter()
                        .map(|o| o.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                CellValue::LinkedRecords(links) => Some(
                    links
                        .iter()
                        .map(|l| l.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", "),
                ),
                CellValue::Empty => None,
            }),
        }
    }
}

/// A field resolved for a specific role.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    pub id: FieldId,
    pub kind: FieldKind,
    extractor: Extractor,
}

impl FieldRef {
    /// Resolve `meta` for `role`, failing if the type is incompatible.
    pub fn resolve(
        slot: &'static str,
        meta: &FieldMeta,
        role: FieldRole,
    ) -> Result<Self, CoreError> {
        let extractor = role
            .extractor_for(meta.kind)
            .ok_or(CoreError::IncompatibleField {
                slot,
                kind: meta.kind,
            })?;
        Ok(Self {
            id: meta.id.clone(),
            kind: meta.kind,
            extractor,
        })
    }

    pub fn extractor(&self) -> Extractor {
        self.extractor
    }

    fn read(&self, record: &Record) -> Extracted {
        self.extractor.extract(record.cell(&self.id))
    }

    /// Linked record ids; empty for non-link extractors.
    pub fn linked_ids(&self, record: &Record) -> Vec<RecordId> {
        match self.read(record) {
            Extracted::Links(ids) => ids,
            _ => Vec::new(),
        }
    }

    /// Selected option names; empty for non-option extractors.
    pub fn option_names(&self, record: &Record) -> Vec<String> {
        match self.read(record) {
            Extracted::Options(names) => names,
            _ => Vec::new(),
        }
    }

    pub fn date(&self, record: &Record) -> Option<Day> {
        match self.read(record) {
            Extracted::Date(day) => day,
            _ => None,
        }
    }

    pub fn number(&self, record: &Record) -> Option<f64> {
        match self.read(record) {
            Extracted::Number(n) => n,
            _ => None,
        }
    }

    pub fn text(&self, record: &Record) -> Option<String> {
        match self.read(record) {
            Extracted::Text(t) => t,
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::record::{LinkedRecord, SelectOption};

    fn meta(kind: FieldKind) -> FieldMeta {
        FieldMeta {
            id: FieldId::from("fld1"),
            name: "Field".into(),
            kind,
        }
    }

    // -- Compatibility ------------------------------------------------------

    #[test]
    fn link_role_accepts_only_record_links() {
        assert!(FieldRole::Link.accepts(FieldKind::MultipleRecordLinks));
        assert!(!FieldRole::Link.accepts(FieldKind::SingleLineText));
        assert!(!FieldRole::Link.accepts(FieldKind::Lookup));
    }

    #[test]
    fn numeric_role_accepts_money_and_percent() {
        assert!(FieldRole::Numeric.accepts(FieldKind::Currency));
        assert!(FieldRole::Numeric.accepts(FieldKind::Percent));
        assert!(!FieldRole::Numeric.accepts(FieldKind::Date));
    }

    #[test]
    fn incompatible_resolution_fails() {
        let result = FieldRef::resolve("weeks", &meta(FieldKind::Number), FieldRole::Link);
        assert_matches!(
            result,
            Err(CoreError::IncompatibleField { slot: "weeks", kind: FieldKind::Number })
        );
    }

    // -- Extraction ---------------------------------------------------------

    #[test]
    fn links_extract_ids_in_order() {
        let field = FieldRef::resolve("weeks", &meta(FieldKind::MultipleRecordLinks), FieldRole::Link)
            .unwrap();
        let record = Record::new("rec1", "E").with_cell(
            "fld1",
            CellValue::LinkedRecords(vec![
                LinkedRecord { id: "recB".into(), name: "B".into() },
                LinkedRecord { id: "recA".into(), name: "A".into() },
            ]),
        );
        assert_eq!(field.linked_ids(&record), vec![RecordId::from("recB"), RecordId::from("recA")]);
    }

    #[test]
    fn options_from_single_select() {
        let field = FieldRef::resolve("days", &meta(FieldKind::SingleSelect), FieldRole::MultiSelect)
            .unwrap();
        let record = Record::new("rec1", "E")
            .with_cell("fld1", CellValue::SingleSelect(SelectOption { name: "L".into() }));
        assert_eq!(field.option_names(&record), vec!["L".to_string()]);
    }

    #[test]
    fn date_from_datetime_truncates() {
        let field = FieldRef::resolve("start", &meta(FieldKind::DateTime), FieldRole::Date).unwrap();
        let record = Record::new("rec1", "W")
            .with_cell("fld1", CellValue::Date("2024-01-08T09:00:00.000Z".into()));
        assert_eq!(
            field.date(&record),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 8)
        );
    }

    #[test]
    fn number_from_formula_text() {
        let field = FieldRef::resolve("capacity", &meta(FieldKind::Formula), FieldRole::Numeric)
            .unwrap();
        let record = Record::new("rec1", "P").with_cell("fld1", CellValue::Text(" 450 ".into()));
        assert_eq!(field.number(&record), Some(450.0));
    }

    #[test]
    fn wrong_shape_reads_as_absent() {
        let field = FieldRef::resolve("weeks", &meta(FieldKind::MultipleRecordLinks), FieldRole::Link)
            .unwrap();
        let record = Record::new("rec1", "E").with_cell("fld1", CellValue::Number(3.0));
        assert!(field.linked_ids(&record).is_empty());
        assert_eq!(field.text(&record), None);
    }
}
