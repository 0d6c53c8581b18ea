//! Extension configuration slots.
//!
//! Each extension declares named slots (tables and fields) that the
//! operator fills in through the host's configuration UI. Core components
//! only ever receive the *resolved* values: a slot is resolved once, against
//! a [`HostSnapshot`], into a [`Table`] reference or a [`FieldRef`].
//!
//! Slot values identify tables and fields by id or, failing that, by name.

use crate::error::CoreError;
use crate::field::{FieldRef, FieldRole};
use crate::record::{HostSnapshot, Table};

/// Resolve a required table slot.
pub fn require_table<'a>(
    snapshot: &'a HostSnapshot,
    slot: &'static str,
    value: Option<&str>,
) -> Result<&'a Table, CoreError> {
    value
        .and_then(|v| snapshot.table(v))
        .ok_or(CoreError::NotConfigured { slot })
}

/// Resolve a required field slot on `table` for `role`.
///
/// An unknown field is "not configured"; a field of the wrong type is
/// reported as incompatible.
pub fn require_field(
    table: &Table,
    slot: &'static str,
    value: Option<&str>,
    role: FieldRole,
) -> Result<FieldRef, CoreError> {
    let meta = value
        .and_then(|v| table.field(v))
        .ok_or(CoreError::NotConfigured { slot })?;
    FieldRef::resolve(slot, meta, role)
}

/// Resolve an optional field slot. An empty slot is `Ok(None)`; a filled
/// slot must still resolve.
pub fn optional_field(
    table: &Table,
    slot: &'static str,
    value: Option<&str>,
    role: FieldRole,
) -> Result<Option<FieldRef>, CoreError> {
    match value {
        None => Ok(None),
        Some(_) => require_field(table, slot, value, role).map(Some),
    }
}

/// Surface a host-reported configuration error verbatim.
pub fn check_upstream(snapshot: &HostSnapshot) -> Result<(), CoreError> {
    match &snapshot.configuration_error {
        Some(message) => Err(CoreError::UpstreamConfiguration(message.clone())),
        None => Ok(()),
    }
}
