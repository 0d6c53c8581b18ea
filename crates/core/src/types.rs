//! Identifier newtypes shared across the workspace.
//!
//! Host platform identifiers are opaque strings (e.g. `recXXXXXXXXXXXXXX`).
//! Identity is always by identifier, never by position in a list.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(
    /// Identifier of a host record.
    RecordId
);

string_id!(
    /// Identifier of a host table field.
    FieldId
);

string_id!(
    /// Identifier of a host table.
    TableId
);

/// Calendar day, no time zone.
pub type Day = chrono::NaiveDate;
