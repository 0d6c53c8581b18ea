//! Session cache of reconstructed series.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use marquee_core::sales::SeriesPoint;
use marquee_core::types::RecordId;

/// Cache key for a performance selection: the single id, or the sorted,
/// de-duplicated ids joined with `,`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey(String);

impl SeriesKey {
    pub fn new(ids: &[RecordId]) -> Self {
        let mut ids: Vec<&str> = ids.iter().map(RecordId::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids.join(","))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub type Series = Arc<Vec<SeriesPoint>>;

/// Unbounded; lives as long as the loader that owns it.
#[derive(Debug, Default)]
pub struct SeriesCache {
    entries: HashMap<SeriesKey, Series>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SeriesKey) -> Option<Series> {
        self.entries.get(key).cloned()
    }

    pub fn insert(&mut self, key: SeriesKey, series: Series) {
        self.entries.insert(key, series);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
