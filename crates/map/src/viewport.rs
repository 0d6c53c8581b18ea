//! Persisted map viewport per workspace and table.
//!
//! The store is a single JSON object `key -> Viewport`. Reads never fail:
//! a missing, unreadable or corrupt file yields the configured default.
//! Writes replace the file atomically (write to a sibling temp file, then
//! rename).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
}

/// Highest zoom level rendered by the map.
pub const MAX_ZOOM: f64 = 22.0;

impl Viewport {
    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
            && (0.0..=MAX_ZOOM).contains(&self.zoom)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    #[error("Viewport store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Viewport store serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Viewport out of range: {0:?}")]
    OutOfRange(Viewport),
}

/// Store key for a table's map in a workspace.
pub fn viewport_key(workspace_id: &str, table_id: &str) -> String {
    format!("{workspace_id}:{table_id}")
}

type Entries = BTreeMap<String, Viewport>;

pub struct ViewportStore {
    path: PathBuf,
    default: Viewport,
}

impl ViewportStore {
    pub fn new(path: impl Into<PathBuf>, default: Viewport) -> Self {
        Self {
            path: path.into(),
            default,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Entries {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Entries::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Viewport store unreadable");
                return Entries::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Viewport store corrupt, ignoring");
            Entries::new()
        })
    }

    /// Saved viewport for `key`, or the default.
    pub async fn load(&self, key: &str) -> Viewport {
        match self.read_entries().await.get(key) {
            Some(viewport) if viewport.is_valid() => *viewport,
            Some(viewport) => {
                tracing::debug!(key, ?viewport, "Stored viewport out of range, using default");
                self.default
            }
            None => self.default,
        }
    }

    pub async fn save(&self, key: &str, viewport: Viewport) -> Result<(), ViewportError> {
        if !viewport.is_valid() {
            return Err(ViewportError::OutOfRange(viewport));
        }

        let mut entries = self.read_entries().await;
        entries.insert(key.to_string(), viewport);
        let payload = serde_json::to_string_pretty(&entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, payload).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::debug!(key, path = %self.path.display(), "Viewport saved");
        Ok(())
    }
}
