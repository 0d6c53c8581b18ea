//! Latest-wins sales loader.
//!
//! Every call to [`SalesLoader::load`] cancels the request in flight and
//! issues a fresh [`CancellationToken`]. A completed fetch publishes its
//! result only if its token is still live; the check and the write to the
//! cache and view happen under the same lock, so a superseded request can
//! never overwrite a newer one.
//!
//! Views observe progress through a [`tokio::sync::watch`] channel of
//! [`SalesView`]. Call [`SalesLoader::subscribe`] to receive it.

use std::sync::Arc;

use marquee_core::sales::{reconstruct, SeriesMode};
use marquee_core::types::RecordId;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::cache::{Series, SeriesCache, SeriesKey};
use crate::error::SalesError;
use crate::source::{fetch_all, SnapshotSource};

/// Observable state of the sales panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SalesView {
    /// Nothing requested yet.
    Idle,
    Loading { key: SeriesKey },
    /// An empty series means "no data".
    Ready { key: SeriesKey, series: Series },
    Failed { status: Option<u16>, message: String },
}

/// Series mode for a selection: one performance is `Single`, several are
/// summed per performance.
pub fn mode_for(ids: &[RecordId]) -> SeriesMode {
    if ids.len() > 1 {
        SeriesMode::Aggregate
    } else {
        SeriesMode::Single
    }
}

struct LoaderState {
    cache: SeriesCache,
    current: CancellationToken,
}

pub struct SalesLoader {
    /// `None` when the remote store is not configured.
    source: Option<Arc<dyn SnapshotSource>>,
    state: Mutex<LoaderState>,
    view_tx: watch::Sender<SalesView>,
}

impl SalesLoader {
    pub fn new(source: Option<Arc<dyn SnapshotSource>>) -> Self {
        let (view_tx, _) = watch::channel(SalesView::Idle);
        Self {
            source,
            state: Mutex::new(LoaderState {
                cache: SeriesCache::new(),
                current: CancellationToken::new(),
            }),
            view_tx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SalesView> {
        self.view_tx.subscribe()
    }

    pub fn view(&self) -> SalesView {
        self.view_tx.borrow().clone()
    }

    /// Number of cached selections.
    pub async fn cached(&self) -> usize {
        self.state.lock().await.cache.len()
    }

    /// Drop every cached series so the next load refetches.
    pub async fn clear_cache(&self) {
        self.state.lock().await.cache.clear();
    }

    /// Load the series for `ids`, superseding any earlier request.
    ///
    /// Returns [`SalesError::Cancelled`] if a newer request was issued
    /// before this one completed; the view then reflects the newer one.
    pub async fn load(&self, ids: &[RecordId]) -> Result<Series, SalesError> {
        let key = SeriesKey::new(ids);

        let (token, source) = {
            let mut state = self.state.lock().await;
            state.current.cancel();
            state.current = CancellationToken::new();

            if let Some(series) = state.cache.get(&key) {
                tracing::debug!(key = %key, "Sales series served from cache");
                self.publish(SalesView::Ready {
                    key,
                    series: series.clone(),
                });
                return Ok(series);
            }

            let Some(source) = self.source.clone() else {
                tracing::debug!(key = %key, "Sales source not configured, reporting no data");
                let series = Series::default();
                self.publish(SalesView::Ready {
                    key,
                    series: series.clone(),
                });
                return Ok(series);
            };

            self.publish(SalesView::Loading { key: key.clone() });
            (state.current.clone(), source)
        };

        let result = fetch_all(source.as_ref(), ids, &token)
            .await
            .map(|rows| Arc::new(reconstruct(&rows, mode_for(ids))));

        let mut state = self.state.lock().await;
        if token.is_cancelled() {
            tracing::debug!(key = %key, "Superseded sales request discarded");
            return Err(SalesError::Cancelled);
        }

        match result {
            Ok(series) => {
                tracing::info!(key = %key, days = series.len(), "Sales series loaded");
                state.cache.insert(key.clone(), series.clone());
                self.publish(SalesView::Ready {
                    key,
                    series: series.clone(),
                });
                Ok(series)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Sales request failed");
                self.publish(SalesView::Failed {
                    status: e.status(),
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn publish(&self, view: SalesView) {
        self.view_tx.send_replace(view);
    }
}
