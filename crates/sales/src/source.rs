//! Paginated snapshot retrieval.
//!
//! [`SnapshotSource`] is the seam between the loader and the remote store;
//! [`fetch_all`] walks its pages until a short page signals the end,
//! yielding between pages and honouring cancellation at every suspension.

use async_trait::async_trait;
use marquee_core::sales::SnapshotRow;
use marquee_core::types::RecordId;
use tokio_util::sync::CancellationToken;

use crate::api::{SalesApi, SalesApiError};
use crate::error::SalesError;

/// Rows requested per page.
pub const PAGE_SIZE: usize = 1000;

/// A store of daily sales snapshots.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Rows for `ids` ordered by date, `limit` rows starting at `offset`.
    async fn fetch_page(
        &self,
        ids: &[RecordId],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SnapshotRow>, SalesApiError>;
}

#[async_trait]
impl SnapshotSource for SalesApi {
    async fn fetch_page(
        &self,
        ids: &[RecordId],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SnapshotRow>, SalesApiError> {
        SalesApi::fetch_page(self, ids, offset, limit).await
    }
}

/// Fetch every row for `ids`.
///
/// Returns [`SalesError::Cancelled`] as soon as `cancel` fires; pages
/// already received are discarded.
pub async fn fetch_all(
    source: &dyn SnapshotSource,
    ids: &[RecordId],
    cancel: &CancellationToken,
) -> Result<Vec<SnapshotRow>, SalesError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut rows = Vec::new();
    let mut offset = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(SalesError::Cancelled);
        }
        let page = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(offset, "Sales snapshot fetch cancelled in flight");
                return Err(SalesError::Cancelled);
            }
            result = source.fetch_page(ids, offset, PAGE_SIZE) => result?,
        };

        let page_len = page.len();
        rows.extend(page);
        tracing::debug!(offset, page_len, total = rows.len(), "Fetched sales snapshot page");

        if page_len < PAGE_SIZE {
            break;
        }
        offset += PAGE_SIZE;
        tokio::task::yield_now().await;
    }

    Ok(rows)
}
