//! Loader behaviour against in-memory snapshot sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use marquee_core::sales::SnapshotRow;
use marquee_core::types::RecordId;
use marquee_sales::{
    fetch_all, SalesApiError, SalesError, SalesLoader, SalesView, SnapshotSource, PAGE_SIZE,
};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

fn row(id: &str, date: &str, sold: f64) -> SnapshotRow {
    SnapshotRow {
        record_id: RecordId::from(id),
        date: date.to_string(),
        sold,
        free: 0.0,
        total: sold * 10.0,
    }
}

fn ids(raw: &[&str]) -> Vec<RecordId> {
    raw.iter().map(|s| RecordId::from(*s)).collect()
}

/// Holds requests for one record id until released.
struct Gate {
    id: RecordId,
    started: Notify,
    release: Notify,
}

#[derive(Default)]
struct FakeSource {
    rows: Vec<SnapshotRow>,
    calls: AtomicUsize,
    gate: Option<Gate>,
}

impl FakeSource {
    fn new(rows: Vec<SnapshotRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    fn gated(rows: Vec<SnapshotRow>, id: &str) -> Self {
        Self {
            rows,
            calls: AtomicUsize::new(0),
            gate: Some(Gate {
                id: RecordId::from(id),
                started: Notify::new(),
                release: Notify::new(),
            }),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotSource for FakeSource {
    async fn fetch_page(
        &self,
        ids: &[RecordId],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SnapshotRow>, SalesApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            if ids.contains(&gate.id) {
                gate.started.notify_one();
                gate.release.notified().await;
            }
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| ids.contains(&r.record_id))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Serves `total` identical rows in pages.
struct PagedSource {
    total: usize,
    offsets: std::sync::Mutex<Vec<usize>>,
}

#[async_trait]
impl SnapshotSource for PagedSource {
    async fn fetch_page(
        &self,
        _ids: &[RecordId],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SnapshotRow>, SalesApiError> {
        self.offsets.lock().unwrap().push(offset);
        let count = self.total.saturating_sub(offset).min(limit);
        Ok((0..count).map(|_| row("recP", "2024-01-01", 1.0)).collect())
    }
}

struct FailingSource;

#[async_trait]
impl SnapshotSource for FailingSource {
    async fn fetch_page(
        &self,
        _ids: &[RecordId],
        _offset: usize,
        _limit: usize,
    ) -> Result<Vec<SnapshotRow>, SalesApiError> {
        Err(SalesApiError::ApiError {
            status: 503,
            body: "upstream unavailable".into(),
        })
    }
}

/// A page request that never completes.
struct HangingSource;

#[async_trait]
impl SnapshotSource for HangingSource {
    async fn fetch_page(
        &self,
        _ids: &[RecordId],
        _offset: usize,
        _limit: usize,
    ) -> Result<Vec<SnapshotRow>, SalesApiError> {
        std::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pagination_fetches_until_short_page() {
    let source = PagedSource {
        total: 2400,
        offsets: Default::default(),
    };
    let rows = fetch_all(&source, &ids(&["recP"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2400);
    assert_eq!(*source.offsets.lock().unwrap(), vec![0, PAGE_SIZE, 2 * PAGE_SIZE]);
}

#[tokio::test]
async fn pagination_exact_multiple_ends_on_empty_page() {
    let source = PagedSource {
        total: 2000,
        offsets: Default::default(),
    };
    let rows = fetch_all(&source, &ids(&["recP"]), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(rows.len(), 2000);
    assert_eq!(source.offsets.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn cancelled_fetch_makes_no_request() {
    let source = PagedSource {
        total: 10,
        offsets: Default::default(),
    };
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = fetch_all(&source, &ids(&["recP"]), &cancel).await;
    assert_matches!(result, Err(SalesError::Cancelled));
    assert!(source.offsets.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cancel_interrupts_in_flight_page() {
    let cancel = CancellationToken::new();
    let fetch = tokio::spawn({
        let cancel = cancel.clone();
        async move { fetch_all(&HangingSource, &ids(&["recP"]), &cancel).await }
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let result = tokio::time::timeout(Duration::from_secs(2), fetch)
        .await
        .expect("fetch should stop once cancelled")
        .unwrap();
    assert_matches!(result, Err(SalesError::Cancelled));
}

#[tokio::test]
async fn empty_selection_makes_no_request() {
    let source = PagedSource {
        total: 10,
        offsets: Default::default(),
    };
    let rows = fetch_all(&source, &[], &CancellationToken::new()).await.unwrap();
    assert!(rows.is_empty());
    assert!(source.offsets.lock().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

#[tokio::test]
async fn newer_request_wins() {
    let source = Arc::new(FakeSource::gated(
        vec![
            row("recSlow", "2024-03-01", 1.0),
            row("recFast", "2024-03-01", 9.0),
        ],
        "recSlow",
    ));
    let loader = Arc::new(SalesLoader::new(Some(source.clone())));

    let slow = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load(&ids(&["recSlow"])).await }
    });
    if let Some(gate) = &source.gate {
        gate.started.notified().await;
    }

    let fast = loader.load(&ids(&["recFast"])).await.unwrap();
    assert_eq!(fast[0].sold, 9.0);

    if let Some(gate) = &source.gate {
        gate.release.notify_one();
    }
    let slow = slow.await.unwrap();
    assert_matches!(slow, Err(SalesError::Cancelled));

    assert_matches!(loader.view(), SalesView::Ready { key, series } => {
        assert_eq!(key.as_str(), "recFast");
        assert_eq!(series[0].sold, 9.0);
    });
    assert_eq!(loader.cached().await, 1);
}

#[tokio::test]
async fn superseded_load_does_not_wait_for_its_page() {
    let loader = Arc::new(SalesLoader::new(Some(Arc::new(HangingSource))));

    let first = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load(&ids(&["recA"])).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    // Starting a newer load cancels the first one.
    let second = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load(&ids(&["recB"])).await }
    });

    let first = tokio::time::timeout(Duration::from_secs(2), first)
        .await
        .expect("superseded load should return promptly")
        .unwrap();
    assert_matches!(first, Err(SalesError::Cancelled));
    assert_matches!(loader.view(), SalesView::Loading { key } => {
        assert_eq!(key.as_str(), "recB");
    });
    second.abort();
}

#[tokio::test]
async fn cache_hit_skips_source() {
    let source = Arc::new(FakeSource::new(vec![row("recA", "2024-03-01", 3.0)]));
    let loader = SalesLoader::new(Some(source.clone()));

    loader.load(&ids(&["recA"])).await.unwrap();
    let again = loader.load(&ids(&["recA"])).await.unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(again[0].sold, 3.0);

    loader.clear_cache().await;
    loader.load(&ids(&["recA"])).await.unwrap();
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn several_ids_are_aggregated() {
    let source = Arc::new(FakeSource::new(vec![
        row("recA", "2024-03-01", 5.0),
        row("recA", "2024-03-03", 7.0),
        row("recB", "2024-03-02", 3.0),
    ]));
    let loader = SalesLoader::new(Some(source));

    let series = loader.load(&ids(&["recB", "recA"])).await.unwrap();
    let sold: Vec<f64> = series.iter().map(|p| p.sold).collect();
    assert_eq!(sold, vec![5.0, 8.0, 10.0]);
}

#[tokio::test]
async fn unconfigured_source_reports_no_data() {
    let loader = SalesLoader::new(None);
    let series = loader.load(&ids(&["recA"])).await.unwrap();
    assert!(series.is_empty());
    assert_matches!(loader.view(), SalesView::Ready { series, .. } if series.is_empty());
}

#[tokio::test]
async fn failure_is_published_with_status() {
    let loader = SalesLoader::new(Some(Arc::new(FailingSource)));
    let mut rx = loader.subscribe();

    let result = loader.load(&ids(&["recA"])).await;
    assert_matches!(result, Err(SalesError::Api(_)));

    assert_matches!(&*rx.borrow_and_update(), SalesView::Failed { status: Some(503), message } => {
        assert!(message.contains("upstream unavailable"));
    });
    assert_eq!(loader.cached().await, 0);
}

#[tokio::test]
async fn subscribers_see_ready_state() {
    let source = Arc::new(FakeSource::new(vec![row("recA", "2024-03-01", 2.0)]));
    let loader = SalesLoader::new(Some(source));
    let rx = loader.subscribe();
    assert_eq!(*rx.borrow(), SalesView::Idle);

    loader.load(&ids(&["recA"])).await.unwrap();
    assert_matches!(&*rx.borrow(), SalesView::Ready { .. });
}
