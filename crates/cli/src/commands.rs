//! Subcommand implementations. Each returns the JSON document to print.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use marquee_core::config::{optional_field, require_field, require_table};
use marquee_core::field::FieldRole;
use marquee_core::grid::{grid_state, GridState, GridView};
use marquee_core::record::HostSnapshot;
use marquee_core::sales::{daily_increments, period_delta, select_performances, SalesSummary};
use marquee_core::types::RecordId;
use marquee_map::{
    build_pins, viewport_key, CachedGeocoder, Geocoder, MapConfig, MapboxGeocoder, Viewport,
    ViewportStore,
};
use marquee_sales::loader::mode_for;
use marquee_sales::{SalesApi, SalesConfig, SalesLoader, SnapshotSource};
use serde_json::{json, Value};

use crate::settings::CliSettings;

pub async fn load_snapshot(path: &Path) -> anyhow::Result<HostSnapshot> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    let snapshot: HostSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        tables = snapshot.tables.len(),
        "Snapshot loaded",
    );
    Ok(snapshot)
}

fn sales_loader(config: Option<SalesConfig>) -> SalesLoader {
    let source = config.map(|c| Arc::new(SalesApi::new(c)) as Arc<dyn SnapshotSource>);
    if source.is_none() {
        tracing::warn!("SALES_API_URL / SALES_API_KEY not set, sales will show no data");
    }
    SalesLoader::new(source)
}

fn geocoder(config: &MapConfig) -> Option<CachedGeocoder<MapboxGeocoder>> {
    let token = config.geocoder_token.clone()?;
    Some(CachedGeocoder::new(MapboxGeocoder::new(
        config.geocoder_url.clone(),
        token,
    )))
}

// ---------------------------------------------------------------------------
// grid
// ---------------------------------------------------------------------------

pub fn grid(settings: &CliSettings, snapshot: &HostSnapshot) -> anyhow::Result<Value> {
    let state = grid_state(
        &settings.grid,
        snapshot,
        &settings.vocabulary,
        &settings.filters,
        settings.layout,
    )?;
    let view = match state {
        GridState::Ready { view } => view,
        GridState::NeedsConfiguration { slot } => {
            tracing::warn!(slot = %slot, "Grid is not fully configured");
            GridView::empty(settings.layout)
        }
    };
    Ok(serde_json::to_value(view)?)
}

// ---------------------------------------------------------------------------
// sales / show
// ---------------------------------------------------------------------------

pub async fn sales(
    settings: &CliSettings,
    config: Option<SalesConfig>,
    ids: &[RecordId],
) -> anyhow::Result<Value> {
    anyhow::ensure!(!ids.is_empty(), "at least one performance id is required");

    let loader = sales_loader(config);
    let series = loader.load(ids).await?;
    Ok(json!({
        "mode": mode_for(ids),
        "series": series.as_slice(),
        "increments": daily_increments(&series),
        "period": period_delta(&series, &settings.period),
    }))
}

pub async fn show(
    settings: &CliSettings,
    snapshot: &HostSnapshot,
    config: Option<SalesConfig>,
    show_id: &RecordId,
) -> anyhow::Result<Value> {
    let performances = settings.performances.resolve(snapshot)?.load();
    let today = Utc::now().date_naive();
    let selected = select_performances(&performances, show_id, settings.performance_filter, today);

    let ids: Vec<RecordId> = selected.iter().map(|p| p.id.clone()).collect();
    let loader = sales_loader(config);
    let series = loader.load(&ids).await?;

    Ok(json!({
        "performances": selected,
        "summary": SalesSummary::from_series(&series, &selected),
        "period": period_delta(&series, &settings.period),
        "series": series.as_slice(),
    }))
}

// ---------------------------------------------------------------------------
// geocode / pins / viewport
// ---------------------------------------------------------------------------

pub async fn geocode(config: &MapConfig, address: &str) -> anyhow::Result<Value> {
    let Some(geocoder) = geocoder(config) else {
        tracing::warn!("GEOCODER_TOKEN not set, geocoding disabled");
        return Ok(Value::Null);
    };
    Ok(serde_json::to_value(geocoder.lookup(address).await?)?)
}

pub async fn pins(
    settings: &CliSettings,
    snapshot: &HostSnapshot,
    config: &MapConfig,
) -> anyhow::Result<Value> {
    let slots = &settings.pins;
    let table = require_table(snapshot, "pin_table", slots.table.as_deref())?;
    let address = require_field(table, "address_field", slots.address_field.as_deref(), FieldRole::Text)?;
    let label = optional_field(table, "label_field", slots.label_field.as_deref(), FieldRole::Text)?;

    let Some(geocoder) = geocoder(config) else {
        tracing::warn!("GEOCODER_TOKEN not set, geocoding disabled");
        return Ok(json!([]));
    };
    let pins = build_pins(&table.records, &address, label.as_ref(), &geocoder).await;
    tracing::info!(records = table.records.len(), pins = pins.len(), "Pins built");
    Ok(serde_json::to_value(pins)?)
}

/// Print the stored viewport for a table, or store `update` first.
pub async fn viewport(
    snapshot: &HostSnapshot,
    config: &MapConfig,
    table: &str,
    update: Option<Viewport>,
) -> anyhow::Result<Value> {
    let store = ViewportStore::new(config.viewport_store_path.clone(), config.default_viewport);
    let table_id = snapshot
        .table(table)
        .map(|t| t.id.to_string())
        .unwrap_or_else(|| table.to_string());
    let key = viewport_key(&snapshot.workspace_id, &table_id);

    if let Some(viewport) = update {
        store.save(&key, viewport).await?;
    }
    Ok(serde_json::to_value(store.load(&key).await)?)
}
