//! Commands run against a snapshot file on disk, without network access.

use std::collections::HashMap;

use marquee_cli::commands;
use marquee_cli::settings::CliSettings;
use marquee_core::types::RecordId;
use marquee_map::{MapConfig, Viewport};
use serde_json::Value;

const SNAPSHOT: &str = r#"{
  "workspace_id": "appTest",
  "tables": [
    {
      "id": "tblEvents", "name": "Événements",
      "fields": [
        {"id": "fldWeeks", "name": "Semaines", "type": "multipleRecordLinks"},
        {"id": "fldBlocs", "name": "Blocs", "type": "multipleRecordLinks"},
        {"id": "fldDays", "name": "Jours", "type": "multipleSelects"}
      ],
      "records": [
        {"id": "recE1", "name": "Concert", "cells": {
          "fldWeeks": {"type": "linked_records", "value": [{"id": "recW1"}]},
          "fldBlocs": {"type": "linked_records", "value": [{"id": "recSoir"}]},
          "fldDays": {"type": "multi_select", "value": [{"name": "Lun"}, {"name": "Mar"}]}
        }}
      ]
    },
    {
      "id": "tblWeeks", "name": "Semaines",
      "fields": [{"id": "fldStart", "name": "Début", "type": "date"}],
      "records": [
        {"id": "recW1", "name": "S1", "cells": {"fldStart": {"type": "date", "value": "2024-01-07"}}}
      ]
    },
    {
      "id": "tblBlocs", "name": "Blocs",
      "records": [{"id": "recSoir", "name": "Soir"}]
    }
  ]
}"#;

fn settings(dir: &tempfile::TempDir, vars: &[(&str, &str)]) -> CliSettings {
    let mut vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    vars.insert(
        "MARQUEE_SNAPSHOT".into(),
        dir.path().join("snapshot.json").display().to_string(),
    );
    CliSettings::from_lookup(|name| vars.get(name).cloned()).unwrap()
}

const GRID_SLOTS: &[(&str, &str)] = &[
    ("MARQUEE_EVENTS_TABLE", "Événements"),
    ("MARQUEE_WEEKS_TABLE", "tblWeeks"),
    ("MARQUEE_BLOCS_TABLE", "tblBlocs"),
    ("MARQUEE_WEEK_LINKS_FIELD", "Semaines"),
    ("MARQUEE_BLOC_LINKS_FIELD", "fldBlocs"),
    ("MARQUEE_ACTIVE_DAYS_FIELD", "Jours"),
    ("MARQUEE_WEEK_START_FIELD", "Début"),
];

async fn write_snapshot(dir: &tempfile::TempDir) {
    tokio::fs::write(dir.path().join("snapshot.json"), SNAPSHOT)
        .await
        .unwrap();
}

#[tokio::test]
async fn grid_prints_configured_rows() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(&dir).await;
    let settings = settings(&dir, GRID_SLOTS);

    let snapshot = commands::load_snapshot(&settings.snapshot_path).await.unwrap();
    let output = commands::grid(&settings, &snapshot).unwrap();

    assert_eq!(output["layout"], "rows");
    let weeks = output["weeks"].as_array().unwrap();
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0]["week"]["id"], "recW1");
    assert_eq!(weeks[0]["rows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unconfigured_grid_prints_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(&dir).await;
    let settings = settings(&dir, &[("MARQUEE_GRID_LAYOUT", "matrix")]);

    let snapshot = commands::load_snapshot(&settings.snapshot_path).await.unwrap();
    let output = commands::grid(&settings, &snapshot).unwrap();

    assert_eq!(output["layout"], "matrix");
    assert_eq!(output["weeks"], Value::Array(Vec::new()));
}

#[tokio::test]
async fn missing_snapshot_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, &[]);
    assert!(commands::load_snapshot(&settings.snapshot_path).await.is_err());
}

#[tokio::test]
async fn sales_without_store_reports_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, &[]);

    let output = commands::sales(&settings, None, &[RecordId::from("recP1"), RecordId::from("recP2")])
        .await
        .unwrap();

    assert_eq!(output["mode"], "aggregate");
    assert_eq!(output["series"], Value::Array(Vec::new()));
    assert_eq!(output["period"]["sold"], 0.0);
}

#[tokio::test]
async fn sales_requires_an_id() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(&dir, &[]);
    assert!(commands::sales(&settings, None, &[]).await.is_err());
}

#[tokio::test]
async fn geocode_without_token_prints_null() {
    let config = MapConfig::from_lookup(|_| None);
    let output = commands::geocode(&config, "Lyon").await.unwrap();
    assert_eq!(output, Value::Null);
}

#[tokio::test]
async fn viewport_saves_then_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(&dir).await;
    let settings = settings(&dir, &[]);
    let snapshot = commands::load_snapshot(&settings.snapshot_path).await.unwrap();

    let store_path = dir.path().join("state").join("viewports.json");
    let config = MapConfig::from_lookup(|name| match name {
        "VIEWPORT_STORE_PATH" => Some(store_path.display().to_string()),
        _ => None,
    });

    let initial = commands::viewport(&snapshot, &config, "Semaines", None).await.unwrap();
    assert_eq!(initial["zoom"], config.default_viewport.zoom);

    let lyon = Viewport {
        longitude: 4.83,
        latitude: 45.76,
        zoom: 11.0,
    };
    commands::viewport(&snapshot, &config, "Semaines", Some(lyon))
        .await
        .unwrap();
    let stored = commands::viewport(&snapshot, &config, "tblWeeks", None).await.unwrap();
    assert_eq!(stored["zoom"], 11.0);
    assert_eq!(stored["longitude"], 4.83);
}
