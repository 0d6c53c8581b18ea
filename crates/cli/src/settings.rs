//! CLI settings from environment variables.
//!
//! Extension slots are named after their field in the slot structs,
//! upper-cased and prefixed with `MARQUEE_` (e.g. `events_table` is read
//! from `MARQUEE_EVENTS_TABLE`). Values are table or field ids or names.

use std::path::PathBuf;

use anyhow::Context;
use marquee_core::grid::{BlocVocabulary, GridConfig, GridFilters, GridLayout};
use marquee_core::sales::{PerformanceConfig, PerformanceFilter, PeriodRange};
use marquee_core::types::RecordId;

pub const DEFAULT_SNAPSHOT_PATH: &str = "snapshot.json";

/// Map pin slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinSlots {
    pub table: Option<String>,
    pub address_field: Option<String>,
    pub label_field: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CliSettings {
    pub snapshot_path: PathBuf,
    pub layout: GridLayout,
    pub filters: GridFilters,
    pub grid: GridConfig,
    pub vocabulary: BlocVocabulary,
    pub performances: PerformanceConfig,
    pub performance_filter: PerformanceFilter,
    pub period: PeriodRange,
    pub pins: PinSlots,
}

fn flag(value: Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim).map(str::to_lowercase).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

impl CliSettings {
    /// | Variable                  | Default          |
    /// |---------------------------|------------------|
    /// | `MARQUEE_SNAPSHOT`        | `snapshot.json`  |
    /// | `MARQUEE_GRID_LAYOUT`     | `rows`           |
    /// | `MARQUEE_SITE_FILTER`     | —                |
    /// | `MARQUEE_CANAL_FILTER`    | —                |
    /// | `MARQUEE_WEEK_FILTER`     | —                |
    /// | `MARQUEE_BLOCS`           | `Matin,Après-midi,Soir,Nuit` |
    /// | `MARQUEE_PERIOD_FROM`     | —                |
    /// | `MARQUEE_PERIOD_TO`       | —                |
    /// | `MARQUEE_EXCLUDE_CANCELLED` | `false`        |
    /// | `MARQUEE_EXCLUDE_PAST`    | `false`          |
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let slot = |name: &str| var(&format!("MARQUEE_{}", name.to_uppercase()));
        let id = |name: &str| var(name).map(RecordId::new);

        let layout = match var("MARQUEE_GRID_LAYOUT") {
            Some(raw) => raw
                .parse::<GridLayout>()
                .context("MARQUEE_GRID_LAYOUT")?,
            None => GridLayout::default(),
        };

        let vocabulary = match var("MARQUEE_BLOCS") {
            Some(raw) => BlocVocabulary::new(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>(),
            ),
            None => BlocVocabulary::default(),
        };

        Ok(Self {
            snapshot_path: var("MARQUEE_SNAPSHOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_PATH)),
            layout,
            filters: GridFilters {
                site: id("MARQUEE_SITE_FILTER"),
                canal: id("MARQUEE_CANAL_FILTER"),
                week: id("MARQUEE_WEEK_FILTER"),
            },
            grid: GridConfig {
                events_table: slot("events_table"),
                weeks_table: slot("weeks_table"),
                blocs_table: slot("blocs_table"),
                week_links_field: slot("week_links_field"),
                bloc_links_field: slot("bloc_links_field"),
                active_days_field: slot("active_days_field"),
                site_field: slot("site_field"),
                canal_field: slot("canal_field"),
                week_start_field: slot("week_start_field"),
                week_end_field: slot("week_end_field"),
            },
            vocabulary,
            performances: PerformanceConfig {
                performances_table: slot("performances_table"),
                show_field: slot("show_field"),
                date_field: slot("date_field"),
                capacity_field: slot("capacity_field"),
                revenue_capacity_field: slot("revenue_capacity_field"),
                venue_field: slot("venue_field"),
                city_field: slot("city_field"),
                status_field: slot("status_field"),
            },
            performance_filter: PerformanceFilter {
                exclude_cancelled: flag(var("MARQUEE_EXCLUDE_CANCELLED")),
                exclude_past: flag(var("MARQUEE_EXCLUDE_PAST")),
            },
            period: PeriodRange {
                from: var("MARQUEE_PERIOD_FROM"),
                to: var("MARQUEE_PERIOD_TO"),
            },
            pins: PinSlots {
                table: slot("pin_table"),
                address_field: slot("address_field"),
                label_field: slot("label_field"),
            },
        })
    }
}
