//! Remote box-office snapshots for the sales dashboard.
//!
//! [`api::SalesApi`] talks to the snapshot store, [`source::fetch_all`]
//! pages through it, and [`loader::SalesLoader`] turns a performance
//! selection into a reconstructed series with a session cache and
//! latest-wins cancellation.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod loader;
pub mod source;

pub use api::{SalesApi, SalesApiError};
pub use cache::{SeriesCache, SeriesKey};
pub use config::SalesConfig;
pub use error::SalesError;
pub use loader::{SalesLoader, SalesView};
pub use source::{fetch_all, SnapshotSource, PAGE_SIZE};
