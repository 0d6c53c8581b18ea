//! Address geocoding.
//!
//! [`MapboxGeocoder`] queries the Mapbox places API and keeps only the best
//! match. [`CachedGeocoder`] wraps any [`Geocoder`] with a session cache
//! keyed by [`normalize_address`]; misses are cached too, errors are not.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OnceCell};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoder API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid geocoder URL: {0}")]
    InvalidUrl(String),
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `address`, or `None` when nothing matched.
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError>;
}

/// Cache key for an address: trimmed, lower-cased, inner whitespace
/// collapsed to single spaces.
pub fn normalize_address(address: &str) -> String {
    address
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

// ---------------------------------------------------------------------------
// Mapbox
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[longitude, latitude]`.
    center: [f64; 2],
}

pub struct MapboxGeocoder {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl MapboxGeocoder {
    /// * `base_url` - API root, e.g. `https://api.mapbox.com`.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    pub fn lookup_url(&self, address: &str) -> Result<Url, GeocodeError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| GeocodeError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GeocodeError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["geocoding", "v5", "mapbox.places"])
            .push(&format!("{address}.json"));
        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("limit", "1");
        Ok(url)
    }
}

#[async_trait]
impl Geocoder for MapboxGeocoder {
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self.client.get(self.lookup_url(address)?).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeocodeError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let places: PlacesResponse = response.json().await?;
        Ok(places.features.first().map(|f| Coordinates {
            longitude: f.center[0],
            latitude: f.center[1],
        }))
    }
}

// ---------------------------------------------------------------------------
// Session cache
// ---------------------------------------------------------------------------

type CacheSlot = Arc<OnceCell<Option<Coordinates>>>;

/// Concurrent lookups of the same key share a single inner lookup.
pub struct CachedGeocoder<G> {
    inner: G,
    cache: Mutex<HashMap<String, CacheSlot>>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Number of addresses with a settled result (found or not found).
    pub async fn cached(&self) -> usize {
        self.cache
            .lock()
            .await
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }
}

#[async_trait]
impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn lookup(&self, address: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let key = normalize_address(address);
        if key.is_empty() {
            return Ok(None);
        }
        let slot = self
            .cache
            .lock()
            .await
            .entry(key.clone())
            .or_default()
            .clone();

        // A failed lookup leaves the slot empty for the next caller.
        let found = slot
            .get_or_try_init(|| async {
                let found = self.inner.lookup(address.trim()).await?;
                if found.is_none() {
                    tracing::debug!(address = %key, "Address not found by geocoder");
                }
                Ok::<_, GeocodeError>(found)
            })
            .await?;
        Ok(*found)
    }
}
