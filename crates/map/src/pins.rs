//! Map pins from host records.

use futures::{stream, StreamExt};
use marquee_core::field::FieldRef;
use marquee_core::record::Record;
use marquee_core::types::RecordId;
use serde::Serialize;

use crate::geocode::{Coordinates, Geocoder};

/// Concurrent geocoder lookups while building pins.
const LOOKUP_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPin {
    pub record_id: RecordId,
    pub label: String,
    pub address: String,
    pub coordinates: Coordinates,
}

/// Geocode each record's address. Records with an empty address, no match
/// or a failed lookup are left out; pins keep record order.
pub async fn build_pins(
    records: &[Record],
    address_field: &FieldRef,
    label_field: Option<&FieldRef>,
    geocoder: &dyn Geocoder,
) -> Vec<MapPin> {
    let candidates: Vec<(&Record, String)> = records
        .iter()
        .filter_map(|record| {
            let address = address_field
                .text(record)
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty());
            if address.is_none() {
                tracing::debug!(record_id = %record.id, "Record without address skipped");
            }
            address.map(|a| (record, a))
        })
        .collect();

    stream::iter(candidates)
        .map(|(record, address)| async move {
            let found = geocoder.lookup(&address).await;
            (record, address, found)
        })
        .buffered(LOOKUP_CONCURRENCY)
        .filter_map(|(record, address, found)| async move {
            let coordinates = match found {
                Ok(Some(c)) => c,
                Ok(None) => return None,
                Err(e) => {
                    tracing::warn!(record_id = %record.id, error = %e, "Geocoding failed");
                    return None;
                }
            };
            let label = label_field
                .and_then(|f| f.text(record))
                .unwrap_or_else(|| record.name.clone());
            Some(MapPin {
                record_id: record.id.clone(),
                label,
                address,
                coordinates,
            })
        })
        .collect()
        .await
}
