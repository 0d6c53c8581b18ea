//! Map support: geocoding with a session cache, persisted viewports and
//! record pins.

pub mod config;
pub mod geocode;
pub mod pins;
pub mod viewport;

pub use config::MapConfig;
pub use geocode::{normalize_address, CachedGeocoder, Coordinates, GeocodeError, Geocoder, MapboxGeocoder};
pub use pins::{build_pins, MapPin};
pub use viewport::{viewport_key, Viewport, ViewportError, ViewportStore};
