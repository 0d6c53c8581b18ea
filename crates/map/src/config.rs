//! Map configuration from environment variables.

use std::path::PathBuf;

use crate::viewport::Viewport;

pub const DEFAULT_GEOCODER_URL: &str = "https://api.mapbox.com";
pub const DEFAULT_VIEWPORT_STORE_PATH: &str = "viewports.json";

/// Centre of metropolitan France.
pub const DEFAULT_VIEWPORT: Viewport = Viewport {
    longitude: 2.2137,
    latitude: 46.2276,
    zoom: 5.0,
};

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    pub geocoder_url: String,
    /// Geocoding is disabled without a token.
    pub geocoder_token: Option<String>,
    pub viewport_store_path: PathBuf,
    pub default_viewport: Viewport,
}

impl MapConfig {
    /// | Variable              | Required | Default                  |
    /// |-----------------------|----------|--------------------------|
    /// | `GEOCODER_URL`        | no       | `https://api.mapbox.com` |
    /// | `GEOCODER_TOKEN`      | no       | —                        |
    /// | `VIEWPORT_STORE_PATH` | no       | `viewports.json`         |
    /// | `DEFAULT_LONGITUDE`   | no       | `2.2137`                 |
    /// | `DEFAULT_LATITUDE`    | no       | `46.2276`                |
    /// | `DEFAULT_ZOOM`        | no       | `5`                      |
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |name: &str, default: f64| {
            lookup(name)
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .unwrap_or(default)
        };

        let mut default_viewport = Viewport {
            longitude: number("DEFAULT_LONGITUDE", DEFAULT_VIEWPORT.longitude),
            latitude: number("DEFAULT_LATITUDE", DEFAULT_VIEWPORT.latitude),
            zoom: number("DEFAULT_ZOOM", DEFAULT_VIEWPORT.zoom),
        };
        if !default_viewport.is_valid() {
            tracing::warn!(?default_viewport, "Configured default viewport out of range, ignoring");
            default_viewport = DEFAULT_VIEWPORT;
        }

        Self {
            geocoder_url: lookup("GEOCODER_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            geocoder_token: lookup("GEOCODER_TOKEN").filter(|v| !v.trim().is_empty()),
            viewport_store_path: lookup("VIEWPORT_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_VIEWPORT_STORE_PATH)),
            default_viewport,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        let config = MapConfig::from_lookup(|_| None);
        assert_eq!(config.geocoder_url, DEFAULT_GEOCODER_URL);
        assert_eq!(config.geocoder_token, None);
        assert_eq!(config.default_viewport, DEFAULT_VIEWPORT);
    }

    #[test]
    fn out_of_range_default_is_ignored() {
        let config = MapConfig::from_lookup(|name| match name {
            "DEFAULT_LATITUDE" => Some("123".into()),
            "DEFAULT_ZOOM" => Some("9".into()),
            _ => None,
        });
        assert_eq!(config.default_viewport, DEFAULT_VIEWPORT);
    }

    #[test]
    fn reads_overrides() {
        let config = MapConfig::from_lookup(|name| match name {
            "GEOCODER_TOKEN" => Some("pk.abc".into()),
            "DEFAULT_ZOOM" => Some("8".into()),
            _ => None,
        });
        assert_eq!(config.geocoder_token.as_deref(), Some("pk.abc"));
        assert_eq!(config.default_viewport.zoom, 8.0);
    }
}
