//! Remote sales store configuration.
//!
//! Loaded from environment variables. If `SALES_API_URL` or
//! `SALES_API_KEY` is missing, [`SalesConfig::from_env`] returns `Ok(None)`
//! and callers show "no data" instead of failing.

use validator::Validate;

use crate::error::SalesError;

/// Default remote table holding daily snapshots.
pub const DEFAULT_SALES_TABLE: &str = "performance_sales";

#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SalesConfig {
    /// Base URL of the REST endpoint, e.g. `https://xyz.supabase.co`.
    #[validate(url)]
    pub api_url: String,
    #[validate(length(min = 1))]
    pub api_key: String,
    #[validate(length(min = 1))]
    pub table: String,
    /// Restricts rows to one host workspace when set.
    pub workspace_id: Option<String>,
}

impl SalesConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable             | Required | Default             |
    /// |----------------------|----------|---------------------|
    /// | `SALES_API_URL`      | yes      | —                   |
    /// | `SALES_API_KEY`      | yes      | —                   |
    /// | `SALES_TABLE`        | no       | `performance_sales` |
    /// | `SALES_WORKSPACE_ID` | no       | —                   |
    pub fn from_env() -> Result<Option<Self>, SalesError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable source.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, SalesError> {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let (Some(api_url), Some(api_key)) = (present("SALES_API_URL"), present("SALES_API_KEY"))
        else {
            return Ok(None);
        };

        let config = Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            table: present("SALES_TABLE").unwrap_or_else(|| DEFAULT_SALES_TABLE.to_string()),
            workspace_id: present("SALES_WORKSPACE_ID"),
        };
        config
            .validate()
            .map_err(|e| SalesError::InvalidConfig(e.to_string()))?;
        Ok(Some(config))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
