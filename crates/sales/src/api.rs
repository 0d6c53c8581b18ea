//! REST client for the remote sales snapshot store.
//!
//! The store exposes a PostgREST-style endpoint: one row per performance
//! per day, filtered and paginated through query parameters.

use marquee_core::sales::SnapshotRow;
use marquee_core::types::RecordId;
use reqwest::Url;

use crate::config::SalesConfig;

/// Columns requested for each snapshot row.
const SELECT_COLUMNS: &str = "record_id,date,sold,free,total";

/// HTTP client for the sales snapshot table.
pub struct SalesApi {
    client: reqwest::Client,
    config: SalesConfig,
}

/// Errors from the sales REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum SalesApiError {
    /// The HTTP request itself failed (network, DNS, TLS, decoding).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store returned a non-2xx status code.
    #[error("Sales API error ({status}): {body}")]
    ApiError {
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    #[error("Invalid sales API URL: {0}")]
    InvalidUrl(String),
}

impl SalesApi {
    pub fn new(config: SalesConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: SalesConfig) -> Self {
        Self { client, config }
    }

    /// URL of one page of snapshots for `ids`, oldest first.
    pub fn page_url(
        &self,
        ids: &[RecordId],
        offset: usize,
        limit: usize,
    ) -> Result<Url, SalesApiError> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| SalesApiError::InvalidUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| SalesApiError::InvalidUrl(self.config.api_url.clone()))?
            .pop_if_empty()
            .extend(["rest", "v1", self.config.table.as_str()]);

        let id_list = ids
            .iter()
            .map(RecordId::as_str)
            .collect::<Vec<_>>()
            .join(",");

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("select", SELECT_COLUMNS);
            if let Some(workspace_id) = &self.config.workspace_id {
                query.append_pair("workspace_id", &format!("eq.{workspace_id}"));
            }
            query
                .append_pair("record_id", &format!("in.({id_list})"))
                .append_pair("order", "date.asc")
                .append_pair("limit", &limit.to_string())
                .append_pair("offset", &offset.to_string());
        }
        Ok(url)
    }

    /// Fetch one page of snapshot rows.
    pub async fn fetch_page(
        &self,
        ids: &[RecordId],
        offset: usize,
        limit: usize,
    ) -> Result<Vec<SnapshotRow>, SalesApiError> {
        let url = self.page_url(ids, offset, limit)?;

        let response = self
            .client
            .get(url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), offset, "Sales store rejected page request");
            return Err(SalesApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
