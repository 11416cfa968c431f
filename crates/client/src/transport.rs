//! Transport seam between the search core and the network

use async_trait::async_trait;
use ghsearch_core::error::{Error, Result};
use ghsearch_core::{ResponseHeaders, UpstreamResponse};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Executes one GET request and hands back the raw response
///
/// Implementations report network-level failures as
/// [`Error::TransportUnavailable`] and return every obtained response,
/// whatever its status, as an [`UpstreamResponse`].
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&'static str, String)])
        -> Result<UpstreamResponse>;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<UpstreamResponse> {
        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await.map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connection"
            } else if e.is_request() {
                "request build"
            } else {
                "unknown"
            };
            warn!("Search request failed ({error_kind}): {e}");
            Error::transport(format!("{error_kind}: {e}"))
        })?;

        let status = response.status().as_u16();
        let headers = ResponseHeaders::from_pairs(
            response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
                }),
        );

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read search response body: {e}");
            Error::transport(format!("body: {e}"))
        })?;

        debug!("Search response: status={status}, {} bytes", body.len());

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
