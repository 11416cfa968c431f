//! Client request module
//!
//! Sends a [`SearchRequest`] either straight to the upstream search API or to
//! the proxy, and normalizes whatever comes back.

use crate::transport::{HttpTransport, SearchTransport};
use ghsearch_core::config::Config;
use ghsearch_core::error::Result;
use ghsearch_core::{build_request, normalize_response, SearchRequest, SearchResult};
use std::sync::Arc;
use tracing::{debug, info};

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

/// Search client holding the transport and header policy
pub struct SearchClient {
    transport: Arc<dyn SearchTransport>,
    search_url: String,
    proxy_url: String,
    user_agent: String,
    token: Option<String>,
}

impl SearchClient {
    /// Create a client over an explicit transport
    pub fn new(transport: Arc<dyn SearchTransport>, config: &Config) -> Self {
        Self {
            transport,
            search_url: config.upstream.search_url.clone(),
            proxy_url: config.client.proxy_url.clone(),
            user_agent: config.upstream.user_agent.clone(),
            token: config.upstream.token.clone(),
        }
    }

    /// Create a client over HTTP
    pub fn from_config(config: &Config) -> Result<Self> {
        info!(
            "Creating search client (upstream: {}, proxy: {}, authenticated: {})",
            config.upstream.search_url,
            config.client.proxy_url,
            config.upstream.token.is_some()
        );
        let transport = HttpTransport::new(config.upstream.timeout_secs)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    /// Run one search
    ///
    /// Nothing is sent when the request fails to build (empty query, values
    /// out of range).
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let built = build_request(request)?;

        let (endpoint, headers) = if request.targets_proxy {
            (self.proxy_url.as_str(), self.proxy_headers())
        } else {
            (self.search_url.as_str(), self.direct_headers())
        };
        let url = built.url_for(endpoint);

        debug!("Searching repositories: {url}");
        let outcome = self.transport.get(&url, &headers).await;
        normalize_response(outcome)
    }

    /// Headers for calling upstream directly
    fn direct_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Accept", ACCEPT_GITHUB_JSON.to_string()),
            ("User-Agent", self.user_agent.clone()),
        ];
        if let Some(token) = &self.token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        headers
    }

    /// Headers for calling the proxy, which holds the credentials
    fn proxy_headers(&self) -> Vec<(&'static str, String)> {
        vec![("Accept", ACCEPT_GITHUB_JSON.to_string())]
    }
}
