//! Caching and retrying caller layer
//!
//! Wraps a [`SearchClient`] with a time-bounded result cache keyed on the
//! normalized request, shares one in-flight call between identical concurrent
//! searches, and applies an explicit retry policy.

use crate::client::SearchClient;
use ghsearch_core::config::ClientConfig;
use ghsearch_core::error::{Error, Result};
use ghsearch_core::{sanitize_query, OrderOption, SearchRequest, SearchResult, SortOption};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Longest wait between two attempts
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

/// Cache key: the request fields after normalization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub normalized_query: String,
    pub page: u32,
    pub per_page: u32,
    pub sort: SortOption,
    pub order: OrderOption,
    pub include_forks: bool,
    pub language: String,
    pub use_proxy: bool,
}

impl QueryKey {
    pub fn from_request(request: &SearchRequest) -> Self {
        Self {
            normalized_query: sanitize_query(&request.query),
            page: request.page,
            per_page: request.per_page,
            sort: request.sort,
            order: request.order,
            include_forks: request.include_forks,
            language: request.language.clone().unwrap_or_default(),
            use_proxy: request.targets_proxy,
        }
    }
}

/// When and how often a failed search is attempted again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failure
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each further retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(1),
        }
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Whether to retry after `retries_so_far` retries have already failed
    pub fn should_retry(&self, retries_so_far: u32, error: &Error) -> bool {
        retries_so_far < self.max_retries && error.is_retryable()
    }

    /// Delay before retry number `retries_so_far + 1`
    pub fn delay_for(&self, retries_so_far: u32) -> Duration {
        let factor = 2u32.saturating_pow(retries_so_far);
        self.base_delay.saturating_mul(factor).min(MAX_RETRY_DELAY)
    }
}

/// Search front end with caching, in-flight deduplication and retries
pub struct CachedSearcher {
    client: Arc<SearchClient>,
    cache: Cache<QueryKey, Arc<SearchResult>>,
    retry: RetryPolicy,
}

impl CachedSearcher {
    pub fn new(client: Arc<SearchClient>, ttl: Duration, capacity: u64, retry: RetryPolicy) -> Self {
        Self {
            client,
            cache: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
            retry,
        }
    }

    pub fn from_config(client: Arc<SearchClient>, config: &ClientConfig) -> Self {
        Self::new(
            client,
            Duration::from_secs(config.cache_ttl_secs),
            config.cache_capacity,
            RetryPolicy::new(config.max_retries),
        )
    }

    /// Run a search, serving a fresh cached result when one exists
    ///
    /// Failures are never cached.
    pub async fn search(&self, request: &SearchRequest) -> Result<Arc<SearchResult>> {
        let key = QueryKey::from_request(request);
        if key.normalized_query.is_empty() {
            return Err(Error::EmptyQuery);
        }

        let normalized = SearchRequest {
            query: key.normalized_query.clone(),
            ..request.clone()
        };

        debug!("Cached search for {key:?}");
        self.cache
            .try_get_with(key, self.fetch_with_retry(normalized))
            .await
            .map_err(|shared| Arc::try_unwrap(shared).unwrap_or_else(|shared| clone_error(&shared)))
    }

    /// Drop every cached result
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    async fn fetch_with_retry(&self, request: SearchRequest) -> Result<Arc<SearchResult>> {
        let mut retries = 0;
        loop {
            match self.client.search(&request).await {
                Ok(result) => return Ok(Arc::new(result)),
                Err(err) if self.retry.should_retry(retries, &err) => {
                    let delay = self.retry.delay_for(retries);
                    retries += 1;
                    warn!(
                        "Search failed ({err}), retry {retries}/{} in {delay:?}",
                        self.retry.max_retries
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Copy an error that is shared between deduplicated callers
fn clone_error(error: &Error) -> Error {
    match error {
        Error::InvalidParameters(details) => Error::InvalidParameters(details.clone()),
        Error::EmptyQuery => Error::EmptyQuery,
        Error::TransportUnavailable(msg) => Error::TransportUnavailable(msg.clone()),
        Error::RateLimited {
            retry_after_seconds,
            reset_at_epoch,
        } => Error::RateLimited {
            retry_after_seconds: *retry_after_seconds,
            reset_at_epoch: *reset_at_epoch,
        },
        Error::UpstreamRejected {
            status_code,
            message,
            details,
        } => Error::UpstreamRejected {
            status_code: *status_code,
            message: message.clone(),
            details: details.clone(),
        },
        Error::MalformedUpstreamResponse(msg) => Error::MalformedUpstreamResponse(msg.clone()),
        Error::Config(msg) => Error::Config(msg.clone()),
        other => Error::Other(anyhow::anyhow!(other.to_string())),
    }
}
