//! Upstream response normalization
//!
//! Validates an untrusted upstream payload against the expected schema and
//! shapes it into a [`SearchResult`]. Any violation rejects the whole payload;
//! nothing is defaulted or partially recovered.

use crate::error::{Error, Result, DEFAULT_RETRY_AFTER_SECONDS};
use crate::pagination::SEARCH_RESULT_CAP;
use crate::search_models::{Repository, SearchResult};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use tracing::warn;
use url::Url;

pub const HEADER_RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RATELIMIT_RESET: &str = "x-ratelimit-reset";
pub const HEADER_RETRY_AFTER: &str = "retry-after";

const GENERIC_REJECTION_MESSAGE: &str = "GitHub search failed.";

/// Rate-limit signalling headers of an upstream response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    pub ratelimit_remaining: Option<String>,
    pub ratelimit_reset: Option<String>,
    pub retry_after: Option<String>,
}

impl ResponseHeaders {
    /// Pick the relevant headers out of `(name, value)` pairs, ignoring case
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut headers = Self::default();
        for (name, value) in pairs {
            let name = name.as_ref();
            if name.eq_ignore_ascii_case(HEADER_RATELIMIT_REMAINING) {
                headers.ratelimit_remaining = Some(value.into());
            } else if name.eq_ignore_ascii_case(HEADER_RATELIMIT_RESET) {
                headers.ratelimit_reset = Some(value.into());
            } else if name.eq_ignore_ascii_case(HEADER_RETRY_AFTER) {
                headers.retry_after = Some(value.into());
            }
        }
        headers
    }

    /// Whether upstream reports the quota as used up
    pub fn is_exhausted(&self) -> bool {
        self.ratelimit_remaining.as_deref().map(str::trim) == Some("0")
    }

    /// Reset time in unix seconds, if present and parseable
    pub fn reset_at_epoch(&self) -> Option<i64> {
        self.ratelimit_reset
            .as_deref()
            .and_then(|value| value.trim().parse().ok())
    }

    /// Seconds to wait, falling back to [`DEFAULT_RETRY_AFTER_SECONDS`]
    pub fn retry_after_seconds(&self) -> u64 {
        self.retry_after
            .as_deref()
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECONDS)
    }
}

/// Raw response as obtained by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: String,
}

/// Expected top-level payload shape
#[derive(Debug, Deserialize)]
struct SearchPayload {
    total_count: u64,
    incomplete_results: bool,
    items: Vec<Repository>,
}

/// Normalize the outcome of one transport call
///
/// The checks run in a fixed order: transport failure, exhausted rate limit
/// (regardless of body), unparseable body, non-success status, schema
/// violation. Only a payload passing all of them produces a result.
pub fn normalize_response(outcome: Result<UpstreamResponse>) -> Result<SearchResult> {
    let response = outcome.map_err(|err| match err {
        Error::TransportUnavailable(_) => err,
        other => Error::transport(other.to_string()),
    })?;

    if response.headers.is_exhausted() {
        return Err(Error::RateLimited {
            retry_after_seconds: response.headers.retry_after_seconds(),
            reset_at_epoch: response.headers.reset_at_epoch(),
        });
    }

    let payload: Value = serde_json::from_str(&response.body).map_err(|e| {
        warn!("Failed to parse upstream response: {e}");
        Error::malformed(format!("response body is not JSON: {e}"))
    })?;

    if !(200..300).contains(&response.status) {
        return Err(rejection(response.status, &payload));
    }

    let payload: SearchPayload = serde_json::from_value(payload).map_err(|e| {
        warn!("Validation failed for upstream payload: {e}");
        Error::malformed(e.to_string())
    })?;

    for repo in &payload.items {
        validate_urls(repo)?;
    }

    let languages = distinct_languages(&payload.items);

    Ok(SearchResult {
        items: payload.items,
        total_count: payload.total_count.min(SEARCH_RESULT_CAP),
        incomplete_results: payload.incomplete_results,
        rate_limit_reset: response.headers.reset_at_epoch(),
        languages,
    })
}

/// Distinct non-null languages in first-seen order
pub fn distinct_languages(items: &[Repository]) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .iter()
        .filter_map(|repo| repo.language.as_deref())
        .filter(|language| seen.insert(*language))
        .map(str::to_string)
        .collect()
}

/// Build an [`Error::UpstreamRejected`] from a non-success body
///
/// Upstream errors carry `message`; the proxy's own envelope carries `error`
/// and sometimes `details`.
fn rejection(status_code: u16, payload: &Value) -> Error {
    let message = ["message", "error"]
        .iter()
        .find_map(|key| payload.get(key).and_then(Value::as_str))
        .unwrap_or(GENERIC_REJECTION_MESSAGE)
        .to_string();

    let details = payload
        .get("details")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Error::UpstreamRejected {
        status_code,
        message,
        details,
    }
}

fn validate_urls(repo: &Repository) -> Result<()> {
    let fields = [
        ("html_url", &repo.html_url),
        ("owner.avatar_url", &repo.owner.avatar_url),
        ("owner.html_url", &repo.owner.html_url),
    ];
    for (field, value) in fields {
        Url::parse(value).map_err(|e| {
            warn!("Repository {} has invalid {field}: {e}", repo.id);
            Error::malformed(format!(
                "repository {} has invalid {field} '{value}': {e}",
                repo.id
            ))
        })?;
    }
    Ok(())
}
