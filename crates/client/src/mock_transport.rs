//! In-memory transport for tests

use crate::transport::SearchTransport;
use async_trait::async_trait;
use ghsearch_core::error::{Error, Result};
use ghsearch_core::{ResponseHeaders, UpstreamResponse};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// A request seen by [`MockTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

enum Canned {
    Response(UpstreamResponse),
    Failure(String),
}

/// Mock transport that replays canned responses and records requests
///
/// Responses are served in the order they were queued; the last one is
/// repeated once the queue is down to it.
#[derive(Default)]
pub struct MockTransport {
    queue: Mutex<VecDeque<Canned>>,
    requests: Mutex<Vec<RecordedRequest>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport answering every request with `body` and `status`
    pub fn with_json(status: u16, body: &Value) -> Self {
        let transport = Self::new();
        transport.push_json(status, body);
        transport
    }

    /// Sleep this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push_response(&self, response: UpstreamResponse) {
        lock(&self.queue).push_back(Canned::Response(response));
    }

    pub fn push_json(&self, status: u16, body: &Value) {
        self.push_response(UpstreamResponse {
            status,
            headers: ResponseHeaders::default(),
            body: body.to_string(),
        });
    }

    /// Queue a network-level failure
    pub fn push_failure(&self, message: impl Into<String>) {
        lock(&self.queue).push_back(Canned::Failure(message.into()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait]
impl SearchTransport for MockTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(&'static str, String)],
    ) -> Result<UpstreamResponse> {
        lock(&self.requests).push(RecordedRequest {
            url: url.to_string(),
            headers: headers.to_vec(),
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut queue = lock(&self.queue);
        let canned = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().map(|canned| match canned {
                Canned::Response(response) => Canned::Response(response.clone()),
                Canned::Failure(message) => Canned::Failure(message.clone()),
            })
        };

        match canned {
            Some(Canned::Response(response)) => Ok(response),
            Some(Canned::Failure(message)) => Err(Error::transport(message)),
            None => Err(Error::transport("no response queued")),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Upstream-shaped repository record
pub fn sample_repository(id: u64, language: Option<&str>) -> Value {
    json!({
        "id": id,
        "name": format!("repo-{id}"),
        "full_name": format!("octocat/repo-{id}"),
        "description": "Test repo",
        "html_url": format!("https://github.com/octocat/repo-{id}"),
        "language": language,
        "stargazers_count": 10 * id,
        "forks_count": id,
        "updated_at": "2024-01-01T00:00:00Z",
        "owner": {
            "login": "octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/1?v=4",
            "html_url": "https://github.com/octocat"
        }
    })
}

/// Upstream-shaped search payload
pub fn sample_payload(total_count: u64, items: Vec<Value>) -> Value {
    json!({
        "total_count": total_count,
        "incomplete_results": false,
        "items": items
    })
}
