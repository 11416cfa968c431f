//! Tests for the client request module and caching caller layer
//!
//! All network traffic goes through `MockTransport`.

use ghsearch_client::mock_transport::{sample_payload, sample_repository};
use ghsearch_client::{CachedSearcher, MockTransport, RetryPolicy, SearchClient};
use ghsearch_core::{
    Config, Error, OrderOption, ResponseHeaders, SearchRequest, SortOption, UpstreamResponse,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn ok_transport() -> Arc<MockTransport> {
    Arc::new(MockTransport::with_json(
        200,
        &sample_payload(2, vec![sample_repository(1, Some("TypeScript"))]),
    ))
}

fn client_with(transport: Arc<MockTransport>, config: &Config) -> Arc<SearchClient> {
    Arc::new(SearchClient::new(transport, config))
}

fn searcher(transport: Arc<MockTransport>, max_retries: u32) -> CachedSearcher {
    CachedSearcher::new(
        client_with(transport, &Config::default()),
        Duration::from_secs(60),
        100,
        RetryPolicy::new(max_retries).with_base_delay(Duration::ZERO),
    )
}

#[tokio::test]
async fn test_direct_search_returns_data() {
    let transport = ok_transport();
    let client = client_with(transport.clone(), &Config::default());

    let result = client
        .search(&SearchRequest::new("react"))
        .await
        .expect("search succeeds");

    assert_eq!(result.items[0].name, "repo-1");
    assert_eq!(result.total_count, 2);
    assert_eq!(result.languages, vec!["TypeScript".to_string()]);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_direct_mode_url_and_headers() {
    let transport = ok_transport();
    let mut config = Config::default();
    config.upstream.token = Some("ghp_test".to_string());
    let client = client_with(transport.clone(), &config);

    let request = SearchRequest {
        sort: SortOption::Stars,
        order: OrderOption::Asc,
        ..SearchRequest::new("react hooks")
    };
    client.search(&request).await.expect("search succeeds");

    let sent = &transport.requests()[0];
    assert_eq!(
        sent.url,
        "https://api.github.com/search/repositories?q=react+hooks+fork%3Afalse&page=1&per_page=10&sort=stars&order=asc"
    );
    assert_eq!(sent.header("accept"), Some("application/vnd.github+json"));
    assert_eq!(sent.header("user-agent"), Some("ghsearch"));
    assert_eq!(sent.header("authorization"), Some("Bearer ghp_test"));
}

#[tokio::test]
async fn test_proxy_mode_url_and_headers() {
    let transport = ok_transport();
    let mut config = Config::default();
    config.upstream.token = Some("ghp_test".to_string());
    let client = client_with(transport.clone(), &config);

    let request = SearchRequest {
        language: Some("Go".to_string()),
        targets_proxy: true,
        ..SearchRequest::new("react")
    };
    client.search(&request).await.expect("search succeeds");

    let sent = &transport.requests()[0];
    assert_eq!(
        sent.url,
        "http://127.0.0.1:8787/search?q=react&page=1&per_page=10&forks=exclude&language=Go"
    );
    assert_eq!(sent.header("authorization"), None);
}

#[tokio::test]
async fn test_empty_query_sends_nothing() {
    let transport = ok_transport();
    let client = client_with(transport.clone(), &Config::default());

    let outcome = client.search(&SearchRequest::new("   ")).await;
    assert!(matches!(outcome, Err(Error::EmptyQuery)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_forbidden_surfaces_typed_error() {
    let transport = Arc::new(MockTransport::with_json(
        403,
        &json!({ "message": "rate limit" }),
    ));
    let client = client_with(transport, &Config::default());

    let err = client
        .search(&SearchRequest::new("react"))
        .await
        .expect_err("403 is an error");
    assert_eq!(err.status_code(), 403);
    assert_eq!(err.user_message(), "GitHub rate limit reached. Try again shortly.");
}

#[tokio::test]
async fn test_proxy_rate_limit_classified() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(UpstreamResponse {
        status: 429,
        headers: ResponseHeaders::from_pairs([
            ("retry-after", "30"),
            ("x-ratelimit-remaining", "0"),
        ]),
        body: json!({ "error": "GitHub rate limit hit. Please retry after cooldown." })
            .to_string(),
    });
    let client = client_with(transport, &Config::default());

    let request = SearchRequest {
        targets_proxy: true,
        ..SearchRequest::new("react")
    };
    let err = client.search(&request).await.expect_err("rate limited");
    assert_eq!(err.retry_after_seconds(), Some(30));
}

#[tokio::test]
async fn test_cache_serves_repeat_searches() {
    let transport = ok_transport();
    let searcher = searcher(transport.clone(), 2);

    let first = searcher
        .search(&SearchRequest::new("react"))
        .await
        .expect("search succeeds");
    let second = searcher
        .search(&SearchRequest::new("  react  "))
        .await
        .expect("search succeeds");

    assert_eq!(first, second);
    assert_eq!(transport.call_count(), 1);

    let next_page = SearchRequest {
        page: 2,
        ..SearchRequest::new("react")
    };
    searcher.search(&next_page).await.expect("search succeeds");
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_cache_invalidate_all() {
    let transport = ok_transport();
    let searcher = searcher(transport.clone(), 0);

    searcher
        .search(&SearchRequest::new("react"))
        .await
        .expect("search succeeds");
    searcher.invalidate_all();
    searcher
        .search(&SearchRequest::new("react"))
        .await
        .expect("search succeeds");

    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn test_concurrent_identical_searches_share_one_call() {
    let transport = Arc::new(
        MockTransport::with_json(200, &sample_payload(1, vec![sample_repository(1, None)]))
            .with_delay(Duration::from_millis(50)),
    );
    let searcher = searcher(transport.clone(), 0);
    let request = SearchRequest::new("tokio");

    let (a, b) = tokio::join!(searcher.search(&request), searcher.search(&request));

    assert!(a.is_ok());
    assert!(b.is_ok());
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_empty_query_never_reaches_cache_or_transport() {
    let transport = ok_transport();
    let searcher = searcher(transport.clone(), 2);

    let outcome = searcher.search(&SearchRequest::new("")).await;
    assert!(matches!(outcome, Err(Error::EmptyQuery)));
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_transient_failures_are_retried() {
    let transport = Arc::new(MockTransport::new());
    transport.push_failure("connection reset");
    transport.push_json(502, &json!({ "message": "Bad Gateway" }));
    transport.push_json(200, &sample_payload(1, vec![sample_repository(7, None)]));
    let searcher = searcher(transport.clone(), 2);

    let result = searcher
        .search(&SearchRequest::new("react"))
        .await
        .expect("third attempt succeeds");

    assert_eq!(result.items[0].id, 7);
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn test_retries_exhausted() {
    let transport = Arc::new(MockTransport::new());
    transport.push_failure("connection refused");
    let searcher = searcher(transport.clone(), 2);

    let outcome = searcher.search(&SearchRequest::new("react")).await;
    assert!(matches!(outcome, Err(Error::TransportUnavailable(_))));
    assert_eq!(transport.call_count(), 3);
}

#[tokio::test]
async fn test_rate_limit_not_retried() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(UpstreamResponse {
        status: 403,
        headers: ResponseHeaders::from_pairs([("x-ratelimit-remaining", "0")]),
        body: "{}".to_string(),
    });
    let searcher = searcher(transport.clone(), 2);

    let outcome = searcher.search(&SearchRequest::new("react")).await;
    match outcome {
        Err(Error::RateLimited {
            retry_after_seconds,
            ..
        }) => assert_eq!(retry_after_seconds, 60),
        other => panic!("expected RateLimited, got {other:?}"),
    }
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_forbidden_not_retried() {
    let transport = Arc::new(MockTransport::with_json(
        403,
        &json!({ "message": "Forbidden" }),
    ));
    let searcher = searcher(transport.clone(), 2);

    let outcome = searcher.search(&SearchRequest::new("react")).await;
    assert!(matches!(
        outcome,
        Err(Error::UpstreamRejected {
            status_code: 403,
            ..
        })
    ));
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let transport = Arc::new(MockTransport::new());
    transport.push_failure("connection refused");
    transport.push_json(200, &sample_payload(1, vec![sample_repository(1, None)]));
    let searcher = searcher(transport.clone(), 0);

    assert!(searcher.search(&SearchRequest::new("react")).await.is_err());
    assert!(searcher.search(&SearchRequest::new("react")).await.is_ok());
    assert_eq!(transport.call_count(), 2);
}
