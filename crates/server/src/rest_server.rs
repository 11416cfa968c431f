//! Proxy entry point implemented with Axum
//!
//! `GET /search` validates its query string, forwards the search upstream
//! through a direct-mode [`SearchClient`] (which holds the credentials), and
//! answers with the upstream envelope or a JSON error.

use crate::params::parse_search_params;
use axum::{
    extract::{OriginalUri, Query, State},
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use ghsearch_client::SearchClient;
use ghsearch_core::error::Error;
use ghsearch_core::response::{HEADER_RATELIMIT_REMAINING, HEADER_RATELIMIT_RESET};
use ghsearch_core::{Repository, SearchResult};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use utoipa::{OpenApi, ToSchema};

const CACHE_CONTROL_SUCCESS: &str = "private, max-age=60";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    client: Arc<SearchClient>,
}

impl AppState {
    pub fn new(client: Arc<SearchClient>) -> Self {
        Self { client }
    }
}

/// Build the Axum router with all endpoints
pub fn build_router(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/search",
            get(search_handler).fallback(method_not_allowed_handler),
        )
        .route("/health", get(health_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
        .layer(cors_layer)
        .layer(SetResponseHeaderLayer::if_not_present(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Success envelope returned by `GET /search`
#[derive(Debug, Serialize, ToSchema)]
pub struct ProxySearchResponse {
    /// Capped at 1000
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<Repository>,
}

impl From<SearchResult> for ProxySearchResponse {
    fn from(result: SearchResult) -> Self {
        Self {
            total_count: result.total_count,
            incomplete_results: result.incomplete_results,
            items: result.items,
        }
    }
}

/// Error envelope
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
    #[serde(rename = "resetAt", skip_serializing_if = "Option::is_none")]
    pub reset_at: Option<i64>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            reset_at: None,
        }
    }
}

/// GET /search
#[utoipa::path(
    get,
    path = "/search",
    params(
        ("q" = String, Query, description = "Search text, 1 to 120 characters"),
        ("page" = Option<u32>, Query, description = "Page number, 1 to 100"),
        ("per_page" = Option<u32>, Query, description = "Results per page, 1 to 50"),
        ("sort" = Option<String>, Query, description = "best, stars or updated"),
        ("order" = Option<String>, Query, description = "asc or desc"),
        ("language" = Option<String>, Query, description = "Language filter"),
        ("forks" = Option<String>, Query, description = "include or exclude")
    ),
    responses(
        (status = 200, description = "Repository search results", body = ProxySearchResponse),
        (status = 400, description = "Invalid search parameters", body = ErrorResponse),
        (status = 429, description = "Upstream rate limit hit", body = ErrorResponse),
        (status = 502, description = "Upstream unreachable or malformed", body = ErrorResponse)
    ),
    tag = "search"
)]
async fn search_handler(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let request = parse_search_params(&params)?;

    info!(
        "Proxy search: query='{}', page={}, per_page={}, sort={}, order={}",
        request.query, request.page, request.per_page, request.sort, request.order
    );

    let outcome = state.client.search(&request).await;

    let status = match &outcome {
        Ok(_) => StatusCode::OK.as_u16(),
        Err(e) => e.status_code(),
    };
    let path = uri.to_string();
    tokio::spawn(async move {
        info!(path = %path, status, "Search request completed");
    });

    let result = outcome?;
    let reset = result.rate_limit_reset;
    let mut response = (
        StatusCode::OK,
        [(header::CACHE_CONTROL, CACHE_CONTROL_SUCCESS)],
        Json(ProxySearchResponse::from(result)),
    )
        .into_response();

    if let Some(reset) = reset {
        response.headers_mut().insert(
            HeaderName::from_static(HEADER_RATELIMIT_RESET),
            HeaderValue::from(reset),
        );
    }

    Ok(response)
}

async fn method_not_allowed_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method not allowed")),
    )
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "health"
)]
async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "version": ghsearch_core::VERSION,
        })),
    )
}

async fn openapi_handler() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Error handling for the proxy entry point
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, body) = match &err {
            Error::InvalidParameters(details) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    details: Some(details.clone()),
                    ..ErrorResponse::new("Invalid search parameters")
                },
            ),
            Error::EmptyQuery => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Query cannot be empty"),
            ),
            Error::RateLimited { reset_at_epoch, .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorResponse {
                    reset_at: *reset_at_epoch,
                    ..ErrorResponse::new("GitHub rate limit hit. Please retry after cooldown.")
                },
            ),
            Error::TransportUnavailable(_) | Error::MalformedUpstreamResponse(_) => {
                (StatusCode::BAD_GATEWAY, ErrorResponse::new(err.user_message()))
            }
            Error::UpstreamRejected {
                status_code,
                message,
                details,
            } => (
                StatusCode::from_u16(*status_code).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorResponse {
                    details: (!details.is_empty()).then(|| details.clone()),
                    ..ErrorResponse::new(message.clone())
                },
            ),
            _ => {
                error!("Internal server error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("An internal server error occurred"),
                )
            }
        };

        let mut response = (status, Json(body)).into_response();

        if let Error::RateLimited {
            retry_after_seconds,
            reset_at_epoch,
        } = &err
        {
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(*retry_after_seconds));
            headers.insert(
                HeaderName::from_static(HEADER_RATELIMIT_REMAINING),
                HeaderValue::from_static("0"),
            );
            if let Some(reset) = reset_at_epoch {
                headers.insert(
                    HeaderName::from_static(HEADER_RATELIMIT_RESET),
                    HeaderValue::from(*reset),
                );
            }
        }

        response
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(search_handler, health_handler),
    components(schemas(
        ProxySearchResponse,
        ErrorResponse,
        ghsearch_core::Repository,
        ghsearch_core::Owner
    )),
    tags(
        (name = "search", description = "Repository search proxy"),
        (name = "health", description = "Health check endpoints")
    )
)]
struct ApiDoc;
