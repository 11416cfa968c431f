//! Core types and logic for GitHub repository search
//!
//! This crate turns a free-form query plus filter state into a bounded
//! upstream search request, and an upstream response into a stable result
//! shape:
//!
//! - **Query**: sanitization and qualifier composition
//! - **Request**: upstream parameter assembly for direct and proxy modes
//! - **Response**: payload validation, rate-limit detection, result capping
//! - **Pagination**: page counts over the capped total
//! - **Configuration** and **error handling** shared by every crate
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod config;
pub mod error;
pub mod pagination;
pub mod query;
pub mod request;
pub mod response;
pub mod search_models;

// Re-export main types for convenience
pub use config::{ClientConfig, Config, ServerConfig, UpstreamConfig};
pub use error::{Error, Result, ResultExt};
pub use pagination::{clamp_page, page_count, page_window, RESULTS_PER_PAGE, SEARCH_RESULT_CAP};
pub use query::{compose_qualifiers, sanitize_query, strip_search_syntax};
pub use request::{build_request, UpstreamRequest};
pub use response::{normalize_response, ResponseHeaders, UpstreamResponse};
pub use search_models::{
    OrderOption, Owner, Repository, SearchRequest, SearchResult, SortOption,
};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
