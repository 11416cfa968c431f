//! Client side of GitHub repository search
//!
//! This crate provides the transport seam, the client request module that
//! talks either to upstream directly or to the proxy, and a caching caller
//! layer with explicit retry policy.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod cache;
mod client;
pub mod mock_transport;
pub mod transport;

pub use cache::{CachedSearcher, QueryKey, RetryPolicy};
pub use client::SearchClient;
pub use mock_transport::MockTransport;
pub use transport::{HttpTransport, SearchTransport};
