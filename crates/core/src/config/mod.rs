//! Configuration module for ghsearch
//!
//! Configuration can be loaded from TOML files and/or environment variables.
//! Every field has a default, so an empty file (or no file) is a valid config.

mod defaults;
mod loading;


use crate::error::{Error, Result};
use crate::search_models::MAX_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.ghsearch/config.toml`.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".ghsearch").join("config.toml"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream search API settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Proxy server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Client request module settings
    #[serde(default)]
    pub client: ClientConfig,
}

/// Upstream repository-search API
#[derive(Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Repository search endpoint
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// Bearer token raising the rate allowance (or use GITHUB_TOKEN env var)
    pub token: Option<String>,

    /// User-Agent sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            search_url: default_search_url(),
            token: None,
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("search_url", &self.search_url)
            .field("token", &self.token.as_ref().map(|_| "***REDACTED***"))
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Proxy server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// Client request module configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Proxy search endpoint used when `use_proxy` is set
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,

    /// Route searches through the proxy instead of calling upstream directly
    #[serde(default)]
    pub use_proxy: bool,

    /// Results per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Seconds a cached result stays fresh
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Maximum number of cached results
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,

    /// Retries after a retryable failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            use_proxy: false,
            per_page: default_per_page(),
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_capacity: default_cache_capacity(),
            max_retries: default_max_retries(),
        }
    }
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.upstream.search_url).map_err(|e| {
            Error::config(format!(
                "Invalid upstream.search_url '{}': {e}",
                self.upstream.search_url
            ))
        })?;

        if self.upstream.timeout_secs == 0 {
            return Err(Error::config(
                "upstream.timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.upstream.user_agent.trim().is_empty() {
            return Err(Error::config(
                "upstream.user_agent must not be empty".to_string(),
            ));
        }

        Url::parse(&self.client.proxy_url).map_err(|e| {
            Error::config(format!(
                "Invalid client.proxy_url '{}': {e}",
                self.client.proxy_url
            ))
        })?;

        if !(1..=MAX_PER_PAGE).contains(&self.client.per_page) {
            return Err(Error::config(format!(
                "client.per_page must be between 1 and {MAX_PER_PAGE} (got {})",
                self.client.per_page
            )));
        }

        if self.client.cache_capacity == 0 {
            return Err(Error::config(
                "client.cache_capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Address the proxy server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
