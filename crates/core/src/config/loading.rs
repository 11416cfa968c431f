//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Config};

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `GHSEARCH_` and use double underscores
    /// for nested values. For example:
    /// - `GHSEARCH_SERVER__PORT=9000`
    /// - `GHSEARCH_CLIENT__USE_PROXY=true`
    ///
    /// The conventional `GITHUB_TOKEN` variable sets `upstream.token`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Upstream defaults
        let builder = set_config_default(builder, "upstream.search_url", default_search_url())?;
        let builder = set_config_default(builder, "upstream.user_agent", default_user_agent())?;
        let builder = set_config_default(
            builder,
            "upstream.timeout_secs",
            default_timeout_secs() as i64,
        )?;

        // Server defaults
        let builder = set_config_default(builder, "server.host", default_server_host())?;
        let builder =
            set_config_default(builder, "server.port", i64::from(default_server_port()))?;

        // Client defaults
        let builder = set_config_default(builder, "client.proxy_url", default_proxy_url())?;
        let builder = set_config_default(builder, "client.use_proxy", false)?;
        let builder =
            set_config_default(builder, "client.per_page", i64::from(default_per_page()))?;
        let builder = set_config_default(
            builder,
            "client.cache_ttl_secs",
            default_cache_ttl_secs() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "client.cache_capacity",
            default_cache_capacity() as i64,
        )?;
        let mut builder = set_config_default(
            builder,
            "client.max_retries",
            i64::from(default_max_retries()),
        )?;

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with GHSEARCH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("GHSEARCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.trim().is_empty() {
                builder = builder
                    .set_override("upstream.token", token)
                    .map_err(|e| Error::config(format!("Failed to set GITHUB_TOKEN: {e}")))?;
            }
        }

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.ghsearch/config.toml or custom --config path)
    /// 3. Environment variables (GHSEARCH_*, GITHUB_TOKEN)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p.to_path_buf(),
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
