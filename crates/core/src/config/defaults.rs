//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_SEARCH_URL: &str = "https://api.github.com/search/repositories";
pub(crate) const DEFAULT_USER_AGENT: &str = "ghsearch";
pub(crate) const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_SERVER_PORT: u16 = 8787;
pub(crate) const DEFAULT_PROXY_URL: &str = "http://127.0.0.1:8787/search";

pub(crate) fn default_search_url() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

pub(crate) fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

pub(crate) fn default_timeout_secs() -> u64 {
    10
}

pub(crate) fn default_server_host() -> String {
    DEFAULT_SERVER_HOST.to_string()
}

pub(crate) fn default_server_port() -> u16 {
    DEFAULT_SERVER_PORT
}

pub(crate) fn default_proxy_url() -> String {
    DEFAULT_PROXY_URL.to_string()
}

pub(crate) fn default_per_page() -> u32 {
    crate::pagination::RESULTS_PER_PAGE
}

pub(crate) fn default_cache_ttl_secs() -> u64 {
    60
}

pub(crate) fn default_cache_capacity() -> u64 {
    500
}

pub(crate) fn default_max_retries() -> u32 {
    2
}
