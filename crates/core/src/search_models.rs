//! Request and response models for repository search
//!
//! These types form the contract between callers (the proxy entry point, the
//! client request module, the CLI) and the translation/normalization core.

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest query accepted, in characters, after trimming
pub const MAX_QUERY_LENGTH: usize = 120;
/// Longest language filter accepted, in characters
pub const MAX_LANGUAGE_LENGTH: usize = 40;
/// Highest page upstream will serve
pub const MAX_PAGE: u32 = 100;
/// Largest page size accepted
pub const MAX_PER_PAGE: u32 = 50;

/// Result ordering requested from upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum SortOption {
    /// Upstream relevance ranking
    #[default]
    Best,
    Stars,
    Updated,
}

impl SortOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Stars => "stars",
            Self::Updated => "updated",
        }
    }
}

impl FromStr for SortOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "best" => Ok(Self::Best),
            "stars" => Ok(Self::Stars),
            "updated" => Ok(Self::Updated),
            other => Err(Error::invalid_parameter(format!(
                "Invalid sort '{other}': expected one of best, stars, updated"
            ))),
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum OrderOption {
    Asc,
    #[default]
    Desc,
}

impl OrderOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for OrderOption {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::invalid_parameter(format!(
                "Invalid order '{other}': expected asc or desc"
            ))),
        }
    }
}

impl fmt::Display for OrderOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single repository search, as issued by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchRequest {
    /// Raw user text
    pub query: String,
    pub page: u32,
    pub per_page: u32,
    pub sort: SortOption,
    pub order: OrderOption,
    pub include_forks: bool,
    pub language: Option<String>,
    /// Route through the proxy, which embeds qualifiers itself
    pub targets_proxy: bool,
}

impl SearchRequest {
    /// Create a request for the first page with default sort, order and filters
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            per_page: crate::pagination::RESULTS_PER_PAGE,
            sort: SortOption::default(),
            order: OrderOption::default(),
            include_forks: false,
            language: None,
            targets_proxy: false,
        }
    }

    /// Check that page, page size and language filter are within bounds
    ///
    /// Every problem is reported, not just the first.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if !(1..=MAX_PAGE).contains(&self.page) {
            problems.push(format!("page must be between 1 and {MAX_PAGE}"));
        }
        if !(1..=MAX_PER_PAGE).contains(&self.per_page) {
            problems.push(format!("per_page must be between 1 and {MAX_PER_PAGE}"));
        }
        if let Some(language) = &self.language {
            if language.trim().chars().count() > MAX_LANGUAGE_LENGTH {
                problems.push(format!(
                    "language must be at most {MAX_LANGUAGE_LENGTH} characters"
                ));
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidParameters(problems))
        }
    }
}

/// Repository owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Owner {
    pub login: String,
    pub avatar_url: String,
    pub html_url: String,
}

/// A repository as returned by upstream, copied field for field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub full_name: String,
    #[serde(deserialize_with = "required_nullable")]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(deserialize_with = "required_nullable")]
    pub language: Option<String>,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub updated_at: String,
    pub owner: Owner,
}

/// Normalized search outcome handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SearchResult {
    /// In upstream order
    pub items: Vec<Repository>,
    /// Capped at [`crate::pagination::SEARCH_RESULT_CAP`]
    pub total_count: u64,
    pub incomplete_results: bool,
    pub rate_limit_reset: Option<i64>,
    /// Distinct non-null languages of `items`, first-seen order
    pub languages: Vec<String>,
}

/// Accept `null` but not a missing key
///
/// A plain `Option` field treats an absent key as `None`; upstream always sends
/// these keys, so absence means the payload is not the shape we expect.
fn required_nullable<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}
