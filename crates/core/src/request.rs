//! Upstream request construction
//!
//! Turns a [`SearchRequest`] into the ordered query parameters sent to either
//! the upstream search API (direct mode) or the proxy (proxy mode).

use crate::error::{Error, Result};
use crate::query::{clean_language, compose_qualifiers, join_qualified, sanitize_query};
use crate::search_models::{OrderOption, SearchRequest, SortOption};
use url::form_urlencoded;

/// Fully formed transport parameters for one search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    /// Query text after sanitization, without qualifiers
    pub sanitized_query: String,
    params: Vec<(&'static str, String)>,
}

impl UpstreamRequest {
    /// Parameters in emission order
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Value of a parameter, if it was emitted
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// `application/x-www-form-urlencoded` rendering of the parameters
    pub fn query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }

    /// Append the parameters to an endpoint URL
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{endpoint}?{}", self.query_string())
    }
}

/// Build the request parameters for a search
///
/// In direct mode the qualifiers are embedded in `q`; in proxy mode `q` carries
/// only the sanitized query and the filters travel as `forks` and `language`
/// for the proxy to embed.
///
/// # Errors
///
/// - [`Error::EmptyQuery`] if the query sanitizes to nothing
/// - [`Error::InvalidParameters`] if page, page size or language are out of range
pub fn build_request(request: &SearchRequest) -> Result<UpstreamRequest> {
    let sanitized_query = sanitize_query(&request.query);
    if sanitized_query.is_empty() {
        return Err(Error::EmptyQuery);
    }
    request.validate()?;

    let q = if request.targets_proxy {
        sanitized_query.clone()
    } else {
        let qualifiers = compose_qualifiers(request.include_forks, request.language.as_deref());
        join_qualified(&sanitized_query, &qualifiers)
    };

    let mut params = vec![
        ("q", q),
        ("page", request.page.to_string()),
        ("per_page", request.per_page.to_string()),
    ];

    // Upstream defaults to descending order, so with relevance ranking only a
    // deviation is sent.
    match (request.sort, request.order) {
        (SortOption::Best, OrderOption::Desc) => {}
        (SortOption::Best, order) => params.push(("order", order.as_str().to_string())),
        (sort, order) => {
            params.push(("sort", sort.as_str().to_string()));
            params.push(("order", order.as_str().to_string()));
        }
    }

    if request.targets_proxy {
        let forks = if request.include_forks {
            "include"
        } else {
            "exclude"
        };
        params.push(("forks", forks.to_string()));
        if let Some(language) = request.language.as_deref().map(clean_language) {
            if !language.is_empty() {
                params.push(("language", language));
            }
        }
    }

    tracing::debug!(
        "Built {} search request: {:?}",
        if request.targets_proxy { "proxy" } else { "direct" },
        params
    );

    Ok(UpstreamRequest {
        sanitized_query,
        params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sort_best_desc_sends_neither() {
        let built = build_request(&SearchRequest::new("react")).expect("valid request");
        assert_eq!(built.get("sort"), None);
        assert_eq!(built.get("order"), None);
    }

    #[test]
    fn test_sort_best_asc_sends_order_only() {
        let request = SearchRequest {
            order: OrderOption::Asc,
            ..SearchRequest::new("react")
        };
        let built = build_request(&request).expect("valid request");
        assert_eq!(built.get("sort"), None);
        assert_eq!(built.get("order"), Some("asc"));
    }

    #[test]
    fn test_explicit_sort_sends_both() {
        let request = SearchRequest {
            sort: SortOption::Updated,
            ..SearchRequest::new("react")
        };
        let built = build_request(&request).expect("valid request");
        assert_eq!(built.get("sort"), Some("updated"));
        assert_eq!(built.get("order"), Some("desc"));
    }

    #[test]
    fn test_query_string_encoding() {
        let request = SearchRequest {
            language: Some("C++".to_string()),
            ..SearchRequest::new("web server")
        };
        let built = build_request(&request).expect("valid request");
        assert_eq!(
            built.query_string(),
            "q=web+server+fork%3Afalse+language%3AC%2B%2B&page=1&per_page=10"
        );
    }
}
