//! Query-string validation for the proxy entry point

use ghsearch_core::error::{Error, Result};
use ghsearch_core::query::{clean_language, strip_search_syntax};
use ghsearch_core::search_models::{MAX_LANGUAGE_LENGTH, MAX_PAGE, MAX_PER_PAGE, MAX_QUERY_LENGTH};
use ghsearch_core::{OrderOption, SearchRequest, SortOption, RESULTS_PER_PAGE};
use std::collections::HashMap;

/// Turn raw `GET /search` parameters into a direct-mode [`SearchRequest`]
///
/// Every invalid parameter is reported in one `InvalidParameters` error.
/// A query that is valid but empty once search syntax is stripped yields
/// `EmptyQuery`.
pub(crate) fn parse_search_params(params: &HashMap<String, String>) -> Result<SearchRequest> {
    let mut problems = Vec::new();

    let query = match params.get("q").map(|q| q.trim()) {
        None | Some("") => {
            problems.push("Query is required".to_string());
            String::new()
        }
        Some(q) if q.chars().count() > MAX_QUERY_LENGTH => {
            problems.push("Query is too long".to_string());
            String::new()
        }
        Some(q) => q.split_whitespace().collect::<Vec<_>>().join(" "),
    };

    let page = parse_bounded(params, "page", 1, MAX_PAGE, 1, &mut problems);
    let per_page = parse_bounded(
        params,
        "per_page",
        1,
        MAX_PER_PAGE,
        RESULTS_PER_PAGE,
        &mut problems,
    );

    let sort = match params.get("sort") {
        None => SortOption::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e: Error| {
            problems.extend(e.details().iter().cloned());
            SortOption::default()
        }),
    };

    let order = match params.get("order") {
        None => OrderOption::default(),
        Some(raw) => raw.parse().unwrap_or_else(|e: Error| {
            problems.extend(e.details().iter().cloned());
            OrderOption::default()
        }),
    };

    let language = match params.get("language").map(|l| l.trim()) {
        None | Some("") => None,
        Some(l) if l.chars().count() > MAX_LANGUAGE_LENGTH => {
            problems.push(format!(
                "language must be at most {MAX_LANGUAGE_LENGTH} characters"
            ));
            None
        }
        Some(l) => Some(clean_language(l)).filter(|l| !l.is_empty()),
    };

    let include_forks = match params.get("forks").map(String::as_str) {
        None | Some("exclude") => false,
        Some("include") => true,
        Some(other) => {
            problems.push(format!(
                "Invalid forks '{other}': expected include or exclude"
            ));
            false
        }
    };

    if !problems.is_empty() {
        return Err(Error::InvalidParameters(problems));
    }

    let query = strip_search_syntax(&query);
    if query.is_empty() {
        return Err(Error::EmptyQuery);
    }

    Ok(SearchRequest {
        query,
        page,
        per_page,
        sort,
        order,
        include_forks,
        language,
        targets_proxy: false,
    })
}

fn parse_bounded(
    params: &HashMap<String, String>,
    name: &str,
    min: u32,
    max: u32,
    default: u32,
    problems: &mut Vec<String>,
) -> u32 {
    let Some(raw) = params.get(name) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(value) if (min..=max).contains(&value) => value,
        Ok(_) => {
            problems.push(format!("{name} must be between {min} and {max}"));
            default
        }
        Err(_) => {
            problems.push(format!("{name} must be an integer"));
            default
        }
    }
}
