//! Query sanitization and qualifier composition
//!
//! Free-form user text is normalized before it reaches upstream, and filter
//! state is rendered as `key:value` qualifiers appended after the query.

use crate::search_models::MAX_QUERY_LENGTH;

/// Punctuation allowed through [`strip_search_syntax`]
const ALLOWED_PUNCTUATION: &[char] = &['-', '_', '.', ':', '+', '/'];

/// Normalize raw query text
///
/// Trims, collapses whitespace runs to a single space and truncates to
/// [`MAX_QUERY_LENGTH`] characters. The result may be empty. Applying it twice
/// yields the same string as applying it once.
pub fn sanitize_query(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_QUERY_LENGTH).collect();
    // Truncation can cut right after a space
    truncated.trim_end().to_string()
}

/// Drop characters that could open new search syntax
///
/// Keeps letters, digits, whitespace and `-_.:+/`. Used by the proxy entry
/// before qualifiers are composed so user text cannot smuggle in its own
/// qualifier-adjacent syntax (quotes, parentheses, comparison operators).
pub fn strip_search_syntax(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ALLOWED_PUNCTUATION.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Remove angle brackets from a language filter value
pub fn clean_language(language: &str) -> String {
    language
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Build the qualifier tokens for the given filters
///
/// `fork:` is always emitted first; `language:` follows when a non-empty
/// language is given.
pub fn compose_qualifiers(include_forks: bool, language: Option<&str>) -> Vec<String> {
    let mut qualifiers = vec![format!("fork:{include_forks}")];

    if let Some(language) = language.map(clean_language) {
        if !language.is_empty() {
            qualifiers.push(format!("language:{language}"));
        }
    }

    qualifiers
}

/// Join a sanitized query and its qualifiers, query first
pub fn join_qualified(query: &str, qualifiers: &[String]) -> String {
    std::iter::once(query)
        .chain(qualifiers.iter().map(String::as_str))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_query("  a   b  "), "a b");
        assert_eq!(sanitize_query("react\t\n hooks"), "react hooks");
    }

    #[test]
    fn test_sanitize_empty_and_blank() {
        assert_eq!(sanitize_query(""), "");
        assert_eq!(sanitize_query(" \t\n "), "");
    }

    #[test]
    fn test_sanitize_truncates_to_limit() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_query(&long).chars().count(), MAX_QUERY_LENGTH);
    }

    #[test]
    fn test_sanitize_truncates_by_chars_not_bytes() {
        let long = "é".repeat(130);
        let sanitized = sanitize_query(&long);
        assert_eq!(sanitized.chars().count(), MAX_QUERY_LENGTH);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let boundary = format!("{} tail", "a".repeat(MAX_QUERY_LENGTH - 1));
        let inputs = [
            "",
            "   ",
            "  a   b  ",
            "react hooks",
            "\u{00a0}rust\u{2003}async ",
            boundary.as_str(),
        ];
        for input in inputs {
            let once = sanitize_query(input);
            assert_eq!(sanitize_query(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_sanitize_trims_space_exposed_by_truncation() {
        let boundary = format!("{} tail", "a".repeat(MAX_QUERY_LENGTH - 1));
        let sanitized = sanitize_query(&boundary);
        assert_eq!(sanitized, "a".repeat(MAX_QUERY_LENGTH - 1));
    }

    #[test]
    fn test_strip_search_syntax() {
        assert_eq!(strip_search_syntax("react \"hooks\" (state)"), "react hooks state");
        assert_eq!(strip_search_syntax("stars:>100"), "stars:100");
        assert_eq!(strip_search_syntax("c++ file/path_v1.2-rc"), "c++ file/path_v1.2-rc");
        assert_eq!(strip_search_syntax("日本語 ライブラリ"), "日本語 ライブラリ");
        assert_eq!(strip_search_syntax("\"\"()"), "");
    }

    #[test]
    fn test_compose_qualifiers_order() {
        assert_eq!(
            compose_qualifiers(false, Some("Go")),
            vec!["fork:false".to_string(), "language:Go".to_string()]
        );
        assert_eq!(compose_qualifiers(true, None), vec!["fork:true".to_string()]);
    }

    #[test]
    fn test_compose_qualifiers_strips_angle_brackets() {
        assert_eq!(
            compose_qualifiers(false, Some("<script>")),
            vec!["fork:false".to_string(), "language:script".to_string()]
        );
        assert_eq!(
            compose_qualifiers(false, Some("<>")),
            vec!["fork:false".to_string()]
        );
    }

    #[test]
    fn test_join_qualified_query_first() {
        let qualifiers = compose_qualifiers(false, Some("Go"));
        assert_eq!(
            join_qualified("web server", &qualifiers),
            "web server fork:false language:Go"
        );
        assert_eq!(join_qualified("web", &[]), "web");
    }
}
