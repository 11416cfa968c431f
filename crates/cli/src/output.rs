//! Plain-text rendering of search results

use ghsearch_core::{clamp_page, page_count, page_window, Repository, SearchResult};
use std::fmt;

/// Render one page of results with its pagination facts
///
/// `page` is clamped to the pages actually available for the capped total.
pub fn render_results(result: &SearchResult, page: u32, per_page: u32) -> String {
    ResultsView {
        result,
        page,
        per_page,
    }
    .to_string()
}

struct ResultsView<'a> {
    result: &'a SearchResult,
    page: u32,
    per_page: u32,
}

impl fmt::Display for ResultsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;

        if result.items.is_empty() {
            writeln!(f, "No repositories matched your search.")?;
        }

        for repo in &result.items {
            write_repository(f, repo)?;
        }

        let pages = page_count(result.total_count, self.per_page);
        let current = clamp_page(self.page, pages);

        writeln!(
            f,
            "{} results, page {current} of {pages}",
            result.total_count
        )?;
        if result.incomplete_results {
            writeln!(f, "Upstream returned incomplete results; counts may be low.")?;
        }

        let window: Vec<String> = page_window(current, pages)
            .into_iter()
            .map(|p| {
                if p == current {
                    format!("[{p}]")
                } else {
                    p.to_string()
                }
            })
            .collect();
        writeln!(f, "Pages: {}", window.join(" "))?;

        if !result.languages.is_empty() {
            writeln!(f, "Languages: {}", result.languages.join(", "))?;
        }

        Ok(())
    }
}

fn write_repository(f: &mut fmt::Formatter<'_>, repo: &Repository) -> fmt::Result {
    writeln!(
        f,
        "{}  ★ {}  forks {}  {}",
        repo.full_name,
        repo.stargazers_count,
        repo.forks_count,
        repo.language.as_deref().unwrap_or("-")
    )?;
    writeln!(f, "  {}", repo.html_url)?;
    if let Some(description) = repo.description.as_deref().filter(|d| !d.is_empty()) {
        writeln!(f, "  {description}")?;
    }
    writeln!(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghsearch_core::Owner;
    use pretty_assertions::assert_eq;

    fn repo(id: u64, language: Option<&str>, description: Option<&str>) -> Repository {
        Repository {
            id,
            name: format!("repo-{id}"),
            full_name: format!("octocat/repo-{id}"),
            description: description.map(str::to_string),
            html_url: format!("https://github.com/octocat/repo-{id}"),
            language: language.map(str::to_string),
            stargazers_count: 42,
            forks_count: 7,
            updated_at: "2024-01-01T00:00:00Z".to_string(),
            owner: Owner {
                login: "octocat".to_string(),
                avatar_url: "https://avatars.githubusercontent.com/u/1".to_string(),
                html_url: "https://github.com/octocat".to_string(),
            },
        }
    }

    fn result(total_count: u64, items: Vec<Repository>, languages: &[&str]) -> SearchResult {
        SearchResult {
            items,
            total_count,
            incomplete_results: false,
            rate_limit_reset: None,
            languages: languages.iter().map(|l| l.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_repository_lines() {
        let rendered = render_results(
            &result(1, vec![repo(1, Some("Rust"), Some("Fast things"))], &["Rust"]),
            1,
            10,
        );

        assert_eq!(
            rendered,
            "octocat/repo-1  ★ 42  forks 7  Rust\n  \
             https://github.com/octocat/repo-1\n  \
             Fast things\n\n\
             1 results, page 1 of 1\n\
             Pages: [1]\n\
             Languages: Rust\n"
        );
    }

    #[test]
    fn test_render_missing_language_and_description() {
        let rendered = render_results(&result(1, vec![repo(1, None, None)], &[]), 1, 10);
        assert!(rendered.starts_with("octocat/repo-1  ★ 42  forks 7  -\n"));
        assert!(!rendered.contains("Languages:"));
    }

    #[test]
    fn test_render_page_window_centred() {
        let rendered = render_results(&result(1000, vec![], &[]), 50, 10);
        assert!(rendered.contains("1000 results, page 50 of 100\n"));
        assert!(rendered.contains("Pages: 48 49 [50] 51 52\n"));
    }

    #[test]
    fn test_render_clamps_page_past_end() {
        let rendered = render_results(&result(25, vec![], &[]), 9, 10);
        assert!(rendered.contains("page 3 of 3"));
        assert!(rendered.contains("Pages: 1 2 [3]\n"));
    }

    #[test]
    fn test_render_incomplete_results_note() {
        let mut partial = result(30, vec![], &[]);
        partial.incomplete_results = true;
        let rendered = render_results(&partial, 1, 10);
        assert!(rendered.contains("Upstream returned incomplete results; counts may be low.\n"));
    }

    #[test]
    fn test_render_empty() {
        let rendered = render_results(&result(0, vec![], &[]), 1, 10);
        assert!(rendered.starts_with("No repositories matched your search.\n"));
        assert!(rendered.contains("0 results, page 1 of 1"));
    }
}
