//! Page-count arithmetic over capped result totals

/// Upstream never serves more than this many results for one search
pub const SEARCH_RESULT_CAP: u64 = 1000;

/// Page size used by interactive callers
pub const RESULTS_PER_PAGE: u32 = 10;

/// Pages shown at once by [`page_window`]
const PAGE_WINDOW_SIZE: u32 = 5;

/// Number of pages needed to show `total_count` results
///
/// The total is capped at [`SEARCH_RESULT_CAP`] first, and there is always at
/// least one page. A `per_page` of zero is treated as one.
pub fn page_count(total_count: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total_count.min(SEARCH_RESULT_CAP).div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Keep `current` within `1..=page_count`
///
/// Callers use this when a narrower filter leaves them past the last page.
pub fn clamp_page(current: u32, page_count: u32) -> u32 {
    current.clamp(1, page_count.max(1))
}

/// Up to five consecutive page numbers around `current`
///
/// The window is centred on `current` where possible and slides to stay within
/// `1..=total_pages`.
pub fn page_window(current: u32, total_pages: u32) -> Vec<u32> {
    let total = i64::from(total_pages.max(1));
    let current = i64::from(current);
    let size = i64::from(PAGE_WINDOW_SIZE);

    let start = (current - 2).min(total - size + 1).max(1);
    let end = total.min(start + size - 1);

    (start..=end).filter_map(|page| u32::try_from(page).ok()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_count_caps_total() {
        assert_eq!(page_count(1500, 10), 100);
        assert_eq!(page_count(1000, 10), 100);
        assert_eq!(page_count(u64::MAX, 10), 100);
    }

    #[test]
    fn test_page_count_minimum_one() {
        assert_eq!(page_count(5, 10), 1);
        assert_eq!(page_count(0, 10), 1);
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(999, 50), 20);
        assert_eq!(page_count(7, 1), 7);
    }

    #[test]
    fn test_page_count_zero_page_size() {
        assert_eq!(page_count(7, 0), 7);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(8, 3), 3);
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(4, 0), 1);
    }

    #[test]
    fn test_page_window_start() {
        assert_eq!(page_window(1, 100), vec![1, 2, 3, 4, 5]);
        assert_eq!(page_window(2, 100), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_page_window_centred() {
        assert_eq!(page_window(10, 100), vec![8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_page_window_end() {
        assert_eq!(page_window(100, 100), vec![96, 97, 98, 99, 100]);
        assert_eq!(page_window(99, 100), vec![96, 97, 98, 99, 100]);
    }

    #[test]
    fn test_page_window_few_pages() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(3, 3), vec![1, 2, 3]);
        assert_eq!(page_window(1, 1), vec![1]);
    }
}
