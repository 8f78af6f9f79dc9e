//! Page/limit arithmetic
//!
//! Pure functions: raw page and limit inputs in, a clamped window out.
//! Nothing here fails; out-of-range input is pulled back into range.

use crate::routing::QueryMap;

/// Page and limit as requested by the client, before clamping
///
/// Values that are missing or do not parse as integers are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    /// Read `page` and `limit` from the query string
    pub fn from_query(query: &QueryMap) -> Self {
        let int = |key: &str| query.get(key).and_then(|v| v.trim().parse::<i64>().ok());
        Self {
            page: int("page"),
            limit: int("limit"),
        }
    }

    /// Clamp against the configured sizes; see [`compute`]
    pub fn resolve(&self, default_limit: u32, max_limit: u32) -> PageWindow {
        compute(self.page, self.limit, default_limit, max_limit)
    }
}

/// A clamped page window ready to be bound as `LIMIT`/`OFFSET`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-indexed page, at least 1
    pub page: u32,
    /// Page size in `[1, max_limit]`
    pub limit: u32,
    /// `(page - 1) * limit`
    pub offset: u64,
}

/// Turn raw page/limit inputs into a window
///
/// - `limit` is the requested limit (or `default_limit`), capped at
///   `max_limit` and raised to at least 1
/// - `page` below 1 is treated as 1
/// - `offset = (page - 1) * limit`
pub fn compute(
    page: Option<i64>,
    limit: Option<i64>,
    default_limit: u32,
    max_limit: u32,
) -> PageWindow {
    let limit = limit
        .unwrap_or_else(|| i64::from(default_limit))
        .min(i64::from(max_limit))
        .max(1);
    let limit = u32::try_from(limit).unwrap_or(u32::MAX);

    let page = page.unwrap_or(1).max(1);
    let page = u32::try_from(page).unwrap_or(u32::MAX);

    PageWindow {
        page,
        limit,
        offset: u64::from(page - 1) * u64::from(limit),
    }
}

/// Number of pages needed for `total` records, `ceil(total / limit)`
///
/// Zero records means zero pages.
pub fn page_count(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_below_one_is_clamped() {
        let w = compute(Some(0), Some(10), 20, 100);
        assert_eq!(w.page, 1);
        assert_eq!(w.limit, 10);
        assert_eq!(w.offset, 0);

        let w = compute(Some(-4), None, 20, 100);
        assert_eq!(w.page, 1);
    }

    #[test]
    fn test_limit_is_capped() {
        let w = compute(Some(2), Some(500), 20, 100);
        assert_eq!(w.limit, 100);
        assert_eq!(w.offset, 100);
    }

    #[test]
    fn test_default_limit() {
        let w = compute(Some(1), None, 20, 100);
        assert_eq!(w.limit, 20);
        assert_eq!(w.offset, 0);
    }

    #[test]
    fn test_non_positive_limit_becomes_one() {
        assert_eq!(compute(None, Some(0), 20, 100).limit, 1);
        assert_eq!(compute(None, Some(-3), 20, 100).limit, 1);
        assert_eq!(compute(Some(3), Some(0), 20, 100).offset, 2);
    }

    #[test]
    fn test_default_above_max_is_capped() {
        assert_eq!(compute(None, None, 250, 100).limit, 100);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let w = compute(Some(i64::MAX), Some(100), 20, 100);
        assert_eq!(w.page, u32::MAX);
        assert_eq!(w.offset, u64::from(u32::MAX - 1) * 100);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(41, 20), 3);
        assert_eq!(page_count(40, 20), 2);
        assert_eq!(page_count(1, 20), 1);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_from_query_ignores_malformed_values() {
        let query: QueryMap = [("page", "two"), ("limit", " 15 ")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let request = PageRequest::from_query(&query);
        assert_eq!(request, PageRequest::new(None, Some(15)));

        let window = request.resolve(20, 100);
        assert_eq!(window.page, 1);
        assert_eq!(window.limit, 15);
    }
}
