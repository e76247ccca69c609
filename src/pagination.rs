//! Page-number pagination for the list endpoints.

use serde::Serialize;

/// Server-side page size limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageSettings {
    pub default_size: usize,
    pub max_size: usize,
}

impl PageSettings {
    pub fn new(default_size: usize, max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            default_size: default_size.clamp(1, max_size),
            max_size,
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::new(20, 100)
    }
}

/// Page requested by a client, already coerced into valid bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// Parses raw `page`/`page_size` query values.
    ///
    /// Unparsable or zero values fall back to the first page and the default
    /// size; oversized requests are clamped to `settings.max_size`.
    pub fn from_params(
        page: Option<&str>,
        page_size: Option<&str>,
        settings: PageSettings,
    ) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);
        let per_page = page_size
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p > 0)
            .map_or(settings.default_size, |p| p.min(settings.max_size));

        Self { page, per_page }
    }

    /// Rows to skip, or `None` when the page lies beyond any table SQLite
    /// can hold.
    pub fn offset(&self) -> Option<i64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.per_page)
            .and_then(|offset| i64::try_from(offset).ok())
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// One page of results together with totals.
#[derive(Debug, Serialize, PartialEq)]
pub struct Paginated<T> {
    /// Total number of items matching the query.
    pub count: usize,
    pub page: usize,
    /// Total number of pages.
    pub pages: usize,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, count: usize, request: PageRequest) -> Self {
        Self {
            count,
            page: request.page,
            pages: count.div_ceil(request.per_page),
            results,
        }
    }

    /// Converts every item keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Paginated<U>
    where
        F: FnMut(T) -> U,
    {
        Paginated {
            count: self.count,
            page: self.page,
            pages: self.pages,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_params_use_defaults() {
        let request = PageRequest::from_params(None, None, PageSettings::default());
        assert_eq!(request, PageRequest { page: 1, per_page: 20 });
        assert_eq!(request.offset(), Some(0));
    }

    #[test]
    fn invalid_params_are_ignored() {
        let settings = PageSettings::new(10, 50);
        let request = PageRequest::from_params(Some("abc"), Some("-4"), settings);
        assert_eq!(request, PageRequest { page: 1, per_page: 10 });

        let request = PageRequest::from_params(Some("0"), Some("0"), settings);
        assert_eq!(request, PageRequest { page: 1, per_page: 10 });
    }

    #[test]
    fn page_size_is_clamped() {
        let settings = PageSettings::new(10, 50);
        let request = PageRequest::from_params(Some("3"), Some("500"), settings);
        assert_eq!(request, PageRequest { page: 3, per_page: 50 });
        assert_eq!(request.offset(), Some(100));
        assert_eq!(request.limit(), 50);
    }

    #[test]
    fn huge_page_has_no_offset() {
        let request = PageRequest::from_params(
            Some("18446744073709551615"),
            Some("2"),
            PageSettings::default(),
        );
        assert_eq!(request.page, usize::MAX);
        assert_eq!(request.offset(), None);

        let request = PageRequest {
            page: (i64::MAX as usize) / 2 + 2,
            per_page: 2,
        };
        assert_eq!(request.offset(), None);
    }

    #[test]
    fn settings_keep_default_within_max() {
        let settings = PageSettings::new(200, 50);
        assert_eq!(settings.default_size, 50);
        let settings = PageSettings::new(0, 0);
        assert_eq!(settings, PageSettings { default_size: 1, max_size: 1 });
    }

    #[test]
    fn paginated_counts_pages() {
        let request = PageRequest { page: 2, per_page: 2 };
        let page = Paginated::new(vec![3, 4], 5, request);
        assert_eq!(page.pages, 3);
        assert_eq!(page.page, 2);

        let empty: Paginated<i32> = Paginated::new(vec![], 0, request);
        assert_eq!(empty.pages, 0);
        assert!(empty.results.is_empty());
    }

    #[test]
    fn map_preserves_metadata() {
        let request = PageRequest { page: 1, per_page: 10 };
        let page = Paginated::new(vec![1, 2], 2, request).map(|n| n * 10);
        assert_eq!(page.results, vec![10, 20]);
        assert_eq!(page.count, 2);
        assert_eq!(page.pages, 1);
    }
}
