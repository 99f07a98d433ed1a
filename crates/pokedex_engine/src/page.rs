use serde::Serialize;

/// Fixed number of records per page.
pub const PAGE_SIZE: usize = 20;

/* 📖 # Why is a bad `page` value not an error?

Clients browse with `?page=N` links. A missing, non-numeric or out-of-range
value falls back to a usable page (1, or clamped up to 1) instead of failing
the request, and a page past the end is simply empty. The page size is fixed so
no request can ask for an unbounded response.
*/

/// A requested page number (1-based) and the slice of the collection it selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
}

impl PageRequest {
    /// Build a request from the raw `page` query value.
    ///
    /// ```
    /// use pokedex_engine::page::PageRequest;
    ///
    /// assert_eq!(PageRequest::from_query(Some("3")).number(), 3);
    /// assert_eq!(PageRequest::from_query(Some("abc")).number(), 1);
    /// assert_eq!(PageRequest::from_query(Some("-2")).number(), 1);
    /// assert_eq!(PageRequest::from_query(None).number(), 1);
    /// ```
    pub fn from_query(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|value| value.trim().parse::<i64>().ok())
            .map(|page| page.max(1) as u64)
            .unwrap_or(1);
        Self { page }
    }

    pub fn new(page: u64) -> Self {
        Self { page: page.max(1) }
    }

    /// The 1-based page number.
    pub fn number(&self) -> u64 {
        self.page
    }

    /// Number of records to skip before this page starts.
    pub fn skip(&self) -> usize {
        let skip = (self.page - 1).saturating_mul(PAGE_SIZE as u64);
        usize::try_from(skip).unwrap_or(usize::MAX)
    }

    pub fn limit(&self) -> usize {
        PAGE_SIZE
    }
}

/// Envelope of the paginated listing: `{page, limit, count, data}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub page: u64,
    pub limit: usize,
    /// Number of records actually in `data`.
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, data: Vec<T>) -> Self {
        Self {
            page: request.number(),
            limit: request.limit(),
            count: data.len(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_per_page() {
        assert_eq!(PageRequest::new(1).skip(), 0);
        assert_eq!(PageRequest::new(2).skip(), 20);
        assert_eq!(PageRequest::new(3).skip(), 40);
        assert_eq!(PageRequest::new(0).number(), 1);
    }

    #[test]
    fn test_from_query_defaults() {
        assert_eq!(PageRequest::from_query(Some("")).number(), 1);
        assert_eq!(PageRequest::from_query(Some("0")).number(), 1);
        assert_eq!(PageRequest::from_query(Some(" 4 ")).number(), 4);
        assert_eq!(PageRequest::from_query(Some("2.5")).number(), 1);
        assert_eq!(
            PageRequest::from_query(Some("99999999999999999999")).number(),
            1
        );
    }

    #[test]
    fn test_huge_page_saturates() {
        let request = PageRequest::from_query(Some(&i64::MAX.to_string()));
        assert_eq!(request.number(), i64::MAX as u64);
        assert!(request.skip() > 0);
    }

    #[test]
    fn test_page_counts_data() {
        let page = Page::new(PageRequest::new(2), vec!["a", "b"]);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 20);
        assert_eq!(page.count, 2);

        let empty: Page<&str> = Page::new(PageRequest::new(9), vec![]);
        assert_eq!(empty.count, 0);
        assert_eq!(
            serde_json::to_string(&empty).unwrap(),
            r#"{"page":9,"limit":20,"count":0,"data":[]}"#
        );
    }
}
