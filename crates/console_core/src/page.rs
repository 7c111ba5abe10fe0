/// One fetched page of rows together with the server-side row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    items: Vec<T>,
    total_count: u64,
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

impl<T> PageResult<T> {
    /// Builds a page from the response body and the `X-Total-Count` header value.
    ///
    /// A missing header falls back to the number of rows received. The total
    /// is never reported below the number of rows actually on the page.
    pub fn new(items: Vec<T>, header_total: Option<u64>) -> Self {
        let received = items.len() as u64;
        let total_count = header_total.map_or(received, |total| total.max(received));
        Self { items, total_count }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_header_counts_items() {
        let page = PageResult::new(vec![1, 2, 3], None);
        assert_eq!(page.total_count(), 3);
    }

    #[test]
    fn header_total_wins_when_larger() {
        let page = PageResult::new(vec![1, 2], Some(40));
        assert_eq!(page.total_count(), 40);
        assert_eq!(page.len(), 2);
    }

    #[test]
    fn items_never_exceed_total() {
        let page = PageResult::new(vec!['a', 'b', 'c'], Some(1));
        assert!(page.len() as u64 <= page.total_count());
    }
}
