use crate::ValidationError;

pub const DEFAULT_PAGE_SIZE: u32 = 15;
pub const DEFAULT_FILTER_FIELD: &str = "resource_type";

/// Page, page size and the single active filter of a list panel.
///
/// Any change to the filter sends the list back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    page_size: u32,
    filter_field: String,
    filter_value: String,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_FIELD)
    }
}

impl QueryState {
    pub fn new(filter_field: impl Into<String>) -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filter_field: filter_field.into(),
            filter_value: String::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn filter_field(&self) -> &str {
        &self.filter_field
    }

    pub fn filter_value(&self) -> &str {
        &self.filter_value
    }

    /// The `(field, value)` pair to send, or `None` while the search box is empty.
    pub fn filter(&self) -> Option<(&str, &str)> {
        if self.filter_value.is_empty() {
            None
        } else {
            Some((self.filter_field.as_str(), self.filter_value.as_str()))
        }
    }

    pub fn set_filter_field(&mut self, field: impl Into<String>) {
        self.filter_field = field.into();
        self.page = 1;
    }

    pub fn set_search_term(&mut self, term: &str) {
        self.filter_value = term.trim().to_string();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) -> Result<(), ValidationError> {
        if page == 0 {
            return Err(ValidationError::PageOutOfRange(page));
        }
        self.page = page;
        Ok(())
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), ValidationError> {
        if page_size == 0 {
            return Err(ValidationError::PageSizeZero);
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    pub fn reset_page(&mut self) {
        self.page = 1;
    }

    /// Number of pages needed for `total_count` rows; never less than 1.
    pub fn page_count(&self, total_count: u64) -> u32 {
        let size = u64::from(self.page_size);
        let pages = total_count.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }
}
