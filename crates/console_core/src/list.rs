use console_logging::console_debug;

use crate::{FetchFailure, PageResult, QueryState, ValidationError};

pub type RequestId = u64;

/// A page fetch the front end must run: `query` snapshot tagged with its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub request_id: RequestId,
    pub query: QueryState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    Failed(FetchFailure),
    /// The response belongs to a request that was superseded; nothing changed.
    Stale,
}

/// Query state plus the last good page of a paginated list.
///
/// Every state change issues a new [`FetchRequest`]. Only the response to the
/// most recently issued request is applied, so a slow answer for an older
/// query can never overwrite rows fetched for the current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListController<T> {
    query: QueryState,
    page: PageResult<T>,
    loading: bool,
    last_issued: RequestId,
    pending: Option<RequestId>,
}

impl<T> Default for ListController<T> {
    fn default() -> Self {
        Self::new(QueryState::default())
    }
}

impl<T> ListController<T> {
    pub fn new(query: QueryState) -> Self {
        Self {
            query,
            page: PageResult::default(),
            loading: false,
            last_issued: 0,
            pending: None,
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn page(&self) -> &PageResult<T> {
        &self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn pending_request(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn set_filter_field(&mut self, field: impl Into<String>) -> FetchRequest {
        self.query.set_filter_field(field);
        self.issue()
    }

    pub fn set_search_term(&mut self, term: &str) -> FetchRequest {
        self.query.set_search_term(term);
        self.issue()
    }

    pub fn set_page(&mut self, page: u32) -> Result<FetchRequest, ValidationError> {
        self.query.set_page(page)?;
        Ok(self.issue())
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<FetchRequest, ValidationError> {
        self.query.set_page_size(page_size)?;
        Ok(self.issue())
    }

    /// Back to page 1 with the current filter.
    pub fn refresh(&mut self) -> FetchRequest {
        self.query.reset_page();
        self.issue()
    }

    /// Same query again, e.g. on a poll tick.
    pub fn reload(&mut self) -> FetchRequest {
        self.issue()
    }

    fn issue(&mut self) -> FetchRequest {
        self.last_issued += 1;
        self.pending = Some(self.last_issued);
        self.loading = true;
        FetchRequest {
            request_id: self.last_issued,
            query: self.query.clone(),
        }
    }

    pub fn apply(
        &mut self,
        request_id: RequestId,
        result: Result<PageResult<T>, FetchFailure>,
    ) -> ApplyOutcome {
        if self.pending != Some(request_id) {
            console_debug!(
                "Discarding stale page response request_id={} pending={:?}",
                request_id,
                self.pending
            );
            return ApplyOutcome::Stale;
        }
        self.pending = None;
        self.loading = false;
        match result {
            Ok(page) => {
                self.page = page;
                ApplyOutcome::Applied
            }
            Err(failure) => ApplyOutcome::Failed(failure),
        }
    }

    /// Forget the in-flight request so its response is ignored when it lands.
    pub fn abandon(&mut self) {
        self.pending = None;
        self.loading = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(items: &[&str], total: u64) -> PageResult<String> {
        PageResult::new(items.iter().map(|s| s.to_string()).collect(), Some(total))
    }

    #[test]
    fn superseded_response_is_discarded() {
        let mut list = ListController::<String>::default();
        let first = list.set_page(2).unwrap();
        let second = list.set_search_term("x");
        assert_eq!(second.query.page(), 1);

        let outcome = list.apply(first.request_id, Ok(page(&["old"], 30)));
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert!(list.page().is_empty());
        assert!(list.is_loading());

        let outcome = list.apply(second.request_id, Ok(page(&["new"], 1)));
        assert_eq!(outcome, ApplyOutcome::Applied);
        assert_eq!(list.page().items(), &["new".to_string()]);
        assert!(!list.is_loading());
    }

    #[test]
    fn failure_keeps_last_good_page_and_clears_loading() {
        let mut list = ListController::<String>::default();
        let request = list.reload();
        list.apply(request.request_id, Ok(page(&["a", "b"], 2)));

        let request = list.set_page(2).unwrap();
        let outcome = list.apply(
            request.request_id,
            Err(FetchFailure::with_status(500, "boom")),
        );
        assert!(matches!(outcome, ApplyOutcome::Failed(_)));
        assert_eq!(list.page().len(), 2);
        assert!(!list.is_loading());
    }

    #[test]
    fn abandoned_request_is_ignored() {
        let mut list = ListController::<String>::default();
        let request = list.reload();
        list.abandon();
        assert_eq!(
            list.apply(request.request_id, Ok(page(&["late"], 1))),
            ApplyOutcome::Stale
        );
        assert!(!list.is_loading());
    }

    #[test]
    fn invalid_page_issues_nothing() {
        let mut list = ListController::<String>::default();
        assert!(list.set_page(0).is_err());
        assert_eq!(list.pending_request(), None);
        assert!(!list.is_loading());
    }
}
