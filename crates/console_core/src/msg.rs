use crate::list::RequestId;
use crate::{FetchFailure, JobSnapshot, PageResult, TaskRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Panel was opened.
    Init,
    /// User submitted the search box.
    SearchSubmitted(String),
    /// User picked another filter field from the dropdown.
    FilterFieldSelected(String),
    /// User navigated to a page (1-based).
    PageSelected(u32),
    /// User changed the page size.
    PageSizeSelected(u32),
    /// User clicked the refresh icon.
    RefreshClicked,
    /// The poll timer fired.
    PollTick,
    /// Response for the parent execution.
    ExecutionLoaded {
        request_id: RequestId,
        result: Result<JobSnapshot, FetchFailure>,
    },
    /// Response for a task page.
    TasksLoaded {
        request_id: RequestId,
        result: Result<PageResult<TaskRow>, FetchFailure>,
    },
    /// User clicked Stop.
    StopClicked,
    StopCompleted { result: Result<(), FetchFailure> },
    /// Panel is going away.
    Teardown,
    NoOp,
}
