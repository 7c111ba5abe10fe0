use std::time::Duration;

use crate::list::{ListController, RequestId};
use crate::view_model::PanelViewModel;
use crate::{ExecutionId, JobSnapshot, QueryState, TaskRow, ValidationError};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollPhase {
    #[default]
    Idle,
    Polling,
}

/// State of one replication-execution panel: the parent execution, its task
/// list, and whether the panel is currently polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    execution_id: ExecutionId,
    poll_interval: Duration,
    tasks: ListController<TaskRow>,
    snapshot: Option<JobSnapshot>,
    snapshot_issued: RequestId,
    snapshot_pending: Option<RequestId>,
    poll: PollPhase,
    poll_finished: bool,
    stop_ongoing: bool,
    torn_down: bool,
    hint: Option<ValidationError>,
    dirty: bool,
}

impl PanelState {
    pub fn new(execution_id: ExecutionId) -> Self {
        Self::with_query(execution_id, QueryState::default(), DEFAULT_POLL_INTERVAL)
    }

    pub fn with_query(
        execution_id: ExecutionId,
        query: QueryState,
        poll_interval: Duration,
    ) -> Self {
        Self {
            execution_id,
            poll_interval,
            tasks: ListController::new(query),
            snapshot: None,
            snapshot_issued: 0,
            snapshot_pending: None,
            poll: PollPhase::Idle,
            poll_finished: false,
            stop_ongoing: false,
            torn_down: false,
            hint: None,
            dirty: false,
        }
    }

    pub fn execution_id(&self) -> ExecutionId {
        self.execution_id
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn poll_phase(&self) -> PollPhase {
        self.poll
    }

    pub fn snapshot(&self) -> Option<&JobSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn tasks(&self) -> &ListController<TaskRow> {
        &self.tasks
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn view(&self) -> PanelViewModel {
        PanelViewModel::from_state(self)
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn tasks_mut(&mut self) -> &mut ListController<TaskRow> {
        &mut self.tasks
    }

    pub(crate) fn execution_loading(&self) -> bool {
        self.snapshot_pending.is_some()
    }

    pub(crate) fn issue_snapshot_request(&mut self) -> RequestId {
        self.snapshot_issued += 1;
        self.snapshot_pending = Some(self.snapshot_issued);
        self.snapshot_issued
    }

    /// Clears the pending marker if `request_id` is the one outstanding.
    pub(crate) fn accept_snapshot_response(&mut self, request_id: RequestId) -> bool {
        if self.snapshot_pending == Some(request_id) {
            self.snapshot_pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_snapshot(&mut self, snapshot: JobSnapshot) {
        if snapshot.status.is_terminal() {
            self.poll_finished = true;
        }
        self.snapshot = Some(snapshot);
    }

    /// Idle to Polling, unless polling already ran to a terminal status.
    pub(crate) fn begin_polling(&mut self) -> bool {
        if self.poll == PollPhase::Idle && !self.poll_finished {
            self.poll = PollPhase::Polling;
            true
        } else {
            false
        }
    }

    pub(crate) fn end_polling(&mut self) -> bool {
        if self.poll == PollPhase::Polling {
            self.poll = PollPhase::Idle;
            true
        } else {
            false
        }
    }

    pub(crate) fn stop_ongoing(&self) -> bool {
        self.stop_ongoing
    }

    pub(crate) fn set_stop_ongoing(&mut self, ongoing: bool) {
        self.stop_ongoing = ongoing;
    }

    pub(crate) fn hint(&self) -> Option<&ValidationError> {
        self.hint.as_ref()
    }

    pub(crate) fn set_hint(&mut self, hint: Option<ValidationError>) {
        self.hint = hint;
    }

    pub(crate) fn tear_down(&mut self) {
        self.torn_down = true;
        self.snapshot_pending = None;
        self.tasks.abandon();
    }
}
