use chrono::{DateTime, Utc};

use crate::{ExecutionId, ExecutionStatus, PanelState, PollPhase, TaskRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelViewModel {
    pub execution_id: ExecutionId,
    pub status: Option<ExecutionStatus>,
    pub trigger: String,
    pub start_time: Option<DateTime<Utc>>,
    pub succeeded: u32,
    pub failed: u32,
    pub in_progress: u32,
    pub stopped: u32,
    pub tasks: Vec<TaskRow>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub filter_field: String,
    pub search: String,
    pub loading: bool,
    pub execution_loading: bool,
    pub poll: PollPhase,
    pub stop_ongoing: bool,
    pub hint: Option<String>,
    pub dirty: bool,
}

impl PanelViewModel {
    pub(crate) fn from_state(state: &PanelState) -> Self {
        let snapshot = state.snapshot();
        let tasks = state.tasks();
        let query = tasks.query();
        let total_count = tasks.page().total_count();
        Self {
            execution_id: state.execution_id(),
            status: snapshot.map(|s| s.status),
            trigger: snapshot.map(|s| s.trigger.clone()).unwrap_or_default(),
            start_time: snapshot.and_then(|s| s.start_time),
            succeeded: snapshot.map_or(0, |s| s.succeeded),
            failed: snapshot.map_or(0, |s| s.failed),
            in_progress: snapshot.map_or(0, |s| s.in_progress),
            stopped: snapshot.map_or(0, |s| s.stopped),
            tasks: tasks.page().items().to_vec(),
            total_count,
            page: query.page(),
            page_size: query.page_size(),
            page_count: query.page_count(total_count),
            filter_field: query.filter_field().to_string(),
            search: query.filter_value().to_string(),
            loading: tasks.is_loading(),
            execution_loading: state.execution_loading(),
            poll: state.poll_phase(),
            stop_ongoing: state.stop_ongoing(),
            hint: state.hint().map(ToString::to_string),
            dirty: state.is_dirty(),
        }
    }
}
