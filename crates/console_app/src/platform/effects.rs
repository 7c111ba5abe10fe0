use console_core::{
    Effect, ErrorSink, ExecutionStatus, FetchFailure, JobSnapshot, Msg, PageResult,
    ProjectSuggestion, QueryState, TaskRow,
};
use console_engine::{ApiError, EngineEvent, EngineHandle, Execution, Project, Task, TaskPage, TaskQuery};
use console_logging::{console_info, console_warn};

/// Carries core effects to the engine and engine events back as messages.
pub struct EffectRunner<S> {
    engine: EngineHandle,
    sink: S,
}

impl<S: ErrorSink> EffectRunner<S> {
    pub fn new(engine: EngineHandle, sink: S) -> Self {
        Self { engine, sink }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchExecution {
                    request_id,
                    execution_id,
                } => self.engine.fetch_execution(request_id, execution_id),
                Effect::FetchTasks {
                    execution_id,
                    request,
                } => self.engine.fetch_tasks(
                    request.request_id,
                    execution_id,
                    task_query(&request.query),
                ),
                Effect::StartPolling {
                    execution_id,
                    interval,
                } => self.engine.start_polling(execution_id, interval),
                Effect::CancelPolling => self.engine.cancel_polling(),
                Effect::StopExecution { execution_id } => {
                    console_info!("Requesting stop of execution {}", execution_id);
                    self.engine.stop_execution(execution_id);
                }
                Effect::ReportError(failure) => self.sink.report(&failure),
                Effect::ReportInfo(message) => self.sink.info(&message),
            }
        }
    }

    /// Next engine event the panel cares about, already translated.
    pub fn next_msg(&self) -> Option<Msg> {
        while let Some(event) = self.engine.try_recv() {
            if let Some(msg) = event_to_msg(event) {
                return Some(msg);
            }
        }
        None
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}

pub(crate) fn event_to_msg(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::ExecutionFetched { request_id, result } => Some(Msg::ExecutionLoaded {
            request_id,
            result: result.map(snapshot_from).map_err(|err| failure_from(&err)),
        }),
        EngineEvent::TasksFetched { request_id, result } => Some(Msg::TasksLoaded {
            request_id,
            result: result.map(page_from).map_err(|err| failure_from(&err)),
        }),
        EngineEvent::ExecutionStopped { result, .. } => Some(Msg::StopCompleted {
            result: result.map_err(|err| failure_from(&err)),
        }),
        EngineEvent::PollTick { .. } => Some(Msg::PollTick),
        EngineEvent::ProjectsFetched { query, .. } => {
            console_warn!("Project lookup for {:?} reached the task panel", query);
            None
        }
    }
}

pub(crate) fn task_query(query: &QueryState) -> TaskQuery {
    TaskQuery {
        page: query.page(),
        page_size: query.page_size(),
        filter: query
            .filter()
            .map(|(field, value)| (field.to_string(), value.to_string())),
    }
}

pub(crate) fn failure_from(err: &ApiError) -> FetchFailure {
    match err.status() {
        Some(code) => FetchFailure::with_status(code, err.message.clone()),
        None => FetchFailure::new(err.to_string()),
    }
}

fn status_from(status: console_engine::ExecutionStatus) -> ExecutionStatus {
    match status {
        console_engine::ExecutionStatus::Pending => ExecutionStatus::Pending,
        console_engine::ExecutionStatus::InProgress => ExecutionStatus::InProgress,
        console_engine::ExecutionStatus::Succeeded => ExecutionStatus::Succeeded,
        console_engine::ExecutionStatus::Failed => ExecutionStatus::Failed,
        console_engine::ExecutionStatus::Stopped => ExecutionStatus::Stopped,
    }
}

pub(crate) fn snapshot_from(execution: Execution) -> JobSnapshot {
    JobSnapshot {
        status: status_from(execution.status),
        succeeded: execution.succeeded,
        failed: execution.failed,
        in_progress: execution.in_progress,
        stopped: execution.stopped,
        total: execution.total,
        trigger: execution.trigger,
        start_time: execution.start_time,
        end_time: execution.end_time,
        status_text: execution.status_text,
    }
}

fn row_from(task: Task) -> TaskRow {
    TaskRow {
        id: task.id,
        resource_type: task.resource_type,
        src_resource: task.src_resource,
        dst_resource: task.dst_resource,
        operation: task.operation,
        status: task.status,
        start_time: task.start_time,
        end_time: task.end_time,
    }
}

pub(crate) fn page_from(page: TaskPage) -> PageResult<TaskRow> {
    PageResult::new(page.tasks, page.total_count).map(row_from)
}

pub(crate) fn suggestions_from(projects: Vec<Project>) -> Vec<ProjectSuggestion> {
    projects
        .into_iter()
        .map(|project| ProjectSuggestion {
            project_id: project.project_id,
            name: project.name,
        })
        .collect()
}

/// Prints notices under the panel and mirrors them to the log.
#[derive(Debug, Default)]
pub struct TerminalSink {
    notices: Vec<String>,
}

impl TerminalSink {
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

impl ErrorSink for TerminalSink {
    fn report(&mut self, failure: &FetchFailure) {
        console_warn!("Request failed: {}", failure);
        self.notices.push(format!("error: {failure}"));
    }

    fn info(&mut self, message: &str) {
        console_info!("{}", message);
        self.notices.push(message.to_string());
    }
}
