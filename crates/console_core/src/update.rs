use console_logging::{console_debug, console_info};

use crate::list::{ApplyOutcome, FetchRequest};
use crate::{Effect, ExecutionStatus, Msg, PanelState};

/// Pure update function: applies a message to panel state and returns any effects.
pub fn update(mut state: PanelState, msg: Msg) -> (PanelState, Vec<Effect>) {
    if state.is_torn_down() {
        // Late responses and ticks after teardown must not touch the panel.
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Init => {
            state.mark_dirty();
            let request = state.tasks_mut().reload();
            vec![fetch_execution(&mut state), fetch_tasks(&state, request)]
        }
        Msg::SearchSubmitted(term) => {
            state.set_hint(None);
            state.mark_dirty();
            let request = state.tasks_mut().set_search_term(&term);
            vec![fetch_tasks(&state, request)]
        }
        Msg::FilterFieldSelected(field) => {
            state.set_hint(None);
            state.mark_dirty();
            let request = state.tasks_mut().set_filter_field(field);
            vec![fetch_tasks(&state, request)]
        }
        Msg::PageSelected(page) => {
            state.mark_dirty();
            match state.tasks_mut().set_page(page) {
                Ok(request) => {
                    state.set_hint(None);
                    vec![fetch_tasks(&state, request)]
                }
                Err(err) => {
                    state.set_hint(Some(err));
                    Vec::new()
                }
            }
        }
        Msg::PageSizeSelected(page_size) => {
            state.mark_dirty();
            match state.tasks_mut().set_page_size(page_size) {
                Ok(request) => {
                    state.set_hint(None);
                    vec![fetch_tasks(&state, request)]
                }
                Err(err) => {
                    state.set_hint(Some(err));
                    Vec::new()
                }
            }
        }
        Msg::RefreshClicked => {
            state.mark_dirty();
            let request = state.tasks_mut().refresh();
            vec![fetch_tasks(&state, request)]
        }
        Msg::PollTick => on_poll_tick(&mut state),
        Msg::ExecutionLoaded { request_id, result } => {
            if !state.accept_snapshot_response(request_id) {
                console_debug!("Discarding stale execution response request_id={}", request_id);
                return (state, Vec::new());
            }
            state.mark_dirty();
            match result {
                Ok(snapshot) => {
                    let status = snapshot.status;
                    state.set_snapshot(snapshot);
                    if !status.is_terminal() && state.begin_polling() {
                        console_info!(
                            "Execution {} is {}; polling every {:?}",
                            state.execution_id(),
                            status,
                            state.poll_interval()
                        );
                        vec![Effect::StartPolling {
                            execution_id: state.execution_id(),
                            interval: state.poll_interval(),
                        }]
                    } else {
                        Vec::new()
                    }
                }
                Err(failure) => vec![Effect::ReportError(failure)],
            }
        }
        Msg::TasksLoaded { request_id, result } => {
            match state.tasks_mut().apply(request_id, result) {
                ApplyOutcome::Applied => {
                    state.mark_dirty();
                    Vec::new()
                }
                ApplyOutcome::Failed(failure) => {
                    state.mark_dirty();
                    vec![Effect::ReportError(failure)]
                }
                ApplyOutcome::Stale => Vec::new(),
            }
        }
        Msg::StopClicked => {
            if state.stop_ongoing() {
                Vec::new()
            } else {
                state.set_stop_ongoing(true);
                state.mark_dirty();
                vec![Effect::StopExecution {
                    execution_id: state.execution_id(),
                }]
            }
        }
        Msg::StopCompleted { result } => {
            state.set_stop_ongoing(false);
            state.mark_dirty();
            match result {
                Ok(()) => vec![
                    Effect::ReportInfo(format!(
                        "Stop requested for execution {}",
                        state.execution_id()
                    )),
                    fetch_execution(&mut state),
                ],
                Err(failure) => vec![Effect::ReportError(failure)],
            }
        }
        Msg::Teardown => {
            state.tear_down();
            state.mark_dirty();
            if state.end_polling() {
                vec![Effect::CancelPolling]
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn on_poll_tick(state: &mut PanelState) -> Vec<Effect> {
    if state.poll_phase() != crate::PollPhase::Polling {
        // Tick queued before the timer was cancelled.
        return Vec::new();
    }
    match state.snapshot().map(|snapshot| snapshot.status) {
        Some(ExecutionStatus::InProgress) => {
            let mut effects = Vec::new();
            effects.extend(refetch_execution(state));
            // A pending fetch already carries the current query.
            if state.tasks().is_loading() {
                console_debug!("Task page still loading; tick skips the reload");
            } else {
                let request = state.tasks_mut().reload();
                effects.push(fetch_tasks(state, request));
            }
            effects
        }
        Some(ExecutionStatus::Pending) | None => refetch_execution(state).into_iter().collect(),
        Some(status) => {
            console_info!(
                "Execution {} reached {}; polling stopped",
                state.execution_id(),
                status
            );
            state.end_polling();
            state.mark_dirty();
            vec![Effect::CancelPolling]
        }
    }
}

/// Snapshot fetch for a tick, unless the previous one is still outstanding.
fn refetch_execution(state: &mut PanelState) -> Option<Effect> {
    if state.execution_loading() {
        console_debug!("Execution fetch still outstanding; tick skips it");
        None
    } else {
        Some(fetch_execution(state))
    }
}

fn fetch_execution(state: &mut PanelState) -> Effect {
    Effect::FetchExecution {
        request_id: state.issue_snapshot_request(),
        execution_id: state.execution_id(),
    }
}

fn fetch_tasks(state: &PanelState, request: FetchRequest) -> Effect {
    Effect::FetchTasks {
        execution_id: state.execution_id(),
        request,
    }
}
