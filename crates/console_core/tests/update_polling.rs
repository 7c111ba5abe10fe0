use std::sync::Once;
use std::time::Duration;

use console_core::{
    update, Effect, ExecutionStatus, FetchFailure, JobSnapshot, Msg, PageResult, PanelState,
    PollPhase, QueryState, RequestId, TaskRow,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn snapshot(status: ExecutionStatus, succeeded: u32, in_progress: u32) -> JobSnapshot {
    JobSnapshot {
        succeeded,
        in_progress,
        trigger: "manual".to_string(),
        ..JobSnapshot::new(status)
    }
}

fn execution_request(effects: &[Effect]) -> RequestId {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchExecution { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("fetch execution effect")
}

fn task_request(effects: &[Effect]) -> Option<RequestId> {
    effects.iter().find_map(|effect| match effect {
        Effect::FetchTasks { request, .. } => Some(request.request_id),
        _ => None,
    })
}

fn one_task_page(id: i64) -> PageResult<TaskRow> {
    let row = TaskRow {
        id,
        resource_type: "image".to_string(),
        src_resource: "library/nginx:1.25".to_string(),
        dst_resource: "mirror/nginx:1.25".to_string(),
        operation: "copy".to_string(),
        status: "InProgress".to_string(),
        start_time: None,
        end_time: None,
    };
    PageResult::new(vec![row], Some(1))
}

/// Init, then both first answers land with the execution in progress.
fn polling_panel() -> PanelState {
    let (state, effects) = update(panel_42(), Msg::Init);
    let (state, _) = update(
        state,
        Msg::TasksLoaded {
            request_id: task_request(&effects).expect("initial task fetch"),
            result: Ok(one_task_page(1)),
        },
    );
    let (state, _) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::InProgress, 0, 1)),
        },
    );
    assert_eq!(state.poll_phase(), PollPhase::Polling);
    state
}

fn count_fetches(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| {
            matches!(
                effect,
                Effect::FetchExecution { .. } | Effect::FetchTasks { .. }
            )
        })
        .count()
}

fn panel_42() -> PanelState {
    PanelState::with_query(42, QueryState::default(), Duration::from_millis(500))
}

#[test]
fn init_fetches_execution_and_first_task_page() {
    init_logging();
    let (state, effects) = update(panel_42(), Msg::Init);

    assert_eq!(effects.len(), 2);
    assert!(matches!(
        effects[0],
        Effect::FetchExecution {
            execution_id: 42,
            ..
        }
    ));
    match &effects[1] {
        Effect::FetchTasks {
            execution_id,
            request,
        } => {
            assert_eq!(*execution_id, 42);
            assert_eq!(request.query.page(), 1);
        }
        other => panic!("unexpected effect {other:?}"),
    }
    assert!(state.view().execution_loading);
    assert!(state.view().loading);
    assert_eq!(state.poll_phase(), PollPhase::Idle);
}

#[test]
fn in_progress_execution_starts_polling_and_tick_refetches_both() {
    init_logging();
    let (state, effects) = update(panel_42(), Msg::Init);
    let request_id = execution_request(&effects);
    let (state, _) = update(
        state,
        Msg::TasksLoaded {
            request_id: task_request(&effects).expect("initial task fetch"),
            result: Ok(one_task_page(1)),
        },
    );

    let (state, effects) = update(
        state,
        Msg::ExecutionLoaded {
            request_id,
            result: Ok(snapshot(ExecutionStatus::InProgress, 2, 3)),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::StartPolling {
            execution_id: 42,
            interval: Duration::from_millis(500),
        }]
    );
    assert_eq!(state.poll_phase(), PollPhase::Polling);
    let view = state.view();
    assert_eq!(view.succeeded, 2);
    assert_eq!(view.in_progress, 3);
    assert_eq!(view.trigger, "manual");

    let (state, effects) = update(state, Msg::PollTick);
    assert_eq!(count_fetches(&effects), 2);
    assert!(effects
        .iter()
        .any(|e| matches!(e, Effect::FetchTasks { .. })));
    assert_eq!(state.poll_phase(), PollPhase::Polling);
}

#[test]
fn succeeded_execution_stops_polling_exactly_once() {
    init_logging();
    let (state, effects) = update(panel_42(), Msg::Init);
    let (state, _) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::InProgress, 2, 3)),
        },
    );
    let (state, effects) = update(state, Msg::PollTick);
    let (state, _) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::Succeeded, 5, 0)),
        },
    );

    let (state, effects) = update(state, Msg::PollTick);
    assert_eq!(effects, vec![Effect::CancelPolling]);
    assert_eq!(state.poll_phase(), PollPhase::Idle);

    // A tick already queued behind the cancel does nothing.
    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
    assert_eq!(state.poll_phase(), PollPhase::Idle);
}

#[test]
fn pending_execution_polls_snapshot_only() {
    init_logging();
    let (state, effects) = update(panel_42(), Msg::Init);
    let (state, effects) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::Pending, 0, 0)),
        },
    );
    assert!(matches!(effects[0], Effect::StartPolling { .. }));

    let (_state, effects) = update(state, Msg::PollTick);
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::FetchExecution { .. }));
}

#[test]
fn terminal_first_snapshot_never_starts_polling() {
    init_logging();
    let (state, effects) = update(panel_42(), Msg::Init);
    let (state, effects) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::Failed, 1, 0)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.poll_phase(), PollPhase::Idle);
}

#[test]
fn polling_does_not_resume_after_terminal_status() {
    init_logging();
    let (state, effects) = update(panel_42(), Msg::Init);
    let (state, _) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::InProgress, 0, 1)),
        },
    );
    let (state, effects) = update(state, Msg::PollTick);
    let (state, _) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::Stopped, 0, 0)),
        },
    );
    let (state, _) = update(state, Msg::PollTick);
    assert_eq!(state.poll_phase(), PollPhase::Idle);

    // Even if a later refresh reports a non-terminal status, the panel stays idle.
    let (state, effects) = update(state, Msg::StopClicked);
    assert!(matches!(effects[0], Effect::StopExecution { .. }));
    let (state, effects) = update(state, Msg::StopCompleted { result: Ok(()) });
    let (state, effects) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::InProgress, 0, 1)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.poll_phase(), PollPhase::Idle);
}

#[test]
fn teardown_cancels_timer_and_ignores_late_responses() {
    init_logging();
    let (state, effects) = update(panel_42(), Msg::Init);
    let (state, _) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::InProgress, 0, 1)),
        },
    );
    let (state, effects) = update(state, Msg::PollTick);
    let late_request = execution_request(&effects);

    let (state, effects) = update(state, Msg::Teardown);
    assert_eq!(effects, vec![Effect::CancelPolling]);
    assert!(state.is_torn_down());

    let before = state.clone();
    let (state, effects) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: late_request,
            result: Ok(snapshot(ExecutionStatus::Succeeded, 1, 0)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state, before);

    let (_state, effects) = update(state, Msg::Teardown);
    assert!(effects.is_empty());
}

#[test]
fn execution_failure_is_reported_and_keeps_snapshot() {
    init_logging();
    let (state, effects) = update(panel_42(), Msg::Init);
    let (state, _) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Ok(snapshot(ExecutionStatus::InProgress, 4, 1)),
        },
    );
    let (state, effects) = update(state, Msg::PollTick);
    let failure = FetchFailure::with_status(503, "unavailable");
    let (state, effects) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution_request(&effects),
            result: Err(failure.clone()),
        },
    );
    assert_eq!(effects, vec![Effect::ReportError(failure)]);
    assert_eq!(state.view().succeeded, 4);
    assert!(!state.view().execution_loading);
    assert_eq!(state.poll_phase(), PollPhase::Polling);
}

#[test]
fn stop_is_not_sent_twice_while_outstanding() {
    init_logging();
    let (state, _) = update(panel_42(), Msg::Init);
    let (state, effects) = update(state, Msg::StopClicked);
    assert_eq!(effects, vec![Effect::StopExecution { execution_id: 42 }]);
    assert!(state.view().stop_ongoing);

    let (state, effects) = update(state, Msg::StopClicked);
    assert!(effects.is_empty());

    let failure = FetchFailure::with_status(403, "forbidden");
    let (state, effects) = update(
        state,
        Msg::StopCompleted {
            result: Err(failure.clone()),
        },
    );
    assert_eq!(effects, vec![Effect::ReportError(failure)]);
    assert!(!state.view().stop_ongoing);
}

#[test]
fn successful_stop_reports_and_refreshes_execution() {
    init_logging();
    let (state, _) = update(panel_42(), Msg::Init);
    let (state, _) = update(state, Msg::StopClicked);
    let (_state, effects) = update(state, Msg::StopCompleted { result: Ok(()) });
    assert_eq!(effects.len(), 2);
    assert!(matches!(effects[0], Effect::ReportInfo(_)));
    assert!(matches!(
        effects[1],
        Effect::FetchExecution {
            execution_id: 42,
            ..
        }
    ));
}

#[test]
fn slow_execution_answer_survives_later_ticks() {
    init_logging();
    let (state, effects) = update(polling_panel(), Msg::PollTick);
    let slow_request = execution_request(&effects);
    let slow_tasks = task_request(&effects).expect("tick reloads tasks");

    // The next ticks arrive before either answer.
    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::PollTick);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::TasksLoaded {
            request_id: slow_tasks,
            result: Ok(one_task_page(7)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().tasks[0].id, 7);

    let (state, effects) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: slow_request,
            result: Ok(snapshot(ExecutionStatus::Succeeded, 1, 0)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().status, Some(ExecutionStatus::Succeeded));

    let (state, effects) = update(state, Msg::PollTick);
    assert_eq!(effects, vec![Effect::CancelPolling]);
    assert_eq!(state.poll_phase(), PollPhase::Idle);
}

#[test]
fn tick_refetches_only_what_has_answered() {
    init_logging();
    let (state, effects) = update(polling_panel(), Msg::PollTick);
    let execution = execution_request(&effects);
    let tasks = task_request(&effects).expect("tick reloads tasks");

    let (state, _) = update(
        state,
        Msg::ExecutionLoaded {
            request_id: execution,
            result: Ok(snapshot(ExecutionStatus::InProgress, 0, 1)),
        },
    );
    let (state, effects) = update(state, Msg::PollTick);
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::FetchExecution { .. }));

    // A query change still supersedes the outstanding page.
    let (state, effects) = update(state, Msg::SearchSubmitted("nginx".to_string()));
    let newer = task_request(&effects).expect("search fetches tasks");
    assert!(newer > tasks);
    let (state, effects) = update(
        state,
        Msg::TasksLoaded {
            request_id: tasks,
            result: Ok(one_task_page(9)),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().tasks[0].id, 1);
    assert!(state.view().loading);
}
