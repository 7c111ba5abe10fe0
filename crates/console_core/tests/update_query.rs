use std::sync::Once;

use console_core::{
    update, Effect, FetchFailure, FetchRequest, Msg, PageResult, PanelState, TaskRow,
    ValidationError,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(console_logging::initialize_for_tests);
}

fn task(id: i64, resource: &str) -> TaskRow {
    TaskRow {
        id,
        resource_type: "image".to_string(),
        src_resource: format!("library/{resource}"),
        dst_resource: format!("mirror/{resource}"),
        operation: "copy".to_string(),
        status: "InProgress".to_string(),
        start_time: None,
        end_time: None,
    }
}

fn task_request(effects: &[Effect]) -> FetchRequest {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchTasks { request, .. } => Some(request.clone()),
            _ => None,
        })
        .expect("fetch tasks effect")
}

fn initialized() -> PanelState {
    let (state, _) = update(PanelState::new(42), Msg::Init);
    state
}

#[test]
fn search_resets_page_before_fetch() {
    init_logging();
    let (state, _) = update(initialized(), Msg::PageSelected(3));
    assert_eq!(state.view().page, 3);

    let (state, effects) = update(state, Msg::SearchSubmitted("  nginx  ".to_string()));
    let request = task_request(&effects);
    assert_eq!(request.query.page(), 1);
    assert_eq!(request.query.filter(), Some(("resource_type", "nginx")));
    assert_eq!(state.view().search, "nginx");
}

#[test]
fn filter_field_change_resets_page() {
    init_logging();
    let (state, _) = update(initialized(), Msg::SearchSubmitted("failed".to_string()));
    let (state, _) = update(state, Msg::PageSelected(2));
    let (_state, effects) = update(state, Msg::FilterFieldSelected("status".to_string()));
    let request = task_request(&effects);
    assert_eq!(request.query.page(), 1);
    assert_eq!(request.query.filter(), Some(("status", "failed")));
}

#[test]
fn page_change_keeps_filter_state() {
    init_logging();
    let (state, _) = update(initialized(), Msg::SearchSubmitted("alpine".to_string()));
    let (_state, effects) = update(state, Msg::PageSelected(4));
    let request = task_request(&effects);
    assert_eq!(request.query.page(), 4);
    assert_eq!(request.query.filter_value(), "alpine");
}

#[test]
fn invalid_page_becomes_hint_without_fetch() {
    init_logging();
    let (state, effects) = update(initialized(), Msg::PageSelected(0));
    assert!(effects.is_empty());
    assert_eq!(
        state.view().hint,
        Some(ValidationError::PageOutOfRange(0).to_string())
    );

    let (state, _) = update(state, Msg::PageSelected(1));
    assert_eq!(state.view().hint, None);
}

#[test]
fn late_response_for_superseded_query_is_discarded() {
    init_logging();
    let (state, effects) = update(initialized(), Msg::PageSelected(2));
    let page_two = task_request(&effects);
    let (state, effects) = update(state, Msg::SearchSubmitted("x".to_string()));
    let searched = task_request(&effects);

    // The page=2 response arrives after the search was issued.
    let (mut state, effects) = update(
        state,
        Msg::TasksLoaded {
            request_id: page_two.request_id,
            result: Ok(PageResult::new(vec![task(1, "old")], Some(40))),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().tasks.is_empty());
    assert!(state.view().loading);
    state.consume_dirty();

    let (state, effects) = update(
        state,
        Msg::TasksLoaded {
            request_id: searched.request_id,
            result: Ok(PageResult::new(vec![task(7, "x")], Some(1))),
        },
    );
    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.tasks, vec![task(7, "x")]);
    assert_eq!(view.total_count, 1);
    assert_eq!(view.page, 1);
    assert!(!view.loading);
}

#[test]
fn failed_page_keeps_previous_rows_and_reports() {
    init_logging();
    let (state, effects) = update(PanelState::new(42), Msg::Init);
    let first = task_request(&effects);
    let (state, _) = update(
        state,
        Msg::TasksLoaded {
            request_id: first.request_id,
            result: Ok(PageResult::new(vec![task(1, "a"), task(2, "b")], Some(30))),
        },
    );

    let (state, effects) = update(state, Msg::PageSelected(2));
    let second = task_request(&effects);
    let failure = FetchFailure::new("connection reset");
    let (state, effects) = update(
        state,
        Msg::TasksLoaded {
            request_id: second.request_id,
            result: Err(failure.clone()),
        },
    );
    assert_eq!(effects, vec![Effect::ReportError(failure)]);
    let view = state.view();
    assert_eq!(view.tasks.len(), 2);
    assert_eq!(view.total_count, 30);
    assert_eq!(view.page_count, 2);
    assert!(!view.loading);
}

#[test]
fn refresh_returns_to_first_page() {
    init_logging();
    let (state, _) = update(initialized(), Msg::PageSelected(5));
    let (state, effects) = update(state, Msg::RefreshClicked);
    assert_eq!(task_request(&effects).query.page(), 1);
    assert_eq!(state.view().page, 1);
}

#[test]
fn view_is_marked_dirty_until_consumed() {
    init_logging();
    let mut state = initialized();
    assert!(state.view().dirty);
    assert!(state.consume_dirty());
    assert!(!state.view().dirty);

    let (mut state, _) = update(state, Msg::NoOp);
    assert!(!state.consume_dirty());
}
