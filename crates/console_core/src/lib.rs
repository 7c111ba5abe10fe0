//! Registry console core: pure panel state machines and form helpers.
mod chart;
mod debounce;
mod effect;
mod list;
mod msg;
mod page;
mod query;
mod report;
mod snapshot;
mod state;
mod typeahead;
mod update;
mod validate;
mod view_model;

pub use chart::{ChartStatus, MaintainerSummary};
pub use debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
pub use effect::Effect;
pub use list::{ApplyOutcome, FetchRequest, ListController, RequestId};
pub use msg::Msg;
pub use page::PageResult;
pub use query::{QueryState, DEFAULT_FILTER_FIELD, DEFAULT_PAGE_SIZE};
pub use report::{ErrorSink, FetchFailure};
pub use snapshot::{ExecutionId, ExecutionStatus, JobSnapshot, TaskRow};
pub use state::{PanelState, PollPhase, DEFAULT_POLL_INTERVAL};
pub use typeahead::{ProjectHint, ProjectSuggestion, ProjectTypeahead, MAX_SUGGESTIONS};
pub use update::update;
pub use validate::{
    validate_project_name, validate_repository_name, validate_robot_name, validate_tag,
    ImageName, ValidationError,
};
pub use view_model::PanelViewModel;
