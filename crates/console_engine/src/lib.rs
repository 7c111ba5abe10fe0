//! Registry console engine: REST services, poll timer and effect execution.
mod charts;
mod client;
mod configuration;
mod engine;
mod models;
mod poll;
mod projects;
mod replication;
mod robots;
mod types;

pub use charts::ChartRepository;
pub use client::{ClientSettings, ReqwestRegistryClient, TOTAL_COUNT_HEADER};
pub use configuration::ConfigurationService;
pub use engine::{EngineHandle, RegistryApi};
pub use models::{
    ChartMaintainer, ChartVersion, Configuration, Execution, ExecutionStatus, NewRobot, Project,
    Robot, RobotAccess, RobotToken, Task, TaskPage, TaskQuery,
};
pub use poll::PollTimer;
pub use projects::ProjectService;
pub use replication::ReplicationService;
pub use robots::RobotRepository;
pub use types::{ApiError, EngineError, EngineEvent, FailureKind, RequestId};
