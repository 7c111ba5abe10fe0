use std::fmt;

use chrono::{DateTime, Utc};

pub type ExecutionId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExecutionStatus {
    Pending,
    InProgress,
    Succeeded,
    Failed,
    Stopped,
}

impl ExecutionStatus {
    /// Succeeded, Failed and Stopped never transition again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExecutionStatus::Succeeded | ExecutionStatus::Failed | ExecutionStatus::Stopped
        )
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExecutionStatus::Pending => "Pending",
            ExecutionStatus::InProgress => "In progress",
            ExecutionStatus::Succeeded => "Succeeded",
            ExecutionStatus::Failed => "Failed",
            ExecutionStatus::Stopped => "Stopped",
        };
        f.write_str(label)
    }
}

/// Parent replication execution as last reported by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub status: ExecutionStatus,
    pub succeeded: u32,
    pub failed: u32,
    pub in_progress: u32,
    pub stopped: u32,
    pub total: Option<u32>,
    pub trigger: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status_text: Option<String>,
}

impl JobSnapshot {
    pub fn new(status: ExecutionStatus) -> Self {
        Self {
            status,
            succeeded: 0,
            failed: 0,
            in_progress: 0,
            stopped: 0,
            total: None,
            trigger: String::new(),
            start_time: None,
            end_time: None,
            status_text: None,
        }
    }
}

/// One row of the replication task table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow {
    pub id: i64,
    pub resource_type: String,
    pub src_resource: String,
    pub dst_resource: String,
    pub operation: String,
    pub status: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}
