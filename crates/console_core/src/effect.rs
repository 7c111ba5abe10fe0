use std::time::Duration;

use crate::list::{FetchRequest, RequestId};
use crate::{ExecutionId, FetchFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchExecution {
        request_id: RequestId,
        execution_id: ExecutionId,
    },
    FetchTasks {
        execution_id: ExecutionId,
        request: FetchRequest,
    },
    StartPolling {
        execution_id: ExecutionId,
        interval: Duration,
    },
    CancelPolling,
    StopExecution { execution_id: ExecutionId },
    ReportError(FetchFailure),
    ReportInfo(String),
}
