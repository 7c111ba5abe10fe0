use std::fmt;
use std::io;

use thiserror::Error;

use crate::models::{Execution, Project, TaskPage};

pub type RequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// HTTP status of the failed call, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "unexpected response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("http client: {0}")]
    Client(#[from] ApiError),
    #[error("async runtime: {0}")]
    Runtime(io::Error),
    #[error("engine thread: {0}")]
    Thread(io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ExecutionFetched {
        request_id: RequestId,
        result: Result<Execution, ApiError>,
    },
    TasksFetched {
        request_id: RequestId,
        result: Result<TaskPage, ApiError>,
    },
    ExecutionStopped {
        execution_id: i64,
        result: Result<(), ApiError>,
    },
    PollTick {
        execution_id: i64,
    },
    ProjectsFetched {
        query: String,
        result: Result<Vec<Project>, ApiError>,
    },
}
