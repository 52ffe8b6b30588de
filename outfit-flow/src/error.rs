use thiserror::Error;

use crate::workflow::Step;

/// Errors raised by the outfit workflow
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Rating must be between 1 and 10, got {0}")]
    InvalidRating(i64),

    #[error("Result already composed, the record is read-only")]
    Finalized,

    #[error("Attempt counter cannot go backwards ({current} -> {requested})")]
    AttemptsDecreased { current: u32, requested: u32 },

    #[error("Workflow has no task for step {0:?}")]
    MissingTask(Step),

    #[error("Task execution failed: {0}")]
    TaskExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
