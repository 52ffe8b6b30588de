use async_trait::async_trait;

use crate::{
    error::Result,
    state::{OutfitState, StateUpdate},
};

/// Result of a task execution
#[derive(Debug, Clone, Default)]
pub struct TaskResult {
    /// Changes the task wants merged into the record
    pub update: StateUpdate,
    /// Optional status line surfaced to the user alongside the response
    pub status_message: Option<String>,
}

impl TaskResult {
    pub fn new(update: StateUpdate) -> Self {
        Self {
            update,
            status_message: None,
        }
    }

    pub fn new_with_status(update: StateUpdate, status_message: Option<String>) -> Self {
        Self {
            update,
            status_message,
        }
    }
}

/// Core trait that every workflow node implements
#[async_trait]
pub trait Task: Send + Sync {
    /// Unique identifier for this task
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Execute the task against a read-only snapshot of the record
    async fn run(&self, state: &OutfitState) -> Result<TaskResult>;
}
