use async_trait::async_trait;
use tracing::info;

use crate::{
    error::Result,
    gate::ACCEPT_RATING,
    state::{OutfitState, StateUpdate},
    task::{Task, TaskResult},
};

/// Final user-facing message for a finished session.
pub fn compose_result(state: &OutfitState) -> String {
    if state.rating >= ACCEPT_RATING {
        format!(
            "Perfect outfit found after {} attempt(s)! 🎉\n\nFinal Recommendation:\n{}",
            state.attempts, state.recommendation
        )
    } else {
        format!(
            "Sorry, we couldn't find the perfect outfit after {} attempts. 💔\n\nLast Recommendation:\n{}",
            state.max_attempts, state.recommendation
        )
    }
}

/// Terminal task that writes the result message
pub struct GenerateResultTask;

#[async_trait]
impl Task for GenerateResultTask {
    async fn run(&self, state: &OutfitState) -> Result<TaskResult> {
        let accepted = state.rating >= ACCEPT_RATING;
        info!(
            task_id = %self.id(),
            rating = state.rating,
            attempts = state.attempts,
            accepted,
            "Composing final result"
        );

        let status = if accepted {
            format!("Outfit accepted after {} attempt(s)", state.attempts)
        } else {
            format!("Attempt budget of {} exhausted", state.max_attempts)
        };

        Ok(TaskResult::new_with_status(
            StateUpdate::new()
                .result_message(compose_result(state))
                .log("Node: generate_result - Creating final message"),
            Some(status),
        ))
    }
}
