use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::{
    completion::TextCompletion,
    error::{FlowError, Result},
    state::{OutfitRequest, OutfitState, StateUpdate, Weather},
    task::{Task, TaskResult},
};

/// Recommendation used when the completion service fails
pub const APOLOGY: &str = "Sorry, I couldn't generate a recommendation due to an error.";

/// Build the stylist prompt for the given attempt number (1-based).
pub fn outfit_prompt(request: &OutfitRequest, weather: &Weather, attempt: u32) -> String {
    let OutfitRequest {
        height,
        gender,
        location,
        occasion,
        mood,
    } = request;
    let previous = attempt.saturating_sub(1);
    let weather = weather.summary();

    format!(
        r#"You are a fashion stylist AI. Generate a specific and actionable outfit recommendation for the following user profile and context.
Be creative but practical. Output only the outfit recommendation, nothing else.

User Profile:
- Height: {height}
- Gender: {gender}

Context:
- Location: {location}
- Occasion: {occasion}
- Desired Mood: {mood}
- Current Weather: {weather}

Previous Attempt Number: {previous} (if > 0, try something different from previous attempts if possible).

Outfit Recommendation:"#
    )
}

/// Asks the completion service for one outfit recommendation
pub struct GenerateOutfitTask {
    completion: Arc<dyn TextCompletion>,
}

impl GenerateOutfitTask {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self { completion }
    }
}

#[async_trait]
impl Task for GenerateOutfitTask {
    async fn run(&self, state: &OutfitState) -> Result<TaskResult> {
        let weather = state
            .weather
            .as_ref()
            .ok_or_else(|| FlowError::TaskExecutionFailed("weather not found in state".into()))?;

        let attempt = state.attempts + 1;
        let request = &state.request;
        let prompt = outfit_prompt(request, weather, attempt);

        info!(
            task_id = %self.id(),
            attempt,
            max_attempts = state.max_attempts,
            model = %self.completion.name(),
            "Generating outfit recommendation"
        );
        let mut update = StateUpdate::new().attempts(attempt).log(format!(
            "Node: generate_outfit - Attempt: {attempt} - Calling LLM ({}) with prompt for {}, {}, {}",
            self.completion.name(),
            request.gender,
            request.occasion,
            request.mood
        ));

        let recommendation = match self.completion.complete(&prompt).await {
            Ok(response) => {
                let recommendation = response.trim().to_string();
                info!(attempt, length = recommendation.len(), "Recommendation generated");
                update = update.log(format!(
                    "Node: generate_outfit - LLM generated recommendation (length: {})",
                    recommendation.len()
                ));
                recommendation
            }
            Err(e) => {
                error!(attempt, error = %e, "Completion service failed");
                update = update.log(format!("Node: generate_outfit - Error: {e}"));
                APOLOGY.to_string()
            }
        };

        Ok(TaskResult::new_with_status(
            update.recommendation(recommendation),
            Some(format!(
                "Recommendation {attempt} of {} ready, waiting for rating",
                state.max_attempts
            )),
        ))
    }
}
