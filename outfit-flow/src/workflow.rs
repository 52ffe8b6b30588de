use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    completion::TextCompletion,
    error::{FlowError, Result},
    gate::{Decision, decide, decision_log},
    state::StateUpdate,
    storage::Session,
    task::Task,
    tasks::{FetchWeatherTask, GenerateOutfitTask, GenerateResultTask},
    weather::WeatherProvider,
};

/// Position of a session in the recommendation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    FetchWeather,
    Generate,
    AwaitRating,
    Done,
}

/// Status of workflow execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    /// A recommendation is out and the user has to rate it
    WaitingForInput,
    /// The result message has been composed
    Completed,
}

#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub response: Option<String>,
    pub status: ExecutionStatus,
}

impl ExecutionResult {
    fn waiting(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
            status: ExecutionStatus::WaitingForInput,
        }
    }

    fn completed(response: Option<String>) -> Self {
        Self {
            response,
            status: ExecutionStatus::Completed,
        }
    }
}

/// Fixed four-step loop: fetch weather, generate, await rating, done.
pub struct Workflow {
    pub id: String,
    fetch_weather: Arc<dyn Task>,
    generate_outfit: Arc<dyn Task>,
    generate_result: Arc<dyn Task>,
}

impl Workflow {
    /// The standard wiring over the given collaborators
    pub fn standard(weather: Arc<dyn WeatherProvider>, completion: Arc<dyn TextCompletion>) -> Result<Self> {
        WorkflowBuilder::new("outfit_flow")
            .fetch_weather(Arc::new(FetchWeatherTask::new(weather)))
            .generate_outfit(Arc::new(GenerateOutfitTask::new(completion)))
            .generate_result(Arc::new(GenerateResultTask))
            .build()
    }

    /// Drive the session forward until it needs a rating or is finished.
    ///
    /// A session waiting for a rating that has none yet is returned as-is.
    pub async fn execute_session(&self, session: &mut Session) -> Result<ExecutionResult> {
        loop {
            match session.step {
                Step::FetchWeather => {
                    run_task(self.fetch_weather.as_ref(), session).await?;
                    session.step = Step::Generate;
                }
                Step::Generate => {
                    run_task(self.generate_outfit.as_ref(), session).await?;
                    session.step = Step::AwaitRating;
                    return Ok(ExecutionResult::waiting(&session.state.recommendation));
                }
                Step::AwaitRating => {
                    if !session.state.is_rated() {
                        return Ok(ExecutionResult::waiting(&session.state.recommendation));
                    }

                    let state = &session.state;
                    let (rating, attempts, max_attempts) = (state.rating, state.attempts, state.max_attempts);
                    let decision = decide(rating, attempts, max_attempts);
                    info!(
                        session_id = %session.id,
                        rating,
                        attempts,
                        max_attempts,
                        decision = ?decision,
                        "Rating evaluated"
                    );

                    let update = StateUpdate::new().logs(decision_log(rating, attempts, max_attempts, decision));
                    match decision {
                        Decision::Retry => {
                            // next recommendation starts unrated
                            session.state.apply(update.rating(0))?;
                            session.step = Step::Generate;
                        }
                        Decision::Finish => {
                            session.state.apply(update)?;
                            run_task(self.generate_result.as_ref(), session).await?;
                            session.step = Step::Done;
                            return Ok(ExecutionResult::completed(session.state.result_message.clone()));
                        }
                    }
                }
                Step::Done => {
                    return Ok(ExecutionResult::completed(session.state.result_message.clone()));
                }
            }
        }
    }
}

async fn run_task(task: &dyn Task, session: &mut Session) -> Result<()> {
    info!(session_id = %session.id, task_id = %task.id(), "Running task");
    let result = task.run(&session.state).await?;
    session.state.apply(result.update)?;
    if result.status_message.is_some() {
        session.status_message = result.status_message;
    }
    Ok(())
}

/// Builder for wiring custom tasks into the loop
pub struct WorkflowBuilder {
    id: String,
    fetch_weather: Option<Arc<dyn Task>>,
    generate_outfit: Option<Arc<dyn Task>>,
    generate_result: Option<Arc<dyn Task>>,
}

impl WorkflowBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fetch_weather: None,
            generate_outfit: None,
            generate_result: None,
        }
    }

    pub fn fetch_weather(mut self, task: Arc<dyn Task>) -> Self {
        self.fetch_weather = Some(task);
        self
    }

    pub fn generate_outfit(mut self, task: Arc<dyn Task>) -> Self {
        self.generate_outfit = Some(task);
        self
    }

    pub fn generate_result(mut self, task: Arc<dyn Task>) -> Self {
        self.generate_result = Some(task);
        self
    }

    pub fn build(self) -> Result<Workflow> {
        Ok(Workflow {
            id: self.id,
            fetch_weather: self
                .fetch_weather
                .ok_or(FlowError::MissingTask(Step::FetchWeather))?,
            generate_outfit: self
                .generate_outfit
                .ok_or(FlowError::MissingTask(Step::Generate))?,
            generate_result: self
                .generate_result
                .ok_or(FlowError::MissingTask(Step::Done))?,
        })
    }
}
