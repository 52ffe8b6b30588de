//! FlowRunner – loads a session, drives it until it needs the user again, and
//! persists it back to storage.
//!
//! Every web request or terminal round trip maps to one call:
//! * [`FlowRunner::start`] creates a session and runs it up to the first
//!   recommendation.
//! * [`FlowRunner::submit_rating`] records a rating and runs the gate, which
//!   either produces the next recommendation or the final result.
//!
//! Each session owns its record exclusively; concurrent sessions never share
//! state. Calls for the same session are serialised so that one call's save
//! cannot overwrite another's.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

use crate::{
    error::{FlowError, Result},
    state::OutfitRequest,
    storage::{Session, SessionStorage},
    workflow::{ExecutionResult, Workflow},
};

/// High-level helper that orchestrates the _load → execute → save_ pattern.
#[derive(Clone)]
pub struct FlowRunner {
    workflow: Arc<Workflow>,
    storage: Arc<dyn SessionStorage>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl FlowRunner {
    pub fn new(workflow: Arc<Workflow>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            workflow,
            storage,
            locks: Arc::new(DashMap::new()),
        }
    }

    /// Create a session for `request` and run it to the first recommendation.
    pub async fn start(&self, request: OutfitRequest, max_attempts: u32) -> Result<(String, ExecutionResult)> {
        let mut session = Session::new(request, max_attempts);
        let session_id = session.id.clone();
        info!(session_id = %session_id, max_attempts, "Session created");

        let result = self.workflow.execute_session(&mut session).await?;
        self.storage.save(session).await?;

        Ok((session_id, result))
    }

    /// Run whatever the session's current step calls for.
    pub async fn run(&self, session_id: &str) -> Result<ExecutionResult> {
        let _guard = self.lock(session_id).await;
        let mut session = self.load(session_id).await?;
        let result = self.workflow.execute_session(&mut session).await?;
        self.storage.save(session).await?;
        Ok(result)
    }

    /// Record the user's rating and continue the loop.
    pub async fn submit_rating(&self, session_id: &str, rating: i64) -> Result<ExecutionResult> {
        let _guard = self.lock(session_id).await;
        let mut session = self.load(session_id).await?;
        session.state.set_rating(rating)?;
        info!(session_id = %session_id, rating, "Rating submitted");

        let result = self.workflow.execute_session(&mut session).await?;
        self.storage.save(session).await?;
        Ok(result)
    }

    /// Current snapshot of a session
    pub async fn session(&self, session_id: &str) -> Result<Session> {
        self.load(session_id).await
    }

    /// Held across load → execute → save
    async fn lock(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_default()
            .clone();
        lock.lock_owned().await
    }

    async fn load(&self, session_id: &str) -> Result<Session> {
        self.storage
            .get(session_id)
            .await?
            .ok_or_else(|| FlowError::SessionNotFound(session_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        completion::TextCompletion, state::sample_request, storage::InMemorySessionStorage,
        weather::StaticWeather, workflow::{ExecutionStatus, Step},
    };
    use async_trait::async_trait;
    use std::time::Duration;

    struct SlowStylist;

    #[async_trait]
    impl TextCompletion for SlowStylist {
        fn name(&self) -> &str {
            "slow"
        }

        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok("Linen shirt and chinos".to_string())
        }
    }

    #[tokio::test]
    async fn concurrent_ratings_cannot_undo_a_finished_session() {
        let workflow = Workflow::standard(Arc::new(StaticWeather::default()), Arc::new(SlowStylist)).unwrap();
        let runner = FlowRunner::new(Arc::new(workflow), Arc::new(InMemorySessionStorage::new()));
        let (session_id, _) = runner.start(sample_request("Pune"), 5).await.unwrap();

        let (low, high) = tokio::join!(
            runner.submit_rating(&session_id, 3),
            runner.submit_rating(&session_id, 9)
        );
        assert_eq!(low.unwrap().status, ExecutionStatus::WaitingForInput);
        assert_eq!(high.unwrap().status, ExecutionStatus::Completed);

        let session = runner.session(&session_id).await.unwrap();
        assert_eq!(session.step, Step::Done);
        assert_eq!(session.state.attempts, 2);
        assert!(session.state.result_message.is_some());
    }

    #[tokio::test]
    async fn rating_after_completion_is_rejected_while_serialised() {
        let workflow = Workflow::standard(Arc::new(StaticWeather::default()), Arc::new(SlowStylist)).unwrap();
        let runner = FlowRunner::new(Arc::new(workflow), Arc::new(InMemorySessionStorage::new()));
        let (session_id, _) = runner.start(sample_request("Delhi"), 5).await.unwrap();

        let (first, second) = tokio::join!(
            runner.submit_rating(&session_id, 8),
            runner.submit_rating(&session_id, 2)
        );
        assert_eq!(first.unwrap().status, ExecutionStatus::Completed);
        assert_eq!(second.unwrap_err(), FlowError::Finalized);

        let session = runner.session(&session_id).await.unwrap();
        assert_eq!(session.step, Step::Done);
        assert_eq!(session.state.rating, 8);
    }
}
