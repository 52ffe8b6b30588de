use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::Result,
    state::{OutfitRequest, OutfitState},
    workflow::Step,
};

/// One user's pass through the recommendation loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub step: Step,
    pub state: OutfitState,
    pub status_message: Option<String>,
}

impl Session {
    pub fn new(request: OutfitRequest, max_attempts: u32) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), request, max_attempts)
    }

    pub fn with_id(id: impl Into<String>, request: OutfitRequest, max_attempts: u32) -> Self {
        Self {
            id: id.into(),
            step: Step::FetchWeather,
            state: OutfitState::new(request, max_attempts),
            status_message: None,
        }
    }
}

/// Trait for storing and retrieving sessions
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn save(&self, session: Session) -> Result<()>;
    async fn get(&self, id: &str) -> Result<Option<Session>>;
    async fn delete(&self, id: &str) -> Result<()>;
}

/// In-memory implementation of SessionStorage
#[derive(Default)]
pub struct InMemorySessionStorage {
    sessions: Arc<DashMap<String, Session>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for InMemorySessionStorage {
    async fn save(&self, session: Session) -> Result<()> {
        self.sessions.insert(session.id.clone(), session);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Session>> {
        Ok(self.sessions.get(id).map(|entry| entry.clone()))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.sessions.remove(id);
        Ok(())
    }
}
