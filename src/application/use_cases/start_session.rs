use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::ChatSession;
use crate::domain::repositories::ChatSessionRepository;

#[derive(Debug, thiserror::Error)]
pub enum StartSessionError {
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[derive(Debug, Clone)]
pub struct StartSessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

pub struct StartSessionUseCase {
    session_repository: Arc<dyn ChatSessionRepository>,
}

impl StartSessionUseCase {
    pub fn new(session_repository: Arc<dyn ChatSessionRepository>) -> Self {
        Self { session_repository }
    }

    pub async fn execute(&self) -> Result<StartSessionResponse, StartSessionError> {
        let session = ChatSession::new();

        self.session_repository
            .save(&session)
            .await
            .map_err(|e| StartSessionError::RepositoryError(e.to_string()))?;

        tracing::debug!(session_id = %session.id(), "Started chat session");

        Ok(StartSessionResponse {
            session_id: session.id(),
            created_at: session.created_at(),
        })
    }
}
