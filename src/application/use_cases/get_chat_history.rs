use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::ChatMessage;
use crate::domain::repositories::ChatSessionRepository;

#[derive(Debug, thiserror::Error)]
pub enum GetChatHistoryError {
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[derive(Debug, Clone)]
pub struct ChatHistoryResponse {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessage>,
}

pub struct GetChatHistoryUseCase {
    session_repository: Arc<dyn ChatSessionRepository>,
}

impl GetChatHistoryUseCase {
    pub fn new(session_repository: Arc<dyn ChatSessionRepository>) -> Self {
        Self { session_repository }
    }

    pub async fn execute(&self, session_id: Uuid) -> Result<ChatHistoryResponse, GetChatHistoryError> {
        let session = self
            .session_repository
            .find_by_id(session_id)
            .await
            .map_err(|e| GetChatHistoryError::RepositoryError(e.to_string()))?
            .ok_or(GetChatHistoryError::SessionNotFound(session_id))?;

        Ok(ChatHistoryResponse {
            session_id,
            messages: session.messages().to_vec(),
        })
    }
}
