use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ChatSession;
use crate::domain::value_objects::SourceReference;

#[derive(Debug, thiserror::Error)]
pub enum ChatSessionRepositoryError {
    #[error("Session not found: {0}")]
    NotFound(Uuid),
    #[error("Session store error: {0}")]
    StoreError(String),
}

#[async_trait]
pub trait ChatSessionRepository: Send + Sync {
    async fn save(&self, session: &ChatSession) -> Result<(), ChatSessionRepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChatSession>, ChatSessionRepositoryError>;
    /// Appends a question and its answer in place.
    ///
    /// Returns `false` without appending when the history was cleared after
    /// `generation` was read.
    async fn append_exchange(
        &self,
        id: Uuid,
        generation: u64,
        question: &str,
        answer: &str,
        sources: Vec<SourceReference>,
    ) -> Result<bool, ChatSessionRepositoryError>;
    /// Empties the history of every session, keeping the sessions themselves.
    async fn clear_all_history(&self) -> Result<usize, ChatSessionRepositoryError>;
}
