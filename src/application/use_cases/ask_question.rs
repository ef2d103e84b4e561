use std::sync::Arc;

use uuid::Uuid;

use crate::application::services::ConversationService;
use crate::application::services::conversation_service::ConversationError;
use crate::domain::value_objects::SourceReference;

#[derive(Debug, thiserror::Error)]
pub enum AskQuestionError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Upstream error: {0}")]
    UpstreamError(String),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<ConversationError> for AskQuestionError {
    fn from(error: ConversationError) -> Self {
        match error {
            ConversationError::EmptyQuestion => AskQuestionError::ValidationError(error.to_string()),
            ConversationError::SessionNotFound(id) => AskQuestionError::SessionNotFound(id),
            ConversationError::RetrievalError(_) | ConversationError::ModelError(_) => {
                AskQuestionError::UpstreamError(error.to_string())
            }
            ConversationError::RepositoryError(_) => {
                AskQuestionError::RepositoryError(error.to_string())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct AskQuestionResponse {
    pub answer: String,
    pub sources: Vec<SourceReference>,
    pub formatted_sources: String,
    pub standalone_question: String,
}

pub struct AskQuestionUseCase {
    conversation_service: Arc<ConversationService>,
}

impl AskQuestionUseCase {
    pub fn new(conversation_service: Arc<ConversationService>) -> Self {
        Self {
            conversation_service,
        }
    }

    pub async fn execute(
        &self,
        session_id: Uuid,
        question: &str,
    ) -> Result<AskQuestionResponse, AskQuestionError> {
        let answer = self.conversation_service.ask(session_id, question).await?;

        Ok(AskQuestionResponse {
            answer: answer.answer,
            sources: answer.sources,
            formatted_sources: answer.formatted_sources,
            standalone_question: answer.standalone_question,
        })
    }
}
