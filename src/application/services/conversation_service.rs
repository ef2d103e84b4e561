use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::ChatModel;
use crate::application::services::prompts;
use crate::application::services::retrieval_service::{RetrievalService, RetrievedPassage};
use crate::domain::entities::ChatSession;
use crate::domain::repositories::chat_session_repository::ChatSessionRepositoryError;
use crate::domain::repositories::{ChatSessionRepository, ChunkRepository};
use crate::domain::value_objects::{SourceReference, format_sources};

pub const EMPTY_STORE_ANSWER: &str = "Please upload some documents first.";

#[derive(Debug, thiserror::Error)]
pub enum ConversationError {
    #[error("Question must not be empty")]
    EmptyQuestion,
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),
    #[error("Retrieval error: {0}")]
    RetrievalError(String),
    #[error("Chat model error: {0}")]
    ModelError(String),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[derive(Debug, Clone)]
pub struct ConversationAnswer {
    pub answer: String,
    pub sources: Vec<SourceReference>,
    pub formatted_sources: String,
    pub standalone_question: String,
    pub passages: Vec<RetrievedPassage>,
}

/// Conversational retrieval: condense the follow-up, retrieve, answer, remember.
pub struct ConversationService {
    chat_model: Arc<dyn ChatModel>,
    retrieval_service: Arc<RetrievalService>,
    chunk_repository: Arc<dyn ChunkRepository>,
    session_repository: Arc<dyn ChatSessionRepository>,
    memory_window: usize,
}

impl ConversationService {
    pub fn new(
        chat_model: Arc<dyn ChatModel>,
        retrieval_service: Arc<RetrievalService>,
        chunk_repository: Arc<dyn ChunkRepository>,
        session_repository: Arc<dyn ChatSessionRepository>,
        memory_window: usize,
    ) -> Self {
        Self {
            chat_model,
            retrieval_service,
            chunk_repository,
            session_repository,
            memory_window,
        }
    }

    pub async fn ask(
        &self,
        session_id: Uuid,
        question: &str,
    ) -> Result<ConversationAnswer, ConversationError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ConversationError::EmptyQuestion);
        }

        let session = self.load_session(session_id).await?;

        let indexed_chunks = self
            .chunk_repository
            .count()
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))?;

        if indexed_chunks == 0 {
            self.remember(&session, question, EMPTY_STORE_ANSWER, Vec::new()).await?;

            return Ok(ConversationAnswer {
                answer: EMPTY_STORE_ANSWER.to_string(),
                sources: Vec::new(),
                formatted_sources: String::new(),
                standalone_question: question.to_string(),
                passages: Vec::new(),
            });
        }

        let history = session.recent_exchanges(self.memory_window);

        let standalone_question = if history.is_empty() {
            question.to_string()
        } else {
            let condensed = self
                .chat_model
                .complete(&prompts::condense_prompt(&history, question))
                .await
                .map_err(|e| ConversationError::ModelError(e.to_string()))?;
            let condensed = condensed.trim();
            if condensed.is_empty() {
                question.to_string()
            } else {
                condensed.to_string()
            }
        };

        let passages = self
            .retrieval_service
            .retrieve(&standalone_question)
            .await
            .map_err(|e| ConversationError::RetrievalError(e.to_string()))?;

        let context: Vec<&str> = passages.iter().map(|p| p.chunk.chunk_text()).collect();
        let answer = self
            .chat_model
            .complete(&prompts::qa_prompt(&context, &standalone_question, &history))
            .await
            .map_err(|e| ConversationError::ModelError(e.to_string()))?;

        let sources = unique_sources(&passages);
        self.remember(&session, question, &answer, sources.clone()).await?;

        tracing::info!(
            session_id = %session_id,
            passages = passages.len(),
            model = self.chat_model.model_name(),
            "Answered question"
        );

        Ok(ConversationAnswer {
            formatted_sources: format_sources(&sources),
            answer,
            sources,
            standalone_question,
            passages,
        })
    }

    async fn load_session(&self, session_id: Uuid) -> Result<ChatSession, ConversationError> {
        self.session_repository
            .find_by_id(session_id)
            .await
            .map_err(|e| ConversationError::RepositoryError(e.to_string()))?
            .ok_or(ConversationError::SessionNotFound(session_id))
    }

    /// Appends the exchange to the stored session. An exchange that raced a
    /// history clear is answered but not remembered.
    async fn remember(
        &self,
        session: &ChatSession,
        question: &str,
        answer: &str,
        sources: Vec<SourceReference>,
    ) -> Result<(), ConversationError> {
        let appended = self
            .session_repository
            .append_exchange(session.id(), session.generation(), question, answer, sources)
            .await
            .map_err(|e| match e {
                ChatSessionRepositoryError::NotFound(id) => ConversationError::SessionNotFound(id),
                other => ConversationError::RepositoryError(other.to_string()),
            })?;

        if !appended {
            tracing::warn!(
                session_id = %session.id(),
                "History was cleared while answering; exchange not recorded"
            );
        }
        Ok(())
    }
}

/// Citations in retrieval order; the same page cited twice is listed once.
fn unique_sources(passages: &[RetrievedPassage]) -> Vec<SourceReference> {
    let mut sources: Vec<SourceReference> = Vec::new();
    for passage in passages {
        let source = passage.chunk.source_reference();
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    sources
}
