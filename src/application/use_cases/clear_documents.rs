use std::sync::Arc;

use crate::application::ports::FileStorage;
use crate::domain::repositories::{
    ChatSessionRepository, ChunkRepository, DocumentRepository, EmbeddingRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum ClearDocumentsError {
    #[error("Repository error: {0}")]
    RepositoryError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearDocumentsResponse {
    pub documents_deleted: i64,
    pub chunks_deleted: i64,
    pub files_deleted: u64,
    pub sessions_cleared: usize,
}

/// Empties the vector store, the stored uploads and every chat history.
pub struct ClearDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    embedding_repository: Arc<dyn EmbeddingRepository>,
    session_repository: Arc<dyn ChatSessionRepository>,
    file_storage: Arc<dyn FileStorage>,
}

impl ClearDocumentsUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        embedding_repository: Arc<dyn EmbeddingRepository>,
        session_repository: Arc<dyn ChatSessionRepository>,
        file_storage: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            document_repository,
            chunk_repository,
            embedding_repository,
            session_repository,
            file_storage,
        }
    }

    pub async fn execute(&self) -> Result<ClearDocumentsResponse, ClearDocumentsError> {
        self.embedding_repository
            .delete_all()
            .await
            .map_err(|e| ClearDocumentsError::RepositoryError(e.to_string()))?;
        let chunks_deleted = self
            .chunk_repository
            .delete_all()
            .await
            .map_err(|e| ClearDocumentsError::RepositoryError(e.to_string()))?;
        let documents_deleted = self
            .document_repository
            .delete_all()
            .await
            .map_err(|e| ClearDocumentsError::RepositoryError(e.to_string()))?;

        let files_deleted = self
            .file_storage
            .delete_all()
            .await
            .map_err(|e| ClearDocumentsError::StorageError(e.to_string()))?;

        let sessions_cleared = self
            .session_repository
            .clear_all_history()
            .await
            .map_err(|e| ClearDocumentsError::RepositoryError(e.to_string()))?;

        tracing::info!(
            documents_deleted,
            chunks_deleted,
            files_deleted,
            sessions_cleared,
            "Cleared all documents"
        );

        Ok(ClearDocumentsResponse {
            documents_deleted,
            chunks_deleted,
            files_deleted,
            sessions_cleared,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestHarness;

    #[tokio::test]
    async fn test_clears_store_files_and_history() {
        let harness = TestHarness::new();
        harness.index_texts(&[("a.txt", "Hail is covered.")]).await;

        let session = harness.start_session.execute().await.unwrap();
        harness.chat_model.push_reply("Yes.");
        harness
            .ask_question
            .execute(session.session_id, "Is hail covered?")
            .await
            .unwrap();

        let response = harness.clear_documents.execute().await.unwrap();

        assert_eq!(response.documents_deleted, 1);
        assert_eq!(response.chunks_deleted, 1);
        assert_eq!(response.files_deleted, 1);
        assert_eq!(response.sessions_cleared, 1);

        let stats = harness.document_stats.execute().await.unwrap();
        assert_eq!((stats.total_documents, stats.total_chunks), (0, 0));
        assert_eq!(harness.embeddings.count().await.unwrap(), 0);

        let history = harness
            .get_chat_history
            .execute(session.session_id)
            .await
            .unwrap();
        assert!(history.messages.is_empty());
    }

    #[tokio::test]
    async fn test_clearing_empty_store() {
        let harness = TestHarness::new();

        let response = harness.clear_documents.execute().await.unwrap();
        assert_eq!(response.documents_deleted, 0);
        assert_eq!(response.files_deleted, 0);
    }
}
