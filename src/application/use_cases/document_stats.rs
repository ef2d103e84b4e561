use std::sync::Arc;

use crate::domain::repositories::{ChunkRepository, DocumentRepository};

#[derive(Debug, thiserror::Error)]
pub enum DocumentStatsError {
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentStats {
    pub total_documents: i64,
    pub total_chunks: i64,
}

pub struct GetDocumentStatsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
}

impl GetDocumentStatsUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
    ) -> Self {
        Self {
            document_repository,
            chunk_repository,
        }
    }

    pub async fn execute(&self) -> Result<DocumentStats, DocumentStatsError> {
        let total_documents = self
            .document_repository
            .count()
            .await
            .map_err(|e| DocumentStatsError::RepositoryError(e.to_string()))?;

        let total_chunks = self
            .chunk_repository
            .count()
            .await
            .map_err(|e| DocumentStatsError::RepositoryError(e.to_string()))?;

        Ok(DocumentStats {
            total_documents,
            total_chunks,
        })
    }
}
