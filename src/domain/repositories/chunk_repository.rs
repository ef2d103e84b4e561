use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::ContentChunk;

#[derive(Debug, thiserror::Error)]
pub enum ChunkRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

#[async_trait]
pub trait ChunkRepository: Send + Sync {
    async fn save_batch(&self, chunks: &[ContentChunk]) -> Result<(), ChunkRepositoryError>;
    async fn find_by_document_id(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<ContentChunk>, ChunkRepositoryError>;
    async fn count(&self) -> Result<i64, ChunkRepositoryError>;
    async fn delete_all(&self) -> Result<i64, ChunkRepositoryError>;
}
