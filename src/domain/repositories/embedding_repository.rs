use async_trait::async_trait;
use pgvector::Vector;

use crate::domain::entities::{ContentChunk, Embedding};

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingRepositoryError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Vector error: {0}")]
    VectorError(String),
}

/// A stored chunk near the query, with the vector it was indexed under.
#[derive(Debug, Clone)]
pub struct SimilaritySearchResult {
    pub chunk: ContentChunk,
    pub embedding: Vector,
    pub similarity_score: f32,
}

#[async_trait]
pub trait EmbeddingRepository: Send + Sync {
    async fn save_batch(&self, embeddings: &[Embedding]) -> Result<(), EmbeddingRepositoryError>;

    /// Nearest chunks by cosine distance, closest first.
    async fn similarity_search(
        &self,
        query_vector: &Vector,
        limit: i64,
    ) -> Result<Vec<SimilaritySearchResult>, EmbeddingRepositoryError>;

    async fn count(&self) -> Result<i64, EmbeddingRepositoryError>;
    async fn delete_all(&self) -> Result<i64, EmbeddingRepositoryError>;
}
