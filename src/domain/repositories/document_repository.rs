use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Document;

#[derive(Debug, thiserror::Error)]
pub enum DocumentRepositoryError {
    #[error("Document not found: {0}")]
    NotFound(Uuid),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError>;
    async fn find_by_hash(&self, hash: &str) -> Result<Option<Document>, DocumentRepositoryError>;
    async fn find_by_name(&self, file_name: &str)
    -> Result<Option<Document>, DocumentRepositoryError>;
    async fn find_all(&self, skip: i64, limit: i64)
    -> Result<Vec<Document>, DocumentRepositoryError>;
    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError>;
    async fn delete_all(&self) -> Result<i64, DocumentRepositoryError>;
    async fn count(&self) -> Result<i64, DocumentRepositoryError>;
}
