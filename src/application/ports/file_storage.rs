use async_trait::async_trait;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("IO error: {0}")]
    IoError(String),
}

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: Uuid,
    pub path: String,
    pub size: u64,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store_file(&self, id: Uuid, data: &[u8]) -> Result<StoredFile, FileStorageError>;

    async fn delete_file(&self, id: Uuid) -> Result<bool, FileStorageError>;

    /// Removes every stored upload and returns how many were deleted.
    async fn delete_all(&self) -> Result<u64, FileStorageError>;
}
