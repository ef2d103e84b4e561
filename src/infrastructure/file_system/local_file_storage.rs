use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::file_storage::{FileStorage, FileStorageError, StoredFile};

/// Keeps raw uploads on disk, one file per document id.
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))
    }

    fn get_file_path(&self, file_id: Uuid) -> PathBuf {
        self.base_path.join(file_id.to_string())
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store_file(&self, id: Uuid, data: &[u8]) -> Result<StoredFile, FileStorageError> {
        self.ensure_directory_exists().await?;

        let file_path = self.get_file_path(id);

        fs::write(&file_path, data)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))?;

        Ok(StoredFile {
            id,
            path: file_path.to_string_lossy().to_string(),
            size: data.len() as u64,
        })
    }

    async fn delete_file(&self, file_id: Uuid) -> Result<bool, FileStorageError> {
        match fs::remove_file(self.get_file_path(file_id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(FileStorageError::IoError(e.to_string())),
        }
    }

    async fn delete_all(&self) -> Result<u64, FileStorageError> {
        let mut entries = match fs::read_dir(&self.base_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(FileStorageError::IoError(e.to_string())),
        };

        let mut deleted = 0u64;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))?
        {
            let is_file = entry
                .file_type()
                .await
                .map_err(|e| FileStorageError::IoError(e.to_string()))?
                .is_file();

            // Only files named by a document id belong to this store.
            let owned = entry
                .file_name()
                .to_str()
                .is_some_and(|name| Uuid::parse_str(name).is_ok());

            if is_file && owned {
                fs::remove_file(entry.path())
                    .await
                    .map_err(|e| FileStorageError::IoError(e.to_string()))?;
                deleted += 1;
            }
        }

        Ok(deleted)
    }
}
