use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::FileStorage;
use crate::application::services::DocumentProcessorService;
use crate::domain::entities::Document;
use crate::domain::repositories::{DocumentRepository, document_repository::DocumentRepositoryError};
use crate::domain::value_objects::{DocumentKind, FileHash};

#[derive(Debug, thiserror::Error)]
pub enum UploadDocumentsError {
    #[error("No files were provided")]
    NoFiles,
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl From<DocumentRepositoryError> for UploadDocumentsError {
    fn from(error: DocumentRepositoryError) -> Self {
        UploadDocumentsError::RepositoryError(error.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentsRequest {
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Indexed { document_id: Uuid, chunks: usize },
    Skipped { reason: String },
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct UploadResult {
    pub file_name: String,
    pub outcome: UploadOutcome,
}

#[derive(Debug, Clone)]
pub struct UploadDocumentsResponse {
    pub results: Vec<UploadResult>,
}

impl UploadDocumentsResponse {
    pub fn indexed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, UploadOutcome::Indexed { .. }))
            .count()
    }
}

/// Stores each upload and appends its chunks to the vector store.
///
/// A file whose name or content is already indexed is skipped. A file that
/// fails to process leaves no trace, so it can be uploaded again.
pub struct UploadDocumentsUseCase {
    document_repository: Arc<dyn DocumentRepository>,
    file_storage: Arc<dyn FileStorage>,
    processor: Arc<DocumentProcessorService>,
}

impl UploadDocumentsUseCase {
    pub fn new(
        document_repository: Arc<dyn DocumentRepository>,
        file_storage: Arc<dyn FileStorage>,
        processor: Arc<DocumentProcessorService>,
    ) -> Self {
        Self {
            document_repository,
            file_storage,
            processor,
        }
    }

    pub async fn execute(
        &self,
        request: UploadDocumentsRequest,
    ) -> Result<UploadDocumentsResponse, UploadDocumentsError> {
        if request.files.is_empty() {
            return Err(UploadDocumentsError::NoFiles);
        }

        let mut results = Vec::with_capacity(request.files.len());

        for file in request.files {
            let file_name = file.file_name.trim().to_string();
            let outcome = self.upload_one(&file_name, file.data).await?;

            match &outcome {
                UploadOutcome::Indexed { chunks, .. } => {
                    tracing::info!(file = %file_name, chunks, "Indexed document");
                }
                UploadOutcome::Skipped { reason } => {
                    tracing::warn!(file = %file_name, "Skipped upload: {}", reason);
                }
                UploadOutcome::Failed { reason } => {
                    tracing::error!(file = %file_name, "Failed to index document: {}", reason);
                }
            }

            results.push(UploadResult { file_name, outcome });
        }

        Ok(UploadDocumentsResponse { results })
    }

    async fn upload_one(
        &self,
        file_name: &str,
        data: Vec<u8>,
    ) -> Result<UploadOutcome, UploadDocumentsError> {
        if file_name.is_empty() {
            return Ok(UploadOutcome::Failed {
                reason: "File name cannot be empty".to_string(),
            });
        }

        let Some(kind) = DocumentKind::from_file_name(file_name) else {
            return Ok(UploadOutcome::Failed {
                reason: format!("Unsupported file type: {}", file_name),
            });
        };

        if data.is_empty() {
            return Ok(UploadOutcome::Failed {
                reason: "File is empty".to_string(),
            });
        }

        if self.document_repository.find_by_name(file_name).await?.is_some() {
            return Ok(UploadOutcome::Skipped {
                reason: format!("{} has already been uploaded", file_name),
            });
        }

        let file_hash = FileHash::of(&data);
        if let Some(existing) = self
            .document_repository
            .find_by_hash(file_hash.as_str())
            .await?
        {
            return Ok(UploadOutcome::Skipped {
                reason: format!("Same content as {}", existing.file_name()),
            });
        }

        let document_id = Uuid::new_v4();
        let stored_file = self
            .file_storage
            .store_file(document_id, &data)
            .await
            .map_err(|e| UploadDocumentsError::StorageError(e.to_string()))?;

        let mut document = Document::new(
            document_id,
            file_name.to_string(),
            stored_file.path,
            data.len() as i64,
            kind,
            file_hash,
        );
        document
            .start_processing()
            .map_err(UploadDocumentsError::RepositoryError)?;

        if let Err(e) = self.document_repository.save(&document).await {
            self.discard_file(document_id).await;
            return Err(e.into());
        }

        match self.processor.process_document(&document, &data).await {
            Ok(outcome) => {
                document
                    .complete_processing(outcome.metadata)
                    .map_err(UploadDocumentsError::RepositoryError)?;
                self.document_repository.update(&document).await?;

                Ok(UploadOutcome::Indexed {
                    document_id,
                    chunks: outcome.chunks_created,
                })
            }
            Err(e) => {
                if let Err(delete_error) = self.document_repository.delete(document_id).await {
                    tracing::warn!(
                        %document_id,
                        "Failed to roll back document row: {}",
                        delete_error
                    );
                }
                self.discard_file(document_id).await;

                Ok(UploadOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn discard_file(&self, document_id: Uuid) {
        if let Err(e) = self.file_storage.delete_file(document_id).await {
            tracing::warn!(%document_id, "Failed to remove stored upload: {}", e);
        }
    }
}
