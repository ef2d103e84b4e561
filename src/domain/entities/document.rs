use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{DocumentKind, DocumentMetadata, FileHash, ProcessingStatus};

/// An uploaded policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    file_name: String,
    file_path: String,
    file_size: i64,
    kind: DocumentKind,
    file_hash: FileHash,
    metadata: DocumentMetadata,
    processing_status: ProcessingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        id: Uuid,
        file_name: String,
        file_path: String,
        file_size: i64,
        kind: DocumentKind,
        file_hash: FileHash,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            file_name,
            file_path,
            file_size,
            kind,
            file_hash,
            metadata: DocumentMetadata::default(),
            processing_status: ProcessingStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a document loaded from storage without touching its timestamps.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        file_name: String,
        file_path: String,
        file_size: i64,
        kind: DocumentKind,
        file_hash: FileHash,
        metadata: DocumentMetadata,
        processing_status: ProcessingStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            file_name,
            file_path,
            file_size,
            kind,
            file_hash,
            metadata,
            processing_status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn file_size(&self) -> i64 {
        self.file_size
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn file_hash(&self) -> &FileHash {
        &self.file_hash
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn processing_status(&self) -> &ProcessingStatus {
        &self.processing_status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn start_processing(&mut self) -> Result<(), String> {
        self.transition(ProcessingStatus::Processing)
    }

    pub fn complete_processing(&mut self, metadata: DocumentMetadata) -> Result<(), String> {
        self.transition(ProcessingStatus::Completed)?;
        self.metadata.merge(metadata);
        Ok(())
    }

    pub fn is_indexed(&self) -> bool {
        self.processing_status.is_completed()
    }

    fn transition(&mut self, next: ProcessingStatus) -> Result<(), String> {
        if !self.processing_status.can_transition_to(&next) {
            return Err(format!(
                "Document {} cannot move from {} to {}",
                self.file_name, self.processing_status, next
            ));
        }

        self.processing_status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}
