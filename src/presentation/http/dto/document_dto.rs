use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::clear_documents::ClearDocumentsResponse;
use crate::application::use_cases::document_stats::DocumentStats;
use crate::application::use_cases::upload_documents::{UploadOutcome, UploadResult};
use crate::domain::entities::Document;

#[derive(Debug, Serialize)]
pub struct DocumentResponseDto {
    pub id: Uuid,
    pub file_name: String,
    pub kind: String,
    pub content_type: String,
    pub file_size: i64,
    pub file_hash: String,
    pub page_count: Option<i32>,
    pub title: Option<String>,
    pub processing_status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Document> for DocumentResponseDto {
    fn from(document: Document) -> Self {
        Self {
            id: document.id(),
            file_name: document.file_name().to_string(),
            kind: document.kind().as_str().to_string(),
            content_type: document.kind().content_type().to_string(),
            file_size: document.file_size(),
            file_hash: document.file_hash().to_string(),
            page_count: document.metadata().page_count,
            title: document.metadata().title.clone(),
            processing_status: document.processing_status().as_str().to_string(),
            created_at: document.created_at().to_rfc3339(),
            updated_at: document.updated_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaginationDto {
    #[serde(default = "default_skip")]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_skip() -> i64 {
    0
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct PaginationMetaDto {
    pub offset: i64,
    pub limit: i64,
    pub total: i64,
}

#[derive(Debug, Serialize)]
pub struct DocumentListResponseDto {
    pub documents: Vec<DocumentResponseDto>,
    pub meta: PaginationMetaDto,
}

#[derive(Debug, Serialize)]
pub struct UploadResultDto {
    pub file_name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<UploadResult> for UploadResultDto {
    fn from(result: UploadResult) -> Self {
        let (status, document_id, chunks, reason) = match result.outcome {
            UploadOutcome::Indexed {
                document_id,
                chunks,
            } => ("indexed", Some(document_id), Some(chunks), None),
            UploadOutcome::Skipped { reason } => ("skipped", None, None, Some(reason)),
            UploadOutcome::Failed { reason } => ("failed", None, None, Some(reason)),
        };

        Self {
            file_name: result.file_name,
            status: status.to_string(),
            document_id,
            chunks,
            reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponseDto {
    pub indexed: usize,
    pub results: Vec<UploadResultDto>,
}

#[derive(Debug, Serialize)]
pub struct DocumentStatsDto {
    pub total_documents: i64,
    pub total_chunks: i64,
}

impl From<DocumentStats> for DocumentStatsDto {
    fn from(stats: DocumentStats) -> Self {
        Self {
            total_documents: stats.total_documents,
            total_chunks: stats.total_chunks,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClearDocumentsResponseDto {
    pub documents_deleted: i64,
    pub chunks_deleted: i64,
    pub files_deleted: u64,
    pub sessions_cleared: usize,
    pub message: String,
}

impl From<ClearDocumentsResponse> for ClearDocumentsResponseDto {
    fn from(response: ClearDocumentsResponse) -> Self {
        Self {
            documents_deleted: response.documents_deleted,
            chunks_deleted: response.chunks_deleted,
            files_deleted: response.files_deleted,
            sessions_cleared: response.sessions_cleared,
            message: "All documents and chat history cleared".to_string(),
        }
    }
}
