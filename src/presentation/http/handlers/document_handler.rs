use axum::{
    Json,
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::{
    ClearDocumentsUseCase, GetDocumentStatsUseCase, ListDocumentsUseCase, UploadDocumentsUseCase,
    list_documents::{ListDocumentsError, ListDocumentsRequest},
    upload_documents::{UploadDocumentsError, UploadDocumentsRequest, UploadOutcome, UploadedFile},
};
use crate::presentation::http::dto::{
    ApiResponse, ClearDocumentsResponseDto, DocumentListResponseDto, DocumentResponseDto,
    DocumentStatsDto, PaginationDto, PaginationMetaDto, UploadResponseDto, UploadResultDto,
};

pub struct DocumentHandler {
    upload_documents_use_case: Arc<UploadDocumentsUseCase>,
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    document_stats_use_case: Arc<GetDocumentStatsUseCase>,
    clear_documents_use_case: Arc<ClearDocumentsUseCase>,
}

impl DocumentHandler {
    pub fn new(
        upload_documents_use_case: Arc<UploadDocumentsUseCase>,
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        document_stats_use_case: Arc<GetDocumentStatsUseCase>,
        clear_documents_use_case: Arc<ClearDocumentsUseCase>,
    ) -> Self {
        Self {
            upload_documents_use_case,
            list_documents_use_case,
            document_stats_use_case,
            clear_documents_use_case,
        }
    }

    /// Every multipart field carrying a file name is treated as one upload.
    pub async fn upload_documents(
        State(handler): State<Arc<DocumentHandler>>,
        mut multipart: Multipart,
    ) -> impl IntoResponse {
        let mut files = Vec::new();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ApiResponse::<UploadResponseDto>::error(
                            "INVALID_MULTIPART",
                            e.to_string(),
                            None,
                        )),
                    );
                }
            };

            let Some(file_name) = field.file_name().map(str::to_string) else {
                continue;
            };

            match field.bytes().await {
                Ok(data) => files.push(UploadedFile {
                    file_name,
                    data: data.to_vec(),
                }),
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ApiResponse::error(
                            "INVALID_MULTIPART",
                            e.to_string(),
                            Some(file_name),
                        )),
                    );
                }
            }
        }

        match handler
            .upload_documents_use_case
            .execute(UploadDocumentsRequest { files })
            .await
        {
            Ok(response) if response.indexed_count() > 0 => {
                let dto = UploadResponseDto {
                    indexed: response.indexed_count(),
                    results: response
                        .results
                        .into_iter()
                        .map(UploadResultDto::from)
                        .collect(),
                };
                (StatusCode::OK, Json(ApiResponse::success(dto)))
            }
            Ok(response) => {
                let has_failures = response
                    .results
                    .iter()
                    .any(|r| matches!(r.outcome, UploadOutcome::Failed { .. }));
                let details = response
                    .results
                    .into_iter()
                    .map(UploadResultDto::from)
                    .map(|r| format!("{}: {}", r.file_name, r.reason.unwrap_or_default()))
                    .collect::<Vec<_>>()
                    .join("; ");

                let (status, code) = if has_failures {
                    (StatusCode::BAD_REQUEST, "UPLOAD_FAILED")
                } else {
                    (StatusCode::CONFLICT, "NOTHING_TO_INDEX")
                };

                (
                    status,
                    Json(ApiResponse::error(
                        code,
                        "No new documents were indexed".to_string(),
                        Some(details),
                    )),
                )
            }
            Err(e @ UploadDocumentsError::NoFiles) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("NO_FILE_PROVIDED", e.to_string(), None)),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("UPLOAD_FAILED", e.to_string(), None)),
            ),
        }
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
        Query(pagination): Query<PaginationDto>,
    ) -> impl IntoResponse {
        let request = ListDocumentsRequest {
            skip: pagination.skip,
            limit: pagination.limit,
        };

        match handler.list_documents_use_case.execute(request).await {
            Ok(response) => {
                let dto = DocumentListResponseDto {
                    documents: response
                        .documents
                        .into_iter()
                        .map(DocumentResponseDto::from)
                        .collect(),
                    meta: PaginationMetaDto {
                        offset: response.skip,
                        limit: response.limit,
                        total: response.total_count,
                    },
                };

                (StatusCode::OK, Json(ApiResponse::success(dto)))
            }
            Err(e @ ListDocumentsError::ValidationError(_)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INVALID_PAGINATION", e.to_string(), None)),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("LIST_FAILED", e.to_string(), None)),
            ),
        }
    }

    pub async fn get_stats(State(handler): State<Arc<DocumentHandler>>) -> impl IntoResponse {
        match handler.document_stats_use_case.execute().await {
            Ok(stats) => (
                StatusCode::OK,
                Json(ApiResponse::success(DocumentStatsDto::from(stats))),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("STATS_FAILED", e.to_string(), None)),
            ),
        }
    }

    pub async fn clear_documents(State(handler): State<Arc<DocumentHandler>>) -> impl IntoResponse {
        match handler.clear_documents_use_case.execute().await {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(ClearDocumentsResponseDto::from(
                    response,
                ))),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("CLEAR_FAILED", e.to_string(), None)),
            ),
        }
    }
}
