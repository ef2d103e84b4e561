use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::use_cases::{
    AskQuestionUseCase, GetChatHistoryUseCase, StartSessionUseCase,
    ask_question::AskQuestionError, get_chat_history::GetChatHistoryError,
};
use crate::presentation::http::dto::{
    AnswerResponseDto, ApiResponse, AskQuestionRequestDto, ChatHistoryResponseDto,
    SessionResponseDto,
};

pub struct ChatHandler {
    start_session_use_case: Arc<StartSessionUseCase>,
    ask_question_use_case: Arc<AskQuestionUseCase>,
    get_chat_history_use_case: Arc<GetChatHistoryUseCase>,
}

impl ChatHandler {
    pub fn new(
        start_session_use_case: Arc<StartSessionUseCase>,
        ask_question_use_case: Arc<AskQuestionUseCase>,
        get_chat_history_use_case: Arc<GetChatHistoryUseCase>,
    ) -> Self {
        Self {
            start_session_use_case,
            ask_question_use_case,
            get_chat_history_use_case,
        }
    }

    pub async fn start_session(State(handler): State<Arc<ChatHandler>>) -> impl IntoResponse {
        match handler.start_session_use_case.execute().await {
            Ok(response) => (
                StatusCode::CREATED,
                Json(ApiResponse::success(SessionResponseDto::from(response))),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("SESSION_FAILED", e.to_string(), None)),
            ),
        }
    }

    pub async fn ask_question(
        State(handler): State<Arc<ChatHandler>>,
        Path(session_id): Path<Uuid>,
        Json(request): Json<AskQuestionRequestDto>,
    ) -> impl IntoResponse {
        match handler
            .ask_question_use_case
            .execute(session_id, &request.question)
            .await
        {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(AnswerResponseDto::from(response))),
            ),
            Err(e) => {
                let (status, code) = match &e {
                    AskQuestionError::ValidationError(_) => {
                        (StatusCode::BAD_REQUEST, "INVALID_QUESTION")
                    }
                    AskQuestionError::SessionNotFound(_) => {
                        (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND")
                    }
                    AskQuestionError::UpstreamError(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
                    AskQuestionError::RepositoryError(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "QUESTION_FAILED")
                    }
                };

                tracing::error!(%session_id, "Failed to answer question: {}", e);
                (status, Json(ApiResponse::error(code, e.to_string(), None)))
            }
        }
    }

    pub async fn get_history(
        State(handler): State<Arc<ChatHandler>>,
        Path(session_id): Path<Uuid>,
    ) -> impl IntoResponse {
        match handler.get_chat_history_use_case.execute(session_id).await {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(ChatHistoryResponseDto::from(response))),
            ),
            Err(e @ GetChatHistoryError::SessionNotFound(_)) => (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error("SESSION_NOT_FOUND", e.to_string(), None)),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("HISTORY_FAILED", e.to_string(), None)),
            ),
        }
    }
}
