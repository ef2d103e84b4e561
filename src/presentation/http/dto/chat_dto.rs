use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::use_cases::ask_question::AskQuestionResponse;
use crate::application::use_cases::get_chat_history::ChatHistoryResponse;
use crate::application::use_cases::start_session::StartSessionResponse;
use crate::domain::entities::ChatMessage;
use crate::domain::value_objects::SourceReference;

#[derive(Debug, Deserialize)]
pub struct AskQuestionRequestDto {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct SourceDto {
    pub document_name: String,
    pub page_number: Option<i32>,
}

impl From<SourceReference> for SourceDto {
    fn from(source: SourceReference) -> Self {
        Self {
            document_name: source.document_name,
            page_number: source.page_number,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerResponseDto {
    pub answer: String,
    pub sources: Vec<SourceDto>,
    pub formatted_sources: String,
    pub standalone_question: String,
}

impl From<AskQuestionResponse> for AnswerResponseDto {
    fn from(response: AskQuestionResponse) -> Self {
        Self {
            answer: response.answer,
            sources: response.sources.into_iter().map(SourceDto::from).collect(),
            formatted_sources: response.formatted_sources,
            standalone_question: response.standalone_question,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponseDto {
    pub session_id: Uuid,
    pub created_at: String,
}

impl From<StartSessionResponse> for SessionResponseDto {
    fn from(response: StartSessionResponse) -> Self {
        Self {
            session_id: response.session_id,
            created_at: response.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessageDto {
    pub role: String,
    pub content: String,
    pub sources: Vec<SourceDto>,
    pub formatted_sources: String,
    pub created_at: String,
}

impl From<&ChatMessage> for ChatMessageDto {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role().as_str().to_string(),
            content: message.content().to_string(),
            sources: message
                .sources()
                .iter()
                .cloned()
                .map(SourceDto::from)
                .collect(),
            formatted_sources: message.formatted_sources(),
            created_at: message.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponseDto {
    pub session_id: Uuid,
    pub messages: Vec<ChatMessageDto>,
}

impl From<ChatHistoryResponse> for ChatHistoryResponseDto {
    fn from(response: ChatHistoryResponse) -> Self {
        Self {
            session_id: response.session_id,
            messages: response.messages.iter().map(ChatMessageDto::from).collect(),
        }
    }
}
