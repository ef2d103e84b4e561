pub mod ask_question;
pub mod clear_documents;
pub mod document_stats;
pub mod get_chat_history;
pub mod list_documents;
pub mod start_session;
pub mod upload_documents;

pub use ask_question::AskQuestionUseCase;
pub use clear_documents::ClearDocumentsUseCase;
pub use document_stats::GetDocumentStatsUseCase;
pub use get_chat_history::GetChatHistoryUseCase;
pub use list_documents::ListDocumentsUseCase;
pub use start_session::StartSessionUseCase;
pub use upload_documents::UploadDocumentsUseCase;
