pub mod conversation_service;
pub mod document_processor;
pub mod prompts;
pub mod retrieval_service;

pub use conversation_service::ConversationService;
pub use document_processor::DocumentProcessorService;
pub use retrieval_service::RetrievalService;
