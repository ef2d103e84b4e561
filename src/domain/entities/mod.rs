pub mod chat_message;
pub mod chat_session;
pub mod content_chunk;
pub mod document;
pub mod embedding;

pub use chat_message::{ChatMessage, MessageRole};
pub use chat_session::ChatSession;
pub use content_chunk::ContentChunk;
pub use document::Document;
pub use embedding::Embedding;
