pub mod chat_session_repository;
pub mod chunk_repository;
pub mod document_repository;
pub mod embedding_repository;

pub use chat_session_repository::ChatSessionRepository;
pub use chunk_repository::ChunkRepository;
pub use document_repository::DocumentRepository;
pub use embedding_repository::EmbeddingRepository;
