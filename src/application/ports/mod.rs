pub mod chat_model;
pub mod document_extractor;
pub mod embedding_provider;
pub mod file_storage;
pub mod text_splitter;

pub use chat_model::ChatModel;
pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use file_storage::FileStorage;
pub use text_splitter::TextSplitter;
