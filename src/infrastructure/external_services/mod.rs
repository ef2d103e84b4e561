pub mod document_extractors;
pub mod openai_client;
pub mod text_splitting;

pub use document_extractors::CompositeDocumentExtractor;
pub use openai_client::{OpenAiClient, OpenAiClientConfig};
pub use text_splitting::RecursiveCharacterSplitter;
