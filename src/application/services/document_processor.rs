use std::sync::Arc;

use crate::application::ports::document_extractor::ExtractedPage;
use crate::application::ports::{DocumentExtractor, EmbeddingProvider, TextSplitter};
use crate::domain::entities::{ContentChunk, Document, Embedding};
use crate::domain::repositories::{ChunkRepository, EmbeddingRepository};
use crate::domain::value_objects::DocumentMetadata;

#[derive(Debug, thiserror::Error)]
pub enum DocumentProcessingError {
    #[error("Extraction error: {0}")]
    ExtractionError(String),
    #[error("No text could be extracted from {0}")]
    NoText(String),
    #[error("Embedding error: {0}")]
    EmbeddingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

#[derive(Debug, Clone)]
pub struct ProcessingOutcome {
    pub chunks_created: usize,
    pub metadata: DocumentMetadata,
}

/// Load, split, embed and store one document.
pub struct DocumentProcessorService {
    document_extractor: Arc<dyn DocumentExtractor>,
    text_splitter: Arc<dyn TextSplitter>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    chunk_repository: Arc<dyn ChunkRepository>,
    embedding_repository: Arc<dyn EmbeddingRepository>,
}

impl DocumentProcessorService {
    const BATCH_SIZE: usize = 64;

    pub fn new(
        document_extractor: Arc<dyn DocumentExtractor>,
        text_splitter: Arc<dyn TextSplitter>,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        chunk_repository: Arc<dyn ChunkRepository>,
        embedding_repository: Arc<dyn EmbeddingRepository>,
    ) -> Self {
        Self {
            document_extractor,
            text_splitter,
            embedding_provider,
            chunk_repository,
            embedding_repository,
        }
    }

    /// Appends the document's chunks and vectors to the store. Nothing is
    /// written unless every chunk was embedded.
    pub async fn process_document(
        &self,
        document: &Document,
        data: &[u8],
    ) -> Result<ProcessingOutcome, DocumentProcessingError> {
        let extracted = self
            .document_extractor
            .extract(data, document.kind())
            .await
            .map_err(|e| DocumentProcessingError::ExtractionError(e.to_string()))?;

        for error in &extracted.metadata.extraction_errors {
            tracing::warn!(document = document.file_name(), "{}", error);
        }

        if extracted.is_blank() {
            return Err(DocumentProcessingError::NoText(
                document.file_name().to_string(),
            ));
        }

        let chunks = self.create_chunks(document, &extracted.pages);
        if chunks.is_empty() {
            return Err(DocumentProcessingError::NoText(
                document.file_name().to_string(),
            ));
        }

        let embeddings = self.generate_embeddings_for_chunks(&chunks).await?;

        self.chunk_repository
            .save_batch(&chunks)
            .await
            .map_err(|e| DocumentProcessingError::RepositoryError(e.to_string()))?;

        self.embedding_repository
            .save_batch(&embeddings)
            .await
            .map_err(|e| DocumentProcessingError::RepositoryError(e.to_string()))?;

        tracing::debug!(
            document = document.file_name(),
            chunks = chunks.len(),
            "Stored chunks and embeddings"
        );

        Ok(ProcessingOutcome {
            chunks_created: chunks.len(),
            metadata: extracted.metadata,
        })
    }

    fn create_chunks(&self, document: &Document, pages: &[ExtractedPage]) -> Vec<ContentChunk> {
        let mut chunks = Vec::new();
        let mut chunk_index = 0;

        for page in pages {
            for text in self.text_splitter.split_text(&page.text) {
                chunks.push(ContentChunk::new(
                    document.id(),
                    document.file_name().to_string(),
                    text,
                    chunk_index,
                    page.page_number,
                ));
                chunk_index += 1;
            }
        }

        chunks
    }

    async fn generate_embeddings_for_chunks(
        &self,
        chunks: &[ContentChunk],
    ) -> Result<Vec<Embedding>, DocumentProcessingError> {
        let expected_dimension = self.embedding_provider.embedding_dimension();
        let mut embeddings = Vec::with_capacity(chunks.len());

        for chunk_batch in chunks.chunks(Self::BATCH_SIZE) {
            let texts: Vec<String> = chunk_batch
                .iter()
                .map(|chunk| chunk.chunk_text().to_string())
                .collect();

            let batch_response = self
                .embedding_provider
                .generate_embeddings(&texts)
                .await
                .map_err(|e| DocumentProcessingError::EmbeddingError(e.to_string()))?;

            if batch_response.embeddings.len() != chunk_batch.len() {
                return Err(DocumentProcessingError::EmbeddingError(format!(
                    "Expected {} embeddings, received {}",
                    chunk_batch.len(),
                    batch_response.embeddings.len()
                )));
            }

            for (chunk, vector) in chunk_batch.iter().zip(batch_response.embeddings) {
                let dimension = vector.as_slice().len();
                if dimension != expected_dimension {
                    return Err(DocumentProcessingError::EmbeddingError(format!(
                        "Embedding has {} dimensions, expected {}",
                        dimension, expected_dimension
                    )));
                }

                embeddings.push(Embedding::new(
                    chunk.id(),
                    batch_response.model_name.clone(),
                    vector,
                ));
            }
        }

        Ok(embeddings)
    }
}
