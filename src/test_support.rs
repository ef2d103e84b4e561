//! In-memory doubles for the ports and repositories, shared by unit tests.

use std::collections::{HashMap, VecDeque};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pgvector::Vector;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::application::ports::chat_model::ChatModelError;
use crate::application::ports::document_extractor::{
    DocumentExtractionError, ExtractedContent,
};
use crate::application::ports::embedding_provider::{
    BatchEmbeddingResponse, EmbeddingProviderError, EmbeddingResponse,
};
use crate::application::ports::file_storage::{FileStorageError, StoredFile};
use crate::application::ports::{
    ChatModel, DocumentExtractor, EmbeddingProvider, FileStorage,
};
use crate::application::services::{ConversationService, DocumentProcessorService, RetrievalService};
use crate::application::use_cases::upload_documents::{UploadDocumentsRequest, UploadedFile};
use crate::application::use_cases::{
    AskQuestionUseCase, ClearDocumentsUseCase, GetChatHistoryUseCase, GetDocumentStatsUseCase,
    ListDocumentsUseCase, StartSessionUseCase, UploadDocumentsUseCase,
};
use crate::config::RetrievalConfig;
use crate::domain::entities::embedding::cosine_similarity;
use crate::domain::entities::{ContentChunk, Document, Embedding};
use crate::domain::repositories::chunk_repository::ChunkRepositoryError;
use crate::domain::repositories::document_repository::DocumentRepositoryError;
use crate::domain::repositories::embedding_repository::{
    EmbeddingRepositoryError, SimilaritySearchResult,
};
use crate::domain::repositories::{ChunkRepository, DocumentRepository, EmbeddingRepository};
use crate::domain::value_objects::DocumentKind;
use crate::infrastructure::external_services::{
    CompositeDocumentExtractor, RecursiveCharacterSplitter,
};
use crate::infrastructure::session_store::InMemoryChatSessionRepository;
use crate::presentation::http::HttpServer;
use crate::presentation::http::handlers::{ChatHandler, DocumentHandler};

/// Hashes words into buckets, so texts sharing words point the same way.
pub struct FakeEmbeddingProvider {
    dimension: usize,
    reported_dimension: usize,
    fail: bool,
    overrides: HashMap<String, Vec<f32>>,
}

impl FakeEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            reported_dimension: dimension,
            fail: false,
            overrides: HashMap::new(),
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn reporting_dimension(mut self, dimension: usize) -> Self {
        self.reported_dimension = dimension;
        self
    }

    pub fn with_vector(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.overrides.insert(text.to_string(), vector);
        self
    }

    pub fn vector_for(&self, text: &str) -> Vector {
        if let Some(vector) = self.overrides.get(text) {
            return Vector::from(vector.clone());
        }

        let mut values = vec![0.0f32; self.dimension];
        // Shared bias keeps every vector non-zero.
        values[0] = 0.1;

        for word in text.split_whitespace() {
            let word = word
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if word.is_empty() {
                continue;
            }

            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            values[(hasher.finish() % self.dimension as u64) as usize] += 1.0;
        }

        Vector::from(values)
    }
}

#[async_trait]
impl EmbeddingProvider for FakeEmbeddingProvider {
    async fn generate_embedding(
        &self,
        text: &str,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        if self.fail {
            return Err(EmbeddingProviderError::ServiceUnavailable);
        }

        Ok(EmbeddingResponse {
            embedding: self.vector_for(text),
            token_count: None,
        })
    }

    async fn generate_embeddings(
        &self,
        texts: &[String],
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if self.fail {
            return Err(EmbeddingProviderError::ServiceUnavailable);
        }

        Ok(BatchEmbeddingResponse {
            embeddings: texts.iter().map(|text| self.vector_for(text)).collect(),
            model_name: self.model_name().to_string(),
            total_tokens: None,
        })
    }

    fn model_name(&self) -> &str {
        "fake-embedding"
    }

    fn embedding_dimension(&self) -> usize {
        self.reported_dimension
    }
}

/// Replies from a queue and keeps every prompt it was sent.
#[derive(Default)]
pub struct RecordingChatModel {
    replies: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    fail: bool,
    delay: Option<Duration>,
    hold_first_call: AtomicBool,
    entered: Notify,
    released: Notify,
}

impl RecordingChatModel {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Every reply is delayed, so concurrent calls interleave.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// The first call waits inside the model until `release` is called.
    pub fn holding_first_call(self) -> Self {
        self.hold_first_call.store(true, Ordering::SeqCst);
        self
    }

    pub async fn wait_until_called(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.released.notify_one();
    }

    pub fn push_reply(&self, reply: &str) {
        self.replies.lock().unwrap().push_back(reply.to_string());
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for RecordingChatModel {
    async fn complete(&self, prompt: &str) -> Result<String, ChatModelError> {
        if self.fail {
            return Err(ChatModelError::NetworkError("connection refused".to_string()));
        }

        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.hold_first_call.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.released.notified().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| ChatModelError::ApiError("no reply queued".to_string()))
    }

    fn model_name(&self) -> &str {
        "recording-chat"
    }
}

/// Returns the same content for any input; `None` makes every call fail.
pub struct StaticExtractor {
    content: Option<ExtractedContent>,
}

impl StaticExtractor {
    pub fn new(content: Option<ExtractedContent>) -> Self {
        Self { content }
    }
}

#[async_trait]
impl DocumentExtractor for StaticExtractor {
    async fn extract(
        &self,
        _data: &[u8],
        _kind: DocumentKind,
    ) -> Result<ExtractedContent, DocumentExtractionError> {
        self.content
            .clone()
            .ok_or_else(|| DocumentExtractionError::ExtractionFailed("unreadable".to_string()))
    }

    fn can_extract(&self, _kind: DocumentKind) -> bool {
        true
    }
}

#[derive(Default)]
pub struct InMemoryDocumentRepository {
    documents: Mutex<Vec<Document>>,
    fail_deletes: AtomicBool,
}

impl InMemoryDocumentRepository {
    /// Makes every single-document delete fail from now on.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn save(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        if documents
            .iter()
            .any(|d| d.file_name() == document.file_name() || d.file_hash() == document.file_hash())
        {
            return Err(DocumentRepositoryError::ValidationError(format!(
                "{} already exists",
                document.file_name()
            )));
        }
        documents.push(document.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, DocumentRepositoryError> {
        let documents = self.documents.lock().unwrap();
        Ok(documents.iter().find(|d| d.id() == id).cloned())
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<Document>, DocumentRepositoryError> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .iter()
            .find(|d| d.file_hash().as_str() == hash)
            .cloned())
    }

    async fn find_by_name(
        &self,
        file_name: &str,
    ) -> Result<Option<Document>, DocumentRepositoryError> {
        let documents = self.documents.lock().unwrap();
        Ok(documents.iter().find(|d| d.file_name() == file_name).cloned())
    }

    async fn find_all(
        &self,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Document>, DocumentRepositoryError> {
        let documents = self.documents.lock().unwrap();
        Ok(documents
            .iter()
            .skip(skip as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn update(&self, document: &Document) -> Result<(), DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        let existing = documents
            .iter_mut()
            .find(|d| d.id() == document.id())
            .ok_or(DocumentRepositoryError::NotFound(document.id()))?;
        *existing = document.clone();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DocumentRepositoryError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DocumentRepositoryError::DatabaseError(
                "connection reset".to_string(),
            ));
        }

        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.id() != id);
        Ok(documents.len() < before)
    }

    async fn delete_all(&self) -> Result<i64, DocumentRepositoryError> {
        let mut documents = self.documents.lock().unwrap();
        let deleted = documents.len() as i64;
        documents.clear();
        Ok(deleted)
    }

    async fn count(&self) -> Result<i64, DocumentRepositoryError> {
        Ok(self.documents.lock().unwrap().len() as i64)
    }
}

#[derive(Default)]
pub struct InMemoryChunkRepository {
    chunks: Mutex<Vec<ContentChunk>>,
}

impl InMemoryChunkRepository {
    fn get(&self, id: Uuid) -> Option<ContentChunk> {
        let chunks = self.chunks.lock().unwrap();
        chunks.iter().find(|c| c.id() == id).cloned()
    }
}

#[async_trait]
impl ChunkRepository for InMemoryChunkRepository {
    async fn save_batch(&self, chunks: &[ContentChunk]) -> Result<(), ChunkRepositoryError> {
        self.chunks.lock().unwrap().extend_from_slice(chunks);
        Ok(())
    }

    async fn find_by_document_id(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<ContentChunk>, ChunkRepositoryError> {
        let chunks = self.chunks.lock().unwrap();
        let mut found: Vec<ContentChunk> = chunks
            .iter()
            .filter(|c| c.document_id() == document_id)
            .cloned()
            .collect();
        found.sort_by_key(|c| c.chunk_index());
        Ok(found)
    }

    async fn count(&self) -> Result<i64, ChunkRepositoryError> {
        Ok(self.chunks.lock().unwrap().len() as i64)
    }

    async fn delete_all(&self) -> Result<i64, ChunkRepositoryError> {
        let mut chunks = self.chunks.lock().unwrap();
        let deleted = chunks.len() as i64;
        chunks.clear();
        Ok(deleted)
    }
}

/// Brute-force cosine search over the vectors saved so far.
pub struct InMemoryEmbeddingRepository {
    chunks: Arc<InMemoryChunkRepository>,
    embeddings: Mutex<Vec<Embedding>>,
}

impl InMemoryEmbeddingRepository {
    pub fn new(chunks: Arc<InMemoryChunkRepository>) -> Self {
        Self {
            chunks,
            embeddings: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl EmbeddingRepository for InMemoryEmbeddingRepository {
    async fn save_batch(&self, embeddings: &[Embedding]) -> Result<(), EmbeddingRepositoryError> {
        self.embeddings
            .lock()
            .unwrap()
            .extend_from_slice(embeddings);
        Ok(())
    }

    async fn similarity_search(
        &self,
        query_vector: &Vector,
        limit: i64,
    ) -> Result<Vec<SimilaritySearchResult>, EmbeddingRepositoryError> {
        let embeddings = self.embeddings.lock().unwrap().clone();

        let mut results: Vec<SimilaritySearchResult> = embeddings
            .into_iter()
            .filter_map(|embedding| {
                let chunk = self.chunks.get(embedding.content_chunk_id())?;
                Some(SimilaritySearchResult {
                    similarity_score: cosine_similarity(
                        query_vector.as_slice(),
                        embedding.embedding().as_slice(),
                    ),
                    embedding: embedding.embedding().clone(),
                    chunk,
                })
            })
            .collect();

        results.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        results.truncate(limit.max(0) as usize);
        Ok(results)
    }

    async fn count(&self) -> Result<i64, EmbeddingRepositoryError> {
        Ok(self.embeddings.lock().unwrap().len() as i64)
    }

    async fn delete_all(&self) -> Result<i64, EmbeddingRepositoryError> {
        let mut embeddings = self.embeddings.lock().unwrap();
        let deleted = embeddings.len() as i64;
        embeddings.clear();
        Ok(deleted)
    }
}

#[derive(Default)]
pub struct InMemoryFileStorage {
    files: Mutex<HashMap<Uuid, Vec<u8>>>,
}

impl InMemoryFileStorage {
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn store_file(&self, id: Uuid, data: &[u8]) -> Result<StoredFile, FileStorageError> {
        self.files.lock().unwrap().insert(id, data.to_vec());
        Ok(StoredFile {
            id,
            path: format!("memory://{}", id),
            size: data.len() as u64,
        })
    }

    async fn delete_file(&self, id: Uuid) -> Result<bool, FileStorageError> {
        Ok(self.files.lock().unwrap().remove(&id).is_some())
    }

    async fn delete_all(&self) -> Result<u64, FileStorageError> {
        let mut files = self.files.lock().unwrap();
        let deleted = files.len() as u64;
        files.clear();
        Ok(deleted)
    }
}

/// Every use case wired over in-memory adapters, the real extractors and splitter.
pub struct TestHarness {
    pub documents: Arc<InMemoryDocumentRepository>,
    pub chunks: Arc<InMemoryChunkRepository>,
    pub embeddings: Arc<InMemoryEmbeddingRepository>,
    pub storage: Arc<InMemoryFileStorage>,
    pub sessions: Arc<InMemoryChatSessionRepository>,
    pub chat_model: Arc<RecordingChatModel>,
    pub upload_documents: Arc<UploadDocumentsUseCase>,
    pub list_documents: Arc<ListDocumentsUseCase>,
    pub document_stats: Arc<GetDocumentStatsUseCase>,
    pub clear_documents: Arc<ClearDocumentsUseCase>,
    pub start_session: Arc<StartSessionUseCase>,
    pub ask_question: Arc<AskQuestionUseCase>,
    pub get_chat_history: Arc<GetChatHistoryUseCase>,
}

impl TestHarness {
    pub fn new() -> Self {
        let documents = Arc::new(InMemoryDocumentRepository::default());
        let chunks = Arc::new(InMemoryChunkRepository::default());
        let embeddings = Arc::new(InMemoryEmbeddingRepository::new(chunks.clone()));
        let storage = Arc::new(InMemoryFileStorage::default());
        let sessions = Arc::new(InMemoryChatSessionRepository::new());
        let chat_model = Arc::new(RecordingChatModel::default());
        let provider = Arc::new(FakeEmbeddingProvider::new(32));

        let processor = Arc::new(DocumentProcessorService::new(
            Arc::new(CompositeDocumentExtractor::new()),
            Arc::new(RecursiveCharacterSplitter::default()),
            provider.clone(),
            chunks.clone(),
            embeddings.clone(),
        ));

        let retrieval = Arc::new(RetrievalService::new(
            provider,
            embeddings.clone(),
            RetrievalConfig::default(),
        ));

        let conversation = Arc::new(ConversationService::new(
            chat_model.clone(),
            retrieval,
            chunks.clone(),
            sessions.clone(),
            5,
        ));

        Self {
            upload_documents: Arc::new(UploadDocumentsUseCase::new(
                documents.clone(),
                storage.clone(),
                processor,
            )),
            list_documents: Arc::new(ListDocumentsUseCase::new(documents.clone())),
            document_stats: Arc::new(GetDocumentStatsUseCase::new(
                documents.clone(),
                chunks.clone(),
            )),
            clear_documents: Arc::new(ClearDocumentsUseCase::new(
                documents.clone(),
                chunks.clone(),
                embeddings.clone(),
                sessions.clone(),
                storage.clone(),
            )),
            start_session: Arc::new(StartSessionUseCase::new(sessions.clone())),
            ask_question: Arc::new(AskQuestionUseCase::new(conversation)),
            get_chat_history: Arc::new(GetChatHistoryUseCase::new(sessions.clone())),
            documents,
            chunks,
            embeddings,
            storage,
            sessions,
            chat_model,
        }
    }

    /// The full HTTP router over this harness's use cases.
    pub fn router(&self) -> axum::Router {
        let document_handler = Arc::new(DocumentHandler::new(
            self.upload_documents.clone(),
            self.list_documents.clone(),
            self.document_stats.clone(),
            self.clear_documents.clone(),
        ));
        let chat_handler = Arc::new(ChatHandler::new(
            self.start_session.clone(),
            self.ask_question.clone(),
            self.get_chat_history.clone(),
        ));

        HttpServer::new(document_handler, chat_handler, 0).router()
    }

    /// Uploads each `(file_name, text)` pair as a text file.
    pub async fn index_texts(&self, files: &[(&str, &str)]) {
        let files = files
            .iter()
            .map(|(file_name, text)| UploadedFile {
                file_name: file_name.to_string(),
                data: text.as_bytes().to_vec(),
            })
            .collect();

        let response = self
            .upload_documents
            .execute(UploadDocumentsRequest { files })
            .await
            .unwrap();
        assert_eq!(response.indexed_count(), response.results.len());
    }
}
