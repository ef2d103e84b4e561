use std::sync::Arc;

use crate::{
    application::{
        ports::{ChatModel, DocumentExtractor, EmbeddingProvider, FileStorage, TextSplitter},
        services::{ConversationService, DocumentProcessorService, RetrievalService},
        use_cases::{
            AskQuestionUseCase, ClearDocumentsUseCase, GetChatHistoryUseCase,
            GetDocumentStatsUseCase, ListDocumentsUseCase, StartSessionUseCase,
            UploadDocumentsUseCase,
        },
    },
    config::AppConfig,
    domain::repositories::{
        ChatSessionRepository, ChunkRepository, DocumentRepository, EmbeddingRepository,
    },
    infrastructure::{
        database::{
            DbPool,
            repositories::{
                PostgresChunkRepository, PostgresDocumentRepository, PostgresEmbeddingRepository,
            },
        },
        external_services::{
            CompositeDocumentExtractor, OpenAiClient, OpenAiClientConfig,
            RecursiveCharacterSplitter,
        },
        file_system::LocalFileStorage,
        session_store::InMemoryChatSessionRepository,
    },
    presentation::http::{
        HttpServer,
        handlers::{ChatHandler, DocumentHandler},
    },
};

pub struct AppContainer {
    pub document_handler: Arc<DocumentHandler>,
    pub chat_handler: Arc<ChatHandler>,
    port: u16,
}

impl AppContainer {
    pub async fn new(
        config: &AppConfig,
        db_pool: DbPool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        // Create repositories
        let document_repository: Arc<dyn DocumentRepository> =
            Arc::new(PostgresDocumentRepository::new(db_pool.clone()));
        let chunk_repository: Arc<dyn ChunkRepository> =
            Arc::new(PostgresChunkRepository::new(db_pool.clone()));
        let embedding_repository: Arc<dyn EmbeddingRepository> =
            Arc::new(PostgresEmbeddingRepository::new(db_pool));
        let session_repository: Arc<dyn ChatSessionRepository> =
            Arc::new(InMemoryChatSessionRepository::with_limits(&config.sessions));

        // Create external services
        let openai = Arc::new(
            OpenAiClient::new(OpenAiClientConfig::from(&config.openai))
                .map_err(|e| format!("Failed to create OpenAI client: {}", e))?,
        );
        let embedding_provider: Arc<dyn EmbeddingProvider> = openai.clone();
        let chat_model: Arc<dyn ChatModel> = openai;

        let local_storage = LocalFileStorage::new(config.upload_dir.clone());
        local_storage
            .ensure_directory_exists()
            .await
            .map_err(|e| format!("Failed to create upload directory: {}", e))?;
        let file_storage: Arc<dyn FileStorage> = Arc::new(local_storage);

        let document_extractor: Arc<dyn DocumentExtractor> =
            Arc::new(CompositeDocumentExtractor::new());
        let text_splitter: Arc<dyn TextSplitter> = Arc::new(RecursiveCharacterSplitter::new(
            config.splitter.chunk_size,
            config.splitter.chunk_overlap,
        ));

        // Create application services
        let document_processor = Arc::new(DocumentProcessorService::new(
            document_extractor,
            text_splitter,
            embedding_provider.clone(),
            chunk_repository.clone(),
            embedding_repository.clone(),
        ));

        let retrieval_service = Arc::new(RetrievalService::new(
            embedding_provider,
            embedding_repository.clone(),
            config.retrieval.clone(),
        ));

        let conversation_service = Arc::new(ConversationService::new(
            chat_model,
            retrieval_service,
            chunk_repository.clone(),
            session_repository.clone(),
            config.memory_window,
        ));

        // Create use cases
        let upload_documents_use_case = Arc::new(UploadDocumentsUseCase::new(
            document_repository.clone(),
            file_storage.clone(),
            document_processor,
        ));
        let list_documents_use_case =
            Arc::new(ListDocumentsUseCase::new(document_repository.clone()));
        let document_stats_use_case = Arc::new(GetDocumentStatsUseCase::new(
            document_repository.clone(),
            chunk_repository.clone(),
        ));
        let clear_documents_use_case = Arc::new(ClearDocumentsUseCase::new(
            document_repository.clone(),
            chunk_repository.clone(),
            embedding_repository.clone(),
            session_repository.clone(),
            file_storage,
        ));
        let start_session_use_case =
            Arc::new(StartSessionUseCase::new(session_repository.clone()));
        let ask_question_use_case =
            Arc::new(AskQuestionUseCase::new(conversation_service));
        let get_chat_history_use_case =
            Arc::new(GetChatHistoryUseCase::new(session_repository));

        // Create HTTP handlers
        let document_handler = Arc::new(DocumentHandler::new(
            upload_documents_use_case,
            list_documents_use_case,
            document_stats_use_case,
            clear_documents_use_case,
        ));
        let chat_handler = Arc::new(ChatHandler::new(
            start_session_use_case,
            ask_question_use_case,
            get_chat_history_use_case,
        ));

        Ok(Self {
            document_handler,
            chat_handler,
            port: config.port,
        })
    }

    pub fn http_server(&self) -> HttpServer {
        HttpServer::new(
            self.document_handler.clone(),
            self.chat_handler.clone(),
            self.port,
        )
    }
}
