use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::chat_model::{ChatModel, ChatModelError};
use crate::application::ports::embedding_provider::{
    BatchEmbeddingResponse, EmbeddingProvider, EmbeddingProviderError, EmbeddingResponse,
};
use crate::config::OpenAiConfig;

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
    model: String,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Deserialize)]
struct Usage {
    total_tokens: Option<i32>,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessagePayload<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessagePayload<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    pub api_key: String,
    pub api_base: String,
    pub chat_model: String,
    pub temperature: f32,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub initial_backoff: Duration,
    pub backoff_factor: f64,
}

impl From<&OpenAiConfig> for OpenAiClientConfig {
    fn from(config: &OpenAiConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            chat_model: config.chat_model.clone(),
            temperature: config.temperature,
            embedding_model: config.embedding_model.clone(),
            embedding_dimension: config.embedding_dimension,
            max_retries: 3,
            timeout_secs: 60,
            initial_backoff: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum OpenAiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Invalid response: {0}")]
    Parse(String),
}

impl OpenAiError {
    fn is_retryable(&self) -> bool {
        match self {
            OpenAiError::Transport(_) => true,
            OpenAiError::Status { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            OpenAiError::Parse(_) => false,
        }
    }
}

impl From<OpenAiError> for EmbeddingProviderError {
    fn from(error: OpenAiError) -> Self {
        match error {
            OpenAiError::Transport(msg) => EmbeddingProviderError::NetworkError(msg),
            OpenAiError::Status { status, .. } if status == StatusCode::TOO_MANY_REQUESTS => {
                EmbeddingProviderError::RateLimitExceeded
            }
            OpenAiError::Status { status, .. } if status.is_server_error() => {
                EmbeddingProviderError::ServiceUnavailable
            }
            OpenAiError::Status { status, message }
                if status == StatusCode::BAD_REQUEST =>
            {
                EmbeddingProviderError::InvalidInput(message)
            }
            other => EmbeddingProviderError::ApiError(other.to_string()),
        }
    }
}

impl From<OpenAiError> for ChatModelError {
    fn from(error: OpenAiError) -> Self {
        match error {
            OpenAiError::Transport(msg) => ChatModelError::NetworkError(msg),
            OpenAiError::Status { status, message }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                ChatModelError::AuthError(message)
            }
            OpenAiError::Status { status, .. } if status == StatusCode::TOO_MANY_REQUESTS => {
                ChatModelError::RateLimitExceeded
            }
            other => ChatModelError::ApiError(other.to_string()),
        }
    }
}

/// OpenAI REST client serving both embeddings and chat completions.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn post_with_retry<B, R>(&self, endpoint: &str, body: &B) -> Result<R, OpenAiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut attempts = 0;

        loop {
            attempts += 1;

            match self.post(endpoint, body).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_retryable() && attempts <= self.config.max_retries => {
                    let backoff = self
                        .config
                        .initial_backoff
                        .mul_f64(self.config.backoff_factor.powi(attempts as i32 - 1));

                    tracing::warn!(
                        endpoint,
                        attempt = attempts,
                        backoff_ms = backoff.as_millis() as u64,
                        "OpenAI request failed, retrying: {}",
                        e
                    );

                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn post<B, R>(&self, endpoint: &str, body: &B) -> Result<R, OpenAiError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(format!("{}/{}", self.config.api_base, endpoint))
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| OpenAiError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error.message)
                .unwrap_or(text);

            return Err(OpenAiError::Status { status, message });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| OpenAiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn generate_embedding(
        &self,
        text: &str,
    ) -> Result<EmbeddingResponse, EmbeddingProviderError> {
        let batch = self.generate_embeddings(&[text.to_string()]).await?;

        let embedding = batch.embeddings.into_iter().next().ok_or_else(|| {
            EmbeddingProviderError::ApiError("No embeddings returned".to_string())
        })?;

        Ok(EmbeddingResponse {
            embedding,
            token_count: batch.total_tokens,
        })
    }

    async fn generate_embeddings(
        &self,
        texts: &[String],
    ) -> Result<BatchEmbeddingResponse, EmbeddingProviderError> {
        if texts.is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "At least one text is required".to_string(),
            ));
        }

        let request = EmbeddingsRequest {
            model: &self.config.embedding_model,
            input: texts,
        };

        let mut response: EmbeddingsResponse = self.post_with_retry("embeddings", &request).await?;

        if response.data.len() != texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, received {}",
                texts.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|data| data.index);

        Ok(BatchEmbeddingResponse {
            embeddings: response
                .data
                .into_iter()
                .map(|data| Vector::from(data.embedding))
                .collect(),
            model_name: response.model,
            total_tokens: response.usage.and_then(|usage| usage.total_tokens),
        })
    }

    fn model_name(&self) -> &str {
        &self.config.embedding_model
    }

    fn embedding_dimension(&self) -> usize {
        self.config.embedding_dimension
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ChatModelError> {
        let request = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages: vec![ChatMessagePayload {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        let response: ChatCompletionResponse =
            self.post_with_retry("chat/completions", &request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatModelError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        &self.config.chat_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> OpenAiClient {
        OpenAiClient::new(OpenAiClientConfig {
            api_key: "test-key".to_string(),
            api_base: server.uri(),
            chat_model: "gpt-4o".to_string(),
            temperature: 0.0,
            embedding_model: "text-embedding-ada-002".to_string(),
            embedding_dimension: 3,
            max_retries: 2,
            timeout_secs: 5,
            initial_backoff: Duration::from_millis(1),
            backoff_factor: 1.0,
        })
        .unwrap()
    }

    fn chat_reply(text: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": text } }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15 }
        })
    }

    #[tokio::test]
    async fn test_embeddings_keep_input_order() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "text-embedding-ada-002",
                "input": ["first", "second"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "embedding": [0.0, 1.0, 0.0], "index": 1 },
                    { "embedding": [1.0, 0.0, 0.0], "index": 0 }
                ],
                "model": "text-embedding-ada-002",
                "usage": { "prompt_tokens": 4, "total_tokens": 4 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .generate_embeddings(&["first".to_string(), "second".to_string()])
            .await
            .unwrap();

        assert_eq!(response.embeddings[0].as_slice(), &[1.0, 0.0, 0.0]);
        assert_eq!(response.embeddings[1].as_slice(), &[0.0, 1.0, 0.0]);
        assert_eq!(response.total_tokens, Some(4));
    }

    #[tokio::test]
    async fn test_chat_completion_sends_temperature() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o",
                "temperature": 0.0,
                "messages": [{ "role": "user", "content": "Is hail covered?" }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("Yes.")))
            .expect(1)
            .mount(&server)
            .await;

        let answer = client(&server).complete("Is hail covered?").await.unwrap();
        assert_eq!(answer, "Yes.");
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("Recovered.")))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(client(&server).complete("hi").await.unwrap(), "Recovered.");
    }

    #[tokio::test]
    async fn test_auth_errors_are_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": { "message": "Incorrect API key provided", "type": "invalid_request_error" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        match client(&server).complete("hi").await {
            Err(ChatModelError::AuthError(message)) => {
                assert_eq!(message, "Incorrect API key provided")
            }
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limit_after_retries() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/embeddings"))
            .respond_with(ResponseTemplate::new(429))
            .expect(3)
            .mount(&server)
            .await;

        let result = client(&server).generate_embedding("hi").await;
        assert!(matches!(result, Err(EmbeddingProviderError::RateLimitExceeded)));
    }

    #[tokio::test]
    async fn test_empty_choice_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{ "message": { "content": null } }]
            })))
            .mount(&server)
            .await;

        assert!(matches!(
            client(&server).complete("hi").await,
            Err(ChatModelError::EmptyResponse)
        ));
    }
}
