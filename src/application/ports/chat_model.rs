use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum ChatModelError {
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Authentication failed: {0}")]
    AuthError(String),
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Model returned no content")]
    EmptyResponse,
}

#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends a fully rendered prompt as a single user turn and returns the reply text.
    async fn complete(&self, prompt: &str) -> Result<String, ChatModelError>;

    fn model_name(&self) -> &str;
}
