//! AI text-generation port.

use async_trait::async_trait;

/// Turns a free-text prompt into a post body.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The upstream service answered with an error.
    #[error("{0}")]
    Upstream(String),

    /// The call succeeded but carried no text.
    #[error("no content received")]
    EmptyResponse,
}
