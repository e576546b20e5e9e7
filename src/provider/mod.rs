//! Text-generation backends used by the AI-assisted generation stage.
//!
//! A backend takes a prompt and returns raw text. It knows nothing about test
//! cases; turning its output into cases is the generator's job.

mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} is unavailable: {reason}")]
    Unavailable {
        provider: &'static str,
        reason: String,
    },
    #[error("request to {provider} failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{provider} returned HTTP {status}: {message}")]
    Backend {
        provider: &'static str,
        status: u16,
        message: String,
    },
    #[error("{provider} returned no text")]
    EmptyResponse { provider: &'static str },
}

/// Turns a prompt into raw text. One request, one response, no streaming.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}
