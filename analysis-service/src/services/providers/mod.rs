//! Vision provider abstraction.
//!
//! The analyzer only needs "send this photo and prompt, give me the reply
//! text", so providers hide the wire format of the upstream API.

pub mod gateway;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// One multimodal prompt: system framing, user text and an image.
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub system_prompt: &'a str,
    pub prompt: &'a str,
    /// Image reference, normally a `data:` URI.
    pub image_url: &'a str,
}

/// Trait for image-understanding providers.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Send one request and return the first textual reply.
    ///
    /// `Ok(None)` means the provider answered successfully but no reply
    /// text could be located.
    async fn describe(&self, request: &VisionRequest<'_>) -> Result<Option<String>, ProviderError>;

    /// Model identifier, for logs and metrics.
    fn model(&self) -> &str;
}
