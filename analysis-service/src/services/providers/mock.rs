//! Mock provider implementation for testing.

use super::{ProviderError, VisionProvider, VisionRequest};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    NoReply,
    Status(u16, String),
    NotConfigured,
}

/// The last request the mock received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub system_prompt: String,
    pub prompt: String,
    pub image_url: String,
}

/// Mock vision provider for testing.
pub struct MockVisionProvider {
    reply: MockReply,
    calls: AtomicUsize,
    last_request: Mutex<Option<RecordedRequest>>,
}

impl MockVisionProvider {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn text(reply: impl Into<String>) -> Self {
        Self::new(MockReply::Text(reply.into()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last_request.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn describe(&self, request: &VisionRequest<'_>) -> Result<Option<String>, ProviderError> {
        if let MockReply::NotConfigured = self.reply {
            return Err(ProviderError::NotConfigured(
                "Mock vision provider not configured".to_string(),
            ));
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(RecordedRequest {
                system_prompt: request.system_prompt.to_string(),
                prompt: request.prompt.to_string(),
                image_url: request.image_url.to_string(),
            });
        }

        match &self.reply {
            MockReply::Text(text) => Ok(Some(text.clone())),
            MockReply::Status(status, body) => Err(ProviderError::ApiError {
                status: *status,
                body: body.clone(),
            }),
            MockReply::NoReply | MockReply::NotConfigured => Ok(None),
        }
    }

    fn model(&self) -> &str {
        "mock-vision"
    }
}
