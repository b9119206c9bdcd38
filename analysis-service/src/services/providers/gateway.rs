//! Chat-completion gateway provider.
//!
//! Speaks the OpenAI-style `/chat/completions` protocol: a system message, a
//! user message made of a text part and an `image_url` part, bearer auth.
//! One request per call, no retries.

use super::{ProviderError, VisionProvider, VisionRequest};
use crate::config::GatewayConfig;
use async_trait::async_trait;
use metrics::histogram;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Gateway-backed vision provider.
pub struct GatewayVisionProvider {
    config: GatewayConfig,
    client: Client,
}

impl GatewayVisionProvider {
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl VisionProvider for GatewayVisionProvider {
    async fn describe(&self, request: &VisionRequest<'_>) -> Result<Option<String>, ProviderError> {
        let api_key = self.config.api_key.as_ref().ok_or_else(|| {
            ProviderError::NotConfigured("AI_GATEWAY_API_KEY not configured".to_string())
        })?;

        let body = ChatCompletionRequest::new(&self.config.model, request);

        tracing::debug!(
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            image_len = request.image_url.len(),
            "Sending request to AI gateway"
        );

        let start = Instant::now();
        let response = self
            .client
            .post(&self.config.url)
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(network_error)?;

        histogram!(
            "hazard_analysis_upstream_latency_seconds",
            "model" => self.config.model.clone(),
            "status" => status.as_u16().to_string()
        )
        .record(start.elapsed().as_secs_f64());

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %text, "AI gateway error");
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body: text,
            });
        }

        match serde_json::from_str::<ChatCompletionResponse>(&text) {
            Ok(completion) => Ok(completion.first_text()),
            Err(e) => {
                tracing::warn!(error = %e, "AI gateway returned an undecodable completion");
                Ok(None)
            }
        }
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

fn network_error(err: reqwest::Error) -> ProviderError {
    tracing::error!(error = %err, "AI gateway request failed");
    ProviderError::NetworkError(err.without_url().to_string())
}

// ============================================================================
// Chat-completion Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, request: &VisionRequest<'a>) -> Self {
        Self {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(request.system_prompt),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: request.prompt,
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: request.image_url,
                            },
                        },
                    ]),
                },
            ],
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<Value>,
}

impl ChatCompletionResponse {
    /// Text of the first choice. Content may be a plain string or a list of
    /// typed parts, depending on the routed model.
    fn first_text(self) -> Option<String> {
        let content = self.choices.into_iter().next()?.message?.content?;

        match content {
            Value::String(text) => Some(text),
            Value::Array(parts) => parts.into_iter().find_map(|part| match part {
                Value::Object(mut fields) => match fields.remove("text") {
                    Some(Value::String(text)) => Some(text),
                    _ => None,
                },
                _ => None,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_request() -> VisionRequest<'static> {
        VisionRequest {
            system_prompt: "You are a mining safety expert.",
            prompt: "Analyze this photo.",
            image_url: "data:image/jpeg;base64,AAAA",
        }
    }

    #[test]
    fn test_request_wire_format() {
        let request = sample_request();
        let body = serde_json::to_value(ChatCompletionRequest::new("google/gemini-2.5-flash", &request))
            .unwrap();

        assert_eq!(
            body,
            json!({
                "model": "google/gemini-2.5-flash",
                "messages": [
                    { "role": "system", "content": "You are a mining safety expert." },
                    {
                        "role": "user",
                        "content": [
                            { "type": "text", "text": "Analyze this photo." },
                            {
                                "type": "image_url",
                                "image_url": { "url": "data:image/jpeg;base64,AAAA" }
                            }
                        ]
                    }
                ]
            })
        );
    }

    #[test]
    fn test_first_text_from_string_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "first" } },
                { "message": { "role": "assistant", "content": "second" } }
            ]
        }))
        .unwrap();

        assert_eq!(response.first_text(), Some("first".to_string()));
    }

    #[test]
    fn test_first_text_from_part_list() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "content": [
                        { "type": "image_url", "image_url": { "url": "x" } },
                        { "type": "text", "text": "{\"hazards\": []}" }
                    ]
                }
            }]
        }))
        .unwrap();

        assert_eq!(response.first_text(), Some("{\"hazards\": []}".to_string()));
    }

    #[test]
    fn test_first_text_missing() {
        let empty: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.first_text(), None);

        let null_content: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [{ "message": { "content": null } }] }))
                .unwrap();
        assert_eq!(null_content.first_text(), None);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_sending() {
        let provider = GatewayVisionProvider::new(GatewayConfig {
            // Nothing listens here; reaching the network would surface a
            // NetworkError instead.
            url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
            api_key: None,
            model: "test-model".to_string(),
            timeout_secs: Some(1),
        })
        .unwrap();

        let err = provider.describe(&sample_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
