//! Gateway backends
//!
//! The model is an opaque text-completion collaborator: system
//! instructions plus ordered turns in, generated text or a typed failure
//! out. `OllamaBackend` speaks the Ollama chat API; anything with the same
//! shape can slot in behind `LlmBackend`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::request::{ChatRole, GenerateRequest, GenerateResponse};
use crate::LlmError;

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model name/ID
    pub model: String,
    /// API endpoint
    pub endpoint: String,
    /// Bearer token, if the endpoint requires one
    pub api_key: Option<String>,
    /// Request timeout; generation legitimately takes tens of seconds
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "qwen2.5:7b-instruct".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl From<&car_advisor_config::GatewaySettings> for LlmConfig {
    fn from(settings: &car_advisor_config::GatewaySettings) -> Self {
        Self {
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }
}

/// Language-model gateway trait
///
/// # Example
///
/// ```ignore
/// let llm: Arc<dyn LlmBackend> = Arc::new(OllamaBackend::new(LlmConfig::default())?);
/// let request = GenerateRequest::new("You are a car advisor")
///     .with_user_message("any SUVs under 100k?");
/// let response = llm.generate(&request).await?;
/// println!("{}", response.text);
/// ```
#[async_trait]
pub trait LlmBackend: Send + Sync + 'static {
    /// Generate a completion, or fail with a typed gateway error
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError>;

    /// Whether the backend currently answers
    async fn is_available(&self) -> bool;

    /// Model name for logging
    fn model_name(&self) -> &str;
}

/// Ollama chat backend
#[derive(Clone)]
pub struct OllamaBackend {
    client: Client,
    config: LlmConfig,
}

impl OllamaBackend {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("http client: {e}")))?;
        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.config.endpoint, path)
    }

    fn to_wire(&self, request: &GenerateRequest) -> WireChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(WireMessage {
                role: ChatRole::System.as_str().to_string(),
                content: request.system.clone(),
                images: None,
            });
        }
        for message in &request.messages {
            messages.push(WireMessage {
                role: message.role.as_str().to_string(),
                content: message.content.clone(),
                images: message.image.as_ref().map(|img| vec![img.to_base64()]),
            });
        }
        WireChatRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
            options: WireOptions {
                temperature: request.params.temperature,
                top_p: request.params.top_p,
                top_k: request.params.top_k,
                num_predict: request.params.max_output_tokens as i32,
            },
        }
    }
}

#[async_trait]
impl LlmBackend for OllamaBackend {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let wire = self.to_wire(request);
        debug!(model = %wire.model, turns = wire.messages.len(), "gateway request");

        let mut http = self.client.post(self.api_url("/chat")).json(&wire);
        if let Some(api_key) = &self.config.api_key {
            http = http.bearer_auth(api_key);
        }
        let response = http.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "gateway returned an error status");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Auth,
                StatusCode::TOO_MANY_REQUESTS => LlmError::Quota,
                s if s.is_server_error() => LlmError::Network(format!("server error {status}")),
                _ => LlmError::InvalidResponse(truncate_body(&body)),
            });
        }

        let parsed: WireChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        // Provider-dependent flag for filtered generations.
        if matches!(
            parsed.done_reason.as_deref(),
            Some("safety") | Some("content_filter")
        ) {
            return Err(LlmError::SafetyBlocked);
        }

        let text = parsed
            .message
            .map(|m| m.content)
            .unwrap_or_default()
            .trim()
            .to_string();
        if text.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        Ok(GenerateResponse::new(text))
    }

    async fn is_available(&self) -> bool {
        self.client
            .get(self.api_url("/tags"))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn truncate_body(body: &str) -> String {
    body.chars().take(200).collect()
}

#[derive(Debug, Serialize)]
struct WireChatRequest {
    model: String,
    messages: Vec<WireMessage>,
    stream: bool,
    options: WireOptions,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct WireOptions {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    num_predict: i32,
}

#[derive(Debug, Deserialize)]
struct WireChatResponse {
    message: Option<WireResponseMessage>,
    #[serde(default)]
    done_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{ChatMessage, InlineImage};

    #[test]
    fn test_wire_shape() {
        let backend = OllamaBackend::new(LlmConfig::default()).unwrap();
        let request = GenerateRequest::new("system text")
            .with_user_message("hello")
            .with_message(
                ChatMessage::user("look at this").with_image(InlineImage::new(
                    "image/png",
                    vec![1, 2, 3],
                )),
            );

        let wire = backend.to_wire(&request);
        assert_eq!(wire.messages.len(), 3);
        assert_eq!(wire.messages[0].role, "system");
        assert!(wire.messages[2].images.as_ref().unwrap()[0] == "AQID");
        assert!(!wire.stream);
    }

    #[test]
    fn test_empty_system_is_omitted() {
        let backend = OllamaBackend::new(LlmConfig::default()).unwrap();
        let request = GenerateRequest::new("").with_user_message("hello");
        let wire = backend.to_wire(&request);
        assert_eq!(wire.messages.len(), 1);
        assert_eq!(wire.messages[0].role, "user");
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"message":{"content":"Here are two options."},"done_reason":"stop"}"#;
        let parsed: WireChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.message.unwrap().content, "Here are two options.");
    }
}
