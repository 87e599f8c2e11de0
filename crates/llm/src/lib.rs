//! Language-model gateway
//!
//! Features:
//! - Backend trait with a single opaque text-completion contract
//! - Ollama-compatible HTTP backend with inline image support
//! - Typed failure taxonomy mapped to fixed user-facing messages
//! - Explicit request timeout (a slow model fails, it never hangs)

pub mod backend;
pub mod request;

pub use backend::{LlmBackend, LlmConfig, OllamaBackend};
pub use request::{
    ChatMessage, ChatRole, GenerateRequest, GenerateResponse, GenerationParams, InlineImage,
};

use thiserror::Error;

/// Gateway failure taxonomy
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Authentication failed")]
    Auth,

    #[error("Quota exceeded")]
    Quota,

    #[error("Response blocked by safety filters")]
    SafetyBlocked,

    #[error("Request timed out")]
    Timeout,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Fixed message per category, safe to show the end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            LlmError::Auth => "The assistant is not available right now. Please try again later.",
            LlmError::Quota => {
                "The assistant is handling too many requests. Please try again in a few minutes."
            }
            LlmError::SafetyBlocked => "I can't help with that request. Could you rephrase it?",
            LlmError::Timeout => "That took too long to answer. Please try again.",
            LlmError::Network(_) => {
                "We couldn't reach the assistant. Please check your connection and retry."
            }
            LlmError::EmptyResponse | LlmError::InvalidResponse(_) => {
                "The assistant didn't return a usable answer. Please try rephrasing."
            }
            LlmError::Configuration(_) => "The assistant is misconfigured. Please contact support.",
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for car_advisor_core::Error {
    fn from(err: LlmError) -> Self {
        car_advisor_core::Error::Llm(err.to_string())
    }
}
