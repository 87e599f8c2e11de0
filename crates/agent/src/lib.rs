//! Conversational car-advisor pipeline
//!
//! Ties the analysis, retrieval and gateway pieces into one deterministic
//! `converse` operation:
//! query -> tokens/locale/intent -> catalog retrieval -> bounded context ->
//! model call -> post-processing -> session update.

pub mod agent;
pub mod context;
pub mod postprocess;
pub mod session;
pub mod telemetry;

pub use agent::{CarAdvisor, ChatRequest, ChatResponse};
pub use context::ContextAssembler;
pub use postprocess::{build_message_id, extract_referenced_ids};
pub use session::InMemorySessionStore;

use thiserror::Error;

use car_advisor_llm::LlmError;

/// Pipeline errors surfaced to the caller
#[derive(Error, Debug)]
pub enum AgentError {
    /// Input rejected before any retrieval was attempted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Catalog completely unavailable; degraded retrieval never lands here
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Gateway failure: {0}")]
    Gateway(#[from] LlmError),

    #[error("Session error: {0}")]
    Session(String),
}

impl AgentError {
    /// Message safe to show the end user
    pub fn user_message(&self) -> String {
        match self {
            AgentError::InvalidInput(msg) => msg.clone(),
            AgentError::Gateway(err) => err.user_message().to_string(),
            AgentError::Retrieval(_) | AgentError::Session(_) => {
                "Something went wrong on our side. Please try again.".to_string()
            }
        }
    }
}

impl From<AgentError> for car_advisor_core::Error {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::InvalidInput(msg) => car_advisor_core::Error::InvalidInput(msg),
            AgentError::Retrieval(msg) => car_advisor_core::Error::Retrieval(msg),
            AgentError::Gateway(inner) => car_advisor_core::Error::Llm(inner.to_string()),
            AgentError::Session(msg) => car_advisor_core::Error::Session(msg),
        }
    }
}
