//! Workspace-wide error type

use thiserror::Error;

/// Top-level error. Component crates define their own error enums and
/// convert into this at crate boundaries.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;
