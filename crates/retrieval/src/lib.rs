//! Catalog retrieval
//!
//! Features:
//! - Typed filter construction from query text (tokens, year, price ceiling)
//! - Intent-directed result ordering
//! - Semantic vector fallback with a lazily loaded index
//! - Keyword and sample fallback tiers with strict score bands
//! - In-memory catalog store for tests and single-process deployments

pub mod candidate;
pub mod embedder;
pub mod engine;
pub mod index;
pub mod memory;
pub mod semantic;

pub use candidate::{RetrievalCandidate, RetrievalStrategy};
pub use embedder::{QueryEmbedder, EMBEDDING_DIM};
pub use engine::CatalogRetrievalEngine;
pub use index::{SemanticIndex, SemanticIndexEntry};
pub use memory::MemoryCatalog;
pub use semantic::SemanticSearcher;

use thiserror::Error;

/// Retrieval errors
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Store error: {0}")]
    Store(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Embedding error: {0}")]
    Embedding(String),
}

impl From<RetrievalError> for car_advisor_core::Error {
    fn from(err: RetrievalError) -> Self {
        car_advisor_core::Error::Retrieval(err.to_string())
    }
}
