//! Semantic index
//!
//! Precomputed (catalog id, embedding) table. Built offline by a batch job,
//! loaded wholesale into memory on first use and read-only afterwards.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use car_advisor_core::CatalogEntry;

use crate::embedder::QueryEmbedder;
use crate::RetrievalError;

/// One row of the index artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticIndexEntry {
    pub id: i64,
    pub vector: Vec<f32>,
}

/// In-memory embedding table with cosine ranking
#[derive(Debug, Default)]
pub struct SemanticIndex {
    entries: Vec<SemanticIndexEntry>,
    dim: usize,
}

impl SemanticIndex {
    /// Load the whole artifact (a JSON array of entries) into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RetrievalError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| RetrievalError::Index(format!("read {}: {}", path.display(), e)))?;
        let entries: Vec<SemanticIndexEntry> = serde_json::from_str(&raw)
            .map_err(|e| RetrievalError::Index(format!("parse {}: {}", path.display(), e)))?;
        let index = Self::from_entries(entries)?;
        info!(
            entries = index.len(),
            dim = index.dim,
            path = %path.display(),
            "semantic index loaded"
        );
        Ok(index)
    }

    /// Build from pre-embedded rows, validating a uniform dimension.
    pub fn from_entries(entries: Vec<SemanticIndexEntry>) -> Result<Self, RetrievalError> {
        let dim = entries.first().map(|e| e.vector.len()).unwrap_or(0);
        if entries.iter().any(|e| e.vector.len() != dim) {
            return Err(RetrievalError::Index(
                "mixed embedding dimensions in index".to_string(),
            ));
        }
        Ok(Self { entries, dim })
    }

    /// Embed catalog entries with the shared embedder. Used by the offline
    /// artifact job and by tests.
    pub fn build(entries: &[CatalogEntry], embedder: &QueryEmbedder) -> Self {
        let rows = entries
            .iter()
            .map(|entry| SemanticIndexEntry {
                id: entry.id,
                vector: embedder.embed(&entry.searchable_text()),
            })
            .collect();
        Self {
            entries: rows,
            dim: embedder.dim(),
        }
    }

    /// Write the artifact as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RetrievalError> {
        let path = path.as_ref();
        let raw = serde_json::to_string(&self.entries)
            .map_err(|e| RetrievalError::Index(format!("serialize: {}", e)))?;
        std::fs::write(path, raw)
            .map_err(|e| RetrievalError::Index(format!("write {}: {}", path.display(), e)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Top-k ids by cosine similarity, descending. Entries that cannot be
    /// compared (dimension mismatch, zero vectors) are skipped.
    pub fn top_k(&self, query: &[f32], k: usize) -> Vec<(i64, f32)> {
        let mut scored: Vec<(i64, f32)> = self
            .entries
            .iter()
            .filter_map(|entry| cosine_similarity(query, &entry.vector).map(|s| (entry.id, s)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);
        scored
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}
