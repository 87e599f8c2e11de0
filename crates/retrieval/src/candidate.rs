//! Retrieval candidates

use serde::{Deserialize, Serialize};

use car_advisor_core::CatalogEntry;

/// Which tier produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStrategy {
    /// Vector-similarity search over the semantic index
    Vector,
    /// Token matching against catalog text
    Keyword,
    /// Padding drawn from the wider catalog
    Sample,
}

/// A catalog entry proposed by retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    pub entry: CatalogEntry,
    /// Relevance in [0, 1]
    pub score: f32,
    pub strategy: RetrievalStrategy,
}

impl RetrievalCandidate {
    pub fn new(entry: CatalogEntry, score: f32, strategy: RetrievalStrategy) -> Self {
        Self {
            entry,
            score: score.clamp(0.0, 1.0),
            strategy,
        }
    }
}

/// Sort candidates by descending score. Ties between keyword/sample
/// candidates break by most recently updated entry; vector candidates keep
/// their similarity order (the sort is stable).
pub fn sort_candidates(candidates: &mut Vec<RetrievalCandidate>) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| {
                if a.strategy == RetrievalStrategy::Vector || b.strategy == RetrievalStrategy::Vector
                {
                    std::cmp::Ordering::Equal
                } else {
                    b.entry.updated_at.cmp(&a.entry.updated_at)
                }
            })
    });
}
