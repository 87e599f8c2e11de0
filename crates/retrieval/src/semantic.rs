//! Semantic fallback chain
//!
//! An ordered list of search tiers: vector similarity, then keyword
//! matching, then sampling. Each tier runs only when the previous one is
//! unavailable or produced nothing; failures are swallowed and logged so
//! the chain degrades silently. The strategy tag on each returned
//! candidate records which tier answered.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, warn};

use car_advisor_core::{CatalogEntry, CatalogStore};
use car_advisor_text::tokenize;

use crate::candidate::{sort_candidates, RetrievalCandidate, RetrievalStrategy};
use crate::embedder::QueryEmbedder;
use crate::index::SemanticIndex;

/// Tier order for the degradation chain
const TIERS: &[RetrievalStrategy] = &[
    RetrievalStrategy::Vector,
    RetrievalStrategy::Keyword,
    RetrievalStrategy::Sample,
];

pub struct SemanticSearcher {
    store: Arc<dyn CatalogStore>,
    embedder: QueryEmbedder,
    index_path: Option<PathBuf>,
    /// Loaded once; `None` inside means the artifact is unavailable and
    /// the vector tier stays off for the process lifetime.
    index: OnceCell<Option<Arc<SemanticIndex>>>,
}

impl SemanticSearcher {
    /// Searcher without a vector index; the keyword tier answers first.
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            embedder: QueryEmbedder::new(),
            index_path: None,
            index: OnceCell::new(),
        }
    }

    /// Lazily load the index artifact from a file on first search.
    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.index_path = Some(path.into());
        self
    }

    /// Use an already-built index (tests, offline jobs).
    pub fn with_index(mut self, index: Arc<SemanticIndex>) -> Self {
        self.index = OnceCell::new_with(Some(Some(index)));
        self
    }

    /// Run the tier chain. Never fails: a total miss yields an empty list.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<RetrievalCandidate> {
        if limit == 0 {
            return Vec::new();
        }
        for tier in TIERS {
            let result = match tier {
                RetrievalStrategy::Vector => self.vector_tier(query, limit).await,
                RetrievalStrategy::Keyword => self.keyword_tier(query, limit).await,
                // Sampling is the engine's job; at this point there is
                // nothing real to return and we never fabricate entries.
                RetrievalStrategy::Sample => Some(Vec::new()),
            };
            if let Some(candidates) = result {
                if !candidates.is_empty() || *tier == RetrievalStrategy::Sample {
                    debug!(strategy = ?tier, count = candidates.len(), "semantic tier answered");
                    return candidates;
                }
            }
        }
        Vec::new()
    }

    /// The loaded index, or `None` when unavailable. First access loads the
    /// artifact; concurrent first access is serialized by the cell.
    async fn index(&self) -> Option<Arc<SemanticIndex>> {
        self.index
            .get_or_init(|| async {
                let path = self.index_path.clone()?;
                match SemanticIndex::load(&path) {
                    Ok(index) if !index.is_empty() => Some(Arc::new(index)),
                    Ok(_) => {
                        warn!(path = %path.display(), "semantic index is empty, vector tier disabled");
                        None
                    }
                    Err(err) => {
                        warn!(error = %err, "semantic index unavailable, vector tier disabled");
                        None
                    }
                }
            })
            .await
            .clone()
    }

    async fn vector_tier(&self, query: &str, limit: usize) -> Option<Vec<RetrievalCandidate>> {
        let index = self.index().await?;
        let vector = self.embedder.embed(query);
        if vector.iter().all(|x| *x == 0.0) {
            return None;
        }

        let ranked = index.top_k(&vector, limit);
        if ranked.is_empty() {
            return None;
        }

        let ids: Vec<i64> = ranked.iter().map(|(id, _)| *id).collect();
        let entries = match self.store.by_ids(&ids).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "id resolution failed, leaving vector tier");
                return None;
            }
        };
        let by_id: HashMap<i64, CatalogEntry> =
            entries.into_iter().map(|entry| (entry.id, entry)).collect();

        // Similarity order is preserved; ids that vanished from the store
        // since the index was built are skipped.
        let candidates: Vec<RetrievalCandidate> = ranked
            .into_iter()
            .filter_map(|(id, score)| {
                by_id.get(&id).map(|entry| {
                    RetrievalCandidate::new(entry.clone(), score, RetrievalStrategy::Vector)
                })
            })
            .collect();

        if candidates.is_empty() {
            None
        } else {
            Some(candidates)
        }
    }

    async fn keyword_tier(&self, query: &str, limit: usize) -> Option<Vec<RetrievalCandidate>> {
        let tokens = tokenize(query);
        let fetched = match self.store.text_search(&tokens, limit * 2).await {
            Ok(entries) => entries,
            Err(err) => {
                warn!(error = %err, "keyword search failed, leaving keyword tier");
                return None;
            }
        };
        if fetched.is_empty() {
            return None;
        }

        let total = fetched.len().max(1);
        let mut candidates: Vec<RetrievalCandidate> = fetched
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                let score = if tokens.is_empty() {
                    // No tokens to score against: decay by ordinal position.
                    (total - position) as f32 / total as f32
                } else {
                    let text = entry.searchable_text();
                    let hits = tokens
                        .iter()
                        .filter(|token| text.contains(token.as_str()))
                        .count();
                    hits as f32 / tokens.len() as f32
                };
                RetrievalCandidate::new(entry, score, RetrievalStrategy::Keyword)
            })
            .collect();

        sort_candidates(&mut candidates);
        candidates.truncate(limit);
        Some(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCatalog;

    fn store() -> Arc<MemoryCatalog> {
        Arc::new(MemoryCatalog::with_entries(vec![
            CatalogEntry::new(1, "Toyota", "Camry", 2022)
                .with_price(85_000.0, "AED")
                .with_rating(4.2, 12),
            CatalogEntry::new(2, "Honda", "Accord", 2021)
                .with_price(78_000.0, "AED")
                .with_rating(4.0, 30),
            CatalogEntry::new(3, "Nissan", "Patrol", 2023)
                .with_price(240_000.0, "AED")
                .with_rating(4.6, 8),
        ]))
    }

    #[tokio::test]
    async fn test_keyword_tier_when_no_index() {
        let searcher = SemanticSearcher::new(store());
        let candidates = searcher.search("camry with good fuel economy", 5).await;

        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| c.strategy == RetrievalStrategy::Keyword));
        assert!(candidates
            .iter()
            .all(|c| (0.0..=1.0).contains(&c.score)));
        assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_vector_tier_with_built_index() {
        let store = store();
        let embedder = QueryEmbedder::new();
        let entries: Vec<CatalogEntry> = vec![
            CatalogEntry::new(1, "Toyota", "Camry", 2022),
            CatalogEntry::new(2, "Honda", "Accord", 2021),
            CatalogEntry::new(3, "Nissan", "Patrol", 2023),
        ];
        let index = Arc::new(SemanticIndex::build(&entries, &embedder));

        let searcher = SemanticSearcher::new(store).with_index(index);
        let candidates = searcher.search("toyota camry", 2).await;

        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| c.strategy == RetrievalStrategy::Vector));
        assert_eq!(candidates[0].entry.id, 1);
    }

    #[tokio::test]
    async fn test_vector_tier_falls_through_when_ids_gone() {
        // Index knows ids the store no longer has.
        let store = store();
        let embedder = QueryEmbedder::new();
        let stale = vec![
            CatalogEntry::new(90, "Mazda", "CX-5", 2020),
            CatalogEntry::new(91, "Mazda", "CX-9", 2021),
        ];
        let index = Arc::new(SemanticIndex::build(&stale, &embedder));

        let searcher = SemanticSearcher::new(store).with_index(index);
        let candidates = searcher.search("mazda camry", 5).await;

        // Falls through to the keyword tier against the live store.
        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| c.strategy == RetrievalStrategy::Keyword));
    }

    #[tokio::test]
    async fn test_missing_index_file_disables_vector_tier() {
        let searcher =
            SemanticSearcher::new(store()).with_index_path("/nonexistent/index.json");
        let candidates = searcher.search("patrol", 5).await;
        assert!(!candidates.is_empty());
        assert!(candidates
            .iter()
            .all(|c| c.strategy == RetrievalStrategy::Keyword));
    }

    #[tokio::test]
    async fn test_empty_store_yields_empty() {
        let searcher = SemanticSearcher::new(Arc::new(MemoryCatalog::new()));
        let candidates = searcher.search("anything", 5).await;
        assert!(candidates.is_empty());
    }
}
