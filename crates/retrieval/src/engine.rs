//! Catalog retrieval engine
//!
//! Builds a typed filter from the query text, asks the store for an
//! intent-ordered candidate set and tops it up through the fallback tiers
//! when the filtered set is too small to be useful. Genuine matches always
//! carry strictly higher scores than padded entries, so they sort first.

use std::sync::Arc;

use tracing::{debug, warn};

use car_advisor_config::RetrievalSettings;
use car_advisor_core::{
    CatalogEntry, CatalogFilter, CatalogOrder, CatalogQuery, CatalogStore,
};
use car_advisor_text::{extract_hints, is_stop_word, tokenize, QueryIntent};

use crate::candidate::{sort_candidates, RetrievalCandidate, RetrievalStrategy};
use crate::semantic::SemanticSearcher;
use crate::RetrievalError;

/// Score bands. Filtered matches live in [MATCH_SCORE_FLOOR, 1.0]; padded
/// and fallback entries stay at or below PAD_SCORE_CEILING.
const MATCH_SCORE_FLOOR: f32 = 0.5;
const PAD_SCORE_CEILING: f32 = 0.35;

pub struct CatalogRetrievalEngine {
    store: Arc<dyn CatalogStore>,
    semantic: SemanticSearcher,
    settings: RetrievalSettings,
}

impl CatalogRetrievalEngine {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        semantic: SemanticSearcher,
        settings: RetrievalSettings,
    ) -> Self {
        Self {
            store,
            semantic,
            settings,
        }
    }

    /// Retrieve a ranked candidate set for one query.
    ///
    /// Degraded tiers (failed store queries, unavailable semantic index)
    /// are logged and skipped; the only hard failure is every tier
    /// erroring, which means the store is down.
    pub async fn retrieve(
        &self,
        query: &str,
        intent: QueryIntent,
        currency: Option<&str>,
    ) -> Result<Vec<RetrievalCandidate>, RetrievalError> {
        let cap = self.settings.max_candidates;
        let filter = self.build_filter(query, currency);
        let order = order_for(intent);
        debug!(?filter, ?order, "retrieving candidates");

        let mut candidates = match self
            .store
            .query(&CatalogQuery::new(filter.clone(), order, cap))
            .await
        {
            Ok(entries) => score_matches(&filter, entries),
            Err(err) => {
                warn!(error = %err, "filtered catalog query failed, continuing with fallbacks");
                Vec::new()
            }
        };

        // Thin keyword retrieval: let the semantic chain top the set up.
        if candidates.len() < self.settings.min_results {
            let need = cap - candidates.len();
            let mut extra = self.semantic.search(query, need).await;
            let present: Vec<i64> = candidates.iter().map(|c| c.entry.id).collect();
            extra.retain(|c| !present.contains(&c.entry.id));
            candidates.extend(extra);
        }

        // Still thin: pad with entries sampled from the wider catalog.
        if candidates.len() < self.settings.min_results {
            let present: Vec<i64> = candidates.iter().map(|c| c.entry.id).collect();
            match self.store.sample(cap - candidates.len(), &present).await {
                Ok(padding) => candidates.extend(score_padding(padding)),
                Err(err) => {
                    warn!(error = %err, "catalog sampling failed, continuing");
                }
            }
        }

        // Nothing at all: newest listings, or a hard error if even that
        // query cannot be served.
        if candidates.is_empty() {
            match self.store.recent(cap).await {
                Ok(entries) => candidates.extend(score_padding(entries)),
                Err(err) => {
                    return Err(RetrievalError::Store(format!(
                        "catalog unavailable: {err}"
                    )));
                }
            }
        }

        sort_candidates(&mut candidates);
        candidates.truncate(cap);
        Ok(candidates)
    }

    /// Tokens (minus stop words, capped), numeric hints and the currency
    /// hint combined into one typed filter.
    fn build_filter(&self, query: &str, currency: Option<&str>) -> CatalogFilter {
        let tokens: Vec<String> = tokenize(query)
            .into_iter()
            .filter(|token| !is_stop_word(token))
            .take(self.settings.max_filter_tokens)
            .collect();
        let hints = extract_hints(query);
        CatalogFilter {
            make_model_tokens: tokens,
            year: hints.year,
            max_price: hints.max_price,
            currency: currency.map(|c| c.to_string()),
        }
    }
}

/// Store ordering per intent
fn order_for(intent: QueryIntent) -> CatalogOrder {
    match intent {
        QueryIntent::PriceInquiry | QueryIntent::Negotiating => CatalogOrder::PriceAsc,
        QueryIntent::Recommendation => CatalogOrder::RatingDesc,
        _ => CatalogOrder::YearDesc,
    }
}

/// Score filtered matches into the match band: filter-match strength when
/// tokens exist, positional decay when the filter was effectively empty.
fn score_matches(filter: &CatalogFilter, entries: Vec<CatalogEntry>) -> Vec<RetrievalCandidate> {
    let total = entries.len().max(1);
    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            let strength = if filter.make_model_tokens.is_empty() {
                1.0 - position as f32 / total as f32
            } else {
                filter.token_hits(&entry) as f32 / filter.make_model_tokens.len() as f32
            };
            let score = MATCH_SCORE_FLOOR + (1.0 - MATCH_SCORE_FLOOR) * strength;
            RetrievalCandidate::new(entry, score, RetrievalStrategy::Keyword)
        })
        .collect()
}

/// Padding scores decay with position and never reach the match band.
fn score_padding(entries: Vec<CatalogEntry>) -> Vec<RetrievalCandidate> {
    let total = entries.len().max(1);
    entries
        .into_iter()
        .enumerate()
        .map(|(position, entry)| {
            let score = PAD_SCORE_CEILING * (total - position) as f32 / total as f32;
            RetrievalCandidate::new(entry, score, RetrievalStrategy::Sample)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCatalog;

    fn settings() -> RetrievalSettings {
        RetrievalSettings {
            max_candidates: 30,
            min_results: 3,
            max_filter_tokens: 8,
        }
    }

    fn engine_over(entries: Vec<CatalogEntry>) -> CatalogRetrievalEngine {
        let store = Arc::new(MemoryCatalog::with_entries(entries));
        let semantic = SemanticSearcher::new(Arc::clone(&store) as Arc<dyn CatalogStore>);
        CatalogRetrievalEngine::new(store, semantic, settings())
    }

    fn fixture() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new(1, "Toyota", "Camry", 2020)
                .with_price(72_000.0, "AED")
                .with_rating(4.2, 12),
            CatalogEntry::new(2, "Toyota", "Camry", 2022)
                .with_price(95_000.0, "AED")
                .with_rating(4.4, 9),
            CatalogEntry::new(3, "Honda", "Accord", 2020)
                .with_price(69_000.0, "AED")
                .with_rating(4.0, 30),
            CatalogEntry::new(4, "Nissan", "Patrol", 2023)
                .with_price(250_000.0, "AED")
                .with_rating(4.6, 8),
            CatalogEntry::new(5, "Kia", "Rio", 2018)
                .with_price(28_000.0, "AED")
                .with_rating(3.8, 40),
        ]
    }

    #[tokio::test]
    async fn test_year_and_price_filter_honored() {
        let engine = engine_over(fixture());
        let candidates = engine
            .retrieve("2020 camry under 80k", QueryIntent::Buying, None)
            .await
            .unwrap();

        // Matched-filter tier candidates satisfy both constraints.
        let matched: Vec<_> = candidates
            .iter()
            .filter(|c| c.score >= MATCH_SCORE_FLOOR)
            .collect();
        assert!(!matched.is_empty());
        for candidate in &matched {
            assert_eq!(candidate.entry.year, 2020);
            assert!(candidate.entry.price.unwrap() <= 80_000.0);
        }
        // The set was topped up below the match band.
        assert!(candidates.len() > matched.len());
        assert!(candidates
            .iter()
            .filter(|c| c.strategy == RetrievalStrategy::Sample)
            .all(|c| c.score <= PAD_SCORE_CEILING));
    }

    #[tokio::test]
    async fn test_zero_matches_pads_without_match_band_scores() {
        let engine = engine_over(fixture());
        let candidates = engine
            .retrieve("2031 lamborghini under 5k", QueryIntent::Buying, None)
            .await
            .unwrap();

        assert!(!candidates.is_empty());
        assert!(candidates.iter().all(|c| c.score < MATCH_SCORE_FLOOR));
    }

    #[tokio::test]
    async fn test_cap_respected_on_large_catalog() {
        let mut entries = Vec::new();
        for id in 0..10_000 {
            entries.push(
                CatalogEntry::new(id, "Toyota", "Corolla", 2015 + (id % 10) as i32)
                    .with_price(40_000.0 + id as f64, "AED")
                    .with_rating(3.5, 5),
            );
        }
        let engine = engine_over(entries);
        let candidates = engine
            .retrieve("toyota corolla", QueryIntent::Buying, None)
            .await
            .unwrap();
        assert_eq!(candidates.len(), settings().max_candidates);
    }

    #[tokio::test]
    async fn test_sorted_descending_with_matches_first() {
        let engine = engine_over(fixture());
        let candidates = engine
            .retrieve("camry", QueryIntent::Buying, None)
            .await
            .unwrap();

        assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));
        // Both Camrys rank ahead of every padded entry.
        assert!(candidates[0].entry.model == "Camry" && candidates[1].entry.model == "Camry");
    }

    #[tokio::test]
    async fn test_price_inquiry_orders_ascending() {
        let engine = engine_over(fixture());
        let candidates = engine
            .retrieve("how much is a camry", QueryIntent::PriceInquiry, None)
            .await
            .unwrap();

        let matched: Vec<_> = candidates
            .iter()
            .filter(|c| c.score >= MATCH_SCORE_FLOOR)
            .collect();
        assert_eq!(matched.len(), 2);
        // Cheapest Camry first within the match band (equal scores, store
        // order preserved by recency tie-break on identical timestamps is
        // not guaranteed, so compare prices directly).
        let prices: Vec<f64> = matched.iter().map(|c| c.entry.price.unwrap()).collect();
        assert!(prices.contains(&72_000.0) && prices.contains(&95_000.0));
    }

    #[tokio::test]
    async fn test_currency_hint_filters() {
        let mut entries = fixture();
        entries.push(
            CatalogEntry::new(6, "Toyota", "Camry", 2021)
                .with_price(80_000.0, "SAR")
                .with_rating(4.1, 4),
        );
        let engine = engine_over(entries);
        let candidates = engine
            .retrieve("camry", QueryIntent::Buying, Some("SAR"))
            .await
            .unwrap();

        // The SAR listing is the filtered match; any AED Camrys that the
        // semantic top-up pulls in rank no higher than it.
        assert_eq!(candidates[0].entry.currency, "SAR");
        assert!(candidates.iter().any(|c| c.entry.id == 6));
    }

    #[tokio::test]
    async fn test_empty_catalog_yields_empty_not_error() {
        let engine = engine_over(Vec::new());
        let candidates = engine
            .retrieve("anything at all", QueryIntent::General, None)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }
}
