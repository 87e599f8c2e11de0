//! In-memory catalog store
//!
//! Backs tests and single-process deployments. Query translation mirrors
//! what a relational backend does with WHERE/ORDER BY/LIMIT. Sampling is
//! deterministic (stable id order) so pipeline output is reproducible.

use async_trait::async_trait;
use parking_lot::RwLock;

use car_advisor_core::{CatalogEntry, CatalogOrder, CatalogQuery, CatalogStore, Result};

#[derive(Default)]
pub struct MemoryCatalog {
    entries: RwLock<Vec<CatalogEntry>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn insert(&self, entry: CatalogEntry) {
        self.entries.write().push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

fn apply_order(rows: &mut [CatalogEntry], order: CatalogOrder) {
    match order {
        CatalogOrder::PriceAsc => rows.sort_by(|a, b| {
            let left = a.price.unwrap_or(f64::MAX);
            let right = b.price.unwrap_or(f64::MAX);
            left.total_cmp(&right)
        }),
        CatalogOrder::RatingDesc => rows.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| b.reviews.cmp(&a.reviews))
        }),
        CatalogOrder::YearDesc => rows.sort_by(|a, b| {
            b.year
                .cmp(&a.year)
                .then_with(|| b.rating.total_cmp(&a.rating))
        }),
        CatalogOrder::CreatedDesc => rows.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn query(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>> {
        let mut rows: Vec<CatalogEntry> = self
            .entries
            .read()
            .iter()
            .filter(|entry| query.filter.matches(entry))
            .cloned()
            .collect();
        apply_order(&mut rows, query.order);
        rows.truncate(query.limit);
        Ok(rows)
    }

    async fn text_search(&self, tokens: &[String], limit: usize) -> Result<Vec<CatalogEntry>> {
        let mut rows: Vec<CatalogEntry> = self
            .entries
            .read()
            .iter()
            .filter(|entry| {
                if tokens.is_empty() {
                    return true;
                }
                let text = entry.searchable_text();
                tokens.iter().any(|token| text.contains(token.as_str()))
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.rating
                .total_cmp(&a.rating)
                .then_with(|| b.reviews.cmp(&a.reviews))
                .then_with(|| b.year.cmp(&a.year))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    async fn sample(&self, limit: usize, exclude: &[i64]) -> Result<Vec<CatalogEntry>> {
        let mut rows: Vec<CatalogEntry> = self
            .entries
            .read()
            .iter()
            .filter(|entry| !exclude.contains(&entry.id))
            .cloned()
            .collect();
        rows.sort_by_key(|entry| entry.id);
        rows.truncate(limit);
        Ok(rows)
    }

    async fn recent(&self, limit: usize) -> Result<Vec<CatalogEntry>> {
        let mut rows: Vec<CatalogEntry> = self.entries.read().iter().cloned().collect();
        apply_order(&mut rows, CatalogOrder::CreatedDesc);
        rows.truncate(limit);
        Ok(rows)
    }

    async fn by_ids(&self, ids: &[i64]) -> Result<Vec<CatalogEntry>> {
        let entries = self.entries.read();
        Ok(ids
            .iter()
            .filter_map(|id| entries.iter().find(|entry| entry.id == *id).cloned())
            .collect())
    }
}
