//! Catalog store trait

use async_trait::async_trait;

use crate::{CatalogEntry, CatalogQuery, Result};

/// Read-side interface to the vehicle catalog.
///
/// Production backs this with a relational store (parameterized SELECT with
/// WHERE/ORDER BY/LIMIT over the catalog table); tests and small
/// deployments use `MemoryCatalog` from the retrieval crate.
///
/// # Example
///
/// ```ignore
/// let store: Arc<dyn CatalogStore> = Arc::new(MemoryCatalog::with_entries(entries));
/// let query = CatalogQuery::new(filter, CatalogOrder::YearDesc, 30);
/// let rows = store.query(&query).await?;
/// ```
#[async_trait]
pub trait CatalogStore: Send + Sync + 'static {
    /// Run a filtered, ordered, capped query.
    ///
    /// Filter semantics follow `CatalogFilter::matches`.
    async fn query(&self, query: &CatalogQuery) -> Result<Vec<CatalogEntry>>;

    /// Entries whose make/model/specs text contains any of the tokens,
    /// ordered by rating desc, review count desc, year desc.
    ///
    /// An empty token slice matches every entry.
    async fn text_search(&self, tokens: &[String], limit: usize) -> Result<Vec<CatalogEntry>>;

    /// Up to `limit` entries drawn from the wider catalog, excluding the
    /// given ids. Implementations may randomize; a deterministic order is
    /// also acceptable.
    async fn sample(&self, limit: usize, exclude: &[i64]) -> Result<Vec<CatalogEntry>>;

    /// Most recently created entries, newest first
    async fn recent(&self, limit: usize) -> Result<Vec<CatalogEntry>>;

    /// Resolve entries by id, preserving input order; unknown ids are skipped
    async fn by_ids(&self, ids: &[i64]) -> Result<Vec<CatalogEntry>>;
}
