//! Typed catalog query model
//!
//! The retrieval engine builds these; a `CatalogStore` implementation
//! translates them into its native query shape (parameterized
//! WHERE/ORDER BY/LIMIT for a relational backend, plain iteration for the
//! in-memory one).

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;

/// Field filter for a catalog query.
///
/// Semantics: the token list is OR-matched against make and model; the
/// winning token clause is AND-combined with every other populated field.
/// An empty filter matches everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFilter {
    /// Tokens matched case-insensitively as substrings of make or model
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub make_model_tokens: Vec<String>,
    /// Exact model-year match
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Inclusive price ceiling; entries without a price never satisfy it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    /// Exact currency-code match (case-insensitive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl CatalogFilter {
    pub fn is_empty(&self) -> bool {
        self.make_model_tokens.is_empty()
            && self.year.is_none()
            && self.max_price.is_none()
            && self.currency.is_none()
    }

    /// Number of tokens present in the entry's make or model
    pub fn token_hits(&self, entry: &CatalogEntry) -> usize {
        let make = entry.make.to_lowercase();
        let model = entry.model.to_lowercase();
        self.make_model_tokens
            .iter()
            .filter(|token| make.contains(token.as_str()) || model.contains(token.as_str()))
            .count()
    }

    /// Reference matching semantics; store implementations must agree with this
    pub fn matches(&self, entry: &CatalogEntry) -> bool {
        if !self.make_model_tokens.is_empty() && self.token_hits(entry) == 0 {
            return false;
        }
        if let Some(year) = self.year {
            if entry.year != year {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            match entry.price {
                Some(price) if price <= max_price => {}
                _ => return false,
            }
        }
        if let Some(currency) = &self.currency {
            if !entry.currency.eq_ignore_ascii_case(currency) {
                return false;
            }
        }
        true
    }
}

/// Result ordering for a catalog query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrder {
    /// Cheapest first; unpriced entries sort last
    PriceAsc,
    /// Best rated first, review count breaking ties
    RatingDesc,
    /// Newest model year first, rating breaking ties
    YearDesc,
    /// Most recently created entries first
    CreatedDesc,
}

/// A complete catalog query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogQuery {
    pub filter: CatalogFilter,
    pub order: CatalogOrder,
    pub limit: usize,
}

impl CatalogQuery {
    pub fn new(filter: CatalogFilter, order: CatalogOrder, limit: usize) -> Self {
        Self {
            filter,
            order,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camry() -> CatalogEntry {
        CatalogEntry::new(1, "Toyota", "Camry", 2022).with_price(85_000.0, "AED")
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(CatalogFilter::default().matches(&camry()));
    }

    #[test]
    fn test_token_or_semantics() {
        let filter = CatalogFilter {
            make_model_tokens: vec!["accord".to_string(), "camry".to_string()],
            ..Default::default()
        };
        assert!(filter.matches(&camry()));
        assert_eq!(filter.token_hits(&camry()), 1);
    }

    #[test]
    fn test_year_and_price_are_anded() {
        let filter = CatalogFilter {
            make_model_tokens: vec!["camry".to_string()],
            year: Some(2022),
            max_price: Some(80_000.0),
            currency: None,
        };
        // Token and year match, price ceiling does not.
        assert!(!filter.matches(&camry()));

        let filter = CatalogFilter {
            max_price: Some(90_000.0),
            ..filter
        };
        assert!(filter.matches(&camry()));
    }

    #[test]
    fn test_unpriced_entry_fails_price_ceiling() {
        let entry = CatalogEntry::new(2, "Honda", "Accord", 2021);
        let filter = CatalogFilter {
            max_price: Some(1_000_000.0),
            ..Default::default()
        };
        assert!(!filter.matches(&entry));
    }

    #[test]
    fn test_currency_ignores_case() {
        let filter = CatalogFilter {
            currency: Some("aed".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&camry()));
    }
}
