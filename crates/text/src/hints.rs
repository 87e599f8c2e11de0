//! Numeric query hints
//!
//! Price ceilings ("under 80k", "1.2 million") and model years embedded in
//! free text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Numeric hints extracted from one query
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryHints {
    /// Inclusive price ceiling
    pub max_price: Option<f64>,
    /// Exact model year
    pub year: Option<i32>,
}

/// Number followed by a thousand/million qualifier
static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*(k|thousand|m|million|الف|ألف|مليون)\b")
        .expect("price regex is valid")
});

/// Any 4-digit year candidate; range-checked afterwards
static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(19\d{2}|20\d{2})\b").expect("year regex is valid")
});

/// Model years accepted outside this range are ignored
const YEAR_MIN: i32 = 1950;
const YEAR_MAX: i32 = 2035;

/// Extract price ceiling and model year from a query.
pub fn extract_hints(query: &str) -> QueryHints {
    QueryHints {
        max_price: extract_price_ceiling(query),
        year: extract_year(query),
    }
}

fn extract_price_ceiling(query: &str) -> Option<f64> {
    let caps = PRICE_RE.captures(query)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let multiplier = match caps.get(2)?.as_str().to_lowercase().as_str() {
        "k" | "thousand" | "الف" | "ألف" => 1_000.0,
        _ => 1_000_000.0,
    };
    Some(amount * multiplier)
}

fn extract_year(query: &str) -> Option<i32> {
    YEAR_RE
        .captures_iter(query)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<i32>().ok())
        .find(|year| (YEAR_MIN..=YEAR_MAX).contains(year))
}
