//! Intent classification
//!
//! Closed tag set matched by keyword families in a fixed priority order.
//! Family order is the tie-break contract: a query containing both a
//! buying keyword and a pricing keyword classifies as `Buying`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the user is trying to do with their query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryIntent {
    Buying,
    Comparing,
    Negotiating,
    PriceInquiry,
    FeatureInquiry,
    Recommendation,
    #[default]
    General,
}

impl QueryIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryIntent::Buying => "buying",
            QueryIntent::Comparing => "comparing",
            QueryIntent::Negotiating => "negotiating",
            QueryIntent::PriceInquiry => "price_inquiry",
            QueryIntent::FeatureInquiry => "feature_inquiry",
            QueryIntent::Recommendation => "recommendation",
            QueryIntent::General => "general",
        }
    }
}

impl fmt::Display for QueryIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Keyword families, highest priority first. The first family with any
/// keyword present in the lower-cased query wins. Note "best price" is a
/// negotiating keyword and the negotiating family outranks price_inquiry,
/// so "what's the best price" classifies as `Negotiating`.
const INTENT_FAMILIES: &[(QueryIntent, &[&str])] = &[
    (
        QueryIntent::Buying,
        &[
            "buy",
            "purchase",
            "looking for",
            "i want a",
            "interested in",
            "شراء",
            "اشتري",
        ],
    ),
    (
        QueryIntent::Comparing,
        &[
            "compare",
            " vs ",
            "versus",
            "difference between",
            "قارن",
            "الفرق",
        ],
    ),
    (
        QueryIntent::Negotiating,
        &[
            "negotiate",
            "best price",
            "discount",
            "lower price",
            "final offer",
            "good deal",
            "bargain",
            "haggle",
            "خصم",
            "تفاوض",
        ],
    ),
    (
        QueryIntent::PriceInquiry,
        &[
            "price",
            "cost",
            "how much",
            "expensive",
            "cheap",
            "afford",
            "budget",
            "سعر",
            "كم",
        ],
    ),
    (
        QueryIntent::FeatureInquiry,
        &[
            "feature",
            "spec",
            "horsepower",
            "engine",
            "fuel",
            "mileage",
            "safety",
            "warranty",
            "مواصفات",
            "محرك",
        ],
    ),
    (
        QueryIntent::Recommendation,
        &[
            "recommend",
            "suggest",
            "which car",
            "best car",
            "advice",
            "help me choose",
            "انصح",
            "اقترح",
        ],
    ),
];

/// Classify a query into exactly one intent tag.
pub fn classify_intent(query: &str) -> QueryIntent {
    let lower = query.to_lowercase();
    for (intent, keywords) in INTENT_FAMILIES {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return *intent;
        }
    }
    QueryIntent::General
}
