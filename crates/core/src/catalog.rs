//! Catalog entry types
//!
//! A catalog entry is one vehicle listing. Entries are written by the
//! listing-management side of the marketplace; the retrieval core treats
//! them as read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Structured vehicle specifications.
///
/// The backing store keeps these as JSON blobs. The fields the context
/// assembler renders are typed; everything else passes through `extra`
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleSpecs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horsepower: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_economy: Option<String>,
    /// Unrecognized spec keys, passed through as-is
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, String>,
}

impl VehicleSpecs {
    pub fn is_empty(&self) -> bool {
        self.body_style.is_none()
            && self.horsepower.is_none()
            && self.engine.is_none()
            && self.fuel_economy.is_none()
            && self.extra.is_empty()
    }

    /// Lowercase concatenation of every populated field, for keyword matching
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(body) = &self.body_style {
            parts.push(body.to_lowercase());
        }
        if let Some(hp) = self.horsepower {
            parts.push(hp.to_string());
        }
        if let Some(engine) = &self.engine {
            parts.push(engine.to_lowercase());
        }
        if let Some(fuel) = &self.fuel_economy {
            parts.push(fuel.to_lowercase());
        }
        for (key, value) in &self.extra {
            parts.push(key.to_lowercase());
            parts.push(value.to_lowercase());
        }
        parts.join(" ")
    }
}

/// One vehicle listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Stable unique identifier
    pub id: i64,
    pub make: String,
    pub model: String,
    /// Model year
    pub year: i32,
    /// Asking price; sellers may omit it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// ISO-style currency code for `price`
    pub currency: String,
    /// Average rating, 0.0 - 5.0; 0.0 means unrated
    pub rating: f32,
    /// Review count behind the rating
    pub reviews: u32,
    #[serde(default)]
    pub specs: VehicleSpecs,
    /// Provenance tags (dealer feed, import batch, ...)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CatalogEntry {
    /// Create a new entry with the mandatory fields
    pub fn new(id: i64, make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        let now = Utc::now();
        Self {
            id,
            make: make.into(),
            model: model.into(),
            year,
            price: None,
            currency: String::new(),
            rating: 0.0,
            reviews: 0,
            specs: VehicleSpecs::default(),
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set price and its currency
    pub fn with_price(mut self, price: f64, currency: impl Into<String>) -> Self {
        self.price = Some(price);
        self.currency = currency.into();
        self
    }

    /// Set rating and review count; rating is clamped to 0.0 - 5.0
    pub fn with_rating(mut self, rating: f32, reviews: u32) -> Self {
        self.rating = rating.clamp(0.0, 5.0);
        self.reviews = reviews;
        self
    }

    pub fn with_specs(mut self, specs: VehicleSpecs) -> Self {
        self.specs = specs;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_timestamps(mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self.updated_at = updated_at;
        self
    }

    /// "Make Model Year", for logs and rendered lines
    pub fn label(&self) -> String {
        format!("{} {} {}", self.make, self.model, self.year)
    }

    /// Lowercase text rendering used for keyword matching and embeddings
    pub fn searchable_text(&self) -> String {
        let mut text = format!(
            "{} {} {}",
            self.make.to_lowercase(),
            self.model.to_lowercase(),
            self.year
        );
        let specs = self.specs.searchable_text();
        if !specs.is_empty() {
            text.push(' ');
            text.push_str(&specs);
        }
        text
    }
}
