// Core structs: Offer, MatchResult, IngredientGroup
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::quantity::PackSize;
use crate::text::Attributes;

/// Canonical offer record. Ingestion (`ingest`) maps every raw catalog shape
/// into this one; the matcher only ever sees this.
#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub title: String,
    pub description: String,
    /// Numeric price in NOK; 0.0 when the raw record carried nothing parseable.
    pub price: f64,
    pub store: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub size: Option<f64>,
    pub pieces: Option<u32>,
    pub hotspot_id: Option<String>,
    pub run_from: Option<NaiveDate>,
    pub run_till: Option<NaiveDate>,
}

/// Category path, either the three-level form used by the synset dictionary
/// or a bare name from the alias tagger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Path { top: String, mid: String, leaf: String },
    Name(String),
}

impl Category {
    pub fn uncategorized() -> Self {
        Category::Path {
            top: "Ukategorisert".to_string(),
            mid: "Annet".to_string(),
            leaf: "Ukjent".to_string(),
        }
    }
}

/// One scored (ingredient, offer) pairing. Request-scoped, never persisted.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub offer: Offer,
    pub score: f64,
    pub reasons: Vec<String>,
    /// Canonical ingredient name the match was resolved under.
    pub ingredient: String,
    pub category: Category,
    pub pack_size: Option<PackSize>,
    pub attributes: Option<Attributes>,
}

/// Per-ingredient result group returned by `Engine::get_best_offers`.
#[derive(Debug, Clone)]
pub struct IngredientGroup {
    /// Ingredient as the caller queried it.
    pub ingredient: String,
    pub canonical: String,
    pub offers: Vec<MatchResult>,
    pub category: Category,
    pub recommended_store: Option<String>,
}

#[derive(Debug, Error)]
pub enum DataError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
