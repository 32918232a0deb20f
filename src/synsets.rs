// Synonym dictionary: canonical ingredients, their spelling variants,
// exclusion terms and scoring hints. Loaded once, hot-swappable.
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use tracing::{info, warn};

use crate::model::{Category, DataError};
use crate::text::normalize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Synset {
    pub canonical: String,
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub brands: Vec<String>,
    pub category: Category,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub strict_matching: bool,
}

/// In-memory synset table. Reload swaps the whole `Arc` so concurrent queries
/// see either the old or the new table, never a partial one.
pub struct SynsetRegistry {
    table: RwLock<Arc<Vec<Synset>>>,
}

impl SynsetRegistry {
    pub fn empty() -> Self {
        Self {
            table: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Builds a registry from an already-assembled table.
    pub fn from_synsets(synsets: Vec<Synset>) -> Self {
        let registry = Self::empty();
        registry.install(synsets);
        registry
    }

    /// Atomically replaces the table. In-flight queries keep the snapshot
    /// they already took.
    pub fn install(&self, synsets: Vec<Synset>) {
        *self.table.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(synsets);
    }

    /// Loads the dictionary from a JSON file. A failed load degrades to an
    /// empty table (every query then takes the fallback search path) rather
    /// than an error.
    pub fn load(path: &Path) -> Self {
        let registry = Self::empty();
        registry.reload(path);
        registry
    }

    /// Re-reads the dictionary and atomically replaces the table. On failure
    /// the current table is kept.
    pub fn reload(&self, path: &Path) {
        match read_synsets(path) {
            Ok(synsets) => {
                info!("Loaded {} synsets from {}", synsets.len(), path.display());
                self.install(synsets);
            }
            Err(e) => {
                warn!(
                    "Could not load synsets from {}: {} — keeping current table",
                    path.display(),
                    e
                );
            }
        }
    }

    /// Snapshot of the current table for the duration of one query.
    pub fn snapshot(&self) -> Arc<Vec<Synset>> {
        self.table.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Resolves an ingredient to its synset: canonical name first
    /// (case-insensitive), then any synonym under normalization.
    pub fn lookup(&self, ingredient: &str) -> Option<Synset> {
        let query = ingredient.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        let normalized = normalize(ingredient);
        self.snapshot()
            .iter()
            .find(|s| {
                s.canonical.to_lowercase() == query
                    || s.synonyms.iter().any(|syn| normalize(syn) == normalized)
            })
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }
}

fn read_synsets(path: &Path) -> Result<Vec<Synset>, DataError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
