// Alias-driven category tagger. Independent of the matcher; used to put
// broad category tags on offers for browsing.
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use tracing::{info, warn};

use crate::model::{DataError, Offer};

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub aliases: Vec<String>,
}

pub struct CategoryTagger {
    rules: RwLock<Arc<Vec<CategoryRule>>>,
}

impl CategoryTagger {
    pub fn empty() -> Self {
        Self {
            rules: RwLock::new(Arc::new(Vec::new())),
        }
    }

    pub fn from_rules(rules: Vec<CategoryRule>) -> Self {
        let tagger = Self::empty();
        *tagger.rules.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(rules);
        tagger
    }

    /// Loads alias rules from JSON; a failed load leaves the tagger empty,
    /// every product then tags as "annet".
    pub fn load(path: &Path) -> Self {
        let tagger = Self::empty();
        tagger.reload(path);
        tagger
    }

    pub fn reload(&self, path: &Path) {
        match read_rules(path) {
            Ok(rules) => {
                info!("Loaded {} category rules from {}", rules.len(), path.display());
                *self.rules.write().unwrap_or_else(|e| e.into_inner()) = Arc::new(rules);
            }
            Err(e) => {
                warn!(
                    "Could not load category rules from {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }

    fn snapshot(&self) -> Arc<Vec<CategoryRule>> {
        self.rules.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Tags a product title with every category whose alias it contains,
    /// defaulting to "annet".
    pub fn tag_product(&self, title: &str) -> Vec<String> {
        let lower = title.to_lowercase();
        let mut tags = Vec::new();
        if !lower.trim().is_empty() {
            for rule in self.snapshot().iter() {
                let hit = rule
                    .aliases
                    .iter()
                    .any(|alias| lower.contains(&alias.to_lowercase()));
                if hit && !tags.contains(&rule.category) {
                    tags.push(rule.category.clone());
                }
            }
        }
        if tags.is_empty() {
            tags.push("annet".to_string());
        }
        tags
    }

    /// Offers whose title tags into the named category (case-insensitive).
    pub fn search_by_category<'a>(&self, offers: &'a [Offer], name: &str) -> Vec<&'a Offer> {
        let rules = self.snapshot();
        let Some(rule) = rules
            .iter()
            .find(|r| r.category.to_lowercase() == name.to_lowercase())
        else {
            return Vec::new();
        };
        offers
            .iter()
            .filter(|o| self.tag_product(&o.title).contains(&rule.category))
            .collect()
    }
}

fn read_rules(path: &Path) -> Result<Vec<CategoryRule>, DataError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
