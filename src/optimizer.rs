// Cross-ingredient store optimization: bias each ingredient's alternatives
// toward the stores that cover the most of the shopping list.
use std::collections::HashMap;

use tracing::debug;

use crate::model::{IngredientGroup, MatchResult};

/// How many top-coverage stores count as "preferred".
pub const PREFERRED_STORES: usize = 3;
/// Non-preferred offers kept per ingredient before the final cut.
pub const EXTRA_OFFERS: usize = 2;
/// Final alternatives per ingredient.
pub const OFFERS_PER_INGREDIENT: usize = 3;

#[derive(Debug, Default)]
struct CoverageEntry {
    ingredients: Vec<String>,
    first_seen: usize,
}

/// Store → distinct-ingredient coverage, built per optimization pass.
#[derive(Debug, Default)]
pub struct StoreCoverage {
    entries: HashMap<String, CoverageEntry>,
}

impl StoreCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `store` had at least one match for `ingredient`. A store
    /// is counted once per distinct ingredient, not once per offer.
    pub fn record(&mut self, store: &str, ingredient: &str) {
        let next_index = self.entries.len();
        let entry = self
            .entries
            .entry(store.to_string())
            .or_insert_with(|| CoverageEntry {
                ingredients: Vec::new(),
                first_seen: next_index,
            });
        if !entry.ingredients.iter().any(|i| i == ingredient) {
            entry.ingredients.push(ingredient.to_string());
        }
    }

    pub fn count(&self, store: &str) -> usize {
        self.entries.get(store).map_or(0, |e| e.ingredients.len())
    }

    /// Top stores by coverage count, descending; ties rank in first-seen
    /// order so repeated passes stay deterministic.
    pub fn preferred_stores(&self) -> Vec<String> {
        let mut ranked: Vec<(&String, &CoverageEntry)> = self.entries.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.ingredients
                .len()
                .cmp(&a.1.ingredients.len())
                .then(a.1.first_seen.cmp(&b.1.first_seen))
        });
        ranked
            .into_iter()
            .take(PREFERRED_STORES)
            .map(|(store, _)| store.clone())
            .collect()
    }
}

/// Re-ranks and caps each ingredient group: preferred-store offers first (in
/// ranked store order, original order within a store), up to two others,
/// then cheapest-first and cut to three. Offers without a usable price sort
/// last. Attaches the top preferred store as the recommendation.
pub fn optimize_store_selection(
    groups: Vec<IngredientGroup>,
    coverage: &StoreCoverage,
) -> Vec<IngredientGroup> {
    let preferred = coverage.preferred_stores();
    debug!("Preferred stores: {}", preferred.join(", "));
    let recommended = preferred.first().cloned();

    groups
        .into_iter()
        .map(|mut group| {
            if group.offers.is_empty() {
                group.recommended_store = recommended.clone();
                return group;
            }

            let mut reordered: Vec<MatchResult> = Vec::with_capacity(group.offers.len());
            for store in &preferred {
                reordered.extend(
                    group
                        .offers
                        .iter()
                        .filter(|m| &m.offer.store == store)
                        .cloned(),
                );
            }
            reordered.extend(
                group
                    .offers
                    .iter()
                    .filter(|m| !preferred.contains(&m.offer.store))
                    .take(EXTRA_OFFERS)
                    .cloned(),
            );

            reordered.sort_by(|a, b| sort_price(a).total_cmp(&sort_price(b)));
            reordered.truncate(OFFERS_PER_INGREDIENT);

            group.offers = reordered;
            group.recommended_store = recommended.clone();
            group
        })
        .collect()
}

/// Price key for the final cheapest-first ordering; unparseable prices were
/// canonicalized to 0 at ingestion and belong at the end, not the front.
fn sort_price(result: &MatchResult) -> f64 {
    if result.offer.price > 0.0 {
        result.offer.price
    } else {
        f64::INFINITY
    }
}
