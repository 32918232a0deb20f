// Engine: multi-ingredient entry point tying matcher, store coverage and
// optimizer together.
use std::sync::Arc;

use tracing::{debug, info};

use crate::matcher::Matcher;
use crate::model::{IngredientGroup, Offer};
use crate::optimizer::{StoreCoverage, optimize_store_selection};
use crate::synsets::SynsetRegistry;

/// Offers carried per ingredient group into the optimization pass.
pub const GROUP_CAP: usize = 5;

pub struct Engine {
    matcher: Matcher,
}

impl Engine {
    pub fn new(registry: Arc<SynsetRegistry>) -> Self {
        Self {
            matcher: Matcher::new(registry),
        }
    }

    /// Matches every ingredient against the offer snapshot and returns
    /// store-concentrated groups: at most three alternatives per ingredient,
    /// biased toward the stores covering the most ingredients.
    ///
    /// Ingredients without any match still appear, with an empty offer list.
    pub fn get_best_offers(&self, ingredients: &[String], offers: &[Offer]) -> Vec<IngredientGroup> {
        info!(
            "Matching {} ingredients against {} offers",
            ingredients.len(),
            offers.len()
        );

        let mut coverage = StoreCoverage::new();
        let mut groups = Vec::with_capacity(ingredients.len());

        for ingredient in ingredients {
            if ingredient.trim().is_empty() {
                continue;
            }

            let matches = self.matcher.find_matches(ingredient, offers);
            debug!("\"{}\": {} matches", ingredient, matches.len());

            // Coverage counts the full match list, before the group cap.
            for m in &matches {
                coverage.record(&m.offer.store, ingredient);
            }

            let canonical = matches
                .first()
                .map(|m| m.ingredient.clone())
                .unwrap_or_else(|| ingredient.to_lowercase());
            let category = matches
                .first()
                .map(|m| m.category.clone())
                .unwrap_or_else(crate::model::Category::uncategorized);

            let mut capped = matches;
            capped.truncate(GROUP_CAP);

            groups.push(IngredientGroup {
                ingredient: ingredient.clone(),
                canonical,
                offers: capped,
                category,
                recommended_store: None,
            });
        }

        let optimized = optimize_store_selection(groups, &coverage);
        info!("Returning {} ingredient groups", optimized.len());
        optimized
    }
}
