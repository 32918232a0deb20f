// Matcher: resolves an ingredient to a synset and scores every offer
// against it, falling back to plain word-boundary search when the
// dictionary has no entry.

pub mod fallback;
pub mod scorer;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::model::{MatchResult, Offer};
use crate::quantity::parse_pack_size;
use crate::synsets::{Synset, SynsetRegistry};
use crate::text::{normalize, parse_attributes, tokenize};

use self::fallback::fallback_search;
use self::scorer::score_candidate;

/// Minimum score for a synset-driven candidate to be kept.
pub const ACCEPT_THRESHOLD: f64 = 0.15;
/// Result cap for the synset-driven path.
pub const MAX_RESULTS: usize = 8;

pub struct Matcher {
    registry: Arc<SynsetRegistry>,
}

impl Matcher {
    pub fn new(registry: Arc<SynsetRegistry>) -> Self {
        Self { registry }
    }

    /// Ranked, capped matches for one ingredient over an offer snapshot.
    /// Deterministic for a fixed snapshot and dictionary; never fails —
    /// blank input or an empty corpus yields an empty list.
    pub fn find_matches(&self, ingredient: &str, offers: &[Offer]) -> Vec<MatchResult> {
        if ingredient.trim().is_empty() {
            return Vec::new();
        }

        let Some(synset) = self.registry.lookup(ingredient) else {
            debug!("No synset for \"{}\", using fallback search", ingredient);
            return fallback_search(ingredient, offers);
        };
        debug!(
            "Matching \"{}\" via synset \"{}\" ({} synonyms)",
            ingredient,
            synset.canonical,
            synset.synonyms.len()
        );

        let mut matches: Vec<MatchResult> = Vec::new();
        for offer in offers {
            let normalized = normalize(&offer.title);
            let token_set: HashSet<String> = tokenize(&offer.title).into_iter().collect();

            let (hits, exact_phrase) = count_hits(&synset, &normalized, &token_set);
            if hits == 0 {
                continue;
            }

            let exclusion_count = count_exclusions(&synset, &normalized);

            let attributes = parse_attributes(&offer.title);
            let brand_boost = attributes.brand.as_deref().is_some_and(|brand| {
                synset.brands.iter().any(|b| normalize(b) == brand)
            });

            let scored = score_candidate(
                &synset,
                offer.price,
                hits,
                exclusion_count,
                brand_boost,
                exact_phrase,
            );

            if scored.score > ACCEPT_THRESHOLD {
                matches.push(MatchResult {
                    offer: offer.clone(),
                    score: scored.score,
                    reasons: scored.reasons,
                    ingredient: synset.canonical.clone(),
                    category: synset.category.clone(),
                    pack_size: parse_pack_size(&offer.title),
                    attributes: Some(attributes),
                });
            }
        }

        // Stable sort: equal scores keep the offer snapshot's order.
        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(MAX_RESULTS);
        matches
    }
}

/// Counts synonym hits against a normalized title. Per synonym, exactly one
/// branch applies, checked in priority order:
/// full phrase substring (+2, exact), all word-tokens present (+1),
/// single token present (+1). Hits accumulate across synonyms.
fn count_hits(synset: &Synset, normalized_title: &str, token_set: &HashSet<String>) -> (u32, bool) {
    let mut hits = 0;
    let mut exact_phrase = false;

    for synonym in &synset.synonyms {
        let syn_norm = normalize(synonym);
        if syn_norm.is_empty() {
            continue;
        }
        let syn_tokens: Vec<&str> = syn_norm.split(' ').collect();

        if normalized_title.contains(&syn_norm) {
            hits += 2;
            exact_phrase = true;
        } else if syn_tokens.len() > 1 && syn_tokens.iter().all(|t| token_set.contains(*t)) {
            hits += 1;
        } else if syn_tokens.len() == 1 && token_set.contains(syn_tokens[0]) {
            hits += 1;
        }
    }

    (hits, exact_phrase)
}

/// One count per exclusion term whose normalized form occurs in the title.
fn count_exclusions(synset: &Synset, normalized_title: &str) -> u32 {
    synset
        .exclude
        .iter()
        .map(|term| normalize(term))
        .filter(|term| !term.is_empty() && normalized_title.contains(term.as_str()))
        .count() as u32
}
