// Word-boundary fallback search for ingredients without a synset.
use regex::RegexBuilder;
use tracing::debug;

use crate::model::{Category, MatchResult, Offer};

const TITLE_SCORE: f64 = 0.8;
const DESCRIPTION_SCORE: f64 = 0.4;
const PRICE_PENALTY: f64 = 0.3;
const PRICE_PENALTY_THRESHOLD: f64 = 200.0;
const MAX_RESULTS: usize = 6;

/// Plain word-boundary search over titles and descriptions. Scores are not
/// clamped after the price penalty; candidates at or below zero are dropped.
pub fn fallback_search(ingredient: &str, offers: &[Offer]) -> Vec<MatchResult> {
    let query = ingredient.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }

    let pattern = format!(r"\b{}\b", regex::escape(&query));
    let Ok(word_re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
        return Vec::new();
    };

    let mut matches: Vec<MatchResult> = Vec::new();
    for offer in offers {
        let mut score = if word_re.is_match(&offer.title) {
            TITLE_SCORE
        } else if word_re.is_match(&offer.description) {
            DESCRIPTION_SCORE
        } else {
            continue;
        };

        if offer.price > PRICE_PENALTY_THRESHOLD {
            score -= PRICE_PENALTY;
        }
        if score <= 0.0 {
            continue;
        }

        matches.push(MatchResult {
            offer: offer.clone(),
            score,
            reasons: vec!["fallback exact word match".to_string()],
            ingredient: query.clone(),
            category: Category::uncategorized(),
            pack_size: None,
            attributes: None,
        });
    }

    debug!("\"{}\" (fallback): {} exact matches", ingredient, matches.len());

    // Near-ties (score within 0.1) are broken by ascending price.
    matches.sort_by(|a, b| {
        if (a.score - b.score).abs() > 0.1 {
            b.score.total_cmp(&a.score)
        } else {
            a.offer.price.total_cmp(&b.offer.price)
        }
    });
    matches.truncate(MAX_RESULTS);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(title: &str, description: &str, price: f64) -> Offer {
        Offer {
            title: title.to_string(),
            description: description.to_string(),
            price,
            store: "Kiwi".to_string(),
            quantity: None,
            unit: None,
            size: None,
            pieces: None,
            hotspot_id: None,
            run_from: None,
            run_till: None,
        }
    }

    #[test]
    fn title_match_outranks_description_match() {
        let offers = vec![
            offer("Noe annet", "inneholder xyzzy123", 20.0),
            offer("XYZZY123 Special", "", 30.0),
        ];
        let results = fallback_search("xyzzy123", &offers);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].offer.title, "XYZZY123 Special");
        assert_eq!(results[0].score, 0.8);
        assert_eq!(results[1].score, 0.4);
    }

    #[test]
    fn word_boundary_prevents_substring_hits() {
        let offers = vec![offer("Eggeplante", "", 15.0)];
        assert!(fallback_search("egg", &offers).is_empty());
    }

    #[test]
    fn expensive_offers_are_penalized_not_dropped() {
        let offers = vec![offer("Hummer", "", 299.0)];
        let results = fallback_search("hummer", &offers);
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn penalized_description_match_survives_at_low_score() {
        // 0.4 - 0.3 = 0.1: kept, not clamped upward.
        let offers = vec![offer("Gavekurv", "med hummer og vin", 450.0)];
        let results = fallback_search("hummer", &offers);
        assert_eq!(results.len(), 1);
        assert!((results[0].score - 0.1).abs() < 1e-9);
    }

    #[test]
    fn near_ties_order_by_ascending_price() {
        let offers = vec![
            offer("Torsk i biter", "", 89.0),
            offer("Torsk fersk", "", 49.0),
            offer("Torsk frossen", "", 69.0),
        ];
        let results = fallback_search("torsk", &offers);
        let prices: Vec<f64> = results.iter().map(|r| r.offer.price).collect();
        assert_eq!(prices, vec![49.0, 69.0, 89.0]);
    }

    #[test]
    fn caps_at_six_results() {
        let offers: Vec<Offer> = (0..10)
            .map(|i| offer(&format!("Torsk {i}"), "", 50.0 + i as f64))
            .collect();
        assert_eq!(fallback_search("torsk", &offers).len(), 6);
    }

    #[test]
    fn blank_ingredient_matches_nothing() {
        let offers = vec![offer("Melk", "", 20.0)];
        assert!(fallback_search("", &offers).is_empty());
        assert!(fallback_search("   ", &offers).is_empty());
    }
}
