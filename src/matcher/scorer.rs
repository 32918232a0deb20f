// Candidate scoring for synset-driven matching.
use crate::synsets::Synset;

/// Score plus the human-readable reasons it was assembled from.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub score: f64,
    pub reasons: Vec<String>,
}

pub const HIT_WEIGHT: f64 = 0.35;
pub const EXACT_PHRASE_BONUS: f64 = 0.25;
pub const BRAND_BONUS: f64 = 0.20;
pub const EXCLUSION_PENALTY_STEP: f64 = 0.25;
pub const EXCLUSION_PENALTY_CAP: f64 = 0.6;
pub const PRICE_PENALTY_CAP: f64 = 0.4;

/// Combines the matcher's signals into one bounded relevance score.
///
/// Strict matching short-circuits everything: a synset flagged
/// `strictMatching` with any exclusion hit is disqualified outright.
pub fn score_candidate(
    synset: &Synset,
    price: f64,
    hits: u32,
    exclusion_count: u32,
    brand_boost: bool,
    exact_phrase: bool,
) -> Scored {
    if synset.strict_matching && exclusion_count > 0 {
        return Scored {
            score: 0.0,
            reasons: vec!["disqualified by strict matching".to_string()],
        };
    }

    let mut score = 0.0;
    let mut reasons = Vec::new();

    score += hits as f64 * HIT_WEIGHT;
    if hits > 0 {
        reasons.push(format!("{hits} synonym hits"));
    }

    if exact_phrase {
        score += EXACT_PHRASE_BONUS;
        reasons.push("exact phrase match".to_string());
    }

    if brand_boost {
        score += BRAND_BONUS;
        reasons.push("known brand".to_string());
    }

    if exclusion_count > 0 {
        let penalty =
            EXCLUSION_PENALTY_CAP.min(EXCLUSION_PENALTY_STEP * exclusion_count as f64);
        score -= penalty;
        reasons.push(format!("{exclusion_count} excluded terms (-{penalty:.2})"));
    }

    if let Some(max_price) = synset.max_price {
        if price > 0.0 && price > max_price {
            let penalty = PRICE_PENALTY_CAP.min((price - max_price) / max_price);
            score -= penalty;
            reasons.push(format!("expensive ({price:.0}kr > {max_price:.0}kr)"));
        }
    }

    let score = score.clamp(0.0, 1.0);
    if reasons.is_empty() {
        reasons.push("base match".to_string());
    }

    Scored { score, reasons }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn synset(strict: bool, max_price: Option<f64>) -> Synset {
        Synset {
            canonical: "kjøttdeig".to_string(),
            synonyms: vec!["kjøttdeig".to_string(), "kjøttfarse".to_string()],
            exclude: vec!["pølse".to_string()],
            brands: vec!["gilde".to_string()],
            category: Category::uncategorized(),
            max_price,
            strict_matching: strict,
        }
    }

    #[test]
    fn full_signal_score_clamps_to_one() {
        // 2 hits + exact phrase + brand = 0.70 + 0.25 + 0.20 = 1.15 → 1.0
        let scored = score_candidate(&synset(false, None), 39.9, 2, 0, true, true);
        assert_eq!(scored.score, 1.0);
        assert!(scored.reasons.contains(&"2 synonym hits".to_string()));
        assert!(scored.reasons.contains(&"exact phrase match".to_string()));
        assert!(scored.reasons.contains(&"known brand".to_string()));
    }

    #[test]
    fn strict_matching_disqualifies_regardless_of_signals() {
        let scored = score_candidate(&synset(true, None), 39.9, 5, 1, true, true);
        assert_eq!(scored.score, 0.0);
        assert_eq!(
            scored.reasons,
            vec!["disqualified by strict matching".to_string()]
        );
    }

    #[test]
    fn exclusions_penalize_without_strict_mode() {
        let one = score_candidate(&synset(false, None), 0.0, 2, 1, false, true);
        // 0.70 + 0.25 - 0.25 = 0.70
        assert!((one.score - 0.70).abs() < 1e-9);

        // Penalty caps at 0.6 even with many exclusion hits.
        let many = score_candidate(&synset(false, None), 0.0, 2, 5, false, true);
        assert!((many.score - (0.95 - 0.6)).abs() < 1e-9);
    }

    #[test]
    fn price_over_ceiling_penalizes_with_cap() {
        // price 120 vs ceiling 80 → (120-80)/80 = 0.5, capped at 0.4
        let scored = score_candidate(&synset(false, Some(80.0)), 120.0, 2, 0, false, true);
        assert!((scored.score - (0.95 - 0.4)).abs() < 1e-9);
        assert!(scored.reasons.iter().any(|r| r.starts_with("expensive")));

        // Mild overage uses the proportional penalty.
        let mild = score_candidate(&synset(false, Some(80.0)), 88.0, 2, 0, false, true);
        assert!((mild.score - (0.95 - 0.1)).abs() < 1e-9);
    }

    #[test]
    fn unknown_price_is_not_penalized() {
        let scored = score_candidate(&synset(false, Some(80.0)), 0.0, 1, 0, false, false);
        assert!((scored.score - 0.35).abs() < 1e-9);
    }

    #[test]
    fn score_never_goes_negative() {
        let scored = score_candidate(&synset(false, Some(10.0)), 500.0, 1, 2, false, false);
        assert_eq!(scored.score, 0.0);
    }
}
