// Text normalization and tokenization for free-text product titles.
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Lowercases, folds Norwegian letters to ASCII digraphs (æ→ae, ø→o, å→aa),
/// turns list punctuation into spaces and collapses whitespace.
/// Pure and total: empty input gives an empty string, and the output is a
/// fixed point (`normalize(normalize(x)) == normalize(x)`).
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        match ch {
            'æ' => out.push_str("ae"),
            'ø' => out.push('o'),
            'å' => out.push_str("aa"),
            ',' | ';' | ':' | '(' | ')' | '[' | ']' | '{' | '}' => out.push(' '),
            c => out.push(c),
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalizes, then additionally splits on hyphen-like separators so that
/// "jasmin-ris" and "2×pk" both break into comparable word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split(|c: char| {
            c.is_whitespace()
                || matches!(c, '-' | '–' | '—' | '_' | '/' | '+' | '×')
        })
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// Grocery brands recognized in Norwegian catalogs. Single-token brands only;
/// multi-word names are matched against token pairs in `parse_attributes`.
static BRANDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "tine", "q", "synnove", "prior", "gilde", "first price", "rema",
        "eldorado", "toro", "freia", "uncle ben", "nortura", "leroy",
        "salmar", "stabburet", "finsbraaten", "jarlsberg", "president",
        "bakehuset", "mutti", "santa maria", "old el paso", "barilla",
        "mission",
    ]
    .into_iter()
    .collect()
});

static ORGANIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(oko|okologisk|organic|naturell)\b").unwrap());
static LACTOSE_FREE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(laktosefri|laktosefritt|lactose free)\b").unwrap());
static FROZEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(frossen|fryst|dypfryst|frozen)\b").unwrap());
static FRESH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(fersk|fresh|ferskt)\b").unwrap());
static LOW_FAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(lett|light|low fat|lavt fettinnhold)\b").unwrap());

/// Product attributes detected from a title.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attributes {
    pub brand: Option<String>,
    pub organic: bool,
    pub lactose_free: bool,
    pub frozen: bool,
    pub fresh: bool,
    pub low_fat: bool,
}

/// Scans a title for a known brand token and common Norwegian product
/// qualifiers. Matching happens on the normalized form, so "Økologisk"
/// is found as "okologisk".
pub fn parse_attributes(text: &str) -> Attributes {
    let normalized = normalize(text);
    let tokens = tokenize(text);

    let mut brand = tokens
        .iter()
        .find(|t| BRANDS.contains(t.as_str()))
        .cloned();
    if brand.is_none() {
        // Multi-word brands ("first price", "santa maria") live in the
        // normalized string, not in single tokens.
        brand = BRANDS
            .iter()
            .filter(|b| b.contains(' '))
            .find(|b| normalized.contains(*b))
            .map(|b| b.to_string());
    }

    Attributes {
        brand,
        organic: ORGANIC_RE.is_match(&normalized),
        lactose_free: LACTOSE_FREE_RE.is_match(&normalized),
        frozen: FROZEN_RE.is_match(&normalized),
        fresh: FRESH_RE.is_match(&normalized),
        low_fat: LOW_FAT_RE.is_match(&normalized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_norwegian_letters() {
        assert_eq!(normalize("Kjøttdeig"), "kjottdeig");
        assert_eq!(normalize("Blåbær"), "blaabaer");
        assert_eq!(normalize("RØMME"), "romme");
    }

    #[test]
    fn normalize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(normalize("Gilde; Kjøttdeig (400g)"), "gilde kjottdeig 400g");
        assert_eq!(normalize("  a ,  b  "), "a b");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["Gilde Kjøttdeig 400g", "Blåbær, økologisk", "", "a-b/c"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn normalize_of_empty_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn tokenize_splits_separators() {
        assert_eq!(
            tokenize("Jasmin-ris 2×500g"),
            vec!["jasmin", "ris", "2", "500g"]
        );
        assert_eq!(tokenize("melk/fløte"), vec!["melk", "flote"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn attributes_detect_brand_and_flags() {
        let attrs = parse_attributes("Gilde Kjøttdeig Økologisk 400g");
        assert_eq!(attrs.brand.as_deref(), Some("gilde"));
        assert!(attrs.organic);
        assert!(!attrs.frozen);
    }

    #[test]
    fn attributes_detect_multi_word_brand() {
        let attrs = parse_attributes("First Price Spaghetti 1kg");
        assert_eq!(attrs.brand.as_deref(), Some("first price"));
    }

    #[test]
    fn attributes_empty_title() {
        assert_eq!(parse_attributes(""), Attributes::default());
    }
}
