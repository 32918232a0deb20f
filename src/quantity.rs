// Pack-size and unit-price parsing from free-text quantity strings.
//
// Accepted pack-size grammar (case-insensitive):
//   [ COUNT ("x" | "×" | "stk" | "stk.") ] AMOUNT UNIT
//   AMOUNT  = digits with optional "," or "." decimal separator
//   UNIT    = kg | g | hg | l | dl | cl | ml | stk
// Base-unit conversion: kg×1000, hg×100 → g; l×1000, dl×100, cl×10 → ml.
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::model::Offer;

static PACK_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(\d+)\s*(?:x|×|stk\.?)\s*)?(\d+[.,]?\d*)\s*(kg|g|hg|l|dl|cl|ml|stk)\b")
        .unwrap()
});

// "4 × 100g", "2 x 0,5l" — leading piece count of a multi-pack quantity.
static MULTI_PACK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*[×x]\s*[\d.,]+[a-zA-Z]+").unwrap());

/// Parsed pack size, normalized to grams or milliliters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackSize {
    pub count: u32,
    pub amount: f64,
    pub unit: String,
    /// `count` × amount converted to `base_unit`. For unit "stk" there is no
    /// conversion; the value is piece-based and must not be compared against
    /// gram/milliliter totals.
    pub total_amount: f64,
    pub base_unit: &'static str,
}

/// Extracts the first pack-size expression from `text`, or None when the
/// grammar above does not match.
pub fn parse_pack_size(text: &str) -> Option<PackSize> {
    let caps = PACK_SIZE_RE.captures(text)?;

    let count: u32 = caps
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(1);
    let amount: f64 = caps.get(2)?.as_str().replace(',', ".").parse().ok()?;
    let unit = caps.get(3)?.as_str().to_lowercase();

    let amount_in_base = match unit.as_str() {
        "kg" | "l" => amount * 1000.0,
        "hg" | "dl" => amount * 100.0,
        "cl" => amount * 10.0,
        _ => amount,
    };
    let base_unit = match unit.as_str() {
        "l" | "dl" | "cl" | "ml" => "ml",
        _ => "g",
    };

    Some(PackSize {
        count,
        amount,
        unit,
        total_amount: count as f64 * amount_in_base,
        base_unit,
    })
}

/// Per-kg or per-liter price derived from an offer's structured size fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitPrice {
    pub price: f64,
    /// "kg" or "l".
    pub unit: &'static str,
}

/// Derives a normalized comparison price for display. Multi-pack piece counts
/// are taken from the quantity string ("6 × 1.5l") when present, else from
/// the `pieces` field. Returns None for unknown units or non-positive sizes.
pub fn calculate_unit_price(offer: &Offer) -> Option<UnitPrice> {
    let size = offer.size.filter(|&s| s > 0.0)?;
    let unit = offer.unit.as_deref()?;
    if offer.price <= 0.0 {
        return None;
    }

    let mut pieces = offer.pieces.unwrap_or(1).max(1);
    if let Some(quantity) = &offer.quantity {
        if let Some(caps) = MULTI_PACK_RE.captures(quantity) {
            if let Ok(n) = caps[1].parse::<u32>() {
                pieces = n;
            }
        }
    }

    let total_size = size * pieces as f64;
    match unit {
        "g" => Some(UnitPrice {
            price: offer.price / total_size * 1000.0,
            unit: "kg",
        }),
        "ml" => Some(UnitPrice {
            price: offer.price / total_size * 1000.0,
            unit: "l",
        }),
        "l" => Some(UnitPrice {
            price: offer.price / total_size,
            unit: "l",
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(price: f64, size: Option<f64>, unit: Option<&str>) -> Offer {
        Offer {
            title: String::new(),
            description: String::new(),
            price,
            store: String::new(),
            quantity: None,
            unit: unit.map(str::to_string),
            size,
            pieces: None,
            hotspot_id: None,
            run_from: None,
            run_till: None,
        }
    }

    #[test]
    fn parses_multi_pack_with_multiplication_sign() {
        let ps = parse_pack_size("6 × 1.5l").unwrap();
        assert_eq!(ps.count, 6);
        assert_eq!(ps.amount, 1.5);
        assert_eq!(ps.unit, "l");
        assert_eq!(ps.total_amount, 9000.0);
        assert_eq!(ps.base_unit, "ml");
    }

    #[test]
    fn parses_plain_mass() {
        let ps = parse_pack_size("Kjøttdeig 400g").unwrap();
        assert_eq!(ps.count, 1);
        assert_eq!(ps.amount, 400.0);
        assert_eq!(ps.unit, "g");
        assert_eq!(ps.total_amount, 400.0);
        assert_eq!(ps.base_unit, "g");
    }

    #[test]
    fn parses_comma_decimal_and_all_units() {
        let ps = parse_pack_size("0,5 kg").unwrap();
        assert_eq!(ps.total_amount, 500.0);
        assert_eq!(parse_pack_size("3 dl").unwrap().total_amount, 300.0);
        assert_eq!(parse_pack_size("25 cl").unwrap().total_amount, 250.0);
        assert_eq!(parse_pack_size("2 hg").unwrap().total_amount, 200.0);
        assert_eq!(parse_pack_size("330 ml").unwrap().total_amount, 330.0);
    }

    #[test]
    fn stk_has_no_base_conversion() {
        let ps = parse_pack_size("4 stk").unwrap();
        assert_eq!(ps.unit, "stk");
        assert_eq!(ps.total_amount, 4.0);
        assert_eq!(ps.base_unit, "g");
    }

    #[test]
    fn no_match_returns_none() {
        assert!(parse_pack_size("Fersk laksefilet").is_none());
        assert!(parse_pack_size("").is_none());
    }

    #[test]
    fn unit_price_per_kg() {
        let up = calculate_unit_price(&offer(40.0, Some(400.0), Some("g"))).unwrap();
        assert_eq!(up.unit, "kg");
        assert!((up.price - 100.0).abs() < 1e-9);
    }

    #[test]
    fn unit_price_multi_pack_from_quantity_string() {
        let mut o = offer(90.0, Some(1.5), Some("l"));
        o.quantity = Some("6 × 1.5l".to_string());
        let up = calculate_unit_price(&o).unwrap();
        assert_eq!(up.unit, "l");
        assert!((up.price - 10.0).abs() < 1e-9);
    }

    #[test]
    fn unit_price_rejects_unknown_unit_and_bad_size() {
        assert!(calculate_unit_price(&offer(40.0, Some(4.0), Some("stk"))).is_none());
        assert!(calculate_unit_price(&offer(40.0, Some(0.0), Some("g"))).is_none());
        assert!(calculate_unit_price(&offer(40.0, None, Some("g"))).is_none());
        assert!(calculate_unit_price(&offer(0.0, Some(400.0), Some("g"))).is_none());
    }
}
