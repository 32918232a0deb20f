// Offer ingestion: maps the duck-typed catalog shapes into canonical
// `Offer` records, extracts numeric prices and filters duplicates.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use futures::future::join_all;
use serde::Deserialize;
use tracing::{info, warn};

use crate::model::{DataError, Offer};

/// Raw catalog record as it appears on disk. Field shapes vary per source:
/// the title may live under `heading`, the price may be flat, nested under
/// `pricing` or an object with a `value`, the store under `dealer.name`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawOffer {
    pub title: Option<String>,
    pub heading: Option<String>,
    pub description: Option<String>,
    pub price: Option<PriceField>,
    pub pricing: Option<Pricing>,
    pub price_text: Option<String>,
    pub store: Option<String>,
    pub dealer: Option<Dealer>,
    pub quantity: Option<String>,
    pub unit: Option<String>,
    pub size: Option<f64>,
    pub pieces: Option<u32>,
    pub hotspot_id: Option<String>,
    pub run_from: Option<String>,
    pub run_till: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pricing {
    pub price: Option<PriceField>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dealer {
    #[serde(default)]
    pub name: Option<String>,
}

/// A price as the catalogs deliver it: a number, free text ("129,-") or an
/// object carrying the number under `value`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PriceField {
    Number(f64),
    Text(String),
    Object { value: f64 },
}

/// Reads the price from the prioritized field set (pricing.price, price,
/// priceText) and parses it to a float. Never fails: anything unparseable
/// comes back as 0.0.
pub fn extract_price(raw: &RawOffer) -> f64 {
    let field = raw
        .pricing
        .as_ref()
        .and_then(|p| p.price.as_ref())
        .or(raw.price.as_ref());

    match field {
        Some(PriceField::Number(n)) => *n,
        Some(PriceField::Object { value }) => *value,
        Some(PriceField::Text(s)) => parse_price_text(s),
        None => raw.price_text.as_deref().map(parse_price_text).unwrap_or(0.0),
    }
}

fn parse_price_text(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    // "129,-" cleans to "129.-"; trim trailing separators before parsing.
    cleaned
        .trim_end_matches(['.', '-'])
        .parse::<f64>()
        .unwrap_or(0.0)
}

/// Canonicalizes one raw record. Records without any title are dropped.
pub fn canonicalize(raw: RawOffer, fallback_store: &str) -> Option<Offer> {
    let title = raw
        .title
        .clone()
        .or_else(|| raw.heading.clone())
        .filter(|t| !t.trim().is_empty())?;

    let store = raw
        .store
        .clone()
        .or_else(|| raw.dealer.as_ref().and_then(|d| d.name.clone()))
        .unwrap_or_else(|| fallback_store.to_string());

    let price = extract_price(&raw);

    Some(Offer {
        title,
        description: raw.description.unwrap_or_default(),
        price,
        store,
        quantity: raw.quantity,
        unit: raw.unit,
        size: raw.size,
        pieces: raw.pieces,
        hotspot_id: raw.hotspot_id,
        run_from: raw.run_from.as_deref().and_then(parse_date),
        run_till: raw.run_till.as_deref().and_then(parse_date),
    })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    // Catalog timestamps are RFC 3339 or bare ISO dates.
    text.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

/// Drops duplicate offers by business key: `hotspotId` when present, else
/// title + store + price + unit. First occurrence wins.
pub fn dedup_offers(offers: Vec<Offer>) -> Vec<Offer> {
    let mut seen = HashSet::new();
    offers
        .into_iter()
        .filter(|o| {
            let key = match &o.hotspot_id {
                Some(id) => format!("id:{id}"),
                None => format!(
                    "{}|{}|{}|{}",
                    o.title,
                    o.store,
                    o.price,
                    o.unit.as_deref().unwrap_or("")
                ),
            };
            seen.insert(key)
        })
        .collect()
}

/// "rema_1000" → "Rema 1000".
pub fn store_name_from_stem(stem: &str) -> String {
    stem.trim_end_matches("_offers")
        .split('_')
        .filter(|p| !p.is_empty())
        .map(|p| {
            let mut chars = p.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Loads every `*_offers.json` file under `dir` concurrently, canonicalizes
/// and deduplicates the combined corpus. Unreadable files are skipped with a
/// warning; an empty or missing directory yields an empty corpus.
pub async fn load_offers_dir(dir: &Path) -> Vec<Offer> {
    let mut paths: Vec<PathBuf> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect(),
        Err(e) => {
            warn!("Could not read offers directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };
    paths.sort();

    let loads = paths.iter().map(|path| async move {
        match load_offers_file(path).await {
            Ok(offers) => {
                info!("Loaded {} offers from {}", offers.len(), path.display());
                offers
            }
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                Vec::new()
            }
        }
    });

    let all: Vec<Offer> = join_all(loads).await.into_iter().flatten().collect();
    let deduped = dedup_offers(all);
    info!("Offer corpus ready: {} offers after dedup", deduped.len());
    deduped
}

async fn load_offers_file(path: &Path) -> Result<Vec<Offer>, DataError> {
    let content = tokio::fs::read_to_string(path).await?;
    let raw: Vec<RawOffer> = serde_json::from_str(&content)?;

    let fallback_store = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(store_name_from_stem)
        .unwrap_or_else(|| "Ukjent".to_string());

    Ok(raw
        .into_iter()
        .filter_map(|r| canonicalize(r, &fallback_store))
        .collect())
}
