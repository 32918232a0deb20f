mod category;
mod config;
mod engine;
mod ingest;
mod matcher;
mod model;
mod optimizer;
mod quantity;
mod synsets;
mod text;

use std::sync::Arc;

use tracing::{error, info, warn};

use category::CategoryTagger;
use config::load_config;
use engine::Engine;
use quantity::calculate_unit_price;
use synsets::SynsetRegistry;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let ingredients: Vec<String> = std::env::args().skip(1).collect();
    if ingredients.is_empty() {
        error!("Usage: tilbudsjeger <ingredient> [<ingredient> ...]");
        return;
    }

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let registry = Arc::new(SynsetRegistry::load(&config.synsets_file));
    if registry.is_empty() {
        warn!("Synset table is empty; all queries will use fallback search");
    }
    let tagger = CategoryTagger::load(&config.categories_file);

    let offers = ingest::load_offers_dir(&config.offers_dir).await;
    if offers.is_empty() {
        warn!("No offers loaded from {}", config.offers_dir.display());
    }

    let engine = Engine::new(registry);
    let groups = engine.get_best_offers(&ingredients, &offers);

    for group in &groups {
        if group.offers.is_empty() {
            info!("\"{}\": no matching offers", group.ingredient);
            continue;
        }
        info!(
            "\"{}\" ({}) — recommended store: {}",
            group.ingredient,
            group.canonical,
            group.recommended_store.as_deref().unwrap_or("none")
        );
        for m in &group.offers {
            let unit_price = calculate_unit_price(&m.offer)
                .map(|up| format!(" ({:.2} kr/{})", up.price, up.unit))
                .unwrap_or_default();
            info!(
                "  {:.2} kr{} | {} | {} (score {:.2}: {}) [{}]",
                m.offer.price,
                unit_price,
                m.offer.store,
                m.offer.title,
                m.score,
                m.reasons.join(", "),
                tagger.tag_product(&m.offer.title).join(", ")
            );
        }
    }
}
