pub mod market;
pub mod memory;
pub mod schema;
pub mod table;
pub mod tracker;

use anyhow::Context;

use chef_core::config::{resolve_with_base, TrackerSettings};
use chef_core::traits::PriceStore;

pub use market::{MarketScraper, Selectors};
pub use memory::MemoryPriceStore;
pub use table::LancePriceStore;
pub use tracker::{PriceTracker, ScrapeStatus, TrackOutcome, TrackReport, TrackerOptions};

/// Open the configured LanceDB store, or an in-memory one when `ephemeral`.
/// A relative `db_dir` is taken from the working directory.
pub async fn open_store(settings: &TrackerSettings, ephemeral: bool) -> anyhow::Result<Box<dyn PriceStore>> {
    if ephemeral {
        return Ok(Box::new(MemoryPriceStore::new()));
    }
    let dir = resolve_with_base(&std::env::current_dir()?, &settings.db_dir);
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let store = LancePriceStore::open(&dir.to_string_lossy(), &settings.table).await?;
    Ok(Box::new(store))
}

pub async fn tracker_from_settings(settings: &TrackerSettings, ephemeral: bool) -> anyhow::Result<PriceTracker<MarketScraper>> {
    let scraper = MarketScraper::from_settings(settings)?;
    let store = open_store(settings, ephemeral).await?;
    Ok(PriceTracker::new(scraper, store, TrackerOptions::from(settings)))
}
