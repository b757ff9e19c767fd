//! Scrape, store, aggregate and forecast prices for one product keyword.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use chef_core::config::TrackerSettings;
use chef_core::forecast::{ewma, forecast_next, DEFAULT_SPAN};
use chef_core::prices::{daily_means, daily_summary_of, parse_price, summarize, DaySummary, PriceFormat, PriceStats};
use chef_core::traits::{ListingSource, PriceStore};
use chef_core::types::{Listing, PriceObservation};

#[derive(Debug, Clone, Copy)]
pub struct TrackerOptions {
    pub max_listings: usize,
    pub span: usize,
    pub price_format: PriceFormat,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self { max_listings: chef_core::config::DEFAULT_MAX_LISTINGS, span: DEFAULT_SPAN, price_format: PriceFormat::default() }
    }
}

impl From<&TrackerSettings> for TrackerOptions {
    fn from(s: &TrackerSettings) -> Self {
        Self { max_listings: s.max_listings, span: s.span, price_format: s.price_format }
    }
}

/// What happened to the scrape step of a [`PriceTracker::track`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeStatus {
    /// Observations for this keyword were already stored today.
    SkippedToday,
    /// `stored` observations appended, `dropped` listings had no readable price.
    Stored { stored: usize, dropped: usize },
    /// Fetching or storing failed; the report uses the existing history.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct TrackReport {
    pub keyword: String,
    pub scrape: Option<ScrapeStatus>,
    pub days: Vec<DaySummary>,
    pub overall: PriceStats,
    /// EWMA over the daily means, one value per entry of `days`.
    pub smoothed: Vec<f64>,
    pub forecast: f64,
}

#[derive(Debug, Clone)]
pub enum TrackOutcome {
    NeedKeyword,
    /// Nothing usable is stored for the keyword.
    NoData { keyword: String, scrape: Option<ScrapeStatus> },
    Report(TrackReport),
}

/// Lowercased, trimmed, single-spaced keyword; the storage key.
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Turn scraped listings into observations, dropping those whose price
/// cannot be parsed. Returns the observations and the dropped count.
pub fn ingest_listings(
    keyword: &str,
    listings: &[Listing],
    format: PriceFormat,
    now: DateTime<Utc>,
) -> (Vec<PriceObservation>, usize) {
    let mut out = Vec::with_capacity(listings.len());
    let mut dropped = 0;
    for l in listings {
        match parse_price(&l.price_text, format) {
            Some(price) => out.push(PriceObservation::new(keyword, &l.name, &l.url, price, now)),
            None => {
                dropped += 1;
                debug!("unreadable price {:?} for {:?}", l.price_text, l.name);
            }
        }
    }
    (out, dropped)
}

pub struct PriceTracker<L>
where
    L: ListingSource,
{
    listings: L,
    store: Box<dyn PriceStore>,
    options: TrackerOptions,
}

impl<L> PriceTracker<L>
where
    L: ListingSource,
{
    pub fn new(listings: L, store: Box<dyn PriceStore>, options: TrackerOptions) -> Self {
        Self { listings, store, options }
    }

    pub fn listings(&self) -> &L {
        &self.listings
    }

    pub fn store(&self) -> &dyn PriceStore {
        self.store.as_ref()
    }

    /// Scrape today's prices for `keyword` unless already stored, then
    /// report on the whole stored history.
    pub async fn track(&self, keyword: &str, now: DateTime<Utc>) -> anyhow::Result<TrackOutcome> {
        let keyword = normalize_keyword(keyword);
        if keyword.is_empty() {
            return Ok(TrackOutcome::NeedKeyword);
        }
        let scrape = self.scrape_once_per_day(&keyword, now).await;
        self.report(keyword, Some(scrape)).await
    }

    /// Report on stored history only.
    pub async fn history_report(&self, keyword: &str) -> anyhow::Result<TrackOutcome> {
        let keyword = normalize_keyword(keyword);
        if keyword.is_empty() {
            return Ok(TrackOutcome::NeedKeyword);
        }
        self.report(keyword, None).await
    }

    async fn scrape_once_per_day(&self, keyword: &str, now: DateTime<Utc>) -> ScrapeStatus {
        let today = now.date_naive();
        match self.store.exists_on(keyword, today).await {
            Ok(true) => {
                info!("{keyword:?} already scraped on {today}");
                return ScrapeStatus::SkippedToday;
            }
            Ok(false) => {}
            Err(e) => warn!("existence check failed for {keyword:?}, scraping anyway: {e:#}"),
        }

        let listings = match self.listings.search(keyword, self.options.max_listings).await {
            Ok(l) => l,
            Err(e) => {
                warn!("scrape failed for {keyword:?}: {e}");
                return ScrapeStatus::Failed(e.to_string());
            }
        };
        let (observations, dropped) = ingest_listings(keyword, &listings, self.options.price_format, now);
        if dropped > 0 {
            warn!("dropped {dropped} of {} listings with unreadable prices", listings.len());
        }
        match self.store.append(&observations).await {
            Ok(stored) => {
                info!("stored {stored} observations for {keyword:?}");
                ScrapeStatus::Stored { stored, dropped }
            }
            Err(e) => {
                warn!("storing observations for {keyword:?} failed: {e:#}");
                ScrapeStatus::Failed(format!("{e:#}"))
            }
        }
    }

    async fn report(&self, keyword: String, scrape: Option<ScrapeStatus>) -> anyhow::Result<TrackOutcome> {
        let history = self.store.history(&keyword).await?;
        let days = daily_summary_of(&history);
        let prices: Vec<f64> = history.iter().map(|o| o.price).collect();
        let Some(overall) = summarize(&prices).filter(|_| !days.is_empty()) else {
            return Ok(TrackOutcome::NoData { keyword, scrape });
        };
        let means = daily_means(&days);
        let smoothed = ewma(&means, self.options.span)?;
        let forecast = forecast_next(&means, self.options.span)?;
        Ok(TrackOutcome::Report(TrackReport { keyword, scrape, days, overall, smoothed, forecast }))
    }
}
