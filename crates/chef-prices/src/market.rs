//! Marketplace search-page scraper.
//!
//! Which elements hold a product, its name, link and price is configuration
//! (CSS selectors), so a layout change on the marketplace needs no rebuild.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};
use url::form_urlencoded::byte_serialize;

use chef_core::config::TrackerSettings;
use chef_core::error::{LookupError, LookupResult};
use chef_core::traits::ListingSource;
use chef_core::types::Listing;

pub struct Selectors {
    item: Selector,
    name: Selector,
    link: Selector,
    price: Selector,
}

fn selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow::anyhow!("Invalid selector {:?}: {}", css, e))
}

impl Selectors {
    pub fn new(item: &str, name: &str, link: &str, price: &str) -> anyhow::Result<Self> {
        Ok(Self { item: selector(item)?, name: selector(name)?, link: selector(link)?, price: selector(price)? })
    }

    pub fn from_settings(settings: &TrackerSettings) -> anyhow::Result<Self> {
        Self::new(&settings.item_selector, &settings.name_selector, &settings.link_selector, &settings.price_selector)
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Substitute the keyword into the search URL template. Each word is
/// percent-encoded as a URL component and words are joined with `-`.
pub fn search_url(template: &str, keyword: &str) -> LookupResult<Url> {
    let slug = keyword
        .split_whitespace()
        .map(|w| byte_serialize(w.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("-");
    let raw = template.replace("{query}", &slug);
    Url::parse(&raw).map_err(|e| LookupError::Malformed(format!("bad search url {raw:?}: {e}")))
}

/// Extract up to `limit` listings from a results page. Entries missing a
/// name, link or price are skipped; relative links are resolved against
/// `page_url`.
pub fn parse_listings(html: &str, selectors: &Selectors, page_url: &Url, limit: usize) -> Vec<Listing> {
    let doc = Html::parse_document(html);
    let mut out = Vec::new();
    for item in doc.select(&selectors.item) {
        if out.len() >= limit {
            break;
        }
        let name = item.select(&selectors.name).next().map(text_of).filter(|s| !s.is_empty());
        let href = item.select(&selectors.link).next().and_then(|a| a.value().attr("href"));
        let price_text = item.select(&selectors.price).next().map(text_of).filter(|s| !s.is_empty());
        let (Some(name), Some(href), Some(price_text)) = (name, href, price_text) else {
            debug!("skipping incomplete listing");
            continue;
        };
        let Ok(url) = page_url.join(href) else {
            debug!("skipping listing with bad link {href:?}");
            continue;
        };
        out.push(Listing { name, url: url.to_string(), price_text });
    }
    out
}

pub struct MarketScraper {
    http: reqwest::Client,
    search_url: String,
    selectors: Selectors,
}

impl MarketScraper {
    pub fn new(search_url: &str, selectors: Selectors, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chef-prices/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, search_url: search_url.to_string(), selectors })
    }

    pub fn from_settings(settings: &TrackerSettings) -> anyhow::Result<Self> {
        Self::new(&settings.search_url, Selectors::from_settings(settings)?, Duration::from_secs(settings.timeout_secs))
    }
}

fn classify(e: reqwest::Error) -> LookupError {
    if e.is_timeout() { LookupError::Timeout(e.to_string()) } else { LookupError::Network(e.to_string()) }
}

#[async_trait]
impl ListingSource for MarketScraper {
    async fn search(&self, keyword: &str, limit: usize) -> LookupResult<Vec<Listing>> {
        let url = search_url(&self.search_url, keyword)?;
        debug!("fetching {url}");
        let response = self.http.get(url.clone()).send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status { status: status.as_u16(), url: url.to_string() });
        }
        let body = response.text().await.map_err(classify)?;
        let listings = parse_listings(&body, &self.selectors, &url, limit);
        if listings.is_empty() {
            warn!("no listings parsed from {url}; selectors may be stale");
        }
        Ok(listings)
    }
}
