use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::LookupResult;
use crate::types::{Listing, PriceObservation, Recipe, RecipeId};

#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Identifiers of recipes that use `ingredient`. An ingredient nobody
    /// cooks with yields an empty list, not an error.
    async fn ids_for_ingredient(&self, ingredient: &str) -> LookupResult<Vec<RecipeId>>;
    /// Full record for one identifier.
    async fn recipe(&self, id: &str) -> LookupResult<Recipe>;
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> LookupResult<String>;
}

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn search(&self, keyword: &str, limit: usize) -> LookupResult<Vec<Listing>>;
}

#[async_trait]
pub trait PriceStore: Send + Sync {
    async fn append(&self, observations: &[PriceObservation]) -> anyhow::Result<usize>;
    async fn exists_on(&self, keyword: &str, day: NaiveDate) -> anyhow::Result<bool>;
    /// Every observation for `keyword`, oldest capture first.
    async fn history(&self, keyword: &str) -> anyhow::Result<Vec<PriceObservation>>;
}
