//! Domain types shared by the recipe matcher and the price tracker.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub type RecipeId = String;

/// Lookup services expose at most this many ingredient slots per recipe.
pub const MAX_INGREDIENT_SLOTS: usize = 20;

/// One ingredient slot of a recipe, in source order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub measure: Option<String>,
}

/// A full recipe record as returned by the detail lookup.
///
/// - `id`: opaque identifier assigned by the lookup service
/// - `ingredients`: non-empty ingredient slots, trimmed, in slot order (1..20)
/// - `source_url`/`video_url`: optional links shown next to the recipe
/// - `category`/`area`: optional tags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub instructions: String,
    pub ingredients: Vec<Ingredient>,
    pub source_url: Option<String>,
    pub video_url: Option<String>,
    pub category: Option<String>,
    pub area: Option<String>,
    pub thumbnail: Option<String>,
}

impl Recipe {
    pub fn ingredient_names(&self) -> impl Iterator<Item = &str> {
        self.ingredients.iter().map(|i| i.name.as_str())
    }
}

/// A product entry scraped from a marketplace search page, before its price
/// text has been parsed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    pub name: String,
    pub url: String,
    pub price_text: String,
}

/// A single stored price reading. Observations are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceObservation {
    pub keyword: String,
    pub name: String,
    pub url: String,
    pub price: f64,
    pub captured_at: DateTime<Utc>,
    pub day: NaiveDate,
}

impl PriceObservation {
    pub fn new(keyword: &str, name: &str, url: &str, price: f64, captured_at: DateTime<Utc>) -> Self {
        Self {
            keyword: keyword.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            price,
            captured_at,
            day: captured_at.date_naive(),
        }
    }
}
