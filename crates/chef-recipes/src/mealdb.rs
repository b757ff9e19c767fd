//! Client for TheMealDB-style recipe APIs.
//!
//! Wire records carry up to twenty `strIngredientN`/`strMeasureN` pairs as
//! loose keys; they are folded into a typed [`Recipe`] here so nothing past
//! this module does dynamic key lookups.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use chef_core::config::RecipeSettings;
use chef_core::error::{LookupError, LookupResult};
use chef_core::traits::RecipeSource;
use chef_core::types::{Ingredient, Recipe, RecipeId, MAX_INGREDIENT_SLOTS};

use crate::http::{build_client, send_json};

#[derive(Debug, Deserialize)]
struct FilterResponse {
    meals: Option<Vec<MealRef>>,
}

#[derive(Debug, Deserialize)]
struct MealRef {
    #[serde(rename = "idMeal")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    meals: Option<Vec<RawMeal>>,
}

#[derive(Debug, Deserialize)]
pub struct RawMeal {
    #[serde(rename = "idMeal")]
    id: Option<String>,
    #[serde(rename = "strMeal")]
    name: Option<String>,
    #[serde(rename = "strInstructions")]
    instructions: Option<String>,
    #[serde(rename = "strSource")]
    source: Option<String>,
    #[serde(rename = "strYoutube")]
    youtube: Option<String>,
    #[serde(rename = "strCategory")]
    category: Option<String>,
    #[serde(rename = "strArea")]
    area: Option<String>,
    #[serde(rename = "strMealThumb")]
    thumbnail: Option<String>,
    #[serde(flatten)]
    slots: HashMap<String, Value>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl RawMeal {
    fn slot(&self, key: &str, i: usize) -> Option<String> {
        self.slots
            .get(&format!("{key}{i}"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}

impl TryFrom<RawMeal> for Recipe {
    type Error = LookupError;

    fn try_from(raw: RawMeal) -> Result<Self, Self::Error> {
        let ingredients = (1..=MAX_INGREDIENT_SLOTS)
            .filter_map(|i| {
                raw.slot("strIngredient", i)
                    .map(|name| Ingredient { name, measure: raw.slot("strMeasure", i) })
            })
            .collect();
        let id = non_blank(raw.id).ok_or_else(|| LookupError::Malformed("recipe without idMeal".into()))?;
        let name = non_blank(raw.name)
            .ok_or_else(|| LookupError::Malformed(format!("recipe {id} without strMeal")))?;
        Ok(Recipe {
            id,
            name,
            instructions: raw.instructions.unwrap_or_default().trim().to_string(),
            ingredients,
            source_url: non_blank(raw.source),
            video_url: non_blank(raw.youtube),
            category: non_blank(raw.category),
            area: non_blank(raw.area),
            thumbnail: non_blank(raw.thumbnail),
        })
    }
}

/// Decode a `filter.php` body. `{"meals": null}` means no recipe uses the
/// ingredient.
pub fn parse_filter(body: &str) -> LookupResult<Vec<RecipeId>> {
    let resp: FilterResponse = serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    Ok(recipe_ids(resp))
}

fn recipe_ids(resp: FilterResponse) -> Vec<RecipeId> {
    resp.meals.unwrap_or_default().into_iter().map(|m| m.id).collect()
}

/// Decode a `lookup.php` body into the first record it contains.
pub fn parse_lookup(body: &str, id: &str) -> LookupResult<Recipe> {
    let resp: LookupResponse = serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;
    first_recipe(resp, id)
}

fn first_recipe(resp: LookupResponse, id: &str) -> LookupResult<Recipe> {
    resp.meals
        .and_then(|meals| meals.into_iter().next())
        .ok_or_else(|| LookupError::NotFound(format!("recipe {id}")))?
        .try_into()
}

pub struct MealDbClient {
    http: reqwest::Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self { http: build_client(timeout)?, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn from_settings(settings: &RecipeSettings) -> anyhow::Result<Self> {
        Self::new(&settings.base_url, Duration::from_secs(settings.timeout_secs))
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn ids_for_ingredient(&self, ingredient: &str) -> LookupResult<Vec<RecipeId>> {
        debug!("filter by ingredient {ingredient:?}");
        let request = self.http.get(self.endpoint("filter.php")).query(&[("i", ingredient)]);
        let resp: FilterResponse = send_json(request).await?;
        Ok(recipe_ids(resp))
    }

    async fn recipe(&self, id: &str) -> LookupResult<Recipe> {
        debug!("lookup recipe {id}");
        let request = self.http.get(self.endpoint("lookup.php")).query(&[("i", id)]);
        let resp: LookupResponse = send_json(request).await?;
        first_recipe(resp, id)
    }
}
