use std::time::Duration;

use chef_core::config::RecipeSettings;

mod http;
pub mod libre;
pub mod mealdb;
pub mod search;

pub use libre::LibreTranslateClient;
pub use mealdb::MealDbClient;
pub use search::{Languages, LocalizedRecipe, RecipeFinder, SearchOptions, SearchOutcome, SearchResults};

/// Build a finder talking to the configured MealDB endpoint, with
/// translation enabled only when a translation URL and both languages are set.
pub fn finder_from_settings(settings: &RecipeSettings, show_progress: bool) -> anyhow::Result<RecipeFinder<MealDbClient>> {
    let options = SearchOptions {
        max_candidates: settings.max_candidates,
        max_results: settings.max_results,
        languages: None,
        show_progress,
    };
    let finder = RecipeFinder::new(MealDbClient::from_settings(settings)?, options);

    let (Some(url), Some(user), Some(lookup)) = (&settings.translate_url, &settings.user_lang, &settings.lookup_lang) else {
        return Ok(finder);
    };
    let translator = LibreTranslateClient::new(url, settings.translate_api_key.clone(), Duration::from_secs(settings.timeout_secs))?;
    Ok(finder.with_translator(Box::new(translator), Languages { user: user.clone(), lookup: lookup.clone() }))
}
