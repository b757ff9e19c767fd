use std::fs;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use chef_core::config::Config;
use chef_core::forecast::forecast_next;
use chef_core::matching::{rank, score_recipe, MatchScore, RecipeMatch, UserIngredients};
use chef_core::prices::{daily_means, daily_summary_of};
use chef_core::session::Session;
use chef_core::types::{Ingredient, PriceObservation, Recipe};

fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
    Recipe {
        id: id.to_string(),
        name: format!("Recipe {id}"),
        instructions: "Mix and bake.".to_string(),
        ingredients: ingredients
            .iter()
            .map(|n| Ingredient { name: n.to_string(), measure: Some("1 cup".to_string()) })
            .collect(),
        source_url: None,
        video_url: None,
        category: Some("Dessert".to_string()),
        area: None,
        thumbnail: None,
    }
}

#[test]
fn env_file_overrides_base_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("config.toml"), "[recipes]\nmax_results = 4\n[tracker]\nspan = 3\n").unwrap();
    fs::write(dir.join("config.test.toml"), "[recipes]\nmax_results = 9\n").unwrap();

    let settings = Config::load_from_dir(dir, "test").unwrap().settings().unwrap();
    assert_eq!(settings.recipes.max_results, 9, "env file wins over base file");
    assert_eq!(settings.tracker.span, 3, "base file value survives");

    let settings = Config::load_from_dir(dir, "prod").unwrap().settings().unwrap();
    assert_eq!(settings.recipes.max_results, 4, "other env files are ignored");
}

#[test]
fn missing_files_fall_back_to_defaults() {
    let tmp = TempDir::new().unwrap();
    let settings = Config::load_from_dir(tmp.path(), "dev").unwrap().settings().unwrap();
    assert_eq!(settings.recipes.max_results, 3);
    assert_eq!(settings.tracker.table, "price_observations");
}

#[test]
fn best_recipe_ranks_first() {
    let user = UserIngredients::parse("egg, flour, sugar");
    let candidates: Vec<RecipeMatch> = [
        recipe("1", &["egg", "milk"]),
        recipe("2", &["egg", "flour", "sugar", "butter"]),
        recipe("3", &["rice"]),
    ]
    .into_iter()
    .map(|r| RecipeMatch { score: score_recipe(&r, &user), recipe: r })
    .collect();

    let ranked = rank(candidates, 10);
    assert_eq!(ranked[0].recipe.id, "2");
    assert_eq!(ranked[0].score, MatchScore { matches: 3, total: 4 });
    for pair in ranked.windows(2) {
        assert!(pair[0].score.matches >= pair[1].score.matches);
    }
    for m in &ranked {
        assert!(m.score.matches <= m.score.total);
    }

    let again = rank(ranked.clone(), 10);
    assert_eq!(again, ranked, "ranking a ranked list is a no-op");
}

#[test]
fn session_add_remove_clear() {
    let mut session = Session::new();
    let entry = |id: &str| RecipeMatch { recipe: recipe(id, &["egg"]), score: MatchScore { matches: 1, total: 1 } };

    assert!(session.add(entry("1")));
    assert!(!session.add(entry("1")), "same recipe is saved once");
    assert!(session.add(entry("2")));
    assert_eq!(session.len(), 2);

    assert_eq!(session.remove("1").map(|m| m.recipe.id), Some("1".to_string()));
    assert!(session.remove("1").is_none());
    assert_eq!(session.len(), 1);

    session.set_last_results(vec![entry("7"), entry("8")]);
    assert_eq!(session.save_from_last(1), Some(true));
    assert_eq!(session.save_from_last(5), None);

    session.clear();
    assert!(session.is_empty());
    assert_eq!(session.last_results().len(), 2, "clear only drops saved recipes");
}

#[test]
fn observations_to_forecast() {
    let at = |d: u32, h: u32| Utc.with_ymd_and_hms(2024, 5, d, h, 0, 0).unwrap();
    let history = vec![
        PriceObservation::new("cafe", "Café 500g", "https://m/1", 10.0, at(1, 9)),
        PriceObservation::new("cafe", "Café 1kg", "https://m/2", 10.0, at(1, 10)),
        PriceObservation::new("cafe", "Café 500g", "https://m/1", 20.0, at(2, 9)),
    ];
    let days = daily_summary_of(&history);
    assert_eq!(days.len(), 2);
    assert_eq!(daily_means(&days), vec![10.0, 20.0]);
    assert_eq!(forecast_next(&daily_means(&days), 7).unwrap(), 12.5);
}
