use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use chef_core::error::{LookupError, LookupResult};
use chef_core::matching::MatchScore;
use chef_core::traits::{RecipeSource, Translator};
use chef_core::types::{Ingredient, Recipe, RecipeId};
use chef_recipes::search::id_order;
use chef_recipes::{Languages, RecipeFinder, SearchOptions, SearchOutcome};

#[derive(Default)]
struct FakeSource {
    by_ingredient: HashMap<String, Vec<RecipeId>>,
    recipes: HashMap<RecipeId, Recipe>,
    fail_all: bool,
    calls: AtomicUsize,
}

impl FakeSource {
    fn with_recipe(mut self, id: &str, ingredients: &[&str]) -> Self {
        for name in ingredients {
            self.by_ingredient.entry(name.to_string()).or_default().push(id.to_string());
        }
        self.recipes.insert(
            id.to_string(),
            Recipe {
                id: id.to_string(),
                name: format!("Recipe {id}"),
                instructions: "Cook it.".to_string(),
                ingredients: ingredients.iter().map(|n| Ingredient { name: n.to_string(), measure: None }).collect(),
                source_url: None,
                video_url: None,
                category: None,
                area: None,
                thumbnail: None,
            },
        );
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecipeSource for FakeSource {
    async fn ids_for_ingredient(&self, ingredient: &str) -> LookupResult<Vec<RecipeId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            return Err(LookupError::Timeout("filter".into()));
        }
        Ok(self.by_ingredient.get(ingredient).cloned().unwrap_or_default())
    }

    async fn recipe(&self, id: &str) -> LookupResult<Recipe> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_all {
            return Err(LookupError::Network("lookup".into()));
        }
        self.recipes.get(id).cloned().ok_or_else(|| LookupError::NotFound(id.to_string()))
    }
}

fn options(max_results: usize) -> SearchOptions {
    SearchOptions { max_results, ..SearchOptions::default() }
}

#[tokio::test]
async fn egg_flour_sugar_scores_three_of_four() {
    let source = FakeSource::default()
        .with_recipe("10", &["egg", "flour", "sugar", "butter"])
        .with_recipe("20", &["egg", "milk"]);
    let finder = RecipeFinder::new(source, options(5));

    let SearchOutcome::Found(results) = finder.find("egg, flour, sugar").await else {
        panic!("expected results");
    };
    assert_eq!(results.matches[0].recipe.id, "10");
    assert_eq!(results.matches[0].score, MatchScore { matches: 3, total: 4 });
    assert_eq!(results.matches[1].score, MatchScore { matches: 1, total: 2 });
}

#[tokio::test]
async fn blank_input_makes_no_calls() {
    let source = FakeSource::default().with_recipe("1", &["egg"]);
    let finder = RecipeFinder::new(source, options(3));
    for input in ["", "   ", " , ,"] {
        assert!(matches!(finder.find(input).await, SearchOutcome::NeedIngredients));
    }
    assert_eq!(finder.source().calls(), 0);
}

#[tokio::test]
async fn every_call_failing_is_no_results() {
    let source = FakeSource { fail_all: true, ..FakeSource::default() }.with_recipe("1", &["egg"]);
    let finder = RecipeFinder::new(source, options(3));
    assert!(matches!(finder.find("egg, rice").await, SearchOutcome::NoResults));
    assert_eq!(finder.source().calls(), 2, "one filter call per ingredient, nothing to resolve");
}

#[tokio::test]
async fn unknown_ingredients_are_no_results() {
    let source = FakeSource::default().with_recipe("1", &["egg"]);
    let finder = RecipeFinder::new(source, options(3));
    assert!(matches!(finder.find("saffron").await, SearchOutcome::NoResults));
}

#[tokio::test]
async fn duplicate_ingredients_query_once() {
    let source = FakeSource::default().with_recipe("1", &["egg"]);
    let finder = RecipeFinder::new(source, options(3));
    assert!(matches!(finder.find("egg, EGG , egg").await, SearchOutcome::Found(_)));
    assert_eq!(finder.source().calls(), 2, "one filter call plus one lookup");
}

#[tokio::test]
async fn candidate_cap_bounds_lookups() {
    let source = FakeSource::default()
        .with_recipe("1", &["egg"])
        .with_recipe("2", &["egg"])
        .with_recipe("3", &["egg"]);
    let finder = RecipeFinder::new(source, SearchOptions { max_candidates: Some(2), ..options(10) });
    let SearchOutcome::Found(results) = finder.find("egg").await else {
        panic!("expected results");
    };
    let ids: Vec<_> = results.matches.iter().map(|m| m.recipe.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(finder.source().calls(), 3);
}

#[tokio::test]
async fn ties_keep_identifier_order() {
    let source = FakeSource::default()
        .with_recipe("30", &["egg", "rice"])
        .with_recipe("12", &["egg", "beans"])
        .with_recipe("21", &["egg", "rice", "beans"]);
    let finder = RecipeFinder::new(source, options(3));
    let SearchOutcome::Found(results) = finder.find("egg, rice").await else {
        panic!("expected results");
    };
    let ids: Vec<_> = results.matches.iter().map(|m| m.recipe.id.as_str()).collect();
    assert_eq!(ids, vec!["21", "30", "12"]);
}

#[tokio::test]
async fn numeric_ids_order_by_value() {
    let source = FakeSource::default()
        .with_recipe("10", &["egg"])
        .with_recipe("9", &["egg"])
        .with_recipe("100", &["egg"]);
    let finder = RecipeFinder::new(source, SearchOptions { max_candidates: Some(2), ..options(3) });
    let SearchOutcome::Found(results) = finder.find("egg").await else {
        panic!("expected results");
    };
    let ids: Vec<_> = results.matches.iter().map(|m| m.recipe.id.as_str()).collect();
    assert_eq!(ids, vec!["9", "10"]);
}

#[test]
fn id_order_puts_numbers_first() {
    let mut ids = vec!["abc", "52772", "9", "0100", "100"];
    ids.sort_by(|a, b| id_order(a, b));
    assert_eq!(ids, vec!["9", "0100", "100", "52772", "abc"]);
}

struct Dictionary;

#[async_trait]
impl Translator for Dictionary {
    async fn translate(&self, text: &str, _source: &str, target: &str) -> LookupResult<String> {
        let out = match (text, target) {
            ("ovo", "en") => "Egg",
            ("farinha", "en") => "flour",
            ("Recipe 7", "pt") => "Receita 7",
            ("egg", "pt") => "ovo",
            _ => return Err(LookupError::Network("no entry".into())),
        };
        Ok(out.to_string())
    }
}

#[tokio::test]
async fn translates_both_ways_with_fallback() {
    let source = FakeSource::default().with_recipe("7", &["egg", "flour", "sugar"]);
    let finder = RecipeFinder::new(source, options(3))
        .with_translator(Box::new(Dictionary), Languages { user: "pt".into(), lookup: "en".into() });

    let SearchOutcome::Found(results) = finder.find("Ovo, farinha, açúcar").await else {
        panic!("expected results");
    };
    assert_eq!(results.user.entries(), &["egg", "flour", "açúcar"]);
    let best = &results.matches[0];
    assert_eq!(best.score, MatchScore { matches: 2, total: 3 });

    let shown = finder.localize(best, &results.user).await;
    assert_eq!(shown.name, "Receita 7");
    assert_eq!(shown.ingredients[0].name, "ovo");
    assert!(shown.ingredients[0].have);
    assert_eq!(shown.ingredients[2].name, "sugar", "untranslatable name is kept");
    assert!(!shown.ingredients[2].have);
    assert!(shown.partially_translated);
    assert_eq!(shown.coverage_percent, 66);
}
