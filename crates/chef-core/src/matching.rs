//! Ingredient matching and recipe ranking.
//!
//! Matching is exact string equality after [`normalize`]; "tomato" and
//! "tomatoes" are different ingredients.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::Recipe;

pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// The user's ingredients, in the order they were typed.
///
/// Duplicates are kept in `entries` but membership tests go through a set,
/// so repeating an ingredient never inflates a score.
#[derive(Debug, Clone, Default)]
pub struct UserIngredients {
    entries: Vec<String>,
    set: HashSet<String>,
}

impl UserIngredients {
    /// Split on commas, trim, drop empties, lowercase.
    pub fn parse(input: &str) -> Self {
        Self::from_entries(input.split(','))
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|e| normalize(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        let set = entries.iter().cloned().collect();
        Self { entries, set }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Distinct ingredients in first-seen order.
    pub fn distinct(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| seen.insert(e.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn distinct_count(&self) -> usize {
        self.set.len()
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.set.contains(ingredient)
    }

    pub fn set(&self) -> &HashSet<String> {
        &self.set
    }
}

/// Normalized, non-empty ingredient names of a recipe in slot order.
pub fn candidate_ingredients(recipe: &Recipe) -> Vec<String> {
    recipe
        .ingredient_names()
        .map(normalize)
        .filter(|name| !name.is_empty())
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub matches: usize,
    pub total: usize,
}

impl MatchScore {
    /// `matches / total`, or 0 for a recipe without ingredients.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matches as f64 / self.total as f64
        }
    }

    /// Share of the user's distinct ingredients the recipe uses, as a whole
    /// percentage capped at 100.
    pub fn coverage_percent(&self, user_count: usize) -> u8 {
        if user_count == 0 {
            return 0;
        }
        let pct = self.matches.saturating_mul(100) / user_count;
        pct.min(100) as u8
    }
}

pub fn score(candidate: &[String], user: &HashSet<String>) -> MatchScore {
    let matches = candidate.iter().filter(|c| user.contains(c.as_str())).count();
    MatchScore { matches, total: candidate.len() }
}

pub fn score_recipe(recipe: &Recipe, user: &UserIngredients) -> MatchScore {
    score(&candidate_ingredients(recipe), user.set())
}

/// Whether the user has each of the recipe's ingredients, in slot order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientMark {
    pub name: String,
    pub measure: Option<String>,
    pub have: bool,
}

pub fn mark_ingredients(recipe: &Recipe, user: &UserIngredients) -> Vec<IngredientMark> {
    recipe
        .ingredients
        .iter()
        .filter(|i| !i.name.trim().is_empty())
        .map(|i| IngredientMark {
            name: i.name.trim().to_string(),
            measure: i.measure.clone(),
            have: user.contains(&normalize(&i.name)),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMatch {
    pub recipe: Recipe,
    pub score: MatchScore,
}

/// Order by descending match count and keep at most `max` entries.
///
/// The sort is stable: recipes with equal counts keep their input order, so
/// ranking an already ranked list changes nothing.
pub fn rank(mut candidates: Vec<RecipeMatch>, max: usize) -> Vec<RecipeMatch> {
    candidates.sort_by(|a, b| b.score.matches.cmp(&a.score.matches));
    candidates.truncate(max);
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ingredient;

    fn recipe(id: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: id.to_string(),
            name: format!("Recipe {id}"),
            instructions: String::new(),
            ingredients: ingredients
                .iter()
                .map(|n| Ingredient { name: n.to_string(), measure: None })
                .collect(),
            source_url: None,
            video_url: None,
            category: None,
            area: None,
            thumbnail: None,
        }
    }

    #[test]
    fn parse_trims_lowercases_and_drops_empties() {
        let user = UserIngredients::parse(" Egg, ,FLOUR ,sugar,, ");
        assert_eq!(user.entries(), &["egg", "flour", "sugar"]);
        assert!(UserIngredients::parse("  , ,").is_empty());
    }

    #[test]
    fn duplicates_do_not_count_twice() {
        let user = UserIngredients::parse("egg, egg, Egg");
        assert_eq!(user.entries().len(), 3);
        assert_eq!(user.distinct(), vec!["egg"]);
        assert_eq!(user.distinct_count(), 1);
    }

    #[test]
    fn score_counts_present_ingredients() {
        let user = UserIngredients::parse("egg, flour, sugar");
        let r = recipe("1", &["Egg", " flour ", "sugar", "butter"]);
        let s = score_recipe(&r, &user);
        assert_eq!(s, MatchScore { matches: 3, total: 4 });
        assert!((s.ratio() - 0.75).abs() < 1e-12);
        assert_eq!(s.coverage_percent(user.distinct_count()), 100);
    }

    #[test]
    fn empty_candidate_has_zero_ratio() {
        let user = UserIngredients::parse("egg");
        let s = score(&[], user.set());
        assert_eq!(s.matches, 0);
        assert_eq!(s.total, 0);
        assert_eq!(s.ratio(), 0.0);
    }

    #[test]
    fn plural_forms_do_not_match() {
        let user = UserIngredients::parse("tomato");
        let s = score(&["tomatoes".to_string()], user.set());
        assert_eq!(s.matches, 0);
    }

    #[test]
    fn blank_slots_are_not_ingredients() {
        let r = recipe("1", &["egg", "  ", ""]);
        assert_eq!(candidate_ingredients(&r), vec!["egg"]);
    }

    #[test]
    fn coverage_is_capped_and_floored() {
        let s = MatchScore { matches: 2, total: 10 };
        assert_eq!(s.coverage_percent(3), 66);
        assert_eq!(s.coverage_percent(1), 100);
        assert_eq!(s.coverage_percent(0), 0);
    }

    #[test]
    fn marks_follow_slot_order() {
        let user = UserIngredients::parse("flour");
        let marks = mark_ingredients(&recipe("1", &["Egg", "Flour"]), &user);
        assert_eq!(marks.len(), 2);
        assert_eq!(marks[0].name, "Egg");
        assert!(!marks[0].have);
        assert!(marks[1].have);
    }

    #[test]
    fn rank_is_stable_and_truncates() {
        let m = |id: &str, matches| RecipeMatch {
            recipe: recipe(id, &[]),
            score: MatchScore { matches, total: 5 },
        };
        let ranked = rank(vec![m("a", 1), m("b", 3), m("c", 1), m("d", 3)], 3);
        let ids: Vec<_> = ranked.iter().map(|r| r.recipe.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a"]);
    }
}
