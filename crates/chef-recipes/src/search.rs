//! Ingredient search pipeline: per-ingredient lookup, candidate resolution,
//! scoring and ranking.
//!
//! Every external call may fail on its own. A failed call only removes that
//! ingredient or recipe from consideration; the request as a whole ends in
//! [`SearchOutcome::NoResults`] when nothing usable is left.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use chef_core::matching::{mark_ingredients, rank, score_recipe, IngredientMark, RecipeMatch, UserIngredients};
use chef_core::traits::{RecipeSource, Translator};
use chef_core::translate::{translate_long, translate_or_keep, IdentityTranslator};
use chef_core::types::{Recipe, RecipeId};

/// Numeric identifiers sort by value and before any non-numeric one;
/// everything else sorts as text.
pub fn id_order(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Language pair used to talk to the lookup service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Languages {
    pub user: String,
    pub lookup: String,
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Resolve at most this many candidate identifiers (lowest ids first).
    pub max_candidates: Option<usize>,
    pub max_results: usize,
    pub languages: Option<Languages>,
    pub show_progress: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { max_candidates: None, max_results: 3, languages: None, show_progress: false }
    }
}

#[derive(Debug, Clone)]
pub struct SearchResults {
    /// The user's ingredients as sent to the lookup service.
    pub user: UserIngredients,
    pub matches: Vec<RecipeMatch>,
}

#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// The input held no ingredient; nothing was looked up.
    NeedIngredients,
    /// No recipe matched any ingredient, or every lookup failed.
    NoResults,
    Found(SearchResults),
}

/// A recipe prepared for display in the user's language.
#[derive(Debug, Clone)]
pub struct LocalizedRecipe {
    pub recipe: Recipe,
    pub name: String,
    pub instructions: String,
    pub ingredients: Vec<IngredientMark>,
    pub coverage_percent: u8,
    /// Some text could not be translated and is shown in the lookup language.
    pub partially_translated: bool,
}

pub struct RecipeFinder<S>
where
    S: RecipeSource,
{
    source: S,
    translator: Box<dyn Translator>,
    options: SearchOptions,
}

impl<S> RecipeFinder<S>
where
    S: RecipeSource,
{
    pub fn new(source: S, options: SearchOptions) -> Self {
        Self { source, translator: Box::new(IdentityTranslator), options }
    }

    pub fn with_translator(mut self, translator: Box<dyn Translator>, languages: Languages) -> Self {
        self.translator = translator;
        self.options.languages = Some(languages);
        self
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn find(&self, input: &str) -> SearchOutcome {
        let user = UserIngredients::parse(input);
        if user.is_empty() {
            return SearchOutcome::NeedIngredients;
        }
        let user = self.to_lookup_language(user).await;

        let ids = self.collect_candidate_ids(&user).await;
        if ids.is_empty() {
            info!("no candidate recipes for {:?}", user.entries());
            return SearchOutcome::NoResults;
        }

        let candidates = self.resolve_candidates(&ids, &user).await;
        let matches = rank(candidates, self.options.max_results);
        if matches.is_empty() {
            return SearchOutcome::NoResults;
        }
        SearchOutcome::Found(SearchResults { user, matches })
    }

    async fn to_lookup_language(&self, user: UserIngredients) -> UserIngredients {
        let Some(langs) = &self.options.languages else {
            return user;
        };
        let mut translated = Vec::with_capacity(user.entries().len());
        for entry in user.entries() {
            let t = translate_or_keep(self.translator.as_ref(), entry, &langs.user, &langs.lookup).await;
            translated.push(t.text);
        }
        UserIngredients::from_entries(translated)
    }

    /// Union of the identifiers returned for each distinct ingredient, in
    /// [`id_order`].
    async fn collect_candidate_ids(&self, user: &UserIngredients) -> Vec<RecipeId> {
        let mut ids = BTreeSet::new();
        for ingredient in user.distinct() {
            match self.source.ids_for_ingredient(ingredient).await {
                Ok(found) => ids.extend(found),
                Err(e) => warn!("skipping ingredient {ingredient:?}: {e}"),
            }
        }
        let mut ids: Vec<RecipeId> = ids.into_iter().collect();
        ids.sort_by(|a, b| id_order(a, b));
        ids
    }

    async fn resolve_candidates(&self, ids: &[RecipeId], user: &UserIngredients) -> Vec<RecipeMatch> {
        let take = self.options.max_candidates.unwrap_or(ids.len()).min(ids.len());
        let pb = self.progress_bar(take as u64);
        let mut out = Vec::new();
        let mut failed = 0usize;
        for id in ids.iter().take(take) {
            pb.set_message(format!("recipe {id}"));
            match self.source.recipe(id).await {
                Ok(recipe) => {
                    let score = score_recipe(&recipe, user);
                    if score.matches > 0 {
                        out.push(RecipeMatch { recipe, score });
                    }
                }
                Err(e) => {
                    failed += 1;
                    warn!("skipping recipe {id}: {e}");
                }
            }
            pb.inc(1);
        }
        pb.finish_and_clear();
        info!("resolved {} of {} candidates, {} failed, {} matched", take - failed, ids.len(), failed, out.len());
        out
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        let style = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb
    }

    /// Translate a match back into the user's language for display.
    ///
    /// Ingredient marks are computed on the untranslated names, so a
    /// translation can never flip a ✓ into a ✗.
    pub async fn localize(&self, m: &RecipeMatch, user: &UserIngredients) -> LocalizedRecipe {
        let mut ingredients = mark_ingredients(&m.recipe, user);
        let coverage_percent = m.score.coverage_percent(user.distinct_count());
        let Some(langs) = &self.options.languages else {
            return LocalizedRecipe {
                recipe: m.recipe.clone(),
                name: m.recipe.name.clone(),
                instructions: m.recipe.instructions.clone(),
                ingredients,
                coverage_percent,
                partially_translated: false,
            };
        };
        let translator = self.translator.as_ref();
        let name = translate_or_keep(translator, &m.recipe.name, &langs.lookup, &langs.user).await;
        let instructions = translate_long(translator, &m.recipe.instructions, &langs.lookup, &langs.user).await;
        let mut fell_back = name.fell_back || instructions.fell_back;
        for mark in &mut ingredients {
            let t = translate_or_keep(translator, &mark.name, &langs.lookup, &langs.user).await;
            fell_back |= t.fell_back;
            mark.name = t.text;
        }
        LocalizedRecipe {
            recipe: m.recipe.clone(),
            name: name.text,
            instructions: instructions.text,
            ingredients,
            coverage_percent,
            partially_translated: fell_back,
        }
    }
}
