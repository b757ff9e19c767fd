use crate::matching::RecipeMatch;

/// Per-user state owned by whatever drives the interface.
///
/// Holds the recipes the user chose to keep and the most recent ranked
/// results so they can be shown again without another lookup.
#[derive(Debug, Default)]
pub struct Session {
    saved: Vec<RecipeMatch>,
    last_results: Vec<RecipeMatch>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a recipe with the same id is already saved.
    pub fn add(&mut self, entry: RecipeMatch) -> bool {
        if self.saved.iter().any(|s| s.recipe.id == entry.recipe.id) {
            return false;
        }
        self.saved.push(entry);
        true
    }

    pub fn remove(&mut self, recipe_id: &str) -> Option<RecipeMatch> {
        let pos = self.saved.iter().position(|s| s.recipe.id == recipe_id)?;
        Some(self.saved.remove(pos))
    }

    pub fn clear(&mut self) {
        self.saved.clear();
    }

    pub fn saved(&self) -> &[RecipeMatch] {
        &self.saved
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    pub fn set_last_results(&mut self, results: Vec<RecipeMatch>) {
        self.last_results = results;
    }

    pub fn last_results(&self) -> &[RecipeMatch] {
        &self.last_results
    }

    /// Save the `index`-th (zero based) entry of the last results.
    pub fn save_from_last(&mut self, index: usize) -> Option<bool> {
        let entry = self.last_results.get(index)?.clone();
        Some(self.add(entry))
    }
}
