//! The recipe store contract and an in-memory implementation.

use std::sync::RwLock;

use chrono::Utc;

use crate::error::StoreError;
use crate::types::{Mutation, NewRecipe, PhotoChange, Recipe, RecipeId, RecipePatch};

/// Persistence for recipes: one flat table keyed by [`RecipeId`].
///
/// Implementations hand out fresh, never-reused ids and return `list_all`
/// in ascending id order. Photos are stored verbatim; a [`PhotoChange::Keep`]
/// patch must leave the stored photo untouched.
pub trait RecipeStore: Send + Sync {
    fn insert(&self, recipe: &NewRecipe) -> Result<RecipeId, StoreError>;

    fn list_all(&self) -> Result<Vec<Recipe>, StoreError>;

    fn get(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError>;

    fn update(&self, id: RecipeId, patch: &RecipePatch) -> Result<Mutation, StoreError>;

    fn delete(&self, id: RecipeId) -> Result<Mutation, StoreError>;
}

/// Apply a patch to an in-memory recipe. Returns whether anything changed.
fn apply_patch(recipe: &mut Recipe, patch: &RecipePatch) {
    // An empty patch leaves the record, including updated_at, untouched
    if patch.is_empty() {
        return;
    }

    if let Some(ref name) = patch.name {
        recipe.name = name.clone();
    }
    if let Some(category) = patch.category {
        recipe.category = category;
    }
    if let Some(ref prep_time) = patch.prep_time {
        recipe.prep_time = prep_time.clone();
    }
    if let Some(ref ingredients) = patch.ingredients {
        recipe.ingredients = ingredients.clone();
    }
    if let Some(ref body) = patch.body {
        recipe.body = body.clone();
    }
    match &patch.photo {
        PhotoChange::Keep => {}
        PhotoChange::Replace(photo) => recipe.photo = Some(photo.clone()),
        PhotoChange::Clear => recipe.photo = None,
    }

    recipe.updated_at = Utc::now();
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    recipes: Vec<Recipe>,
}

/// A [`RecipeStore`] that keeps everything in memory.
///
/// Ids start at 1 and are never reused, even after deletes.
#[derive(Debug, Default)]
pub struct MemoryRecipeStore {
    state: RwLock<MemoryState>,
}

impl MemoryRecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, MemoryState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, MemoryState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl RecipeStore for MemoryRecipeStore {
    fn insert(&self, recipe: &NewRecipe) -> Result<RecipeId, StoreError> {
        let mut state = self.write()?;
        state.last_id += 1;
        let id = RecipeId(state.last_id);
        let now = Utc::now();

        state.recipes.push(Recipe {
            id,
            name: recipe.name.clone(),
            category: recipe.category,
            prep_time: recipe.prep_time.clone(),
            ingredients: recipe.ingredients.clone(),
            body: recipe.body.clone(),
            photo: recipe.photo.clone(),
            created_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<Recipe>, StoreError> {
        // Pushed in id order, so already sorted
        Ok(self.read()?.recipes.clone())
    }

    fn get(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        Ok(self.read()?.recipes.iter().find(|r| r.id == id).cloned())
    }

    fn update(&self, id: RecipeId, patch: &RecipePatch) -> Result<Mutation, StoreError> {
        let mut state = self.write()?;
        match state.recipes.iter_mut().find(|r| r.id == id) {
            Some(recipe) => {
                apply_patch(recipe, patch);
                Ok(Mutation::Applied)
            }
            None => Ok(Mutation::NotFound),
        }
    }

    fn delete(&self, id: RecipeId) -> Result<Mutation, StoreError> {
        let mut state = self.write()?;
        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);

        if state.recipes.len() == before {
            Ok(Mutation::NotFound)
        } else {
            Ok(Mutation::Applied)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, EncodedPhoto};

    fn cake() -> NewRecipe {
        NewRecipe {
            name: "Cake".to_string(),
            category: Category::Sweet,
            prep_time: "40 min".to_string(),
            ingredients: Some("flour\neggs".to_string()),
            body: "Mix and bake".to_string(),
            photo: Some(EncodedPhoto::from_stored("aGVsbG8=".to_string())),
        }
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = MemoryRecipeStore::new();
        assert_eq!(store.insert(&cake()).unwrap(), RecipeId(1));
        assert_eq!(store.insert(&cake()).unwrap(), RecipeId(2));
    }

    #[test]
    fn test_insert_then_list() {
        let store = MemoryRecipeStore::new();
        let id = store.insert(&cake()).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].name, "Cake");
        assert_eq!(all[0].category, Category::Sweet);
        assert_eq!(all[0].prep_time, "40 min");
        assert_eq!(all[0].ingredients.as_deref(), Some("flour\neggs"));
        assert_eq!(all[0].body, "Mix and bake");
        assert_eq!(all[0].photo, cake().photo);
    }

    #[test]
    fn test_update_without_photo_keeps_photo() {
        let store = MemoryRecipeStore::new();
        let id = store.insert(&cake()).unwrap();

        let patch = RecipePatch {
            body: Some("new".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update(id, &patch).unwrap(), Mutation::Applied);

        let recipe = store.get(id).unwrap().unwrap();
        assert_eq!(recipe.body, "new");
        assert_eq!(recipe.photo, cake().photo);
    }

    #[test]
    fn test_update_clear_photo() {
        let store = MemoryRecipeStore::new();
        let id = store.insert(&cake()).unwrap();

        let patch = RecipePatch {
            photo: PhotoChange::Clear,
            ..Default::default()
        };
        assert_eq!(store.update(id, &patch).unwrap(), Mutation::Applied);
        assert!(store.get(id).unwrap().unwrap().photo.is_none());
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let store = MemoryRecipeStore::new();
        let patch = RecipePatch {
            name: Some("x".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update(RecipeId(9), &patch).unwrap(), Mutation::NotFound);
    }

    #[test]
    fn test_delete_twice() {
        let store = MemoryRecipeStore::new();
        let id = store.insert(&cake()).unwrap();

        assert_eq!(store.delete(id).unwrap(), Mutation::Applied);
        assert_eq!(store.delete(id).unwrap(), Mutation::NotFound);
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryRecipeStore::new();
        let first = store.insert(&cake()).unwrap();
        let _ = store.delete(first).unwrap();
        let second = store.insert(&cake()).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_empty_update_leaves_record_untouched() {
        let store = MemoryRecipeStore::new();
        let id = store.insert(&cake()).unwrap();
        let before = store.get(id).unwrap().unwrap();

        assert_eq!(
            store.update(id, &RecipePatch::default()).unwrap(),
            Mutation::Applied
        );
        assert_eq!(store.get(id).unwrap().unwrap(), before);
        assert_eq!(
            store.update(RecipeId(9), &RecipePatch::default()).unwrap(),
            Mutation::NotFound
        );
    }
}
