//! Form-level operations: validate, normalize the photo, then hit the store.

use crate::error::{NotebookError, ValidationError};
use crate::photo::{normalize_with, PhotoOutcome, PhotoSettings};
use crate::store::RecipeStore;
use crate::types::{
    Category, EncodedPhoto, Mutation, NewRecipe, PhotoChange, Recipe, RecipeId, RecipePatch,
};

/// Fields collected by the "add recipe" form.
#[derive(Debug, Clone, Default)]
pub struct RecipeForm {
    pub name: String,
    pub category: Category,
    pub prep_time: String,
    pub ingredients: Option<String>,
    pub body: String,
    /// Raw uploaded bytes, if the user attached a photo.
    pub photo: Option<Vec<u8>>,
}

/// Fields collected by the "edit recipe" form. `None` leaves a field as stored.
#[derive(Debug, Clone, Default)]
pub struct RecipeEdit {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub prep_time: Option<String>,
    pub ingredients: Option<Option<String>>,
    pub body: Option<String>,
    /// Replacement photo upload.
    pub photo: Option<Vec<u8>>,
    /// Drop the stored photo. Ignored when a replacement photo is uploaded.
    pub remove_photo: bool,
}

/// What happened to the photo part of a save or edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoStatus {
    /// No photo was uploaded.
    None,
    Attached,
    /// A photo was uploaded but couldn't be processed; the recipe text was still saved.
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedRecipe {
    pub id: RecipeId,
    pub photo: PhotoStatus,
}

/// Check the fields a new recipe can't be saved without.
pub fn validate_form(name: &str, body: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if body.trim().is_empty() {
        return Err(ValidationError::MissingBody);
    }
    Ok(())
}

fn split_outcome(outcome: PhotoOutcome) -> (PhotoStatus, Option<EncodedPhoto>) {
    match outcome {
        PhotoOutcome::Absent => (PhotoStatus::None, None),
        PhotoOutcome::Encoded(photo) => (PhotoStatus::Attached, Some(photo)),
        PhotoOutcome::Unprocessable(e) => (PhotoStatus::Rejected(e.to_string()), None),
    }
}

/// Save a new recipe. A bad photo never blocks the save.
pub fn save_recipe(
    store: &dyn RecipeStore,
    settings: &PhotoSettings,
    form: RecipeForm,
) -> Result<SavedRecipe, NotebookError> {
    validate_form(&form.name, &form.body)?;

    let (photo_status, photo) = split_outcome(normalize_with(settings, form.photo.as_deref()));

    let recipe = NewRecipe {
        name: form.name.trim().to_string(),
        category: form.category,
        prep_time: form.prep_time,
        ingredients: form.ingredients,
        body: form.body,
        photo,
    };

    let id = store.insert(&recipe).map_err(|e| {
        tracing::error!(error = %e, "Failed to insert recipe");
        e
    })?;

    tracing::info!(recipe_id = %id, photo = ?photo_status, "Saved recipe");

    Ok(SavedRecipe {
        id,
        photo: photo_status,
    })
}

/// Apply an edit to an existing recipe.
///
/// An unprocessable replacement photo leaves the stored photo as it was.
pub fn edit_recipe(
    store: &dyn RecipeStore,
    settings: &PhotoSettings,
    id: RecipeId,
    edit: RecipeEdit,
) -> Result<PhotoStatus, NotebookError> {
    if let Some(ref name) = edit.name {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }
    }
    if let Some(ref body) = edit.body {
        if body.trim().is_empty() {
            return Err(ValidationError::MissingBody.into());
        }
    }

    let (photo_status, photo) = split_outcome(normalize_with(settings, edit.photo.as_deref()));

    let photo_change = match photo {
        Some(photo) => PhotoChange::Replace(photo),
        None if edit.remove_photo && edit.photo.is_none() => PhotoChange::Clear,
        None => PhotoChange::Keep,
    };

    let patch = RecipePatch {
        name: edit.name.map(|n| n.trim().to_string()),
        category: edit.category,
        prep_time: edit.prep_time,
        ingredients: edit.ingredients,
        body: edit.body,
        photo: photo_change,
    };

    match store.update(id, &patch)? {
        Mutation::Applied => {
            tracing::info!(recipe_id = %id, photo = ?photo_status, "Updated recipe");
            Ok(photo_status)
        }
        Mutation::NotFound => Err(NotebookError::NotFound(id)),
    }
}

/// Delete a recipe. Deleting something already gone reports `NotFound`.
pub fn remove_recipe(store: &dyn RecipeStore, id: RecipeId) -> Result<Mutation, NotebookError> {
    let mutation = store.delete(id)?;
    if mutation == Mutation::Applied {
        tracing::info!(recipe_id = %id, "Deleted recipe");
    }
    Ok(mutation)
}

/// Case-insensitive substring match over the name and the instructions.
/// A blank query matches everything.
pub fn matches_query(recipe: &Recipe, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    recipe.name.to_lowercase().contains(&needle) || recipe.body.to_lowercase().contains(&needle)
}

/// All recipes matching `query`, in store order.
pub fn search_recipes(store: &dyn RecipeStore, query: &str) -> Result<Vec<Recipe>, NotebookError> {
    let recipes = store.list_all()?;
    Ok(recipes
        .into_iter()
        .filter(|r| matches_query(r, query))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecipeStore;
    use chrono::Utc;

    fn recipe(name: &str, body: &str) -> Recipe {
        Recipe {
            id: RecipeId(1),
            name: name.to_string(),
            category: Category::Savory,
            prep_time: String::new(),
            ingredients: None,
            body: body.to_string(),
            photo: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn form(name: &str, body: &str) -> RecipeForm {
        RecipeForm {
            name: name.to_string(),
            body: body.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_form() {
        assert_eq!(validate_form("Cake", "Mix"), Ok(()));
        assert_eq!(validate_form("  ", "Mix"), Err(ValidationError::MissingName));
        assert_eq!(validate_form("Cake", "\n\t"), Err(ValidationError::MissingBody));
    }

    #[test]
    fn test_invalid_form_never_reaches_store() {
        let store = MemoryRecipeStore::new();
        let result = save_recipe(&store, &PhotoSettings::default(), form("", "Mix"));
        assert!(matches!(
            result,
            Err(NotebookError::Validation(ValidationError::MissingName))
        ));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_bad_photo_still_saves_recipe() {
        let store = MemoryRecipeStore::new();
        let mut f = form("Soup", "Boil");
        f.photo = Some(b"definitely not a photo".to_vec());

        let saved = save_recipe(&store, &PhotoSettings::default(), f).unwrap();
        assert!(matches!(saved.photo, PhotoStatus::Rejected(_)));

        let stored = store.get(saved.id).unwrap().unwrap();
        assert_eq!(stored.name, "Soup");
        assert!(stored.photo.is_none());
    }

    #[test]
    fn test_save_without_photo() {
        let store = MemoryRecipeStore::new();
        let saved = save_recipe(&store, &PhotoSettings::default(), form("Tea", "Steep")).unwrap();
        assert_eq!(saved.photo, PhotoStatus::None);
    }

    #[test]
    fn test_edit_rejects_blank_body() {
        let store = MemoryRecipeStore::new();
        let saved = save_recipe(&store, &PhotoSettings::default(), form("Tea", "Steep")).unwrap();

        let edit = RecipeEdit {
            body: Some("   ".to_string()),
            ..Default::default()
        };
        let result = edit_recipe(&store, &PhotoSettings::default(), saved.id, edit);
        assert!(matches!(
            result,
            Err(NotebookError::Validation(ValidationError::MissingBody))
        ));
        assert_eq!(store.get(saved.id).unwrap().unwrap().body, "Steep");
    }

    #[test]
    fn test_edit_missing_recipe() {
        let store = MemoryRecipeStore::new();
        let edit = RecipeEdit {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        let result = edit_recipe(&store, &PhotoSettings::default(), RecipeId(42), edit);
        assert!(matches!(result, Err(NotebookError::NotFound(RecipeId(42)))));
    }

    #[test]
    fn test_matches_query_is_case_insensitive() {
        let r = recipe("Chocolate Cake", "Melt the BUTTER");
        assert!(matches_query(&r, "chocolate"));
        assert!(matches_query(&r, "butter"));
        assert!(matches_query(&r, "CAKE"));
        assert!(!matches_query(&r, "soup"));
    }

    #[test]
    fn test_blank_query_matches_everything() {
        let r = recipe("Tea", "Steep");
        assert!(matches_query(&r, ""));
        assert!(matches_query(&r, "   "));
    }

    #[test]
    fn test_query_ignores_other_fields() {
        let mut r = recipe("Tea", "Steep");
        r.prep_time = "5 min".to_string();
        r.ingredients = Some("mint".to_string());
        assert!(!matches_query(&r, "mint"));
        assert!(!matches_query(&r, "5 min"));
    }

    #[test]
    fn test_search_recipes() {
        let store = MemoryRecipeStore::new();
        save_recipe(&store, &PhotoSettings::default(), form("Cake", "Bake")).unwrap();
        save_recipe(&store, &PhotoSettings::default(), form("Soup", "Boil the cake? no")).unwrap();
        save_recipe(&store, &PhotoSettings::default(), form("Tea", "Steep")).unwrap();

        let found = search_recipes(&store, "cake").unwrap();
        let names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Cake", "Soup"]);
    }

    #[test]
    fn test_remove_recipe_twice() {
        let store = MemoryRecipeStore::new();
        let saved = save_recipe(&store, &PhotoSettings::default(), form("Tea", "Steep")).unwrap();
        assert_eq!(remove_recipe(&store, saved.id).unwrap(), Mutation::Applied);
        assert_eq!(remove_recipe(&store, saved.id).unwrap(), Mutation::NotFound);
    }
}
