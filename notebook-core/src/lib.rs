pub mod error;
pub mod notebook;
pub mod photo;
pub mod store;
pub mod types;

pub use error::{NotebookError, PhotoError, PhotoUnavailable, StoreError, ValidationError};
pub use notebook::{
    edit_recipe, matches_query, remove_recipe, save_recipe, search_recipes, validate_form,
    PhotoStatus, RecipeEdit, RecipeForm, SavedRecipe,
};
pub use photo::{
    denormalize, encode_photo, normalize, normalize_with, validate_image, PhotoOutcome,
    PhotoSettings, MAX_FILE_SIZE,
};
pub use store::{MemoryRecipeStore, RecipeStore};
pub use types::{
    Category, EncodedPhoto, Mutation, NewRecipe, PhotoChange, Recipe, RecipeId, RecipePatch,
};
