use chrono::NaiveDateTime;
use diesel::prelude::*;
use notebook_core::{
    Category, EncodedPhoto, PhotoChange, Recipe, RecipeId, RecipePatch, StoreError,
};

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::recipes)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecipeRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub prep_time: String,
    pub ingredients: Option<String>,
    pub body: String,
    pub photo: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl RecipeRow {
    pub fn into_recipe(self) -> Result<Recipe, StoreError> {
        let category = Category::parse(&self.category).ok_or_else(|| {
            StoreError::InvalidRecord(format!(
                "recipe {} has unknown category {:?}",
                self.id, self.category
            ))
        })?;

        Ok(Recipe {
            id: RecipeId(self.id),
            name: self.name,
            category,
            prep_time: self.prep_time,
            ingredients: self.ingredients,
            body: self.body,
            photo: self.photo.map(EncodedPhoto::from_stored),
            created_at: self.created_at.and_utc(),
            updated_at: self.updated_at.and_utc(),
        })
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipes)]
pub struct NewRecipeRow<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub prep_time: &'a str,
    pub ingredients: Option<&'a str>,
    pub body: &'a str,
    pub photo: Option<&'a str>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Partial update. Outer `None` skips the column; `Some(None)` writes NULL.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::recipes)]
pub struct RecipeChangeset<'a> {
    pub name: Option<&'a str>,
    pub category: Option<&'a str>,
    pub prep_time: Option<&'a str>,
    pub ingredients: Option<Option<&'a str>>,
    pub body: Option<&'a str>,
    pub photo: Option<Option<&'a str>>,
    pub updated_at: NaiveDateTime,
}

impl<'a> RecipeChangeset<'a> {
    pub fn from_patch(patch: &'a RecipePatch, updated_at: NaiveDateTime) -> Self {
        let photo = match &patch.photo {
            PhotoChange::Keep => None,
            PhotoChange::Replace(photo) => Some(Some(photo.as_str())),
            PhotoChange::Clear => Some(None),
        };

        Self {
            name: patch.name.as_deref(),
            category: patch.category.map(|c| c.as_str()),
            prep_time: patch.prep_time.as_deref(),
            ingredients: patch.ingredients.as_ref().map(|i| i.as_deref()),
            body: patch.body.as_deref(),
            photo,
            updated_at,
        }
    }
}
