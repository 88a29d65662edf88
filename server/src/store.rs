//! SQLite-backed [`RecipeStore`].

use chrono::Utc;
use diesel::prelude::*;
use notebook_core::{Mutation, NewRecipe, Recipe, RecipeId, RecipePatch, RecipeStore, StoreError};

use crate::db::{DbConn, DbPool};
use crate::models::{NewRecipeRow, RecipeChangeset, RecipeRow};
use crate::schema::recipes;

/// Recipe store on top of a diesel connection pool. Each call checks out a
/// connection and returns it to the pool when done.
#[derive(Clone)]
pub struct SqliteRecipeStore {
    pool: DbPool,
}

impl SqliteRecipeStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<DbConn, StoreError> {
        self.pool.get().map_err(|e| {
            tracing::error!("Failed to get DB connection: {}", e);
            StoreError::Unavailable(e.to_string())
        })
    }
}

fn query_error(e: diesel::result::Error) -> StoreError {
    tracing::error!("Recipe query failed: {}", e);
    StoreError::Query(e.to_string())
}

impl RecipeStore for SqliteRecipeStore {
    fn insert(&self, recipe: &NewRecipe) -> Result<RecipeId, StoreError> {
        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let row = NewRecipeRow {
            name: &recipe.name,
            category: recipe.category.as_str(),
            prep_time: &recipe.prep_time,
            ingredients: recipe.ingredients.as_deref(),
            body: &recipe.body,
            photo: recipe.photo.as_ref().map(|p| p.as_str()),
            created_at: now,
            updated_at: now,
        };

        let id: i64 = diesel::insert_into(recipes::table)
            .values(&row)
            .returning(recipes::id)
            .get_result(&mut conn)
            .map_err(query_error)?;

        Ok(RecipeId(id))
    }

    fn list_all(&self) -> Result<Vec<Recipe>, StoreError> {
        let mut conn = self.conn()?;

        let rows: Vec<RecipeRow> = recipes::table
            .select(RecipeRow::as_select())
            .order(recipes::id.asc())
            .load(&mut conn)
            .map_err(query_error)?;

        rows.into_iter().map(RecipeRow::into_recipe).collect()
    }

    fn get(&self, id: RecipeId) -> Result<Option<Recipe>, StoreError> {
        let mut conn = self.conn()?;

        let row: Option<RecipeRow> = recipes::table
            .find(id.0)
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(query_error)?;

        row.map(RecipeRow::into_recipe).transpose()
    }

    fn update(&self, id: RecipeId, patch: &RecipePatch) -> Result<Mutation, StoreError> {
        let mut conn = self.conn()?;

        // Nothing to write, but callers still need to know whether the row exists
        if patch.is_empty() {
            let exists: bool = diesel::select(diesel::dsl::exists(recipes::table.find(id.0)))
                .get_result(&mut conn)
                .map_err(query_error)?;
            return Ok(if exists {
                Mutation::Applied
            } else {
                Mutation::NotFound
            });
        }

        let changeset = RecipeChangeset::from_patch(patch, Utc::now().naive_utc());
        let updated = diesel::update(recipes::table.find(id.0))
            .set(&changeset)
            .execute(&mut conn)
            .map_err(query_error)?;

        Ok(if updated == 0 {
            Mutation::NotFound
        } else {
            Mutation::Applied
        })
    }

    fn delete(&self, id: RecipeId) -> Result<Mutation, StoreError> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(recipes::table.find(id.0))
            .execute(&mut conn)
            .map_err(query_error)?;

        Ok(if deleted == 0 {
            Mutation::NotFound
        } else {
            Mutation::Applied
        })
    }
}
