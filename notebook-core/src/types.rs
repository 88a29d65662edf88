use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned recipe identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub i64);

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recipe categories offered by the form.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Savory,
    Sweet,
    Beverage,
    Healthy,
}

impl Category {
    /// All categories in the order the form lists them
    pub const ALL: &'static [Category] = &[
        Category::Savory,
        Category::Sweet,
        Category::Beverage,
        Category::Healthy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Savory => "savory",
            Category::Sweet => "sweet",
            Category::Beverage => "beverage",
            Category::Healthy => "healthy",
        }
    }

    /// Case-insensitive parse of the stored/submitted name.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "savory" => Some(Category::Savory),
            "sweet" => Some(Category::Sweet),
            "beverage" => Some(Category::Beverage),
            "healthy" => Some(Category::Healthy),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Base64 text of a normalized JPEG, as produced by [`crate::photo::normalize`].
///
/// The store persists it verbatim and never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedPhoto(String);

impl EncodedPhoto {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    /// Wrap text read back from storage. No validation happens here;
    /// [`crate::photo::denormalize`] reports corrupt payloads.
    pub fn from_stored(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A persisted recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub category: Category,
    /// Free text, e.g. "40 min"; never parsed.
    pub prep_time: String,
    pub ingredients: Option<String>,
    /// Preparation instructions.
    pub body: String,
    pub photo: Option<EncodedPhoto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A recipe that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecipe {
    pub name: String,
    pub category: Category,
    pub prep_time: String,
    pub ingredients: Option<String>,
    pub body: String,
    pub photo: Option<EncodedPhoto>,
}

/// What an update does to the stored photo.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum PhotoChange {
    /// Leave whatever is stored untouched.
    #[default]
    Keep,
    Replace(EncodedPhoto),
    /// Explicitly drop the stored photo.
    Clear,
}

/// Partial update; `None` fields are left as stored.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub prep_time: Option<String>,
    /// `Some(None)` clears the ingredients.
    pub ingredients: Option<Option<String>>,
    pub body: Option<String>,
    pub photo: PhotoChange,
}

impl RecipePatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.prep_time.is_none()
            && self.ingredients.is_none()
            && self.body.is_none()
            && self.photo == PhotoChange::Keep
    }
}

/// Outcome of an update or delete keyed by id.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("Sweet"), Some(Category::Sweet));
        assert_eq!(Category::parse(" BEVERAGE "), Some(Category::Beverage));
        assert_eq!(Category::parse("dessert"), None);
    }

    #[test]
    fn test_category_round_trips_through_as_str() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(*category));
        }
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Healthy).unwrap();
        assert_eq!(json, "\"healthy\"");
    }

    #[test]
    fn test_empty_patch() {
        assert!(RecipePatch::default().is_empty());

        let patch = RecipePatch {
            photo: PhotoChange::Clear,
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
