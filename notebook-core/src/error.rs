use thiserror::Error;

use crate::types::RecipeId;

/// Reasons an uploaded photo could not be turned into a stored photo.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    #[error("Photo is empty")]
    Empty,

    #[error("Photo too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Could not detect image format")]
    UnknownFormat,

    #[error("Unsupported image format: {0}. Allowed: JPEG, PNG, GIF, WebP")]
    UnsupportedFormat(String),

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Why a stored photo can't be shown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PhotoUnavailable {
    #[error("Recipe has no photo")]
    NoPhoto,

    #[error("Stored photo is corrupt: {0}")]
    Corrupt(String),
}

/// A recipe form that must not reach the store.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name cannot be empty")]
    MissingName,

    #[error("Preparation instructions cannot be empty")]
    MissingBody,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store query failed: {0}")]
    Query(String),

    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

#[derive(Error, Debug)]
pub enum NotebookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Recipe {0} not found")]
    NotFound(RecipeId),

    #[error(transparent)]
    Store(#[from] StoreError),
}
